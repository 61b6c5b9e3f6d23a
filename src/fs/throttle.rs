//! Bandwidth throttling for source reads
//!
//! Token-bucket rate limiting via the Governor crate. One token stands for
//! one KiB; a chunk waits for as many tokens as it spans.

use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const BYTES_PER_TOKEN: usize = 1024;

/// Bandwidth limiter for controlling transfer rates
#[derive(Clone)]
pub struct BandwidthLimiter {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    bytes_per_second: u64,
}

impl BandwidthLimiter {
    /// Create a new bandwidth limiter
    ///
    /// # Example
    /// ```
    /// use clonedrive::fs::BandwidthLimiter;
    /// let limiter = BandwidthLimiter::new(100 * 1024 * 1024); // 100 MB/s
    /// assert_eq!(limiter.bytes_per_second(), 100 * 1024 * 1024);
    /// ```
    pub fn new(bytes_per_second: u64) -> Self {
        let tokens_per_second = (bytes_per_second / BYTES_PER_TOKEN as u64).max(1);

        // Cap at u32::MAX to prevent overflow when casting
        let capped = tokens_per_second.min(u32::MAX as u64) as u32;
        let quota = Quota::per_second(NonZeroU32::new(capped).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            bytes_per_second,
        }
    }

    /// Configured rate
    pub fn bytes_per_second(&self) -> u64 {
        self.bytes_per_second
    }

    fn tokens_for(bytes: usize) -> usize {
        bytes.div_ceil(BYTES_PER_TOKEN).max(1)
    }

    /// Wait until we're allowed to transfer the given number of bytes
    pub async fn wait_for_capacity(&self, bytes: usize) {
        for _ in 0..Self::tokens_for(bytes) {
            self.limiter.until_ready().await;
        }
    }

    /// Wait (blocking) until we're allowed to transfer the given number of bytes
    pub fn wait_for_capacity_blocking(&self, bytes: usize) {
        for _ in 0..Self::tokens_for(bytes) {
            while self.limiter.check().is_err() {
                std::thread::sleep(Duration::from_micros(100));
            }
        }
    }
}

impl std::fmt::Debug for BandwidthLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandwidthLimiter")
            .field("bytes_per_second", &self.bytes_per_second)
            .finish()
    }
}

/// Reader that waits on a [`BandwidthLimiter`] before every read
pub struct ThrottledReader<R> {
    inner: R,
    limiter: BandwidthLimiter,
}

impl<R: std::io::Read> ThrottledReader<R> {
    /// Wrap a reader
    pub fn new(reader: R, limiter: BandwidthLimiter) -> Self {
        Self {
            inner: reader,
            limiter,
        }
    }
}

impl<R: std::io::Read> std::io::Read for ThrottledReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.limiter.wait_for_capacity_blocking(buf.len());
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_limiter_creation() {
        let limiter = BandwidthLimiter::new(100 * 1024 * 1024);
        assert_eq!(limiter.bytes_per_second(), 100 * 1024 * 1024);
        limiter.wait_for_capacity_blocking(1024);
    }

    #[test]
    fn test_tokens_round_up() {
        assert_eq!(BandwidthLimiter::tokens_for(1), 1);
        assert_eq!(BandwidthLimiter::tokens_for(1024), 1);
        assert_eq!(BandwidthLimiter::tokens_for(1025), 2);
    }

    #[tokio::test]
    async fn test_tiny_rate_still_allows_one_token() {
        let limiter = BandwidthLimiter::new(1);
        limiter.wait_for_capacity(1).await;
    }

    #[test]
    fn test_throttled_reader_passes_bytes_through() {
        let data: Vec<u8> = (0..8192u32).map(|i| (i % 251) as u8).collect();
        let limiter = BandwidthLimiter::new(1024 * 1024 * 1024);
        let mut reader = ThrottledReader::new(data.as_slice(), limiter);

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }
}
