//! Pipelined copy engine
//!
//! Same contract as [`copy_stream`](super::copy_stream), but source reads,
//! digest folding, and destination writes run as three cooperating tasks:
//!
//! ```text
//!            ┌──────────► digest task (one blocking thread, offset order)
//! reader ────┤
//!            └──────────► writer task (destination, offset order)
//! ```
//!
//! Every chunk is shared by both consumers and counts against a
//! [`Watermark`] until both have dropped it. The reader stops issuing reads
//! at the high-water mark and resumes at the low-water mark. The copy is
//! complete only after all three tasks have been joined, so no caller can
//! observe a destination that still has a write in flight.

use crate::error::{CloneError, Result};
use crate::fs::BandwidthLimiter;
use crate::hash::{Digest, HashAlgorithm, StreamingDigest};
use crate::progress::ProgressSink;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Notify};

/// Upper bound on queued chunks per channel; the watermark still bounds bytes
const MAX_QUEUE_DEPTH: usize = 1024;

/// Tuning for the pipelined engine
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bytes per read
    pub chunk_size: usize,
    /// Pause reads once this many bytes are in flight
    pub high_water: u64,
    /// Resume reads once in-flight bytes drop to this level
    pub low_water: u64,
    /// Optional throttle on source reads
    pub limiter: Option<BandwidthLimiter>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8 * 1024 * 1024,
            high_water: 64 * 1024 * 1024,
            low_water: 16 * 1024 * 1024,
            limiter: None,
        }
    }
}

#[derive(Debug, Default)]
struct WatermarkState {
    in_flight: u64,
    peak: u64,
    paused: bool,
    closed: bool,
}

/// High/low watermark gate on in-flight bytes
///
/// In-flight bytes never exceed `high + one chunk`: the acquire that crosses
/// `high` succeeds and pauses the gate, and it stays paused until releases
/// bring the total down to `low`.
#[derive(Debug)]
pub struct Watermark {
    high: u64,
    low: u64,
    state: Mutex<WatermarkState>,
    notify: Notify,
}

impl Watermark {
    /// Create a gate; `low` is clamped to `high`
    pub fn new(high: u64, low: u64) -> Self {
        Self {
            high,
            low: low.min(high),
            state: Mutex::new(WatermarkState::default()),
            notify: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WatermarkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `Some(true)` if taken, `Some(false)` if closed, `None` while paused
    fn try_take(&self, bytes: u64) -> Option<bool> {
        let mut state = self.lock();
        if state.closed {
            return Some(false);
        }
        if state.paused {
            return None;
        }

        state.in_flight += bytes;
        state.peak = state.peak.max(state.in_flight);
        if state.in_flight >= self.high {
            state.paused = true;
        }
        Some(true)
    }

    /// Wait for room for `bytes` more in-flight bytes
    ///
    /// Returns `false` if the gate was closed.
    pub async fn acquire(&self, bytes: u64) -> bool {
        loop {
            // Register before checking so a release in between is not missed.
            let notified = self.notify.notified();
            if let Some(taken) = self.try_take(bytes) {
                return taken;
            }
            notified.await;
        }
    }

    /// Return `bytes` to the gate
    pub fn release(&self, bytes: u64) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(bytes);
        if state.paused && state.in_flight <= self.low {
            state.paused = false;
            drop(state);
            self.notify.notify_waiters();
        }
    }

    /// Refuse all further acquires and wake any waiter
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_waiters();
    }

    /// Whether the gate has been closed
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Resolve once the gate is closed
    pub async fn closed(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_closed() {
                return;
            }
            notified.await;
        }
    }

    /// Bytes currently in flight
    pub fn in_flight(&self) -> u64 {
        self.lock().in_flight
    }

    /// Highest in-flight total seen
    pub fn peak(&self) -> u64 {
        self.lock().peak
    }

    /// Whether reads are currently paused
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }
}

/// A chunk read from the source, released to the gate when dropped
struct InFlightChunk {
    offset: u64,
    data: Vec<u8>,
    gate: Arc<Watermark>,
}

impl Drop for InFlightChunk {
    fn drop(&mut self) {
        self.gate.release(self.data.len() as u64);
    }
}

/// One end of a pipelined pass; owned because it moves into a task
pub struct AsyncEndpoint<T> {
    /// The stream
    pub io: T,
    /// Path used in error messages
    pub path: PathBuf,
}

impl<T> AsyncEndpoint<T> {
    /// Pair a stream with its path
    pub fn new(io: T, path: impl Into<PathBuf>) -> Self {
        Self {
            io,
            path: path.into(),
        }
    }
}

/// Description of one pipelined pass
pub struct PipelinedPass {
    /// Progress label
    pub phase: String,
    /// Exact number of bytes to move
    pub total: u64,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Where progress goes; called only from the digest task
    pub progress: Arc<dyn ProgressSink>,
}

/// What a pipelined pass produced
pub struct PipelineOutput<W> {
    /// Digest of every byte read, in offset order
    pub digest: Digest,
    /// Highest number of bytes that were in flight at once
    pub peak_in_flight: u64,
    /// The destination, flushed, if there was one
    pub destination: Option<W>,
}

fn torn_down(what: &str) -> CloneError {
    CloneError::Pipeline(format!("{} channel closed before the pass finished", what))
}

async fn read_chunk<R>(src: &mut R, buf: &mut [u8], path: &std::path::Path, offset: u64) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]).await {
            Ok(0) => {
                return Err(CloneError::ShortRead {
                    path: path.to_path_buf(),
                    offset,
                    expected: buf.len(),
                    actual: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(CloneError::io("read()", path, e)),
        }
    }
    Ok(())
}

async fn write_chunks<W>(
    dst: &mut W,
    rx: &mut mpsc::Receiver<Arc<InFlightChunk>>,
    path: &std::path::Path,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(chunk) = rx.recv().await {
        dst.write_all(&chunk.data).await.map_err(|e| match e.kind() {
            ErrorKind::WriteZero => CloneError::ShortWrite {
                path: path.to_path_buf(),
                offset: chunk.offset,
            },
            _ => CloneError::io("write()", path, e),
        })?;
    }
    dst.flush().await.map_err(|e| CloneError::io("flush()", path, e))
}

/// Stream `pass.total` bytes from `source`, optionally into `destination`
pub async fn pipelined_copy<R, W>(
    config: &PipelineConfig,
    pass: PipelinedPass,
    source: AsyncEndpoint<R>,
    destination: Option<AsyncEndpoint<W>>,
) -> Result<PipelineOutput<W>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let chunk_size = config.chunk_size.max(1) as u64;
    let gate = Arc::new(Watermark::new(config.high_water, config.low_water));
    let depth = usize::try_from(config.high_water / chunk_size)
        .unwrap_or(usize::MAX)
        .saturating_add(2)
        .min(MAX_QUEUE_DEPTH);

    let (digest_tx, mut digest_rx) = mpsc::channel::<Arc<InFlightChunk>>(depth);
    let (write_tx, write_rx) = match destination {
        Some(_) => {
            let (tx, rx) = mpsc::channel::<Arc<InFlightChunk>>(depth);
            (Some(tx), Some(rx))
        }
        None => (None, None),
    };

    let total = pass.total;

    let reader = {
        let gate = Arc::clone(&gate);
        let limiter = config.limiter.clone();
        let AsyncEndpoint { io: mut src, path } = source;

        tokio::spawn(async move {
            let result = async {
                let mut offset = 0u64;
                while offset < total {
                    let len = chunk_size.min(total - offset);
                    if gate.is_paused() {
                        tracing::trace!(in_flight = gate.in_flight(), "high-water mark reached, reads paused");
                    }
                    if !gate.acquire(len).await {
                        return Err(torn_down("write"));
                    }
                    if let Some(limiter) = &limiter {
                        limiter.wait_for_capacity(len as usize).await;
                    }

                    let mut chunk = InFlightChunk {
                        offset,
                        data: vec![0u8; len as usize],
                        gate: Arc::clone(&gate),
                    };
                    read_chunk(&mut src, &mut chunk.data, &path, offset).await?;

                    let chunk = Arc::new(chunk);
                    if let Some(tx) = &write_tx {
                        tx.send(Arc::clone(&chunk)).await.map_err(|_| torn_down("write"))?;
                    }
                    digest_tx.send(chunk).await.map_err(|_| torn_down("digest"))?;

                    offset += len;
                }
                tracing::debug!(path = %path.display(), offset, "reader finished issuing reads");
                Ok::<u64, CloneError>(offset)
            }
            .await;

            if result.is_err() {
                // Stop the writer mid-queue rather than letting it drain.
                gate.close();
            }
            result
        })
    };

    let digester = {
        let progress = Arc::clone(&pass.progress);
        let phase = pass.phase.clone();
        let algorithm = pass.algorithm;

        tokio::task::spawn_blocking(move || {
            let mut digest = StreamingDigest::new(algorithm);
            progress.report(0, total, &phase);
            while let Some(chunk) = digest_rx.blocking_recv() {
                if chunk.gate.is_closed() {
                    break;
                }
                debug_assert_eq!(chunk.offset, digest.bytes_processed());
                digest.update(&chunk.data);
                progress.report(digest.bytes_processed(), total, &phase);
            }
            digest
        })
    };

    let writer = match (destination, write_rx) {
        (Some(AsyncEndpoint { io: mut dst, path }), Some(mut rx)) => {
            let gate = Arc::clone(&gate);
            Some(tokio::spawn(async move {
                let result = tokio::select! {
                    res = write_chunks(&mut dst, &mut rx, &path) => res,
                    () = gate.closed() => Err(torn_down("read")),
                };
                if result.is_err() {
                    // Stop the reader now rather than at its next send.
                    gate.close();
                }
                result.map(|()| dst)
            }))
        }
        _ => None,
    };

    let (read_res, digest_res, write_res) = tokio::join!(reader, digester, async {
        match writer {
            Some(handle) => Some(handle.await),
            None => None,
        }
    });

    let join_err = |task: &str, e: tokio::task::JoinError| {
        CloneError::Pipeline(format!("{} task failed: {}", task, e))
    };

    let read_res = read_res.map_err(|e| join_err("reader", e)).and_then(|r| r);
    let digest = digest_res.map_err(|e| join_err("digest", e));
    let write_res = write_res.map(|r| r.map_err(|e| join_err("writer", e)).and_then(|r| r));

    let mut errors: Vec<CloneError> = Vec::new();
    let destination = match write_res {
        Some(Ok(dst)) => Some(dst),
        Some(Err(e)) => {
            errors.push(e);
            None
        }
        None => None,
    };
    if let Err(e) = read_res {
        errors.push(e);
    }

    match digest {
        Ok(digest) if errors.is_empty() => {
            if digest.bytes_processed() != total {
                return Err(CloneError::Pipeline(format!(
                    "digested {} of {} bytes",
                    digest.bytes_processed(),
                    total
                )));
            }
            Ok(PipelineOutput {
                digest: digest.finalize(),
                peak_in_flight: gate.peak(),
                destination,
            })
        }
        Ok(_) => Err(pick_error(errors)),
        Err(e) => {
            errors.push(e);
            Err(pick_error(errors))
        }
    }
}

/// A real I/O failure outranks the channel teardown it causes elsewhere
fn pick_error(mut errors: Vec<CloneError>) -> CloneError {
    match errors.iter().position(|e| !matches!(e, CloneError::Pipeline(_))) {
        Some(i) => errors.swap_remove(i),
        None => errors.swap_remove(0),
    }
}
