//! Buffered copy loop
//!
//! The synchronous engine: one reusable buffer, blocking reads and writes.
//! Each iteration reads exactly `min(capacity, remaining)` bytes, folds them
//! into the digest, and writes them to the destination when there is one.
//! Without a destination the same loop is a read-and-hash pass, which is how
//! both the repeatable-read check and the read-back verification run.

use crate::error::{CloneError, Result};
use crate::hash::{Digest, HashAlgorithm, StreamingDigest};
use crate::progress::ProgressSink;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

/// The single reusable copy buffer
///
/// Owned by the session and lent to whichever pass is running.
pub struct CopyBuffer {
    buf: Vec<u8>,
}

impl CopyBuffer {
    /// Allocate a buffer of exactly `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity.max(1)],
        }
    }

    /// Allocate no more than a pass of `total` bytes can use
    pub fn for_length(capacity: usize, total: u64) -> Self {
        let needed = usize::try_from(total).unwrap_or(usize::MAX);
        Self::new(capacity.min(needed))
    }

    /// Buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

/// What a single pass is and how it reports
#[derive(Clone, Copy)]
pub struct CopyPass<'a> {
    /// Progress label, e.g. "cloning"
    pub phase: &'a str,
    /// Exact number of bytes to move
    pub total: u64,
    /// Digest algorithm for this pass
    pub algorithm: HashAlgorithm,
    /// Where progress goes
    pub progress: &'a dyn ProgressSink,
}

/// One end of a pass: a stream and the path it stands for
pub struct Endpoint<'a, T: ?Sized> {
    /// The stream
    pub io: &'a mut T,
    /// Path used in error messages
    pub path: &'a Path,
}

impl<'a, T: ?Sized> Endpoint<'a, T> {
    /// Pair a stream with its path
    pub fn new(io: &'a mut T, path: &'a Path) -> Self {
        Self { io, path }
    }
}

/// Fill `buf` completely or fail with a short read
fn read_full<R: Read + ?Sized>(src: &mut R, buf: &mut [u8], path: &Path, offset: u64) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
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

/// Write all of `buf` or fail
fn write_full<W: Write + ?Sized>(dst: &mut W, buf: &[u8], path: &Path, offset: u64) -> Result<()> {
    dst.write_all(buf).map_err(|e| match e.kind() {
        ErrorKind::WriteZero => CloneError::ShortWrite {
            path: path.to_path_buf(),
            offset,
        },
        _ => CloneError::io("write()", path, e),
    })
}

/// Stream `pass.total` bytes from `source`, optionally into `destination`
///
/// Returns the digest of every byte read, in offset order.
pub fn copy_stream<R, W>(
    pass: CopyPass<'_>,
    source: Endpoint<'_, R>,
    mut destination: Option<Endpoint<'_, W>>,
    buffer: &mut CopyBuffer,
) -> Result<Digest>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut digest = StreamingDigest::new(pass.algorithm);
    let capacity = buffer.capacity() as u64;
    let mut offset = 0u64;

    pass.progress.report(0, pass.total, pass.phase);

    while offset < pass.total {
        let chunk_len = capacity.min(pass.total - offset) as usize;
        let chunk = &mut buffer.buf[..chunk_len];

        read_full(&mut *source.io, chunk, source.path, offset)?;
        digest.update(chunk);

        if let Some(dst) = destination.as_mut() {
            write_full(&mut *dst.io, chunk, dst.path, offset)?;
        }

        offset += chunk_len as u64;
        tracing::trace!(phase = pass.phase, offset, chunk_len, "chunk done");
        pass.progress.report(offset, pass.total, pass.phase);
    }

    if let Some(dst) = destination.as_mut() {
        dst.io.flush().map_err(|e| CloneError::io("flush()", dst.path, e))?;
    }

    Ok(digest.finalize())
}

/// Read-and-hash pass with no destination
pub fn read_stream<R: Read + ?Sized>(
    pass: CopyPass<'_>,
    source: Endpoint<'_, R>,
    buffer: &mut CopyBuffer,
) -> Result<Digest> {
    copy_stream::<R, std::io::Sink>(pass, source, None, buffer)
}
