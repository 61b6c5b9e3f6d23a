//! Drive handles and capacity probing
//!
//! A [`DriveHandle`] is an open device or image file together with the byte
//! length resolved when it was opened. Raw block devices report their
//! capacity through an ioctl; ordinary files answer that ioctl with
//! `ENOTTY`, in which case the length comes from `fstat`.

use crate::error::{CloneError, IoResultExt, Result};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How a drive is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    /// Read-only
    ReadOnly,
    /// Read-write, never created or truncated
    ReadWrite,
}

/// Where a drive's byte length came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeSource {
    /// Block-count/block-size query on a raw device
    BlockDevice,
    /// File length from `fstat`
    File,
}

/// Resolved capacity of a drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DriveSize {
    /// Addressable length in bytes
    pub bytes: u64,
    /// How the length was determined
    pub source: SizeSource,
}

#[cfg(target_os = "linux")]
mod query {
    use nix::errno::Errno;
    use std::os::unix::io::RawFd;

    nix::ioctl_read!(blk_get_size64, 0x12, 114, u64);

    pub const OP: &str = "ioctl(BLKGETSIZE64)";

    pub fn device_bytes(fd: RawFd) -> Result<u64, (&'static str, Errno)> {
        let mut bytes: u64 = 0;
        // SAFETY: `fd` is an open descriptor and `bytes` outlives the call.
        unsafe { blk_get_size64(fd, &mut bytes) }.map_err(|e| (OP, e))?;
        Ok(bytes)
    }
}

#[cfg(target_os = "macos")]
mod query {
    use nix::errno::Errno;
    use std::os::unix::io::RawFd;

    nix::ioctl_read!(dk_get_block_size, b'd', 24, u32);
    nix::ioctl_read!(dk_get_block_count, b'd', 25, u64);

    pub const OP: &str = "ioctl(DKIOCGETBLOCKCOUNT)";

    pub fn device_bytes(fd: RawFd) -> Result<u64, (&'static str, Errno)> {
        let mut block_count: u64 = 0;
        // SAFETY: `fd` is an open descriptor and the out-params outlive the calls.
        unsafe { dk_get_block_count(fd, &mut block_count) }.map_err(|e| (OP, e))?;

        let mut block_size: u32 = 0;
        unsafe { dk_get_block_size(fd, &mut block_size) }
            .map_err(|e| ("ioctl(DKIOCGETBLOCKSIZE)", e))?;

        Ok(u64::from(block_size) * block_count)
    }
}

/// Determine the addressable byte length of an open handle
///
/// Tries the block-device capacity query first. A handle that does not
/// support it (an ordinary file) falls back to its `fstat` length; any other
/// query failure is fatal.
pub fn probe_size(file: &File, path: &Path) -> Result<DriveSize> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        use nix::errno::Errno;
        use std::os::unix::io::AsRawFd;

        match query::device_bytes(file.as_raw_fd()) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), bytes, "block device capacity");
                return Ok(DriveSize {
                    bytes,
                    source: SizeSource::BlockDevice,
                });
            }
            // It's really just a file.
            Err((_, Errno::ENOTTY)) => {}
            Err((op, errno)) => {
                return Err(CloneError::SizeProbe {
                    op,
                    path: path.to_path_buf(),
                    source: std::io::Error::from(errno),
                });
            }
        }
    }

    let metadata = file.metadata().map_err(|source| CloneError::SizeProbe {
        op: "fstat()",
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = metadata.len(), "file length");

    Ok(DriveSize {
        bytes: metadata.len(),
        source: SizeSource::File,
    })
}

/// An open device or image file with its resolved length
///
/// The descriptor is closed when the handle is dropped.
#[derive(Debug)]
pub struct DriveHandle {
    path: PathBuf,
    size: DriveSize,
    file: File,
}

impl DriveHandle {
    /// Open a drive and probe its length
    pub fn open(path: &Path, mode: AccessMode) -> Result<Self> {
        let file = match mode {
            AccessMode::ReadOnly => File::open(path),
            AccessMode::ReadWrite => OpenOptions::new().read(true).write(true).open(path),
        }
        .with_op("open()", path)?;

        let size = probe_size(&file, path)?;

        Ok(Self {
            path: path.to_path_buf(),
            size,
            file,
        })
    }

    /// Path this handle was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte length resolved at open time
    pub fn len(&self) -> u64 {
        self.size.bytes
    }

    /// Whether the drive has zero length
    pub fn is_empty(&self) -> bool {
        self.size.bytes == 0
    }

    /// Full size information
    pub fn size(&self) -> DriveSize {
        self.size
    }

    /// Seek back to offset zero
    pub fn rewind(&mut self) -> Result<()> {
        let pos = self.file.seek(SeekFrom::Start(0)).with_op("lseek()", &self.path)?;
        if pos != 0 {
            return Err(CloneError::io(
                "lseek()",
                &self.path,
                std::io::Error::other(format!("landed at offset {} instead of 0", pos)),
            ));
        }
        Ok(())
    }

    /// Flush written data to stable storage
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush().with_op("flush()", &self.path)?;
        self.file.sync_all().with_op("fsync()", &self.path)
    }

    /// Duplicate the descriptor for use by the pipelined engine
    ///
    /// The duplicate shares the file offset with this handle.
    pub fn try_clone_file(&self) -> Result<File> {
        self.file.try_clone().with_op("dup()", &self.path)
    }
}

impl Read for DriveHandle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for DriveHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn temp_with(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![0x5Au8; len]).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_plain_file_falls_back_to_fstat() {
        let tmp = temp_with(12_345);

        let size = probe_size(tmp.as_file(), tmp.path()).unwrap();
        assert_eq!(size.bytes, 12_345);
        assert_eq!(size.source, SizeSource::File);
    }

    #[test]
    fn test_empty_file() {
        let tmp = temp_with(0);
        let handle = DriveHandle::open(tmp.path(), AccessMode::ReadOnly).unwrap();
        assert!(handle.is_empty());
        assert_eq!(handle.size().source, SizeSource::File);
    }

    #[test]
    fn test_open_resolves_length() {
        let tmp = temp_with(4096);
        let handle = DriveHandle::open(tmp.path(), AccessMode::ReadWrite).unwrap();
        assert_eq!(handle.len(), 4096);
        assert_eq!(handle.path(), tmp.path());
    }

    #[test]
    fn test_open_missing_names_operation() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-drive");

        let err = DriveHandle::open(&missing, AccessMode::ReadOnly).unwrap_err();
        match err {
            CloneError::Io { op, path, source } => {
                assert_eq!(op, "open()");
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_write_does_not_truncate() {
        let tmp = temp_with(100);
        {
            let mut handle = DriveHandle::open(tmp.path(), AccessMode::ReadWrite).unwrap();
            handle.write_all(b"abc").unwrap();
            handle.sync().unwrap();
        }
        let contents = std::fs::read(tmp.path()).unwrap();
        assert_eq!(contents.len(), 100);
        assert_eq!(&contents[..3], b"abc");
        assert_eq!(contents[3], 0x5A);
    }

    #[test]
    fn test_rewind() {
        let tmp = temp_with(10);
        let mut handle = DriveHandle::open(tmp.path(), AccessMode::ReadOnly).unwrap();
        let mut buf = [0u8; 10];
        handle.read_exact(&mut buf).unwrap();
        assert_eq!(handle.read(&mut buf).unwrap(), 0);

        handle.rewind().unwrap();
        handle.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0x5A; 10]);
    }
}
