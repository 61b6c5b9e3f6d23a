//! Error types for CloneDrive
//!
//! Every variant here is fatal for the run. Digest mismatches detected by
//! the clone protocol are not errors; they are reported through
//! [`crate::core::Outcome`] so the detecting phase can finish and print
//! both digests.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for CloneDrive operations
#[derive(Error, Debug)]
pub enum CloneError {
    /// I/O error during a named operation
    #[error("{op} failed on '{path}': {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Device capacity query failed for a reason other than "not a block device"
    #[error("{op} failed on '{path}': {source}")]
    SizeProbe {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fewer bytes were available than the pass needed
    #[error("short read on '{path}' at offset {offset}: wanted {expected} bytes, got {actual}")]
    ShortRead {
        path: PathBuf,
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// Destination accepted fewer bytes than it was handed
    #[error("short write on '{path}' at offset {offset}")]
    ShortWrite { path: PathBuf, offset: u64 },

    /// Source and destination are the same
    #[error("destination must be different from source: {0}")]
    SameSourceAndDestination(PathBuf),

    /// Destination cannot hold the source
    #[error("can't clone: source is {source_len} bytes but destination '{path}' holds only {dest_len} bytes")]
    DestinationTooSmall {
        path: PathBuf,
        source_len: u64,
        dest_len: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pipelined copy task failed or was torn down
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CloneError {
    /// Create an I/O error tagged with the failing operation
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::SizeProbe { path, .. }
            | Self::ShortRead { path, .. }
            | Self::ShortWrite { path, .. }
            | Self::SameSourceAndDestination(path)
            | Self::DestinationTooSmall { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Underlying OS error code, when the failure came from the OS
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Io { source, .. } | Self::SizeProbe { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CloneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for CloneDrive operations
pub type Result<T> = std::result::Result<T, CloneError>;

/// Extension trait for adding operation and path context to std::io::Result
pub trait IoResultExt<T> {
    /// Tag an I/O error with the operation that produced it
    fn with_op(self, op: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_op(self, op: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| CloneError::io(op, path, e))
    }
}
