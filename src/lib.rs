//! # CloneDrive - Verified Drive Cloning
//!
//! CloneDrive copies every byte of a raw block device (or an image file)
//! onto another device at least as large, then proves the copy by reading
//! the destination back and comparing digests.
//!
//! ## Features
//!
//! - **Repeatable-read pre-flight**: the source is read twice before any
//!   write, so flaky media is caught early
//! - **Consistency check**: the bytes copied must hash to what the pre-flight saw
//! - **Read-back verification**: the destination is re-read after an fsync
//! - **Two engines**: a single-buffer blocking loop, or a pipelined engine
//!   that overlaps reads with writes under a bounded in-flight window
//! - **Digests**: SHA-1 (default), SHA-256, BLAKE3
//!
//! ## Quick Start
//!
//! ```no_run
//! use clonedrive::config::SessionConfig;
//! use clonedrive::core::CloneSession;
//! use std::path::PathBuf;
//!
//! let config = SessionConfig {
//!     source: PathBuf::from("/dev/rdisk8"),
//!     destination: Some(PathBuf::from("/dev/rdisk9")),
//!     ..Default::default()
//! };
//!
//! let report = CloneSession::new(config).run().unwrap();
//! report.print_summary();
//! ```
//!
//! ## Pipelined Engine With Progress
//!
//! ```no_run
//! use clonedrive::config::{Engine, SessionConfig};
//! use clonedrive::core::{CloneSession, ConsoleObserver};
//! use clonedrive::progress::SimpleProgress;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let config = SessionConfig {
//!     source: PathBuf::from("disk.img"),
//!     destination: Some(PathBuf::from("copy.img")),
//!     engine: Engine::Pipelined,
//!     ..Default::default()
//! };
//!
//! let session = CloneSession::new(config).with_progress(Arc::new(SimpleProgress::new()));
//! let report = session.run_with(&mut ConsoleObserver::new()).unwrap();
//! assert!(report.is_success());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod hash;
pub mod progress;

// Re-export commonly used types
pub use config::{Engine, SessionConfig};
pub use core::{CloneSession, Outcome, SessionReport};
pub use error::{CloneError, Result};
pub use hash::HashAlgorithm;
pub use progress::ProgressReporter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use clonedrive::prelude::*;
    //! ```

    pub use crate::config::{Engine, SessionConfig};
    pub use crate::core::{
        CloneSession, ConsoleObserver, FailureKind, Outcome, PassKind, Phase, SessionObserver, SessionReport,
    };
    pub use crate::error::{CloneError, Result};
    pub use crate::fs::{AccessMode, DriveHandle, DriveSize};
    pub use crate::hash::{digest_bytes, Digest, HashAlgorithm, StreamingDigest};
    pub use crate::progress::{NoProgress, ProgressReporter, ProgressSink, SimpleProgress};
}
