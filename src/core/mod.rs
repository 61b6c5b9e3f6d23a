//! Core clone engine module
//!
//! Provides the buffered and pipelined copy engines and the session that
//! drives them through the read, clone, and verify phases.

mod copier;
mod observer;
mod pipeline;
mod session;

pub use copier::*;
pub use observer::*;
pub use pipeline::*;
pub use session::*;
