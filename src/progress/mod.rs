//! Progress reporting module
//!
//! Rate-limited progress output for the copy and verify passes.

mod reporter;

pub use reporter::*;
