//! Streaming digests
//!
//! Incremental hashing of ordered chunks into a fixed-size [`Digest`].
//! SHA-1 is the default; SHA-256 and BLAKE3 are available on request.

mod digest;

pub use digest::*;
