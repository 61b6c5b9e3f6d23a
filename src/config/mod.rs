//! Configuration module for CloneDrive
//!
//! Provides CLI argument parsing and the runtime session configuration.

mod settings;

pub use settings::*;
