//! Configuration settings for CloneDrive
//!
//! Defines the CLI arguments, the runtime session configuration derived
//! from them, and their defaults.

use crate::error::{CloneError, Result};
use crate::hash::HashAlgorithm;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default copy buffer capacity (512 MiB)
pub const DEFAULT_BUFFER_SIZE: usize = 512 * 1024 * 1024;

/// CloneDrive - clone a drive and prove the copy
#[derive(Parser, Debug, Clone)]
#[command(name = "clonedrive")]
#[command(author = "CloneDrive Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clone a drive byte-for-byte and verify the copy")]
#[command(long_about = r#"
CloneDrive copies every byte of a block device (or an image file) onto
another device at least as large, then reads the destination back to prove
it holds exactly what the source held.

With only a SOURCE, the source is read twice and the two digests compared
(a repeatable-read check).

Examples:
  sudo clonedrive /dev/rdisk8 /dev/rdisk9       # Clone and verify
  sudo clonedrive /dev/sdb                      # Repeatable-read check only
  clonedrive disk.img copy.img --engine pipelined
"#)]
pub struct CliArgs {
    /// Source device or image file
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination device or image file (omit for a repeatable-read check)
    #[arg(value_name = "DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Copy buffer size (e.g., 512M, 64M)
    #[arg(short = 'b', long, env = "CLONEDRIVE_BUFFER_SIZE", default_value = "512M", value_name = "SIZE")]
    pub buffer_size: String,

    /// Copy engine
    #[arg(short = 'e', long, env = "CLONEDRIVE_ENGINE", value_enum, default_value = "buffered")]
    pub engine: Engine,

    /// Read unit for the pipelined engine
    #[arg(long, env = "CLONEDRIVE_CHUNK_SIZE", default_value = "8M", value_name = "SIZE")]
    pub chunk_size: String,

    /// Pause reads once this many bytes are in flight (pipelined engine)
    #[arg(long, env = "CLONEDRIVE_HIGH_WATER", default_value = "64M", value_name = "SIZE")]
    pub high_water: String,

    /// Resume reads once in-flight bytes drop to this level (pipelined engine)
    #[arg(long, env = "CLONEDRIVE_LOW_WATER", default_value = "16M", value_name = "SIZE")]
    pub low_water: String,

    /// Digest algorithm
    #[arg(short = 'a', long, env = "CLONEDRIVE_ALGORITHM", value_enum, default_value = "sha1")]
    pub algorithm: HashAlgorithm,

    /// Skip the repeatable-read pre-flight before cloning
    #[arg(long)]
    pub no_preflight: bool,

    /// Bandwidth limit for source reads (e.g., 100M for 100 MB/s)
    #[arg(long, env = "CLONEDRIVE_BANDWIDTH_LIMIT", value_name = "RATE")]
    pub bandwidth_limit: Option<String>,

    /// How progress is drawn
    #[arg(long, value_enum, default_value = "text")]
    pub progress_style: ProgressStyleKind,

    /// Output format for the final report
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Log format on stderr
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbose logging (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged, no progress)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Copy engine selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Single thread, one reusable buffer, blocking I/O
    #[default]
    Buffered,
    /// Overlapped reads and writes with bounded in-flight data
    Pipelined,
}

/// Progress display style
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStyleKind {
    /// indicatif progress bar
    Bar,
    /// One line per phase, overwritten in place at most once per second
    #[default]
    Text,
    /// No progress output
    None,
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Log line format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain text
    #[default]
    Text,
    /// JSON lines
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Source path
    pub source: PathBuf,
    /// Destination path, if cloning
    pub destination: Option<PathBuf>,
    /// Buffered engine buffer capacity
    pub buffer_size: usize,
    /// Copy engine
    pub engine: Engine,
    /// Pipelined engine read unit
    pub chunk_size: usize,
    /// Pipelined engine high-water mark
    pub high_water: u64,
    /// Pipelined engine low-water mark
    pub low_water: u64,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Run the repeatable-read pre-flight before cloning
    pub preflight: bool,
    /// Bandwidth limit in bytes/sec
    pub bandwidth_limit: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            engine: Engine::Buffered,
            chunk_size: 8 * 1024 * 1024,
            high_water: 64 * 1024 * 1024,
            low_water: 16 * 1024 * 1024,
            algorithm: HashAlgorithm::Sha1,
            preflight: true,
            bandwidth_limit: None,
        }
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> std::result::Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("TB") || size.ends_with('T') {
        (size.trim_end_matches(['T', 'B']), 1024u64 * 1024 * 1024 * 1024)
    } else if size.ends_with("GB") || size.ends_with('G') {
        (size.trim_end_matches(['G', 'B']), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        (size.trim_end_matches(['M', 'B']), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        (size.trim_end_matches(['K', 'B']), 1024u64)
    } else if size.ends_with('B') {
        (size.trim_end_matches('B'), 1u64)
    } else {
        (size.as_str(), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    if num < 0.0 {
        return Err(format!("Negative size: {}", num_str));
    }

    Ok((num * multiplier as f64) as u64)
}

impl SessionConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let size = |what: &str, value: &str| {
            parse_size(value).map_err(|e| CloneError::config(format!("Invalid {}: {}", what, e)))
        };

        let config = Self {
            source: args.source.clone(),
            destination: args.destination.clone(),
            buffer_size: size("buffer size", &args.buffer_size)? as usize,
            engine: args.engine,
            chunk_size: size("chunk size", &args.chunk_size)? as usize,
            high_water: size("high-water mark", &args.high_water)?,
            low_water: size("low-water mark", &args.low_water)?,
            algorithm: args.algorithm,
            preflight: !args.no_preflight,
            bandwidth_limit: args
                .bandwidth_limit
                .as_deref()
                .map(|s| size("bandwidth limit", s))
                .transpose()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot run, before any I/O happens
    pub fn validate(&self) -> Result<()> {
        if let Some(destination) = &self.destination {
            if destination == &self.source {
                return Err(CloneError::SameSourceAndDestination(destination.clone()));
            }
        }

        if self.buffer_size == 0 {
            return Err(CloneError::config("buffer size must be greater than zero"));
        }
        if self.chunk_size == 0 {
            return Err(CloneError::config("chunk size must be greater than zero"));
        }
        if self.low_water > self.high_water {
            return Err(CloneError::config(format!(
                "low-water mark ({}) exceeds high-water mark ({})",
                self.low_water, self.high_water
            )));
        }
        if self.bandwidth_limit == Some(0) {
            return Err(CloneError::config("bandwidth limit must be greater than zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["clonedrive"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("512M").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("1.5G").unwrap(), (1.5 * 1024.0 * 1024.0 * 1024.0) as u64);
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn test_defaults_from_cli() {
        let config = SessionConfig::from_cli(&args(&["/dev/rdisk8", "/dev/rdisk9"])).unwrap();
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(config.engine, Engine::Buffered);
        assert_eq!(config.algorithm, HashAlgorithm::Sha1);
        assert!(config.preflight);
        assert_eq!(config.destination, Some(PathBuf::from("/dev/rdisk9")));
    }

    #[test]
    fn test_source_only() {
        let config = SessionConfig::from_cli(&args(&["/dev/sdb", "--no-preflight"])).unwrap();
        assert!(config.destination.is_none());
        assert!(!config.preflight);
    }

    #[test]
    fn test_same_paths_rejected() {
        let err = SessionConfig::from_cli(&args(&["/dev/sdb", "/dev/sdb"])).unwrap_err();
        assert!(matches!(err, CloneError::SameSourceAndDestination(_)));
    }

    #[test]
    fn test_inverted_watermarks_rejected() {
        let err = SessionConfig::from_cli(&args(&[
            "a.img", "b.img", "--high-water", "4M", "--low-water", "8M",
        ]))
        .unwrap_err();
        assert!(matches!(err, CloneError::Config(_)));
    }

    #[test]
    fn test_pipelined_options() {
        let config = SessionConfig::from_cli(&args(&[
            "a.img",
            "b.img",
            "--engine",
            "pipelined",
            "--chunk-size",
            "1M",
            "--bandwidth-limit",
            "100M",
            "--algorithm",
            "blake3",
        ]))
        .unwrap();
        assert_eq!(config.engine, Engine::Pipelined);
        assert_eq!(config.chunk_size, 1024 * 1024);
        assert_eq!(config.bandwidth_limit, Some(100 * 1024 * 1024));
        assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_string(&SessionConfig::default()).unwrap();
        assert!(json.contains("\"engine\":\"buffered\""));
        assert!(json.contains("\"algorithm\":\"sha1\""));
    }
}
