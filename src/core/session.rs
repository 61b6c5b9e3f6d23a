//! Clone session orchestration
//!
//! A session walks a fixed sequence of phases:
//!
//! ```text
//! Init -> SizeProbed -> RepeatableReadChecked -> Cloned -> ConsistencyChecked -> Verified -> Succeeded
//! ```
//!
//! Any phase may end in `Failed`. Digest mismatches are outcomes carried in
//! the [`SessionReport`]; I/O problems and an undersized destination are
//! errors returned from [`CloneSession::run`]. Nothing is written to the
//! destination before its capacity has been checked.

use crate::config::{Engine, SessionConfig};
use crate::core::{
    copy_stream, pipelined_copy, AsyncEndpoint, CopyBuffer, CopyPass, DriveRole, Endpoint, NoopObserver,
    PipelineConfig, PipelinedPass, SessionObserver,
};
use crate::error::{CloneError, Result};
use crate::fs::{AccessMode, BandwidthLimiter, DriveHandle, DriveSize, ThrottledReader};
use crate::hash::{Digest, HashAlgorithm};
use crate::progress::{NoProgress, ProgressSink};
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Nothing opened yet
    Init,
    /// Both lengths known, destination large enough
    SizeProbed,
    /// Source read twice with identical digests
    RepeatableReadChecked,
    /// Source copied onto the destination and synced
    Cloned,
    /// Copy digest matched the last pre-read digest
    ConsistencyChecked,
    /// Destination read back
    Verified,
    /// Terminal: every check passed
    Succeeded,
    /// Terminal: a check failed or an error occurred
    Failed,
}

/// A single pass over a drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    /// First pre-flight read of the source
    SourceRead,
    /// Second pre-flight read of the source
    SourceReread,
    /// Source to destination copy
    Clone,
    /// Destination read-back
    Verify,
}

impl PassKind {
    /// Progress label for this pass
    pub fn label(&self) -> &'static str {
        match self {
            Self::SourceRead => "reading",
            Self::SourceReread => "re-reading",
            Self::Clone => "cloning",
            Self::Verify => "verifying",
        }
    }
}

/// Digest produced by one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassRecord {
    /// Which pass
    pub kind: PassKind,
    /// Drive the hashed bytes were read from
    pub path: PathBuf,
    /// Bytes hashed
    pub bytes: u64,
    /// Digest of those bytes
    pub digest: Digest,
}

/// Why a session failed without an I/O error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Two reads of the source disagreed
    NotRepeatable,
    /// The copy pass saw different source bytes than the pre-flight
    SourceChanged,
    /// The destination read back differently from what was written
    VerificationMismatch,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRepeatable => write!(f, "source is not repeatably readable"),
            Self::SourceChanged => write!(f, "source changed during the clone"),
            Self::VerificationMismatch => write!(f, "destination does not match what was written"),
        }
    }
}

/// Terminal result of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// All checks passed
    Succeeded,
    /// A digest comparison failed
    Failed {
        /// Which comparison
        kind: FailureKind,
        /// Digest the check expected
        expected: Digest,
        /// Digest actually observed
        actual: Digest,
    },
}

impl Outcome {
    fn failed(kind: FailureKind, expected: Digest, actual: Digest) -> Self {
        Self::Failed { kind, expected, actual }
    }

    /// Whether the session succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Everything a finished session observed
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// Source path
    pub source: PathBuf,
    /// Destination path, if cloning
    pub destination: Option<PathBuf>,
    /// Source capacity
    pub source_size: DriveSize,
    /// Destination capacity, if cloning
    pub destination_size: Option<DriveSize>,
    /// Engine used
    pub engine: Engine,
    /// Digest algorithm used
    pub algorithm: HashAlgorithm,
    /// Phases entered, in order, ending with a terminal phase
    pub phases: Vec<Phase>,
    /// Every completed pass, in order
    pub passes: Vec<PassRecord>,
    /// Final result
    pub outcome: Outcome,
    /// Wall-clock duration
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl SessionReport {
    /// Whether the session succeeded
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Digest of the given pass, if it ran
    pub fn digest(&self, kind: PassKind) -> Option<&Digest> {
        self.passes.iter().find(|p| p.kind == kind).map(|p| &p.digest)
    }

    /// Total bytes moved across every pass
    pub fn bytes_processed(&self) -> u64 {
        self.passes.iter().map(|p| p.bytes).sum()
    }

    /// Print summary to stdout, ending with the SUCCESS or FAILURE line
    pub fn print_summary(&self) {
        let stdout = std::io::stdout();
        // Output is best-effort once the session is over.
        let _ = self.write_summary(&mut stdout.lock());
    }

    /// Write the summary block; the verdict is always the last line
    pub fn write_summary<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        let secs = self.elapsed.as_secs_f64();
        let rate = if secs > 0.0 {
            (self.bytes_processed() as f64 / secs) as u64
        } else {
            0
        };
        let elapsed = Duration::from_millis(self.elapsed.as_millis() as u64);

        writeln!(out)?;
        writeln!(out, "Engine:     {:?}", self.engine)?;
        writeln!(out, "Algorithm:  {}", self.algorithm.name())?;
        writeln!(out, "Passes:     {}", self.passes.len())?;
        writeln!(
            out,
            "Processed:  {}",
            humansize::format_size(self.bytes_processed(), humansize::BINARY)
        )?;
        writeln!(out, "Time:       {}", humantime::format_duration(elapsed))?;
        writeln!(out, "Throughput: {}/s", humansize::format_size(rate, humansize::BINARY))?;
        writeln!(out)?;
        writeln!(out, "{}", if self.is_success() { "SUCCESS" } else { "FAILURE" })?;
        out.flush()
    }
}

/// Refuse a destination that cannot hold the whole source
fn ensure_fits(path: &Path, source_len: u64, dest_len: u64) -> Result<()> {
    if dest_len < source_len {
        return Err(CloneError::DestinationTooSmall {
            path: path.to_path_buf(),
            source_len,
            dest_len,
        });
    }
    Ok(())
}

fn start_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("clonedrive-io")
        .build()
        .map_err(|e| CloneError::Pipeline(format!("failed to start I/O runtime: {}", e)))
}

/// Per-engine resources, released when the session run ends
enum EngineState {
    Buffered {
        capacity: usize,
        buffer: Option<CopyBuffer>,
        limiter: Option<BandwidthLimiter>,
    },
    Pipelined {
        runtime: tokio::runtime::Runtime,
        config: PipelineConfig,
    },
}

/// Runs passes with whichever engine was configured
struct PassRunner {
    state: EngineState,
    algorithm: HashAlgorithm,
    progress: Arc<dyn ProgressSink>,
}

impl PassRunner {
    fn start(config: &SessionConfig, progress: Arc<dyn ProgressSink>) -> Result<Self> {
        let limiter = config.bandwidth_limit.map(BandwidthLimiter::new);
        let state = match config.engine {
            Engine::Buffered => EngineState::Buffered {
                capacity: config.buffer_size,
                buffer: None,
                limiter,
            },
            Engine::Pipelined => EngineState::Pipelined {
                runtime: start_runtime()?,
                config: PipelineConfig {
                    chunk_size: config.chunk_size,
                    high_water: config.high_water,
                    low_water: config.low_water,
                    limiter,
                },
            },
        };

        Ok(Self {
            state,
            algorithm: config.algorithm,
            progress,
        })
    }

    /// Hash `total` bytes of `source` from offset zero, copying them to
    /// `destination` when given
    fn run(
        &mut self,
        kind: PassKind,
        source: &mut DriveHandle,
        mut destination: Option<&mut DriveHandle>,
        total: u64,
    ) -> Result<Digest> {
        source.rewind()?;
        if let Some(dst) = destination.as_deref_mut() {
            dst.rewind()?;
        }
        debug!(pass = kind.label(), source = %source.path().display(), total, "pass starting");

        match &mut self.state {
            EngineState::Buffered {
                capacity,
                buffer,
                limiter,
            } => {
                let buffer = buffer.get_or_insert_with(|| CopyBuffer::for_length(*capacity, total));
                let pass = CopyPass {
                    phase: kind.label(),
                    total,
                    algorithm: self.algorithm,
                    progress: &*self.progress,
                };

                let source_path = source.path().to_path_buf();
                let destination_path = destination.as_ref().map(|d| d.path().to_path_buf());
                let destination = destination
                    .zip(destination_path.as_deref())
                    .map(|(io, path)| Endpoint::new(io, path));

                let mut throttled;
                let reader: &mut dyn Read = match limiter {
                    Some(limiter) => {
                        throttled = ThrottledReader::new(source, limiter.clone());
                        &mut throttled
                    }
                    None => source,
                };

                copy_stream(pass, Endpoint::new(reader, &source_path), destination, buffer)
            }
            EngineState::Pipelined { runtime, config } => {
                let reader = AsyncEndpoint::new(tokio::fs::File::from_std(source.try_clone_file()?), source.path());
                let writer = destination
                    .map(|d| -> Result<_> {
                        Ok(AsyncEndpoint::new(
                            tokio::fs::File::from_std(d.try_clone_file()?),
                            d.path(),
                        ))
                    })
                    .transpose()?;
                let pass = PipelinedPass {
                    phase: kind.label().to_string(),
                    total,
                    algorithm: self.algorithm,
                    progress: Arc::clone(&self.progress),
                };

                let output = runtime.block_on(pipelined_copy(config, pass, reader, writer))?;
                debug!(pass = kind.label(), peak_in_flight = output.peak_in_flight, "pass finished");
                Ok(output.digest)
            }
        }
    }
}

/// Phase and pass log shared with the observer
struct Journal<'o> {
    observer: &'o mut dyn SessionObserver,
    phases: Vec<Phase>,
    passes: Vec<PassRecord>,
}

impl<'o> Journal<'o> {
    fn new(observer: &'o mut dyn SessionObserver) -> Self {
        Self {
            observer,
            phases: Vec::new(),
            passes: Vec::new(),
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!(?phase, "phase");
        self.phases.push(phase);
        self.observer.on_phase(phase);
    }

    fn drive(&mut self, role: DriveRole, drive: &DriveHandle) {
        info!(
            role = role.label(),
            path = %drive.path().display(),
            bytes = drive.len(),
            size_source = ?drive.size().source,
            "drive opened"
        );
        self.observer.on_drive(role, drive.path(), drive.size());
    }

    fn record(&mut self, kind: PassKind, path: &Path, bytes: u64, digest: &Digest) {
        let record = PassRecord {
            kind,
            path: path.to_path_buf(),
            bytes,
            digest: digest.clone(),
        };
        info!(pass = kind.label(), digest = %record.digest, "pass complete");
        self.observer.on_pass(&record);
        self.passes.push(record);
    }
}

/// Sizes known once both drives have been probed
struct Probed {
    source_size: DriveSize,
    destination_size: Option<DriveSize>,
}

/// A clone (or repeatable-read check) of one drive
pub struct CloneSession {
    config: SessionConfig,
    progress: Arc<dyn ProgressSink>,
}

impl CloneSession {
    /// Create a session that reports no progress
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            progress: Arc::new(NoProgress),
        }
    }

    /// Send per-chunk progress to `progress`
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the session to completion
    pub fn run(&self) -> Result<SessionReport> {
        self.run_with(&mut NoopObserver)
    }

    /// Run the session, reporting every event to `observer`
    ///
    /// On error the observer sees [`Phase::Failed`] before this returns.
    /// Drives, the copy buffer, and any runtime are released on every path.
    pub fn run_with(&self, observer: &mut dyn SessionObserver) -> Result<SessionReport> {
        let started = Instant::now();
        let mut journal = Journal::new(observer);

        let result = self
            .config
            .validate()
            .and_then(|()| self.execute(&mut journal, started));

        if let Err(e) = &result {
            warn!(error = %e, "session aborted");
            journal.enter(Phase::Failed);
        }
        result
    }

    fn execute(&self, journal: &mut Journal<'_>, started: Instant) -> Result<SessionReport> {
        let config = &self.config;
        journal.enter(Phase::Init);
        let mut runner = PassRunner::start(config, Arc::clone(&self.progress))?;

        let mut source = DriveHandle::open(&config.source, AccessMode::ReadOnly)?;
        journal.drive(DriveRole::Source, &source);
        let total = source.len();

        let destination_size = match &config.destination {
            Some(path) => {
                let probe = DriveHandle::open(path, AccessMode::ReadOnly)?;
                journal.drive(DriveRole::Destination, &probe);
                ensure_fits(path, total, probe.len())?;
                Some(probe.size())
            }
            None => None,
        };
        let probed = Probed {
            source_size: source.size(),
            destination_size,
        };
        journal.enter(Phase::SizeProbed);

        let mut reference = None;
        if config.destination.is_none() || config.preflight {
            let first = runner.run(PassKind::SourceRead, &mut source, None, total)?;
            journal.record(PassKind::SourceRead, &config.source, total, &first);
            let second = runner.run(PassKind::SourceReread, &mut source, None, total)?;
            journal.record(PassKind::SourceReread, &config.source, total, &second);

            if first != second {
                let outcome = Outcome::failed(FailureKind::NotRepeatable, first, second);
                return Ok(self.finish(journal, probed, outcome, started));
            }
            journal.enter(Phase::RepeatableReadChecked);
            reference = Some(second);
        } else {
            warn!("pre-flight skipped; a source changing under the copy will go unnoticed");
        }

        let Some(destination_path) = &config.destination else {
            return Ok(self.finish(journal, probed, Outcome::Succeeded, started));
        };

        let mut destination = DriveHandle::open(destination_path, AccessMode::ReadWrite)?;
        ensure_fits(destination_path, total, destination.len())?;
        let copied = runner.run(PassKind::Clone, &mut source, Some(&mut destination), total)?;
        destination.sync()?;
        drop(destination);
        drop(source);
        journal.record(PassKind::Clone, &config.source, total, &copied);
        journal.enter(Phase::Cloned);

        if let Some(reference) = reference {
            if reference != copied {
                let outcome = Outcome::failed(FailureKind::SourceChanged, reference, copied);
                return Ok(self.finish(journal, probed, outcome, started));
            }
            journal.enter(Phase::ConsistencyChecked);
        }

        let mut readback = DriveHandle::open(destination_path, AccessMode::ReadOnly)?;
        let verified = runner.run(PassKind::Verify, &mut readback, None, total)?;
        drop(readback);
        journal.record(PassKind::Verify, destination_path, total, &verified);
        journal.enter(Phase::Verified);

        let outcome = if verified == copied {
            Outcome::Succeeded
        } else {
            Outcome::failed(FailureKind::VerificationMismatch, copied, verified)
        };
        Ok(self.finish(journal, probed, outcome, started))
    }

    fn finish(&self, journal: &mut Journal<'_>, probed: Probed, outcome: Outcome, started: Instant) -> SessionReport {
        journal.enter(if outcome.is_success() {
            Phase::Succeeded
        } else {
            Phase::Failed
        });
        match &outcome {
            Outcome::Succeeded => info!("session succeeded"),
            Outcome::Failed { kind, .. } => warn!(%kind, "session failed"),
        }
        journal.observer.on_outcome(&outcome);

        SessionReport {
            source: self.config.source.clone(),
            destination: self.config.destination.clone(),
            source_size: probed.source_size,
            destination_size: probed.destination_size,
            engine: self.config.engine,
            algorithm: self.config.algorithm,
            phases: std::mem::take(&mut journal.phases),
            passes: std::mem::take(&mut journal.passes),
            outcome,
            elapsed: started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::copier::tests::pattern;
    use crate::core::ConsoleObserver;
    use crate::hash::digest_bytes;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn image(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    fn config(source: &Path, destination: Option<&Path>) -> SessionConfig {
        SessionConfig {
            source: source.to_path_buf(),
            destination: destination.map(Path::to_path_buf),
            buffer_size: 4096,
            chunk_size: 1024,
            high_water: 8192,
            low_water: 2048,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_source_only_checks_repeatability() {
        let data = pattern(50_000);
        let src = image(&data);

        let report = CloneSession::new(config(src.path(), None)).run().unwrap();

        assert!(report.is_success());
        assert_eq!(
            report.phases,
            vec![Phase::Init, Phase::SizeProbed, Phase::RepeatableReadChecked, Phase::Succeeded]
        );
        let expected = digest_bytes(&data, HashAlgorithm::Sha1);
        assert_eq!(report.digest(PassKind::SourceRead), Some(&expected));
        assert_eq!(report.digest(PassKind::SourceReread), Some(&expected));
        assert!(report.digest(PassKind::Clone).is_none());
    }

    #[test]
    fn test_clone_full_phase_sequence() {
        let data = pattern(30_000);
        let src = image(&data);
        let dst = image(&vec![0u8; 40_000]);

        let report = CloneSession::new(config(src.path(), Some(dst.path()))).run().unwrap();

        assert!(report.is_success());
        assert_eq!(
            report.phases,
            vec![
                Phase::Init,
                Phase::SizeProbed,
                Phase::RepeatableReadChecked,
                Phase::Cloned,
                Phase::ConsistencyChecked,
                Phase::Verified,
                Phase::Succeeded,
            ]
        );
        assert_eq!(report.passes.len(), 4);

        let written = std::fs::read(dst.path()).unwrap();
        assert_eq!(&written[..data.len()], &data[..]);
        assert!(written[data.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_no_preflight_skips_consistency_phase() {
        let data = pattern(10_000);
        let src = image(&data);
        let dst = image(&vec![0u8; 10_000]);
        let mut cfg = config(src.path(), Some(dst.path()));
        cfg.preflight = false;

        let report = CloneSession::new(cfg).run().unwrap();

        assert!(report.is_success());
        assert_eq!(
            report.phases,
            vec![Phase::Init, Phase::SizeProbed, Phase::Cloned, Phase::Verified, Phase::Succeeded]
        );
        assert_eq!(report.passes.len(), 2);
    }

    #[test]
    fn test_pipelined_engine_clones() {
        let data = pattern(25_000);
        let src = image(&data);
        let dst = image(&vec![0u8; 25_000]);
        let mut cfg = config(src.path(), Some(dst.path()));
        cfg.engine = Engine::Pipelined;
        cfg.algorithm = HashAlgorithm::Blake3;

        let report = CloneSession::new(cfg).run().unwrap();

        assert!(report.is_success());
        assert_eq!(
            report.digest(PassKind::Verify),
            Some(&digest_bytes(&data, HashAlgorithm::Blake3))
        );
        assert_eq!(std::fs::read(dst.path()).unwrap(), data);
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.img");

        let err = CloneSession::new(config(&missing, None)).run().unwrap_err();

        assert!(matches!(err, CloneError::Io { op: "open()", .. }));
        assert_eq!(err.path(), Some(&missing));
    }

    fn text_output(cfg: SessionConfig) -> Vec<String> {
        let mut console = ConsoleObserver::with_writer(Vec::new());
        let report = CloneSession::new(cfg).run_with(&mut console).unwrap();
        let mut out = console.into_inner();
        report.write_summary(&mut out).unwrap();
        String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_text_output_ends_with_single_verdict() {
        let data = pattern(20_000);
        let src = image(&data);
        let dst = image(&vec![0u8; 20_000]);

        let lines = text_output(config(src.path(), Some(dst.path())));

        let verdicts: Vec<&String> = lines
            .iter()
            .filter(|l| *l == "SUCCESS" || *l == "FAILURE")
            .collect();
        assert_eq!(verdicts, vec!["SUCCESS"]);
        assert_eq!(lines.last().map(String::as_str), Some("SUCCESS"));
    }

    #[test]
    fn test_text_output_digest_lines_pair_source_and_destination() {
        let data = pattern(8_000);
        let src = image(&data);
        let dst = image(&vec![0u8; 8_000]);
        let hex = digest_bytes(&data, HashAlgorithm::Sha1).to_hex();

        let lines = text_output(config(src.path(), Some(dst.path())));

        let digest_lines: Vec<&String> = lines.iter().filter(|l| l.starts_with(&hex)).collect();
        let src_line = format!("{}  {}", hex, src.path().display());
        let dst_line = format!("{}  {}", hex, dst.path().display());
        assert_eq!(digest_lines, vec![&src_line, &src_line, &src_line, &dst_line]);
        assert!(lines[0].starts_with("src drive size: 8000 bytes"));
        assert!(lines[1].starts_with("dst drive size: 8000 bytes"));
    }

    #[test]
    fn test_ensure_fits() {
        assert!(ensure_fits(Path::new("dst"), 10, 10).is_ok());
        assert!(ensure_fits(Path::new("dst"), 10, 11).is_ok());
        let err = ensure_fits(Path::new("dst"), 11, 10).unwrap_err();
        assert!(matches!(
            err,
            CloneError::DestinationTooSmall {
                source_len: 11,
                dest_len: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_report_serializes() {
        let data = pattern(1000);
        let src = image(&data);

        let report = CloneSession::new(config(src.path(), None)).run().unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["outcome"]["status"], "succeeded");
        assert_eq!(json["engine"], "buffered");
        assert_eq!(json["phases"][1], "size-probed");
        assert_eq!(json["passes"][0]["kind"], "source-read");
        assert_eq!(
            json["passes"][0]["digest"],
            digest_bytes(&data, HashAlgorithm::Sha1).to_hex()
        );
        assert!(json["elapsed_secs"].is_number());
    }

    #[test]
    fn test_failed_outcome_serializes() {
        let a = digest_bytes(b"a", HashAlgorithm::Sha1);
        let b = digest_bytes(b"b", HashAlgorithm::Sha1);
        let outcome = Outcome::failed(FailureKind::VerificationMismatch, a.clone(), b);

        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "verification-mismatch");
        assert_eq!(json["expected"], a.to_hex());
        assert!(!outcome.is_success());
    }
}
