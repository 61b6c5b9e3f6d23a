//! Session event hooks
//!
//! A [`SessionObserver`] sees every drive probe, phase transition, and
//! finished pass as it happens. The CLI prints through one; tests use them
//! to inject faults between phases or to spy on what the session did.

use crate::core::{Outcome, PassRecord, Phase};
use crate::fs::DriveSize;
use serde::Serialize;
use std::io::{Stdout, Write};
use std::path::Path;

/// Which side of the clone a drive is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveRole {
    /// The drive being cloned
    Source,
    /// The drive receiving the clone
    Destination,
}

impl DriveRole {
    /// Short label used on the console
    pub fn label(&self) -> &'static str {
        match self {
            Self::Source => "src",
            Self::Destination => "dst",
        }
    }
}

/// Receiver of session events; every method defaults to doing nothing
pub trait SessionObserver {
    /// A drive was opened and its length probed
    fn on_drive(&mut self, _role: DriveRole, _path: &Path, _size: DriveSize) {}

    /// The session entered `phase`
    fn on_phase(&mut self, _phase: Phase) {}

    /// A read, clone, or verify pass produced a digest
    fn on_pass(&mut self, _record: &PassRecord) {}

    /// The session reached a terminal state
    fn on_outcome(&mut self, _outcome: &Outcome) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Writes the protocol lines (sizes, digests, mismatch detail) as they happen
///
/// The closing SUCCESS/FAILURE verdict belongs to
/// [`SessionReport::write_summary`](crate::core::SessionReport::write_summary),
/// so it is printed once, last.
pub struct ConsoleObserver<W: Write = Stdout> {
    out: W,
}

impl ConsoleObserver {
    /// Observer printing to stdout
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleObserver<W> {
    /// Observer printing to any writer
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    /// Give the writer back
    pub fn into_inner(self) -> W {
        self.out
    }
}

// Console output is best-effort; a closed stdout must not abort a clone.
impl<W: Write> SessionObserver for ConsoleObserver<W> {
    fn on_drive(&mut self, role: DriveRole, _path: &Path, size: DriveSize) {
        let _ = writeln!(
            self.out,
            "{} drive size: {} bytes ({})",
            role.label(),
            size.bytes,
            humansize::format_size(size.bytes, humansize::BINARY)
        );
    }

    fn on_phase(&mut self, phase: Phase) {
        if phase == Phase::Cloned {
            let _ = writeln!(self.out, "source closed (it's now safe to unplug the src drive)");
        }
    }

    fn on_pass(&mut self, record: &PassRecord) {
        let _ = writeln!(self.out, "{}  {}", record.digest, record.path.display());
    }

    fn on_outcome(&mut self, outcome: &Outcome) {
        if let Outcome::Failed { kind, expected, actual } = outcome {
            let _ = writeln!(self.out, "{}", kind);
            let _ = writeln!(self.out, "  expected {}", expected);
            let _ = writeln!(self.out, "  actual   {}", actual);
        }
        let _ = self.out.flush();
    }
}
