//! Progress reporter implementations
//!
//! Copy engines call [`ProgressSink::report`] after every chunk with the
//! bytes done so far, the pass total, and a phase label. Sinks decide how
//! often to draw; none of them can influence the copy itself.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Receiver of per-chunk progress updates
pub trait ProgressSink: Send + Sync {
    /// Report `done` of `total` bytes for the named phase
    fn report(&self, done: u64, total: u64, phase: &str);
}

/// Completion percentage, 100% for an empty pass
pub fn percentage(done: u64, total: u64) -> f64 {
    if total == 0 {
        100.0
    } else {
        (done as f64 / total as f64) * 100.0
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _done: u64, _total: u64, _phase: &str) {}
}

/// Progress bar reporter
///
/// One indicatif bar per phase, redrawn at most once per second.
pub struct ProgressReporter {
    current: Mutex<Option<(String, ProgressBar)>>,
    hidden: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter drawing to stdout
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            hidden: false,
        }
    }

    /// Create a reporter that tracks state but never draws
    pub fn disabled() -> Self {
        Self {
            current: Mutex::new(None),
            hidden: true,
        }
    }

    fn new_bar(&self, phase: &str, total: u64) -> ProgressBar {
        let target = if self.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stdout_with_hz(1)
        };

        let bar = ProgressBar::with_draw_target(Some(total), target);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{prefix:.bold.dim} [{bar:40.green/white}] {percent:>3}% {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})",
        ) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(phase.to_string());
        bar
    }

}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressReporter {
    fn report(&self, done: u64, total: u64, phase: &str) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        let same_phase = matches!(&*current, Some((label, bar)) if label == phase && !bar.is_finished());
        if !same_phase {
            if let Some((_, old)) = current.take() {
                old.abandon();
            }
            *current = Some((phase.to_string(), self.new_bar(phase, total)));
        }

        if let Some((_, bar)) = current.as_ref() {
            bar.set_position(done);
            if done >= total {
                bar.finish();
            }
        }
    }
}

struct SimpleState {
    phase: String,
    last_emit: Option<Instant>,
    finished: bool,
}

/// Simple text progress for non-TTY environments
///
/// Prints `"\r<phase> 42% (x GB of y GB)"`, overwriting the line in place,
/// at most once per interval. The first and the final update of each phase
/// are always printed; the final one ends the line.
pub struct SimpleProgress {
    out: Mutex<Box<dyn Write + Send>>,
    state: Mutex<SimpleState>,
    interval: Duration,
}

impl SimpleProgress {
    /// Create a text reporter on stdout
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()), Duration::from_secs(1))
    }

    /// Create a text reporter on any writer with a custom interval
    pub fn with_writer(out: Box<dyn Write + Send>, interval: Duration) -> Self {
        Self {
            out: Mutex::new(out),
            state: Mutex::new(SimpleState {
                phase: String::new(),
                last_emit: None,
                finished: true,
            }),
            interval,
        }
    }

    fn render(done: u64, total: u64, phase: &str) -> String {
        format!(
            "\r{} {:.0}% ({:.3} GB of {:.3} GB)",
            phase,
            percentage(done, total),
            done as f64 / GIB,
            total as f64 / GIB,
        )
    }
}

impl Default for SimpleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for SimpleProgress {
    fn report(&self, done: u64, total: u64, phase: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.phase != phase || state.finished {
            state.phase = phase.to_string();
            state.last_emit = None;
            state.finished = false;
        }

        let complete = done >= total;
        let due = state
            .last_emit
            .map_or(true, |last| last.elapsed() >= self.interval);

        if !(due || complete) {
            return;
        }

        state.last_emit = Some(Instant::now());
        state.finished = complete;

        let mut line = Self::render(done, total, phase);
        if complete {
            line.push('\n');
        }

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // Progress output is best-effort.
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(50, 100), 50.0);
        assert_eq!(percentage(0, 0), 100.0);
        assert_eq!(percentage(100, 100), 100.0);
    }

    #[test]
    fn test_simple_progress_throttles() {
        let buf = SharedBuf::default();
        let progress = SimpleProgress::with_writer(Box::new(buf.clone()), Duration::from_secs(3600));

        progress.report(0, 100, "cloning");
        progress.report(10, 100, "cloning");
        progress.report(20, 100, "cloning");
        progress.report(100, 100, "cloning");

        let text = buf.text();
        assert_eq!(text.matches('\r').count(), 2);
        assert!(text.starts_with("\rcloning 0%"));
        assert!(text.ends_with("cloning 100% (0.000 GB of 0.000 GB)\n"));
    }

    #[test]
    fn test_simple_progress_new_phase_prints_immediately() {
        let buf = SharedBuf::default();
        let progress = SimpleProgress::with_writer(Box::new(buf.clone()), Duration::from_secs(3600));

        progress.report(0, 10, "reading");
        progress.report(10, 10, "reading");
        progress.report(0, 10, "verifying");

        let text = buf.text();
        assert!(text.contains("\rreading 100%"));
        assert!(text.ends_with("\rverifying 0% (0.000 GB of 0.000 GB)"));
    }

    #[test]
    fn test_simple_progress_repeated_phase_label() {
        let buf = SharedBuf::default();
        let progress = SimpleProgress::with_writer(Box::new(buf.clone()), Duration::from_secs(3600));

        // Two passes with the same label, back to back.
        progress.report(0, 10, "reading");
        progress.report(10, 10, "reading");
        progress.report(0, 10, "reading");

        assert_eq!(buf.text().matches("reading 0%").count(), 2);
    }

    #[test]
    fn test_bar_reporter_tracks_phases() {
        let reporter = ProgressReporter::disabled();

        reporter.report(0, 1000, "cloning");
        reporter.report(500, 1000, "cloning");
        {
            let current = reporter.current.lock().unwrap();
            let (phase, bar) = current.as_ref().unwrap();
            assert_eq!((phase.as_str(), bar.position()), ("cloning", 500));
        }

        reporter.report(1000, 1000, "cloning");
        reporter.report(10, 1000, "verifying");
        let current = reporter.current.lock().unwrap();
        let (phase, bar) = current.as_ref().unwrap();
        assert_eq!((phase.as_str(), bar.position()), ("verifying", 10));
    }
}
