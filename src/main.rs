//! CloneDrive CLI - clone a drive and prove the copy
//!
//! Exits 0 only when every check passed.

use clap::Parser;
use clonedrive::config::{CliArgs, LogFormat, OutputFormat, ProgressStyleKind, SessionConfig};
use clonedrive::core::{CloneSession, ConsoleObserver, NoopObserver, SessionObserver};
use clonedrive::error::Result;
use clonedrive::progress::{NoProgress, ProgressReporter, ProgressSink, SimpleProgress};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    init_logging(&args);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(error = %e, "clone aborted");
            eprintln!("Error: {}", e);
            if args.output_format == OutputFormat::Text {
                println!("FAILURE");
            }
            std::process::exit(1);
        }
    }
}

/// RUST_LOG wins; otherwise -v/-vv/-vvv raise the level and -q lowers it
fn init_logging(args: &CliArgs) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn progress_sink(args: &CliArgs) -> Arc<dyn ProgressSink> {
    if args.quiet || args.output_format == OutputFormat::Json {
        return Arc::new(NoProgress);
    }

    match args.progress_style {
        ProgressStyleKind::None => Arc::new(NoProgress),
        ProgressStyleKind::Bar if console::Term::stdout().is_term() => Arc::new(ProgressReporter::new()),
        ProgressStyleKind::Bar | ProgressStyleKind::Text => Arc::new(SimpleProgress::new()),
    }
}

fn run(args: &CliArgs) -> Result<bool> {
    // Build configuration
    let config = SessionConfig::from_cli(args)?;
    let session = CloneSession::new(config).with_progress(progress_sink(args));
    tracing::debug!(config = ?session.config(), "configuration");

    let mut console = ConsoleObserver::new();
    let mut silent = NoopObserver;
    let observer: &mut dyn SessionObserver = match args.output_format {
        OutputFormat::Text => &mut console,
        OutputFormat::Json => &mut silent,
    };

    let report = session.run_with(observer)?;

    match args.output_format {
        OutputFormat::Text => report.print_summary(),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(report.is_success())
}
