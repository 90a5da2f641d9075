//! CLI entry point for the rolling median pipeline.
//!
//! Parses the two positional paths with clap, streams the input through the
//! graph engine, and maps failures to exit codes. Usage errors exit with
//! status 2 (clap's convention) and runtime failures with status 1.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use rollgraph_cli::{
    cli::{Cli, CliError, run_cli},
    logging::{self, Installation, LoggingError},
};
use tracing::{debug, error, field, info};

/// Parse CLI arguments, run the pipeline, and log the summary.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to process transactions")?;
    info!(
        events = summary.events,
        written = summary.written,
        stale = summary.stale,
        skipped = summary.skipped,
        "run completed"
    );
    Ok(())
}

fn main() -> ExitCode {
    match logging::init_logging() {
        Ok(Installation::Installed(format)) => debug!(?format, "logging installed"),
        Ok(Installation::Preexisting) => {}
        Err(err) => {
            report_logging_init_error(&err);
            return ExitCode::FAILURE;
        }
    }

    if let Err(err) = try_main() {
        let code = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Core(core) => Some(core.code().as_str()),
                _ => None,
            });
        let chain = format!("{err:#}");
        error!(
            error = %chain,
            code = code.map(field::display),
            "run failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
