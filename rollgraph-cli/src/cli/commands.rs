//! Argument parsing and the `run` pipeline for the rollgraph CLI.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use rollgraph_core::{
    Ingest, Median, RollingGraph, RollingGraphBuilder, RollingGraphError, TransactionEvent,
};
use rollgraph_providers_jsonl::{ReaderError, Record, TransactionReader};
use thiserror::Error;
use tracing::{Span, field, instrument, warn};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "rollgraph",
    about = "Report the rolling median degree of a sixty-second transaction graph."
)]
pub struct Cli {
    /// JSON-lines file of transactions.
    pub input: PathBuf,

    /// File receiving one median per accepted transaction.
    pub output: PathBuf,
}

/// Errors that abort a CLI run.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CliError {
    /// Opening, creating, or writing a file failed.
    #[error("I/O failure on `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading the input stream failed.
    #[error(transparent)]
    Reader(#[from] ReaderError),
    /// The graph engine reported a fatal condition.
    #[error(transparent)]
    Core(#[from] RollingGraphError),
}

/// Counts describing a completed run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Valid events read from the input.
    pub events: u64,
    /// Median lines written to the output.
    pub written: u64,
    /// Events ignored because they fell outside the window.
    pub stale: u64,
    /// Input lines rejected as malformed.
    pub skipped: u64,
}

/// Executes a full run: read `cli.input`, write medians to `cli.output`.
///
/// # Errors
/// Returns [`CliError`] when a file cannot be opened, read, or written, or
/// when the engine reports a fatal condition.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use rollgraph_cli::cli::{Cli, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let input = dir.path().join("input.txt");
/// std::fs::write(
///     &input,
///     concat!(
///         r#"{"created_time": "2016-03-28T23:23:12Z", "actor": "a", "target": "b"}"#,
///         "\n",
///         r#"{"created_time": "2016-03-28T23:23:13Z", "actor": "a", "target": "c"}"#,
///         "\n",
///     ),
/// )?;
/// let output = dir.path().join("out").join("medians.txt");
/// let summary = run_cli(Cli { input, output: output.clone() })?;
/// assert_eq!(summary.written, 2);
/// assert_eq!(std::fs::read_to_string(output)?, "1.00\n1.00\n");
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(input = field::Empty, output = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<RunSummary, CliError> {
    let span = Span::current();
    span.record("input", field::display(cli.input.display()));
    span.record("output", field::display(cli.output.display()));

    let reader = open_input(&cli.input)?;
    let mut writer = create_output(&cli.output)?;
    let summary = process(reader, &mut writer, &cli.output)?;
    writer.flush().map_err(|source| CliError::Io {
        path: cli.output.clone(),
        source,
    })?;
    Ok(summary)
}

fn process(
    reader: BufReader<File>,
    writer: &mut impl Write,
    output: &Path,
) -> Result<RunSummary, CliError> {
    let mut graph = RollingGraphBuilder::new().build()?;
    let mut summary = RunSummary::default();

    for record in TransactionReader::new(reader) {
        let event = match record? {
            Record::Event(event) => event,
            Record::Skipped { line, error } => {
                summary.skipped += 1;
                warn!(line, error = %error, "skipped input line");
                continue;
            }
        };
        summary.events += 1;
        if let Some(median) = apply(&mut graph, &event)? {
            writeln!(writer, "{median}").map_err(|source| CliError::Io {
                path: output.to_path_buf(),
                source,
            })?;
            summary.written += 1;
        } else {
            summary.stale += 1;
        }
    }
    Ok(summary)
}

fn apply(
    graph: &mut RollingGraph,
    event: &TransactionEvent,
) -> Result<Option<Median>, RollingGraphError> {
    Ok(match graph.ingest(event)? {
        Ingest::Accepted(median) => Some(median),
        Ingest::Stale => None,
    })
}

#[instrument(name = "cli.open_input", err, fields(path = field::Empty))]
pub(super) fn open_input(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

#[instrument(name = "cli.create_output", err, fields(path = field::Empty))]
pub(super) fn create_output(path: &Path) -> Result<BufWriter<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let io_error = |source: io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    Ok(BufWriter::new(file))
}
