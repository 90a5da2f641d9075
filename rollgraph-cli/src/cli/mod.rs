//! Command-line interface for the rolling median pipeline.
//!
//! A run reads JSON-lines transactions from an input file, feeds them through
//! a [`rollgraph_core::RollingGraph`], and writes one median per accepted
//! event to the output file.

mod commands;

pub use commands::{Cli, CliError, RunSummary, run_cli};

#[cfg(test)]
mod test_helpers;
