//! Support library for the rollgraph CLI binary.
//!
//! Re-exports the CLI and logging modules so doctests and integration tests
//! can drive a full run without forking a subprocess.

pub mod cli;
pub mod logging;
