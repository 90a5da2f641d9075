//! Benchmark setup error type.
//!
//! Aggregates the failures that may arise while preparing benchmark inputs
//! so that setup functions can propagate them with `?`.

use rollgraph_core::{EventError, RollingGraphError};

use crate::stream::StreamError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic stream generation failed.
    #[error("synthetic stream generation failed: {0}")]
    Stream(#[from] StreamError),
    /// A generated event was rejected.
    #[error("generated event was invalid: {0}")]
    Event(#[from] EventError),
    /// Building or feeding the graph failed.
    #[error("graph operation failed: {0}")]
    Graph(#[from] RollingGraphError),
}
