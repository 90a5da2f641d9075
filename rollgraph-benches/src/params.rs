//! Benchmark parameter types.

use std::fmt;

/// Parameters for an ingestion benchmark run.
#[derive(Clone, Debug)]
pub struct IngestBenchParams {
    /// Number of events fed to the graph.
    pub event_count: usize,
    /// Number of distinct parties events are drawn from.
    pub population: usize,
}

impl fmt::Display for IngestBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "events={},parties={}", self.event_count, self.population)
    }
}
