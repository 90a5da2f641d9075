//! Benchmark support crate for rollgraph.
//!
//! Provides seeded synthetic transaction streams and parameter types used by
//! the Criterion ingestion benchmarks.

pub mod error;
pub mod params;
pub mod stream;
