//! Synthetic transaction streams for benchmarking.
//!
//! Provides [`SyntheticStream`], a pre-generated sequence of
//! [`TransactionEvent`]s whose clock mostly moves forward with occasional
//! late arrivals. Streams are seeded for reproducibility across runs.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rollgraph_core::TransactionEvent;

use crate::error::BenchSetupError;

/// Event time of the first generated event (2016-03-28T23:23:12Z).
const START_TIME: i64 = 1_459_207_392;

/// Furthest a late event may fall behind the clock, in seconds. Anything
/// sixty or more seconds behind is stale.
const LATE_REACH: i64 = 75;

const SECONDS_PER_MINUTE: i64 = 60;

/// Errors that may occur during synthetic stream generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum StreamError {
    /// The requested event count was zero.
    #[error("event count must be greater than zero")]
    ZeroEvents,
    /// Fewer than two parties were requested.
    #[error("population must hold at least two parties, got {population}")]
    PopulationTooSmall {
        /// Requested population.
        population: usize,
    },
    /// The late-arrival probability was outside `0.0..=1.0`.
    #[error("late ratio must lie in 0.0..=1.0, got {ratio}")]
    InvalidLateRatio {
        /// Requested probability.
        ratio: f64,
    },
}

/// Configuration for synthetic stream generation.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    /// Number of events to generate.
    pub event_count: usize,
    /// Number of distinct parties to draw actors and targets from.
    pub population: usize,
    /// Largest forward clock step between consecutive events, in seconds.
    pub max_step: u32,
    /// Probability that an event arrives behind the clock.
    pub late_ratio: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A reproducible stream of validated transaction events.
///
/// # Examples
///
/// ```
/// use rollgraph_benches::stream::{StreamConfig, SyntheticStream};
///
/// let config = StreamConfig {
///     event_count: 100,
///     population: 20,
///     max_step: 2,
///     late_ratio: 0.1,
///     seed: 42,
/// };
/// let stream = SyntheticStream::generate(&config).expect("valid config");
/// assert_eq!(stream.events().len(), 100);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticStream {
    events: Vec<TransactionEvent>,
}

impl SyntheticStream {
    /// Generates events eagerly from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BenchSetupError::Stream`] when the configuration is invalid
    /// and [`BenchSetupError::Event`] if a generated event fails validation.
    pub fn generate(config: &StreamConfig) -> Result<Self, BenchSetupError> {
        validate(config)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let parties: Vec<Arc<str>> = (0..config.population)
            .map(|index| Arc::from(format!("party-{index}")))
            .collect();

        let mut clock = START_TIME;
        let mut events = Vec::with_capacity(config.event_count);
        for _ in 0..config.event_count {
            let time = if rng.gen_bool(config.late_ratio) {
                clock - rng.gen_range(1..=LATE_REACH)
            } else {
                clock += i64::from(rng.gen_range(0..=config.max_step));
                clock
            };
            let second = u32::try_from(time.rem_euclid(SECONDS_PER_MINUTE)).unwrap_or_default();
            let actor = pick(&parties, &mut rng)?;
            let target = pick(&parties, &mut rng)?;
            events.push(TransactionEvent::new(actor, target, time, second)?);
        }
        Ok(Self { events })
    }

    /// Returns the generated events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[TransactionEvent] {
        &self.events
    }
}

fn validate(config: &StreamConfig) -> Result<(), StreamError> {
    if config.event_count == 0 {
        return Err(StreamError::ZeroEvents);
    }
    if config.population < 2 {
        return Err(StreamError::PopulationTooSmall {
            population: config.population,
        });
    }
    if !(0.0..=1.0).contains(&config.late_ratio) {
        return Err(StreamError::InvalidLateRatio {
            ratio: config.late_ratio,
        });
    }
    Ok(())
}

fn pick(parties: &[Arc<str>], rng: &mut SmallRng) -> Result<Arc<str>, StreamError> {
    parties
        .get(rng.gen_range(0..parties.len()))
        .cloned()
        .ok_or(StreamError::PopulationTooSmall {
            population: parties.len(),
        })
}
