//! Validated transaction events accepted by [`crate::RollingGraph::ingest`].

use std::sync::Arc;

use crate::{edge::VertexPair, error::EventError, window::WINDOW_SECONDS};

/// One payment between two parties, already validated for ingestion.
///
/// The two identifiers are stored in canonical order (`actor <= target`),
/// since the transaction graph is undirected.
///
/// # Examples
/// ```
/// use rollgraph_core::TransactionEvent;
///
/// let event = TransactionEvent::new("zoe", "adam", 1_460_000_019, 39)?;
/// assert_eq!(event.actor(), "adam");
/// assert_eq!(event.target(), "zoe");
/// assert_eq!(event.second(), 39);
/// # Ok::<(), rollgraph_core::EventError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionEvent {
    actor: Arc<str>,
    target: Arc<str>,
    event_time: i64,
    second: u8,
}

impl TransactionEvent {
    /// Validates and canonicalises an event.
    ///
    /// `event_time` is in seconds since the Unix epoch and `second` is its
    /// second-of-minute.
    ///
    /// # Errors
    /// Returns [`EventError::EmptyIdentifier`] when either identifier is
    /// empty, [`EventError::SecondOutOfRange`] when `second >= 60`, and
    /// [`EventError::SecondMismatch`] when `second` is not the
    /// second-of-minute of `event_time`.
    pub fn new(
        actor: impl Into<Arc<str>>,
        target: impl Into<Arc<str>>,
        event_time: i64,
        second: u32,
    ) -> Result<Self, EventError> {
        let actor = actor.into();
        let target = target.into();
        if actor.is_empty() {
            return Err(EventError::EmptyIdentifier { role: "actor" });
        }
        if target.is_empty() {
            return Err(EventError::EmptyIdentifier { role: "target" });
        }
        let second = u8::try_from(second)
            .ok()
            .filter(|value| *value < WINDOW_SECONDS)
            .ok_or(EventError::SecondOutOfRange { second })?;
        if event_time.rem_euclid(i64::from(WINDOW_SECONDS)) != i64::from(second) {
            return Err(EventError::SecondMismatch { second, event_time });
        }
        let (actor, target) = if actor <= target {
            (actor, target)
        } else {
            (target, actor)
        };
        Ok(Self {
            actor,
            target,
            event_time,
            second,
        })
    }

    /// Lexicographically smaller party.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Lexicographically larger party.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Event time in seconds since the Unix epoch.
    #[must_use]
    pub const fn event_time(&self) -> i64 {
        self.event_time
    }

    /// Second-of-minute of [`Self::event_time`], in `0..60`.
    #[must_use]
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Returns `true` when both parties are the same identifier.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.actor == self.target
    }

    pub(crate) fn pair(&self) -> VertexPair {
        VertexPair::from_canonical(Arc::clone(&self.actor), Arc::clone(&self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("alice", "bob")]
    #[case("bob", "alice")]
    fn new_orders_parties(#[case] actor: &str, #[case] target: &str) {
        let event = TransactionEvent::new(actor, target, 0, 0).expect("event must validate");
        assert_eq!((event.actor(), event.target()), ("alice", "bob"));
    }

    #[rstest]
    #[case::actor("", "bob", "actor")]
    #[case::target("alice", "", "target")]
    fn new_rejects_empty_identifiers(
        #[case] actor: &str,
        #[case] target: &str,
        #[case] role: &'static str,
    ) {
        let err = TransactionEvent::new(actor, target, 0, 0).expect_err("empty id must fail");
        assert_eq!(err, EventError::EmptyIdentifier { role });
    }

    #[rstest]
    #[case(60)]
    #[case(256)]
    #[case(u32::MAX)]
    fn new_rejects_out_of_range_seconds(#[case] second: u32) {
        let err = TransactionEvent::new("a", "b", 0, second).expect_err("second must be < 60");
        assert_eq!(err, EventError::SecondOutOfRange { second });
        assert_eq!(err.code().as_str(), "EVENT_SECOND_OUT_OF_RANGE");
    }

    #[rstest]
    #[case(61, 0)]
    #[case(-1, 0)]
    #[case(119, 58)]
    fn new_rejects_inconsistent_seconds(#[case] event_time: i64, #[case] second: u32) {
        let err = TransactionEvent::new("a", "b", event_time, second)
            .expect_err("second must agree with the event time");
        assert_eq!(err.code().as_str(), "EVENT_SECOND_MISMATCH");
    }

    #[test]
    fn pre_epoch_times_use_euclidean_seconds() {
        let event = TransactionEvent::new("a", "b", -1, 59).expect("-1 is second 59");
        assert_eq!(event.second(), 59);
    }

    #[test]
    fn self_loops_are_flagged() {
        let event = TransactionEvent::new("solo", "solo", 5, 5).expect("event must validate");
        assert!(event.is_self_loop());
    }
}
