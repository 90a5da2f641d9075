//! The rolling transaction graph and its ingestion protocol.
//!
//! Each accepted event moves the sixty-second window, replaces any retained
//! edge for the same pair, attaches the new edge's endpoints, and reads the
//! median degree back off the histogram.

use tracing::{instrument, trace};

use crate::{
    Result,
    builder::GraphConfig,
    edge::VertexPair,
    error::InvariantViolation,
    event::TransactionEvent,
    hash::IndexWidth,
    histogram::Median,
    tally::DegreeTally,
    validate,
    window::{Advance, EdgeWindow},
};

/// Outcome of [`RollingGraph::ingest`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub enum Ingest {
    /// The event was applied; carries the median degree afterwards.
    Accepted(Median),
    /// The event predates the window by a full span or more and was ignored.
    Stale,
}

impl Ingest {
    /// Median reported for an accepted event.
    #[must_use]
    pub const fn median(self) -> Option<Median> {
        match self {
            Self::Accepted(median) => Some(median),
            Self::Stale => None,
        }
    }

    /// Returns `true` when the event was ignored as stale.
    #[must_use]
    pub const fn is_stale(self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// Undirected transaction graph over the trailing sixty seconds of events.
///
/// Construct one through [`crate::RollingGraphBuilder`].
///
/// # Examples
/// ```
/// use rollgraph_core::{Ingest, RollingGraphBuilder, TransactionEvent};
///
/// let mut graph = RollingGraphBuilder::new().build()?;
/// graph.ingest(&TransactionEvent::new("alice", "bob", 0, 0)?)?;
/// let outcome = graph.ingest(&TransactionEvent::new("alice", "carol", 1, 1)?)?;
///
/// assert_eq!(outcome.median().map(|m| m.to_string()).as_deref(), Some("1.00"));
/// assert_eq!(graph.degree_of("alice"), Some(2));
/// assert_eq!(graph.histogram(), [0, 2, 1]);
///
/// let late = TransactionEvent::new("dave", "erin", -64, 56)?;
/// assert_eq!(graph.ingest(&late)?, Ingest::Stale);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RollingGraph {
    config: GraphConfig,
    window: EdgeWindow,
    tally: DegreeTally,
}

impl RollingGraph {
    pub(crate) fn new(config: GraphConfig) -> Self {
        Self {
            config,
            window: EdgeWindow::new(config.edge_width),
            tally: fresh_tally(&config),
        }
    }

    /// Applies one event and reports the resulting median degree.
    ///
    /// # Errors
    /// Returns [`crate::RollingGraphError::DegreeOverflow`] or
    /// [`crate::RollingGraphError::HistogramExhausted`] when a degree can no
    /// longer be recorded, and [`crate::RollingGraphError::Invariant`] when
    /// the internal bookkeeping is found inconsistent. All three are fatal:
    /// the graph should be discarded afterwards.
    #[instrument(
        name = "core.ingest",
        level = "trace",
        err,
        skip_all,
        fields(
            actor = event.actor(),
            target = event.target(),
            event_time = event.event_time(),
        ),
    )]
    pub fn ingest(&mut self, event: &TransactionEvent) -> Result<Ingest> {
        let advance = self
            .window
            .advance(event.event_time(), event.second(), &mut self.tally)?;
        match advance {
            Advance::Stale => {
                record_stale();
                trace!(latest = ?self.window.latest_event_time(), "stale event ignored");
                return Ok(Ingest::Stale);
            }
            Advance::Reset { evicted } => {
                record_reset();
                record_evicted(evicted);
            }
            Advance::Slid { evicted } => record_evicted(evicted),
            Advance::Opened | Advance::Within => {}
        }

        let pair = event.pair();
        let replaced = self.window.insert(
            pair.clone(),
            event.event_time(),
            event.second(),
            &mut self.tally,
        )?;
        if replaced {
            record_replaced();
        }
        self.tally.attach_pair(&pair)?;

        let median = self
            .tally
            .median()
            .ok_or_else(|| InvariantViolation::PopulationMismatch {
                histogram: self.tally.histogram().total(),
                registry: self.tally.registry().len(),
            })?;
        record_ingested();
        trace!(
            %median,
            histogram = ?self.tally.histogram().occupancy(),
            "event ingested"
        );
        Ok(Ingest::Accepted(median))
    }

    /// Current median degree, `None` while no vertex is retained.
    #[must_use]
    pub fn median(&self) -> Option<Median> {
        self.tally.median()
    }

    /// Number of vertices with at least one retained edge.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.tally.registry().len()
    }

    /// Number of retained edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.window.edge_count()
    }

    /// Degree of `id`, or `None` when it has no retained edge.
    #[must_use]
    pub fn degree_of(&self, id: &str) -> Option<u32> {
        self.tally.degree_of(id)
    }

    /// Returns `true` when an edge between `left` and `right` is retained.
    ///
    /// The pair is unordered.
    #[must_use]
    pub fn contains_edge(&self, left: &str, right: &str) -> bool {
        self.window.contains(&VertexPair::new(left, right))
    }

    /// Vertex counts per degree, indexed `0..=max_degree`.
    #[must_use]
    pub fn histogram(&self) -> &[u32] {
        self.tally.histogram().occupancy()
    }

    /// Highest degree the histogram currently tracks.
    ///
    /// Never below one, even when the graph is empty.
    #[must_use]
    pub const fn max_degree(&self) -> u32 {
        self.tally.histogram().max_degree()
    }

    /// Event time of the newest accepted event, `None` before the first.
    #[must_use]
    pub fn latest_event_time(&self) -> Option<i64> {
        self.window.latest_event_time()
    }

    /// Width of the vertex index.
    #[must_use]
    pub const fn vertex_index_width(&self) -> IndexWidth {
        self.config.vertex_width
    }

    /// Width of each per-second edge index.
    #[must_use]
    pub const fn edge_index_width(&self) -> IndexWidth {
        self.config.edge_width
    }

    /// Forgets every edge, vertex, and the latest event time.
    ///
    /// The histogram shrinks back to its initial capacity.
    #[instrument(name = "core.reset", skip(self), fields(edges = self.window.edge_count()))]
    pub fn reset(&mut self) {
        self.window.clear();
        self.window.forget_latest();
        self.tally = fresh_tally(&self.config);
    }

    /// Audits every structural invariant of the graph.
    ///
    /// Runs in time linear in the retained edges and vertices; intended for
    /// tests and diagnostics rather than the ingestion hot path.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> core::result::Result<(), InvariantViolation> {
        validate::audit(&self.window, &self.tally)
    }
}

fn fresh_tally(config: &GraphConfig) -> DegreeTally {
    DegreeTally::new(
        config.vertex_width,
        config.histogram_capacity,
        config.histogram_capacity_limit,
    )
}

#[cfg(feature = "metrics")]
fn record_ingested() {
    metrics::counter!("rollgraph_events_ingested").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_ingested() {}

#[cfg(feature = "metrics")]
fn record_stale() {
    metrics::counter!("rollgraph_events_stale").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_stale() {}

#[cfg(feature = "metrics")]
fn record_evicted(edges: usize) {
    metrics::counter!("rollgraph_edges_evicted").increment(edges as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_evicted(_edges: usize) {}

#[cfg(feature = "metrics")]
fn record_reset() {
    metrics::counter!("rollgraph_window_resets").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_reset() {}

#[cfg(feature = "metrics")]
fn record_replaced() {
    metrics::counter!("rollgraph_edges_replaced").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_replaced() {}
