//! Behavioural tests for the `RollingGraph` ingestion API.

mod common;

use common::{event, graph, median_of};
use rollgraph_core::{Ingest, RollingGraph, RollingGraphBuilder, RollingGraphError};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use rollgraph_test_support::tracing::RecordingLayer;

/// Two edges sharing `a`, one second apart.
#[fixture]
fn fan() -> RollingGraph {
    let mut graph = graph();
    graph.ingest(&event("a", "b", 0)).expect("ingest");
    graph.ingest(&event("a", "c", 1)).expect("ingest");
    graph
}

#[rstest]
fn builder_defaults() {
    let builder = RollingGraphBuilder::new();
    assert_eq!(builder.vertex_index_bits(), 16);
    assert_eq!(builder.edge_index_bits(), 13);
    assert_eq!(builder.histogram_capacity(), 2048);
    assert_eq!(builder.histogram_capacity_limit(), 1 << 24);

    let graph = builder.build().expect("defaults valid");
    assert_eq!(graph.vertex_count(), 0);
    assert_eq!(graph.max_degree(), 1);
    assert_eq!(graph.latest_event_time(), None);
    assert!(graph.median().is_none());
}

#[rstest]
fn shared_vertex_scenario(fan: RollingGraph) {
    assert_eq!(fan.degree_of("a"), Some(2));
    assert_eq!(fan.degree_of("b"), Some(1));
    assert_eq!(fan.degree_of("c"), Some(1));
    assert_eq!(fan.histogram(), [0, 2, 1]);
    assert_eq!(median_of(&fan).as_deref(), Some("1.00"));
    fan.validate().expect("graph is consistent");
}

#[rstest]
fn full_window_jump_resets_everything(mut fan: RollingGraph) {
    let outcome = fan.ingest(&event("d", "e", 61)).expect("ingest");
    assert_eq!(outcome.median().map(|m| m.to_string()).as_deref(), Some("1.00"));
    assert_eq!(fan.vertex_count(), 2);
    assert_eq!(fan.edge_count(), 1);
    assert_eq!(fan.degree_of("a"), None);
    assert_eq!(fan.degree_of("d"), Some(1));
    assert_eq!(fan.histogram(), [0, 2]);
    fan.validate().expect("graph is consistent");
}

#[rstest]
fn window_law_drops_sixty_and_keeps_fifty_nine(mut fan: RollingGraph) {
    fan.ingest(&event("d", "e", 60)).expect("ingest");
    assert!(!fan.contains_edge("a", "b"), "edge observed 60 s earlier must expire");
    assert!(fan.contains_edge("c", "a"), "edge observed 59 s earlier must survive");
    assert_eq!(fan.degree_of("a"), Some(1));
    assert_eq!(fan.degree_of("b"), None);
    assert_eq!(fan.edge_count(), 2);
    fan.validate().expect("graph is consistent");
}

#[rstest]
fn duplicate_pair_replaces_prior_edge(mut fan: RollingGraph) {
    let outcome = fan.ingest(&event("b", "a", 2)).expect("ingest");
    assert_eq!(outcome, Ingest::Accepted(fan.median().expect("median exists")));
    assert_eq!(fan.edge_count(), 2);
    assert_eq!(fan.vertex_count(), 3);
    assert_eq!(fan.degree_of("a"), Some(2));
    assert_eq!(fan.degree_of("b"), Some(1));
    assert_eq!(fan.histogram(), [0, 2, 1]);
    fan.validate().expect("graph is consistent");

    // The refreshed edge now lives at t=2, so it outlasts the original slot.
    fan.ingest(&event("x", "y", 60)).expect("ingest");
    assert!(fan.contains_edge("a", "b"));
}

#[rstest]
fn stale_event_is_ignored(mut fan: RollingGraph) {
    fan.ingest(&event("a", "b", 2)).expect("ingest");
    let histogram = fan.histogram().to_vec();
    let median = fan.median();

    let outcome = fan.ingest(&event("f", "g", 2 - 65)).expect("ingest");
    assert_eq!(outcome, Ingest::Stale);
    assert!(outcome.median().is_none());
    assert_eq!(fan.histogram(), histogram.as_slice());
    assert_eq!(fan.median(), median);
    assert_eq!(fan.edge_count(), 2);
    assert_eq!(fan.latest_event_time(), Some(2));
    assert_eq!(fan.degree_of("f"), None);
}

#[rstest]
#[case::one_second_inside(-59, false)]
#[case::exactly_a_window(-60, true)]
#[case::far_behind(-3_600, true)]
fn late_events_respect_the_window(
    mut fan: RollingGraph,
    #[case] offset: i64,
    #[case] stale: bool,
) {
    let outcome = fan.ingest(&event("p", "q", 1 + offset)).expect("ingest");
    assert_eq!(outcome.is_stale(), stale);
    assert_eq!(fan.latest_event_time(), Some(1));
}

#[rstest]
fn late_event_inside_window_expires_on_schedule(mut fan: RollingGraph) {
    fan.ingest(&event("p", "q", -50)).expect("ingest");
    assert!(fan.contains_edge("p", "q"));
    // t=10 pushes the window start to -49.
    fan.ingest(&event("r", "s", 10)).expect("ingest");
    assert!(!fan.contains_edge("p", "q"));
    fan.validate().expect("graph is consistent");
}

#[rstest]
fn explicit_reset_allows_any_event_time(mut fan: RollingGraph) {
    fan.reset();
    assert_eq!(fan.vertex_count(), 0);
    assert_eq!(fan.histogram(), [0, 0]);
    let outcome = fan.ingest(&event("a", "b", -1_000)).expect("ingest");
    assert!(!outcome.is_stale());
    fan.validate().expect("graph is consistent");
}

#[rstest]
fn degree_ceiling_is_reported_not_panicked() {
    let mut graph = RollingGraphBuilder::new()
        .with_histogram_capacity(2)
        .with_histogram_capacity_limit(2)
        .build()
        .expect("configuration valid");
    graph.ingest(&event("hub", "a", 0)).expect("ingest");
    let err = graph
        .ingest(&event("hub", "b", 0))
        .expect_err("degree 2 needs three buckets");
    assert!(matches!(
        err,
        RollingGraphError::HistogramExhausted { degree: 2, limit: 2 }
    ));
    assert!(!err.is_invariant());
}

#[rstest]
fn reset_span_records_edge_count(mut fan: RollingGraph) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || fan.reset());

    let spans = layer.spans();
    let reset = spans
        .iter()
        .find(|span| span.name == "core.reset")
        .expect("core.reset span must exist");
    assert_eq!(reset.level, Level::INFO);
    assert_eq!(reset.fields.get("edges"), Some(&"2".to_owned()));
}

#[rstest]
fn window_reset_is_logged(mut fan: RollingGraph) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        fan.ingest(&event("d", "e", 500)).expect("ingest");
    });

    let events = layer.events();
    assert!(events.iter().any(|event| {
        event.level == Level::DEBUG
            && event
                .fields
                .get("message")
                .is_some_and(|value| value == "window reset")
            && event
                .fields
                .get("evicted")
                .is_some_and(|value| value == "2")
    }));
}
