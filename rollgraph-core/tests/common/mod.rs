use rollgraph_core::{RollingGraph, RollingGraphBuilder, TransactionEvent};

/// Builds an event whose second-of-minute is derived from `time`.
#[must_use]
pub fn event(actor: &str, target: &str, time: i64) -> TransactionEvent {
    let second = u32::try_from(time.rem_euclid(60)).expect("second of minute fits u32");
    TransactionEvent::new(actor, target, time, second).expect("test event must validate")
}

/// A graph with narrow indices so chains collide often.
#[must_use]
pub fn graph() -> RollingGraph {
    RollingGraphBuilder::new()
        .with_vertex_index_bits(4)
        .with_histogram_capacity(4)
        .build()
        .expect("test configuration is valid")
}

#[must_use]
pub fn median_of(graph: &RollingGraph) -> Option<String> {
    graph.median().map(|median| median.to_string())
}
