//! Property tests comparing `RollingGraph` against a brute-force model.

mod common;

use std::collections::{BTreeMap, HashMap};

use common::{event, graph, median_of};
use proptest::prelude::*;
use rollgraph_core::{Ingest, RollingGraph, VertexPair};
use test_strategy::Arbitrary;

/// How far the next event moves relative to the latest event time.
#[derive(Clone, Copy, Debug, Arbitrary)]
enum Jump {
    #[weight(4)]
    Same,
    #[weight(4)]
    Forward(#[strategy(1_i64..8)] i64),
    #[weight(1)]
    Leap(#[strategy(55_i64..130)] i64),
    #[weight(2)]
    Back(#[strategy(1_i64..75)] i64),
}

#[derive(Clone, Copy, Debug, Arbitrary)]
struct Step {
    #[strategy(0_u8..7)]
    left: u8,
    #[strategy(0_u8..7)]
    right: u8,
    jump: Jump,
}

impl Step {
    fn time(self, latest: Option<i64>) -> i64 {
        let base = latest.unwrap_or(1_000);
        match self.jump {
            Jump::Same => base,
            Jump::Forward(delta) | Jump::Leap(delta) => base + delta,
            Jump::Back(delta) => base - delta,
        }
    }

    fn names(self) -> (String, String) {
        (format!("v{}", self.left), format!("v{}", self.right))
    }
}

/// Every retained pair with the time it was last observed.
#[derive(Default)]
struct Model {
    edges: HashMap<VertexPair, i64>,
    latest: Option<i64>,
}

impl Model {
    fn apply(&mut self, left: &str, right: &str, time: i64) -> bool {
        if self.latest.is_some_and(|latest| time <= latest - 60) {
            return false;
        }
        let latest = self.latest.map_or(time, |latest| latest.max(time));
        self.latest = Some(latest);
        self.edges.insert(VertexPair::new(left, right), time);
        self.edges.retain(|_, observed| *observed > latest - 60);
        true
    }

    fn degrees(&self) -> BTreeMap<String, u32> {
        let mut degrees = BTreeMap::new();
        for pair in self.edges.keys() {
            for id in [pair.low(), pair.high()] {
                *degrees.entry(id.to_owned()).or_insert(0) += 1;
            }
        }
        degrees
    }

    fn median(&self) -> Option<String> {
        let mut sorted: Vec<u32> = self.degrees().into_values().collect();
        sorted.sort_unstable();
        let count = sorted.len();
        if count == 0 {
            return None;
        }
        let upper = *sorted.get(count / 2)?;
        if count % 2 == 1 {
            return Some(format!("{upper}.00"));
        }
        // Even count: distinct middle values report the lower one plus a half.
        let lower = *sorted.get(count / 2 - 1)?;
        let fraction = if lower == upper { "00" } else { "50" };
        Some(format!("{lower}.{fraction}"))
    }
}

fn replay(graph: &mut RollingGraph, steps: &[Step]) -> Result<(), TestCaseError> {
    for step in steps {
        let time = step.time(graph.latest_event_time());
        let (left, right) = step.names();
        graph
            .ingest(&event(&left, &right, time))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn graph_matches_model(steps in proptest::collection::vec(any::<Step>(), 1..120)) {
        let mut graph = graph();
        let mut model = Model::default();
        for step in steps {
            let time = step.time(graph.latest_event_time());
            let (left, right) = step.names();
            let outcome = graph
                .ingest(&event(&left, &right, time))
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            let accepted = model.apply(&left, &right, time);

            prop_assert_eq!(outcome.is_stale(), !accepted);
            if let Ingest::Accepted(median) = outcome {
                prop_assert_eq!(Some(median.to_string()), model.median());
            }
            prop_assert_eq!(graph.validate(), Ok(()));
            prop_assert_eq!(graph.edge_count(), model.edges.len());
            prop_assert_eq!(graph.latest_event_time(), model.latest);
            let degrees = model.degrees();
            prop_assert_eq!(graph.vertex_count(), degrees.len());
            for (id, degree) in &degrees {
                prop_assert_eq!(graph.degree_of(id), Some(*degree));
            }
            for pair in model.edges.keys() {
                prop_assert!(graph.contains_edge(pair.low(), pair.high()));
            }
            prop_assert_eq!(median_of(&graph), model.median());
        }
    }

    #[test]
    fn same_second_events_commute(
        prefix in proptest::collection::vec(any::<Step>(), 0..40),
        first in any::<Step>(),
        second in any::<Step>(),
    ) {
        let mut forward = graph();
        let mut reversed = graph();
        replay(&mut forward, &prefix)?;
        replay(&mut reversed, &prefix)?;

        let time = forward.latest_event_time().unwrap_or(1_000) + 1;
        let (a_left, a_right) = first.names();
        let (b_left, b_right) = second.names();
        for (graph, order) in [
            (&mut forward, [(&a_left, &a_right), (&b_left, &b_right)]),
            (&mut reversed, [(&b_left, &b_right), (&a_left, &a_right)]),
        ] {
            for (left, right) in order {
                graph
                    .ingest(&event(left, right, time))
                    .map_err(|err| TestCaseError::fail(err.to_string()))?;
            }
        }

        prop_assert_eq!(forward.histogram(), reversed.histogram());
        prop_assert_eq!(forward.median(), reversed.median());
        prop_assert_eq!(forward.edge_count(), reversed.edge_count());
    }
}
