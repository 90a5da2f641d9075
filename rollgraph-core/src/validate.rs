//! Structural audit backing [`crate::RollingGraph::validate`].

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use crate::{
    edge::VertexPair,
    error::InvariantViolation,
    tally::DegreeTally,
    window::{EdgeWindow, WINDOW_SECONDS},
};

type Audit = Result<(), InvariantViolation>;

pub(crate) fn audit(window: &EdgeWindow, tally: &DegreeTally) -> Audit {
    audit_histogram(tally)?;
    let incidence = audit_edges(window, tally)?;
    audit_degrees(tally, &incidence)
}

fn audit_histogram(tally: &DegreeTally) -> Audit {
    let histogram = tally.histogram();
    let occupancy = histogram.occupancy();
    if let Some(&count) = occupancy.first().filter(|count| **count != 0) {
        return Err(InvariantViolation::ZeroDegreeOccupied { count });
    }
    let total = histogram.total();
    let population = tally.registry().len();
    if usize::try_from(total).ok() != Some(population) {
        return Err(InvariantViolation::PopulationMismatch {
            histogram: total,
            registry: population,
        });
    }

    let mut expected: BTreeMap<u32, u64> = BTreeMap::new();
    for vertex in tally.registry().iter() {
        *expected.entry(vertex.degree()).or_default() += 1;
    }
    let top = expected
        .keys()
        .next_back()
        .copied()
        .unwrap_or(0)
        .max(histogram.max_degree());
    for degree in 0..=top {
        let recorded = usize::try_from(degree)
            .ok()
            .and_then(|index| occupancy.get(index))
            .copied()
            .unwrap_or(0);
        let wanted = expected.get(&degree).copied().unwrap_or(0);
        if u64::from(recorded) != wanted {
            return Err(InvariantViolation::HistogramMismatch {
                degree,
                recorded,
                expected: wanted,
            });
        }
    }
    Ok(())
}

fn audit_edges<'a>(
    window: &'a EdgeWindow,
    tally: &DegreeTally,
) -> Result<HashMap<&'a str, u64>, InvariantViolation> {
    let mut incidence: HashMap<&str, u64> = HashMap::new();
    let mut seen: HashSet<&VertexPair> = HashSet::new();
    let mut retained = 0_usize;
    let latest = window.latest_event_time();

    for (slot, edge) in window.edges() {
        let pair = edge.pair();
        let [low, high] = pair.endpoints();
        if !seen.insert(pair) {
            return Err(InvariantViolation::DuplicateEdge {
                low: Arc::clone(low),
                high: Arc::clone(high),
            });
        }
        let observed_at = edge.observed_at();
        if observed_at.rem_euclid(i64::from(WINDOW_SECONDS)) != i64::from(slot) {
            return Err(InvariantViolation::MisfiledEdge {
                low: Arc::clone(low),
                high: Arc::clone(high),
                slot,
            });
        }
        if let Some(latest) = latest {
            let age = latest.saturating_sub(observed_at);
            if !(0..i64::from(WINDOW_SECONDS)).contains(&age) {
                return Err(InvariantViolation::ExpiredEdge {
                    low: Arc::clone(low),
                    high: Arc::clone(high),
                    observed_at,
                    latest,
                });
            }
        }
        for endpoint in [low, high] {
            if tally.degree_of(endpoint).is_none() {
                return Err(InvariantViolation::DanglingEndpoint {
                    vertex: Arc::clone(endpoint),
                });
            }
            *incidence.entry(endpoint.as_ref()).or_default() += 1;
        }
        retained += 1;
    }

    if retained != window.edge_count() {
        return Err(InvariantViolation::EdgeCountMismatch {
            recorded: window.edge_count(),
            retained,
        });
    }
    Ok(incidence)
}

fn audit_degrees(tally: &DegreeTally, incidence: &HashMap<&str, u64>) -> Audit {
    for vertex in tally.registry().iter() {
        let incident = incidence.get(vertex.id().as_ref()).copied().unwrap_or(0);
        if incident == 0 {
            return Err(InvariantViolation::OrphanVertex {
                vertex: Arc::clone(vertex.id()),
            });
        }
        if u64::from(vertex.degree()) != incident {
            return Err(InvariantViolation::DegreeMismatch {
                vertex: Arc::clone(vertex.id()),
                stored: vertex.degree(),
                incident,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};

    use crate::hash::IndexWidth;

    struct Parts {
        window: EdgeWindow,
        tally: DegreeTally,
    }

    #[fixture]
    fn parts() -> Parts {
        let width = IndexWidth::new(4).expect("valid width");
        Parts {
            window: EdgeWindow::new(width),
            tally: DegreeTally::new(width, 4, 64),
        }
    }

    fn link(parts: &mut Parts, low: &str, high: &str, time: i64) {
        let second = u8::try_from(time.rem_euclid(60)).expect("second fits u8");
        parts
            .window
            .advance(time, second, &mut parts.tally)
            .expect("advance");
        let pair = VertexPair::new(low, high);
        parts
            .window
            .insert(pair.clone(), time, second, &mut parts.tally)
            .expect("insert");
        parts.tally.attach_pair(&pair).expect("attach");
    }

    #[rstest]
    fn consistent_parts_pass(mut parts: Parts) {
        link(&mut parts, "a", "b", 0);
        link(&mut parts, "a", "c", 1);
        link(&mut parts, "c", "c", 2);
        audit(&parts.window, &parts.tally).expect("parts are consistent");
    }

    #[rstest]
    fn vertex_without_edge_is_orphaned(mut parts: Parts) {
        link(&mut parts, "a", "b", 0);
        parts
            .tally
            .attach_pair(&VertexPair::new("x", "y"))
            .expect("attach");
        let err = audit(&parts.window, &parts.tally).expect_err("x and y have no edges");
        assert!(matches!(err, InvariantViolation::OrphanVertex { .. }));
    }

    #[rstest]
    fn edge_without_degree_is_a_mismatch(mut parts: Parts) {
        link(&mut parts, "a", "b", 0);
        parts
            .tally
            .attach_pair(&VertexPair::new("a", "b"))
            .expect("attach");
        let err = audit(&parts.window, &parts.tally).expect_err("degrees are doubled");
        assert!(matches!(
            err,
            InvariantViolation::DegreeMismatch {
                stored: 2,
                incident: 1,
                ..
            }
        ));
    }

    #[rstest]
    fn edge_without_vertices_dangles(mut parts: Parts) {
        let pair = VertexPair::new("a", "b");
        parts
            .window
            .advance(0, 0, &mut parts.tally)
            .expect("advance");
        parts
            .window
            .insert(pair, 0, 0, &mut parts.tally)
            .expect("insert");
        let err = audit(&parts.window, &parts.tally).expect_err("endpoints are unregistered");
        assert_eq!(
            err,
            InvariantViolation::DanglingEndpoint {
                vertex: Arc::from("a")
            }
        );
    }
}
