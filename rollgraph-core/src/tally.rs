//! Degree bookkeeping shared by the registry and the histogram.
//!
//! Every change to a stored vertex degree goes through [`DegreeTally`] so the
//! histogram always mirrors the registry.

use std::sync::Arc;

use crate::{
    edge::VertexPair,
    error::{InvariantViolation, Result, RollingGraphError},
    hash::IndexWidth,
    histogram::{DegreeHistogram, Median},
    vertex::VertexRegistry,
};

#[derive(Debug)]
pub(crate) struct DegreeTally {
    registry: VertexRegistry,
    histogram: DegreeHistogram,
}

impl DegreeTally {
    pub(crate) fn new(width: IndexWidth, initial_capacity: usize, capacity_limit: usize) -> Self {
        Self {
            registry: VertexRegistry::new(width),
            histogram: DegreeHistogram::new(initial_capacity, capacity_limit),
        }
    }

    pub(crate) const fn registry(&self) -> &VertexRegistry {
        &self.registry
    }

    pub(crate) const fn histogram(&self) -> &DegreeHistogram {
        &self.histogram
    }

    pub(crate) fn degree_of(&self, id: &str) -> Option<u32> {
        self.registry.get(id).map(|vertex| vertex.degree())
    }

    pub(crate) fn median(&self) -> Option<Median> {
        self.histogram.median()
    }

    /// Adds one endpoint incidence for each side of `pair`.
    ///
    /// A self-loop attaches its vertex twice.
    pub(crate) fn attach_pair(&mut self, pair: &VertexPair) -> Result<()> {
        for id in pair.endpoints() {
            self.attach(id)?;
        }
        Ok(())
    }

    /// Removes one endpoint incidence for each side of `pair`, evicting
    /// vertices left without edges.
    pub(crate) fn degrade(&mut self, pair: &VertexPair) -> Result<()> {
        for id in pair.endpoints() {
            self.detach(id)?;
        }
        Ok(())
    }

    /// Drops every vertex and zeroes the histogram.
    pub(crate) fn clear(&mut self) {
        self.registry.clear();
        self.histogram.reset();
    }

    fn attach(&mut self, id: &Arc<str>) -> Result<()> {
        let (vertex, existed) = self.registry.resolve(id);
        if !existed {
            return self.histogram.record(vertex.degree());
        }
        let old = vertex.degree();
        let new = old
            .checked_add(1)
            .ok_or(RollingGraphError::DegreeOverflow { degree: old })?;
        // Record first so a refused degree leaves the histogram untouched.
        self.histogram.record(new)?;
        self.histogram.release(old)?;
        vertex.set_degree(new);
        Ok(())
    }

    fn detach(&mut self, id: &Arc<str>) -> Result<()> {
        let vertex = self
            .registry
            .get_mut(id)
            .ok_or_else(|| InvariantViolation::UnknownVertex {
                vertex: Arc::clone(id),
            })?;
        let old = vertex.degree();
        let new = old
            .checked_sub(1)
            .ok_or(InvariantViolation::HistogramUnderflow { degree: old })?;
        vertex.set_degree(new);
        self.histogram.bump(old, new)?;
        if new == 0 {
            self.registry.evict(id)?;
        }
        Ok(())
    }
}
