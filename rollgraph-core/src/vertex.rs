//! Vertex records and the registry that owns them.
//!
//! A vertex exists in the registry exactly while its degree is positive.
//! Degree bookkeeping is left to the caller: [`VertexRegistry::resolve`]
//! creates fresh vertices at degree one but never touches an existing one.

use std::sync::Arc;

use crate::{
    chain::{ChainItem, HashIndex, Placement},
    error::InvariantViolation,
    hash::{IndexWidth, vertex_hash},
};

#[derive(Clone, Debug)]
pub(crate) struct Vertex {
    id: Arc<str>,
    degree: u32,
}

impl Vertex {
    const fn fresh(id: Arc<str>) -> Self {
        Self { id, degree: 1 }
    }

    pub(crate) fn id(&self) -> &Arc<str> {
        &self.id
    }

    pub(crate) const fn degree(&self) -> u32 {
        self.degree
    }

    pub(crate) const fn set_degree(&mut self, degree: u32) {
        self.degree = degree;
    }
}

impl ChainItem for Vertex {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
pub(crate) struct VertexRegistry {
    index: HashIndex<Vertex>,
    width: IndexWidth,
}

impl VertexRegistry {
    pub(crate) fn new(width: IndexWidth) -> Self {
        Self {
            index: HashIndex::new(width),
            width,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.index.len()
    }

    /// Looks up `id`, registering it at degree one when absent.
    ///
    /// The flag is `true` when the vertex was already registered.
    pub(crate) fn resolve(&mut self, id: &Arc<str>) -> (&mut Vertex, bool) {
        let hash = vertex_hash(id, self.width);
        let (vertex, placement) = self.index.insert(hash, Vertex::fresh(Arc::clone(id)));
        (vertex, placement == Placement::Existing)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Vertex> {
        self.index.find(vertex_hash(id, self.width), id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Vertex> {
        self.index.find_mut(vertex_hash(id, self.width), id)
    }

    /// Removes a vertex whose degree has dropped to zero.
    ///
    /// # Errors
    /// Returns [`InvariantViolation::UnknownVertex`] when `id` is not
    /// registered and [`InvariantViolation::LiveEviction`] when it still has
    /// a positive degree; the registry is left untouched in both cases.
    pub(crate) fn evict(&mut self, id: &str) -> Result<(), InvariantViolation> {
        let hash = vertex_hash(id, self.width);
        let vertex = self
            .index
            .find(hash, id)
            .ok_or_else(|| InvariantViolation::UnknownVertex { vertex: id.into() })?;
        if vertex.degree != 0 {
            return Err(InvariantViolation::LiveEviction {
                vertex: Arc::clone(&vertex.id),
                degree: vertex.degree,
            });
        }
        self.index.remove(hash, id);
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.index.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
    }
}
