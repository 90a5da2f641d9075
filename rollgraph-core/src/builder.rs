//! Builder utilities for configuring a [`RollingGraph`].
//!
//! Exposes the sizing knobs of the hash indices and the degree histogram and
//! validates them before a graph is constructed.

use crate::{Result, engine::RollingGraph, error::RollingGraphError, hash::IndexWidth};

/// Validated sizing of a [`RollingGraph`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GraphConfig {
    pub(crate) vertex_width: IndexWidth,
    pub(crate) edge_width: IndexWidth,
    pub(crate) histogram_capacity: usize,
    pub(crate) histogram_capacity_limit: usize,
}

/// Configures and constructs [`RollingGraph`] instances.
///
/// # Examples
/// ```
/// use rollgraph_core::RollingGraphBuilder;
///
/// let graph = RollingGraphBuilder::new()
///     .with_vertex_index_bits(12)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(graph.vertex_index_width().bits(), 12);
/// assert_eq!(graph.edge_index_width().bits(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct RollingGraphBuilder {
    vertex_index_bits: u8,
    edge_index_bits: Option<u8>,
    histogram_capacity: usize,
    histogram_capacity_limit: usize,
}

impl Default for RollingGraphBuilder {
    fn default() -> Self {
        Self {
            vertex_index_bits: Self::DEFAULT_VERTEX_INDEX_BITS,
            edge_index_bits: None,
            histogram_capacity: Self::DEFAULT_HISTOGRAM_CAPACITY,
            histogram_capacity_limit: Self::DEFAULT_HISTOGRAM_CAPACITY_LIMIT,
        }
    }
}

impl RollingGraphBuilder {
    /// Default width of the vertex index (65 536 slots).
    pub const DEFAULT_VERTEX_INDEX_BITS: u8 = 16;
    /// How many bits narrower each per-second edge index is by default.
    pub const EDGE_INDEX_NARROWING: u8 = 3;
    /// Default number of histogram buckets allocated up front.
    pub const DEFAULT_HISTOGRAM_CAPACITY: usize = 2048;
    /// Default ceiling on histogram growth.
    pub const DEFAULT_HISTOGRAM_CAPACITY_LIMIT: usize = 1 << 24;
    /// Largest histogram capacity limit accepted.
    pub const MAX_HISTOGRAM_CAPACITY_LIMIT: usize = 1 << 31;

    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use rollgraph_core::RollingGraphBuilder;
    ///
    /// let builder = RollingGraphBuilder::new();
    /// assert_eq!(builder.vertex_index_bits(), 16);
    /// assert_eq!(builder.edge_index_bits(), 13);
    /// assert_eq!(builder.histogram_capacity(), 2048);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of address bits of the vertex index.
    #[must_use]
    pub fn with_vertex_index_bits(mut self, bits: u8) -> Self {
        self.vertex_index_bits = bits;
        self
    }

    /// Returns the configured vertex index width in bits.
    #[must_use]
    pub fn vertex_index_bits(&self) -> u8 {
        self.vertex_index_bits
    }

    /// Overrides the number of address bits of each per-second edge index.
    ///
    /// When unset, the edge index is [`Self::EDGE_INDEX_NARROWING`] bits
    /// narrower than the vertex index.
    #[must_use]
    pub fn with_edge_index_bits(mut self, bits: u8) -> Self {
        self.edge_index_bits = Some(bits);
        self
    }

    /// Returns the effective edge index width in bits.
    ///
    /// # Examples
    /// ```
    /// use rollgraph_core::RollingGraphBuilder;
    ///
    /// assert_eq!(RollingGraphBuilder::new().with_vertex_index_bits(2).edge_index_bits(), 1);
    /// assert_eq!(RollingGraphBuilder::new().with_edge_index_bits(5).edge_index_bits(), 5);
    /// ```
    #[must_use]
    pub fn edge_index_bits(&self) -> u8 {
        self.edge_index_bits.unwrap_or_else(|| {
            self.vertex_index_bits
                .saturating_sub(Self::EDGE_INDEX_NARROWING)
                .max(1)
        })
    }

    /// Overrides the number of histogram buckets allocated up front.
    #[must_use]
    pub fn with_histogram_capacity(mut self, capacity: usize) -> Self {
        self.histogram_capacity = capacity;
        self
    }

    /// Returns the configured initial histogram capacity.
    #[must_use]
    pub fn histogram_capacity(&self) -> usize {
        self.histogram_capacity
    }

    /// Overrides the ceiling on histogram growth.
    ///
    /// Recording a degree that needs more buckets fails with
    /// [`RollingGraphError::HistogramExhausted`].
    #[must_use]
    pub fn with_histogram_capacity_limit(mut self, limit: usize) -> Self {
        self.histogram_capacity_limit = limit;
        self
    }

    /// Returns the configured histogram capacity limit.
    #[must_use]
    pub fn histogram_capacity_limit(&self) -> usize {
        self.histogram_capacity_limit
    }

    /// Validates the configuration and constructs a [`RollingGraph`].
    ///
    /// # Errors
    /// Returns [`RollingGraphError::InvalidConfiguration`] when an index
    /// width is outside `1..=24`, when the edge index is wider than the
    /// vertex index, or when the histogram capacities are inconsistent.
    ///
    /// # Examples
    /// ```
    /// use rollgraph_core::{RollingGraphBuilder, RollingGraphErrorCode};
    ///
    /// let err = RollingGraphBuilder::new()
    ///     .with_vertex_index_bits(0)
    ///     .build()
    ///     .expect_err("zero-width index is rejected");
    /// assert_eq!(err.code(), RollingGraphErrorCode::InvalidConfiguration);
    /// ```
    pub fn build(self) -> Result<RollingGraph> {
        let vertex_width = index_width("vertex_index_bits", self.vertex_index_bits)?;
        let edge_width = index_width("edge_index_bits", self.edge_index_bits())?;
        if edge_width.bits() > vertex_width.bits() {
            return Err(invalid(
                "edge_index_bits",
                format!(
                    "must not exceed vertex_index_bits ({}), got {}",
                    vertex_width.bits(),
                    edge_width.bits()
                ),
            ));
        }
        let limit = self.histogram_capacity_limit;
        if !(2..=Self::MAX_HISTOGRAM_CAPACITY_LIMIT).contains(&limit) {
            return Err(invalid(
                "histogram_capacity_limit",
                format!(
                    "must be within 2..={}, got {limit}",
                    Self::MAX_HISTOGRAM_CAPACITY_LIMIT
                ),
            ));
        }
        let capacity = self.histogram_capacity;
        if !(2..=limit).contains(&capacity) {
            return Err(invalid(
                "histogram_capacity",
                format!("must be within 2..={limit}, got {capacity}"),
            ));
        }
        Ok(RollingGraph::new(GraphConfig {
            vertex_width,
            edge_width,
            histogram_capacity: capacity,
            histogram_capacity_limit: limit,
        }))
    }
}

fn index_width(setting: &'static str, bits: u8) -> Result<IndexWidth> {
    IndexWidth::new(bits).ok_or_else(|| {
        invalid(
            setting,
            format!("must be within 1..={}, got {bits}", IndexWidth::MAX_BITS),
        )
    })
}

fn invalid(setting: &'static str, reason: String) -> RollingGraphError {
    RollingGraphError::InvalidConfiguration { setting, reason }
}
