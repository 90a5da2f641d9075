//! Edge records retained by the sliding window.

use std::{fmt, sync::Arc};

use crate::chain::ChainItem;

/// Unordered vertex pair stored with the smaller identifier first.
///
/// The derived ordering compares `low` then `high`, which is the order edge
/// chains are sorted by.
///
/// # Examples
/// ```
/// use rollgraph_core::VertexPair;
///
/// let pair = VertexPair::new("mallory", "bob");
/// assert_eq!(pair.low(), "bob");
/// assert_eq!(pair, VertexPair::new("bob", "mallory"));
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexPair {
    low: Arc<str>,
    high: Arc<str>,
}

impl VertexPair {
    /// Builds the canonical pair for two identifiers given in any order.
    #[must_use]
    pub fn new(left: impl Into<Arc<str>>, right: impl Into<Arc<str>>) -> Self {
        let left = left.into();
        let right = right.into();
        if left <= right {
            Self::from_canonical(left, right)
        } else {
            Self::from_canonical(right, left)
        }
    }

    pub(crate) fn from_canonical(low: Arc<str>, high: Arc<str>) -> Self {
        debug_assert!(low <= high, "pair must be canonicalised");
        Self { low, high }
    }

    /// Lexicographically smaller endpoint.
    #[must_use]
    pub fn low(&self) -> &str {
        &self.low
    }

    /// Lexicographically larger endpoint.
    #[must_use]
    pub fn high(&self) -> &str {
        &self.high
    }

    /// Returns `true` when both endpoints are the same vertex.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.low == self.high
    }

    pub(crate) fn endpoints(&self) -> [&Arc<str>; 2] {
        [&self.low, &self.high]
    }
}

impl fmt::Display for VertexPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// An edge held in one per-second slot of the window.
///
/// The endpoints are identifiers, not owning references; the vertex records
/// themselves belong to the registry.
#[derive(Clone, Debug)]
pub(crate) struct Edge {
    pair: VertexPair,
    observed_at: i64,
}

impl Edge {
    pub(crate) const fn new(pair: VertexPair, observed_at: i64) -> Self {
        Self { pair, observed_at }
    }

    pub(crate) const fn pair(&self) -> &VertexPair {
        &self.pair
    }

    pub(crate) const fn observed_at(&self) -> i64 {
        self.observed_at
    }
}

impl ChainItem for Edge {
    type Key = VertexPair;

    fn key(&self) -> &VertexPair {
        &self.pair
    }
}
