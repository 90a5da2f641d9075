//! Fixed-width hash index whose slots hold sorted bucket chains.
//!
//! Every slot owns a small vector kept in ascending key order. Lookups,
//! deduplicating inserts, and removals locate their key by binary search
//! within the chain, with no linked-list bookkeeping. The index is
//! generic over its content through [`ChainItem`], which both vertex and edge
//! records implement.

use std::iter;

use crate::hash::IndexWidth;

/// Content stored in a [`HashIndex`] chain.
///
/// Items are ordered by their key; two items with equal keys are the same
/// item as far as the index is concerned.
pub(crate) trait ChainItem {
    /// Totally ordered key the chain is sorted by.
    type Key: Ord + ?Sized;

    /// Returns the key identifying this item.
    fn key(&self) -> &Self::Key;
}

/// Whether [`HashIndex::insert`] stored the offered item or found an equal one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Placement {
    /// The offered item was spliced into its chain.
    Inserted,
    /// An equal item was already present; the offered item was dropped.
    Existing,
}

#[derive(Debug)]
pub(crate) struct HashIndex<T> {
    slots: Box<[Vec<T>]>,
    width: IndexWidth,
    len: usize,
}

impl<T: ChainItem> HashIndex<T> {
    pub(crate) fn new(width: IndexWidth) -> Self {
        let slots = iter::repeat_with(Vec::new).take(width.slots()).collect();
        Self {
            slots,
            width,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns the chain stored under `hash`, empty when the slot is vacant.
    pub(crate) fn chain(&self, hash: u32) -> &[T] {
        &self.slots[self.slot(hash)]
    }

    pub(crate) fn find(&self, hash: u32, key: &T::Key) -> Option<&T> {
        let chain = self.chain(hash);
        chain
            .binary_search_by(|probe| probe.key().cmp(key))
            .ok()
            .and_then(|position| chain.get(position))
    }

    pub(crate) fn find_mut(&mut self, hash: u32, key: &T::Key) -> Option<&mut T> {
        let slot = self.slot(hash);
        let chain = &mut self.slots[slot];
        let position = chain.binary_search_by(|probe| probe.key().cmp(key)).ok()?;
        chain.get_mut(position)
    }

    /// Inserts `item` under `hash` unless an equal item is already chained.
    ///
    /// Returns the canonical stored item together with how it got there, so
    /// callers can tell a fresh record from a pre-existing one.
    pub(crate) fn insert(&mut self, hash: u32, item: T) -> (&mut T, Placement) {
        let slot = self.slot(hash);
        let chain = &mut self.slots[slot];
        match chain.binary_search_by(|probe| probe.key().cmp(item.key())) {
            Ok(position) => (&mut chain[position], Placement::Existing),
            Err(position) => {
                chain.insert(position, item);
                self.len += 1;
                (&mut chain[position], Placement::Inserted)
            }
        }
    }

    /// Unlinks and returns the item keyed `key`, if chained under `hash`.
    pub(crate) fn remove(&mut self, hash: u32, key: &T::Key) -> Option<T> {
        let slot = self.slot(hash);
        let chain = &mut self.slots[slot];
        let position = chain.binary_search_by(|probe| probe.key().cmp(key)).ok()?;
        self.len -= 1;
        Some(chain.remove(position))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    /// Drops every chain at once.
    pub(crate) fn clear(&mut self) {
        for chain in &mut self.slots {
            chain.clear();
        }
        self.len = 0;
    }

    const fn slot(&self, hash: u32) -> usize {
        (hash & self.width.mask()) as usize
    }
}

impl<T> IntoIterator for HashIndex<T> {
    type Item = T;
    type IntoIter = iter::Flatten<std::vec::IntoIter<Vec<T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_vec().into_iter().flatten()
    }
}
