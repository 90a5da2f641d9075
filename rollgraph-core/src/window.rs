//! The sliding sixty-second edge window.
//!
//! Edges are filed by the second-of-minute they were observed at. Because the
//! window never spans more than sixty seconds, each slot only ever holds edges
//! from a single event time, so sliding the window forward means emptying the
//! slots the new time has wrapped past.

use std::array;

use tracing::debug;

use crate::{
    chain::{HashIndex, Placement},
    edge::{Edge, VertexPair},
    error::Result,
    hash::{IndexWidth, edge_hash},
    tally::DegreeTally,
};

/// Number of per-second slots, and the window span in seconds.
pub(crate) const WINDOW_SECONDS: u8 = 60;

const WINDOW_SPAN: i64 = WINDOW_SECONDS as i64;

/// Outcome of moving the window to a new event time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Advance {
    /// The first event opened the window.
    Opened,
    /// The event is at least a full window older than the latest one.
    Stale,
    /// The event falls inside the current window; nothing moved.
    Within,
    /// The window slid forward and dropped the slots it passed.
    Slid {
        /// Edges removed from the vacated slots.
        evicted: usize,
    },
    /// The event is at least a full window newer; everything was dropped.
    Reset {
        /// Edges retained before the reset.
        evicted: usize,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Cursor {
    time: i64,
    second: u8,
}

#[derive(Debug)]
pub(crate) struct EdgeWindow {
    slots: [Option<HashIndex<Edge>>; WINDOW_SECONDS as usize],
    width: IndexWidth,
    latest: Option<Cursor>,
    edge_count: usize,
}

impl EdgeWindow {
    pub(crate) fn new(width: IndexWidth) -> Self {
        Self {
            slots: array::from_fn(|_| None),
            width,
            latest: None,
            edge_count: 0,
        }
    }

    pub(crate) const fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub(crate) fn latest_event_time(&self) -> Option<i64> {
        self.latest.map(|cursor| cursor.time)
    }

    /// Moves the window so it ends at `time`, evicting whatever falls out.
    ///
    /// Evicted edges release their endpoint degrees through `tally`. A stale
    /// event leaves every structure untouched.
    pub(crate) fn advance(
        &mut self,
        time: i64,
        second: u8,
        tally: &mut DegreeTally,
    ) -> Result<Advance> {
        let next = Cursor { time, second };
        let Some(latest) = self.latest else {
            self.latest = Some(next);
            return Ok(Advance::Opened);
        };
        let delta = time.saturating_sub(latest.time);
        if delta <= -WINDOW_SPAN {
            return Ok(Advance::Stale);
        }
        if delta >= WINDOW_SPAN {
            let evicted = self.edge_count;
            self.clear();
            tally.clear();
            self.latest = Some(next);
            debug!(evicted, from = latest.time, to = time, "window reset");
            return Ok(Advance::Reset { evicted });
        }
        if delta <= 0 {
            return Ok(Advance::Within);
        }
        let mut evicted = 0;
        let mut slot = latest.second;
        for _ in 0..delta {
            slot = (slot + 1) % WINDOW_SECONDS;
            evicted += self.evict_slot(slot, tally)?;
        }
        self.latest = Some(next);
        Ok(Advance::Slid { evicted })
    }

    /// Files a freshly observed edge under `second`.
    ///
    /// Any retained edge for the same pair is removed first, releasing its
    /// endpoint degrees. Returns `true` when such an edge was replaced.
    pub(crate) fn insert(
        &mut self,
        pair: VertexPair,
        observed_at: i64,
        second: u8,
        tally: &mut DegreeTally,
    ) -> Result<bool> {
        let hash = edge_hash(pair.low(), pair.high(), self.width);
        let replaced = self.deduplicate(&pair, hash, tally)?;
        let width = self.width;
        let index = self
            .slot_mut(second)
            .get_or_insert_with(|| HashIndex::new(width));
        let (_, placement) = index.insert(hash, Edge::new(pair, observed_at));
        if placement == Placement::Inserted {
            self.edge_count += 1;
        }
        Ok(replaced)
    }

    pub(crate) fn contains(&self, pair: &VertexPair) -> bool {
        let hash = edge_hash(pair.low(), pair.high(), self.width);
        self.indices()
            .any(|(_, index)| index.find(hash, pair).is_some())
    }

    /// Every retained edge along with the slot it is filed under.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (u8, &Edge)> {
        self.indices()
            .flat_map(|(slot, index)| index.iter().map(move |edge| (slot, edge)))
    }

    /// Drops every slot wholesale, keeping the latest event time.
    ///
    /// The caller is responsible for clearing the matching degree tally.
    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.edge_count = 0;
    }

    pub(crate) const fn forget_latest(&mut self) {
        self.latest = None;
    }

    fn deduplicate(
        &mut self,
        pair: &VertexPair,
        hash: u32,
        tally: &mut DegreeTally,
    ) -> Result<bool> {
        for index in self.slots.iter_mut().flatten() {
            if let Some(edge) = index.remove(hash, pair) {
                self.edge_count -= 1;
                tally.degrade(edge.pair())?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn evict_slot(&mut self, second: u8, tally: &mut DegreeTally) -> Result<usize> {
        let Some(index) = self.slot_mut(second).take() else {
            return Ok(0);
        };
        let evicted = index.len();
        for edge in index {
            tally.degrade(edge.pair())?;
        }
        self.edge_count -= evicted;
        if evicted > 0 {
            debug!(second, evicted, "evicted expired slot");
        }
        Ok(evicted)
    }

    fn indices(&self) -> impl Iterator<Item = (u8, &HashIndex<Edge>)> {
        (0..WINDOW_SECONDS)
            .zip(&self.slots)
            .filter_map(|(slot, entry)| entry.as_ref().map(|index| (slot, index)))
    }

    fn slot_mut(&mut self, second: u8) -> &mut Option<HashIndex<Edge>> {
        &mut self.slots[usize::from(second % WINDOW_SECONDS)]
    }
}
