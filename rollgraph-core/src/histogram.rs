//! Degree frequency table and the median read off it.
//!
//! `counts[d]` holds the number of registered vertices at degree `d`. The
//! zero bucket is never occupied because zero-degree vertices are evicted.
//! The table grows by doubling up to a configured limit.

use std::fmt;

use crate::error::{InvariantViolation, Result, RollingGraphError};

/// Largest degree the histogram accepts before declaring overflow.
pub(crate) const DEGREE_CEILING: u32 = u32::MAX >> 1;

/// Median vertex degree, always a multiple of one half.
///
/// Renders as `<integer>.00` or `<integer>.50`.
///
/// # Examples
/// ```
/// use rollgraph_core::Median;
///
/// assert_eq!(Median::whole(3).to_string(), "3.00");
/// assert_eq!(Median::half(1).to_string(), "1.50");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Median {
    whole: u32,
    half: bool,
}

impl Median {
    /// A median landing exactly on `degree`.
    #[must_use]
    pub const fn whole(degree: u32) -> Self {
        Self {
            whole: degree,
            half: false,
        }
    }

    /// A median on an exact halfway crossing just above `degree`.
    #[must_use]
    pub const fn half(degree: u32) -> Self {
        Self {
            whole: degree,
            half: true,
        }
    }

    /// Integer part of the median.
    #[must_use]
    pub const fn integer_part(self) -> u32 {
        self.whole
    }

    /// Returns `true` when the median has a fractional part of one half.
    #[must_use]
    pub const fn is_half(self) -> bool {
        self.half
    }
}

impl fmt::Display for Median {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fraction = if self.half { "50" } else { "00" };
        write!(f, "{}.{fraction}", self.whole)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DegreeHistogram {
    counts: Vec<u32>,
    max_degree: u32,
    capacity_limit: usize,
}

impl DegreeHistogram {
    pub(crate) fn new(initial_capacity: usize, capacity_limit: usize) -> Self {
        Self {
            counts: vec![0; initial_capacity],
            max_degree: 1,
            capacity_limit,
        }
    }

    pub(crate) const fn max_degree(&self) -> u32 {
        self.max_degree
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.counts.len()
    }

    /// Buckets `0..=max_degree`.
    pub(crate) fn occupancy(&self) -> &[u32] {
        let end = (self.max_degree as usize + 1).min(self.counts.len());
        self.counts.get(..end).unwrap_or(&self.counts)
    }

    pub(crate) fn count(&self, degree: u32) -> u32 {
        self.counts.get(degree as usize).copied().unwrap_or(0)
    }

    pub(crate) fn total(&self) -> u64 {
        self.occupancy().iter().copied().map(u64::from).sum()
    }

    /// Moves one vertex from `old` to `new`.
    ///
    /// Degree zero stands for "not registered": it is neither decremented
    /// nor incremented.
    ///
    /// # Errors
    /// Fails when `new` cannot be recorded (see [`Self::record`]) or when the
    /// `old` bucket is already empty.
    pub(crate) fn bump(&mut self, old: u32, new: u32) -> Result<()> {
        if old != 0 {
            self.release(old)?;
        }
        if new != 0 {
            self.record(new)?;
        }
        Ok(())
    }

    pub(crate) fn record(&mut self, degree: u32) -> Result<()> {
        if degree >= DEGREE_CEILING {
            return Err(RollingGraphError::DegreeOverflow { degree });
        }
        self.ensure_capacity(degree)?;
        if let Some(count) = self.counts.get_mut(degree as usize) {
            *count += 1;
        }
        if degree > self.max_degree {
            self.max_degree = degree;
        }
        Ok(())
    }

    pub(crate) fn release(&mut self, degree: u32) -> core::result::Result<(), InvariantViolation> {
        let count = self
            .counts
            .get_mut(degree as usize)
            .filter(|count| **count > 0)
            .ok_or(InvariantViolation::HistogramUnderflow { degree })?;
        *count -= 1;
        if degree == self.max_degree && *count == 0 {
            self.shrink_max_degree();
        }
        Ok(())
    }

    /// Zeroes every bucket and restores the initial maximum.
    pub(crate) fn reset(&mut self) {
        let end = (self.max_degree as usize + 1).min(self.counts.len());
        if let Some(occupied) = self.counts.get_mut(..end) {
            occupied.fill(0);
        }
        self.max_degree = 1;
    }

    /// Median of the recorded degrees, `None` when nothing is recorded.
    ///
    /// Walks the buckets accumulating twice each count. The first degree at
    /// which the running sum reaches the total holds the median. An exact
    /// crossing, where the sum equals the total, reports that degree plus one
    /// half regardless of how far away the next occupied level is.
    pub(crate) fn median(&self) -> Option<Median> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut running = 0_u64;
        for degree in 1..=self.max_degree {
            running += 2 * u64::from(self.count(degree));
            if running > total {
                return Some(Median::whole(degree));
            }
            if running == total {
                return Some(Median::half(degree));
            }
        }
        None
    }

    fn shrink_max_degree(&mut self) {
        while self.max_degree > 1 && self.count(self.max_degree) == 0 {
            self.max_degree -= 1;
        }
    }

    fn ensure_capacity(&mut self, degree: u32) -> Result<()> {
        let needed = degree as usize + 1;
        if needed <= self.counts.len() {
            return Ok(());
        }
        if needed > self.capacity_limit {
            return Err(RollingGraphError::HistogramExhausted {
                degree,
                limit: self.capacity_limit,
            });
        }
        let mut grown = self.counts.len().max(1);
        while grown < needed {
            grown = grown.saturating_mul(2);
        }
        self.counts.resize(grown.min(self.capacity_limit), 0);
        Ok(())
    }
}
