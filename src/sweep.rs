//! Forward-only sweep over one chromosome's CDS intervals.
//!
//! For each start (visited in sorted order) the sweep answers: what is the
//! total coverage of CDS intervals that begin strictly before the start and
//! end strictly after it?
//!
//! Two phases per query:
//! 1. **Prune**: advance the pointer past intervals with `end <= start.end`.
//!    With start ends non-decreasing these can never straddle a later start,
//!    so they are retired for the rest of the chromosome.
//! 2. **Scan**: from the pointer, walk while `interval.start < start.start`
//!    and sum the coverage of intervals with `interval.end > start.end`.
//!    The pointer is not moved by the scan.
//!
//! The pointer only moves forward, so pruning is amortized linear per
//! chromosome. The scan window is bounded by the first interval starting
//! at or after the current start.

use crate::interval::CodingInterval;

/// Sweep state for a single chromosome.
#[derive(Debug, Clone)]
pub struct SweepState<'a> {
    intervals: &'a [CodingInterval],
    pointer: usize,
    last_end: u64,
}

impl<'a> SweepState<'a> {
    /// Start a sweep over one chromosome's intervals, sorted by `(start, end)`.
    pub fn new(intervals: &'a [CodingInterval]) -> Self {
        Self {
            intervals,
            pointer: 0,
            last_end: 0,
        }
    }

    /// Sweep over a chromosome with no CDS evidence.
    pub fn empty() -> Self {
        Self::new(&[])
    }

    /// Index of the first interval not yet retired.
    #[inline]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Number of intervals still eligible to straddle a later start.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.intervals.len() - self.pointer
    }

    /// Retire every interval ending at or before `end`. Returns the new pointer.
    #[inline]
    pub fn advance(&mut self, end: u64) -> usize {
        while self.pointer < self.intervals.len() && self.intervals[self.pointer].end <= end {
            self.pointer += 1;
        }
        self.last_end = self.last_end.max(end);
        self.pointer
    }

    /// Sum the coverage of live intervals that straddle `[start, end]`.
    ///
    /// Does not move the pointer. The sum saturates at `u64::MAX`, which
    /// is never below any threshold.
    #[inline]
    pub fn overlap_coverage(&self, start: u64, end: u64) -> u64 {
        self.intervals[self.pointer..]
            .iter()
            .take_while(|cds| cds.start < start)
            .filter(|cds| cds.straddles(start, end))
            .fold(0u64, |acc, cds| acc.saturating_add(cds.coverage))
    }

    /// Prune, then scan. This is the per-start query of the filter.
    #[inline]
    pub fn query(&mut self, start: u64, end: u64) -> u64 {
        self.advance(end);
        self.overlap_coverage(start, end)
    }

    /// True if `end` is below an end this sweep has already pruned against.
    ///
    /// Intervals retired for that earlier end might straddle a start ending
    /// here, so its overlap can be under-counted.
    #[inline]
    pub fn is_behind(&self, end: u64) -> bool {
        end < self.last_end
    }
}
