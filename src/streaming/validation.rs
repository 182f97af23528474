//! Sort validation for the sweep inputs.
//!
//! The sweep never revisits CDS intervals it has retired, so unsorted input
//! silently under-counts overlaps instead of failing. Validation turns that
//! into an error. It checks that:
//! 1. All records for a chromosome are contiguous (no interleaving)
//! 2. Within a chromosome, `(start, end)` keys are non-decreasing
//!
//! Chromosome order itself is free: any consistent grouping works.

use crate::gff::GffError;
use rustc_hash::FxHashSet;

/// Inline sort validator, fed one record at a time while a file is consumed.
#[derive(Debug)]
pub struct SortValidator {
    file_id: &'static str,
    prev_chrom: Option<String>,
    prev_start: u64,
    prev_end: u64,
    seen_chroms: FxHashSet<String>,
    record_count: usize,
}

impl SortValidator {
    /// Create a validator; `file_id` names the input in error messages.
    pub fn new(file_id: &'static str) -> Self {
        Self {
            file_id,
            prev_chrom: None,
            prev_start: 0,
            prev_end: 0,
            seen_chroms: FxHashSet::default(),
            record_count: 0,
        }
    }

    /// Validate that the given record maintains sort order.
    #[inline]
    pub fn validate(&mut self, chrom: &str, start: u64, end: u64) -> Result<(), GffError> {
        self.record_count += 1;

        match self.prev_chrom.as_deref() {
            Some(pc) if pc == chrom => {
                if (start, end) < (self.prev_start, self.prev_end) {
                    return Err(GffError::Unsorted(format!(
                        "{} file not sorted: {}:{}-{} at record {} comes after {}:{}-{}",
                        self.file_id,
                        chrom,
                        start,
                        end,
                        self.record_count,
                        chrom,
                        self.prev_start,
                        self.prev_end
                    )));
                }
            }
            Some(pc) => {
                if self.seen_chroms.contains(chrom) {
                    return Err(GffError::Unsorted(format!(
                        "{} file not sorted: chromosome '{}' at record {} was seen earlier (chromosomes must be contiguous)",
                        self.file_id, chrom, self.record_count
                    )));
                }
                self.seen_chroms.insert(pc.to_string());
                self.prev_chrom = Some(chrom.to_string());
            }
            None => self.prev_chrom = Some(chrom.to_string()),
        }

        self.prev_start = start;
        self.prev_end = end;
        Ok(())
    }

    /// Get the number of records validated.
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
