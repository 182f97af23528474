//! Core record types: CDS evidence intervals and candidate start codons.

use std::fmt;

/// One CDS alignment region on a chromosome.
///
/// The chromosome is implied by the index bucket holding the interval.
/// Coordinates are compared as opaque integers; the caller's GFF
/// convention is never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodingInterval {
    pub start: u64,
    pub end: u64,
    /// Number of alignments supporting this region.
    pub coverage: u64,
}

impl CodingInterval {
    /// Create a new coding interval.
    #[inline]
    pub fn new(start: u64, end: u64, coverage: u64) -> Self {
        Self {
            start,
            end,
            coverage,
        }
    }

    /// True if this interval begins strictly before `start` and ends
    /// strictly after `end`. Equality on either bound does not count.
    #[inline]
    pub fn straddles(&self, start: u64, end: u64) -> bool {
        self.start < start && self.end > end
    }
}

/// A candidate start-codon annotation.
///
/// `line` is the record text exactly as read (without its line
/// terminator) and is what gets written when the start is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub line: Vec<u8>,
}

impl StartRecord {
    /// Create a new start record.
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, line: impl Into<Vec<u8>>) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            line: line.into(),
        }
    }

    /// Chromosome name.
    #[inline]
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Original record text.
    #[inline]
    pub fn line(&self) -> &[u8] {
        &self.line
    }
}

impl fmt::Display for StartRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.line))
    }
}
