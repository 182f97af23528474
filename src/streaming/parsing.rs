//! Zero-allocation GFF field parsing.
//!
//! Only the columns the filter reads are located: seqname (0), start (3),
//! end (4) and score (5). Everything else on the line is opaque.

use crate::config::{COVERAGE_PLACEHOLDER, DEFAULT_COVERAGE};
use memchr::memchr;

/// Column index of the sequence (chromosome) name.
pub const SEQNAME_COL: usize = 0;
/// Column index of the feature start.
pub const START_COL: usize = 3;
/// Column index of the feature end.
pub const END_COL: usize = 4;
/// Column index of the score, which carries CDS coverage.
pub const SCORE_COL: usize = 5;

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty, contains non-digit characters,
/// or does not fit in a u64.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Parse a CDS score column into a coverage weight.
///
/// The placeholder yields [`DEFAULT_COVERAGE`]; anything else must be a
/// nonnegative integer.
#[inline]
pub fn parse_coverage(field: &[u8]) -> Option<u64> {
    if field == COVERAGE_PLACEHOLDER {
        Some(DEFAULT_COVERAGE)
    } else {
        parse_u64_fast(field)
    }
}

/// Borrowed view of the GFF columns used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GffFields<'a> {
    pub seqname: &'a [u8],
    pub start: &'a [u8],
    pub end: &'a [u8],
    /// Absent when the line has only five columns.
    pub score: Option<&'a [u8]>,
}

impl<'a> GffFields<'a> {
    /// Split a line (without its terminator) into the filter's columns.
    ///
    /// Returns None if fewer than five tab-separated columns are present.
    #[inline]
    pub fn split(line: &'a [u8]) -> Option<Self> {
        let empty: &'a [u8] = &[];
        let mut cols = [empty; SCORE_COL + 1];
        let mut rest = line;
        let mut found = 0;

        while found <= SCORE_COL {
            match memchr(b'\t', rest) {
                Some(tab) => {
                    cols[found] = &rest[..tab];
                    rest = &rest[tab + 1..];
                    found += 1;
                }
                None => {
                    cols[found] = rest;
                    found += 1;
                    break;
                }
            }
        }

        if found <= END_COL {
            return None;
        }

        Some(Self {
            seqname: cols[SEQNAME_COL],
            start: cols[START_COL],
            end: cols[END_COL],
            score: (found > SCORE_COL).then_some(cols[SCORE_COL]),
        })
    }
}

/// Check if a line should be skipped (empty, comment, or GFF directive).
#[inline(always)]
pub fn should_skip_line(line: &[u8]) -> bool {
    line.is_empty() || line[0] == b'#'
}

/// Strip a trailing `\n` or `\r\n`.
#[inline]
pub fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
