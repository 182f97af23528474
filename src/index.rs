//! Per-chromosome index of CDS evidence intervals.
//!
//! The whole CDS file is loaded into memory. Intervals are kept in input
//! order, which must already be ascending by `(start, end)` within each
//! chromosome; nothing is re-sorted here.

use crate::config::{DEFAULT_INPUT_BUFFER, DEFAULT_LINE_BUFFER, MMAP_THRESHOLD};
use crate::gff::{invalid_field, too_few_columns, GffError, Result};
use crate::interval::CodingInterval;
use crate::streaming::parsing::{
    parse_coverage, parse_u64_fast, should_skip_line, trim_line_end, GffFields,
};
use crate::streaming::SortValidator;
use log::{debug, info};
use memchr::memchr;
use memmap2::Mmap;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// CDS intervals grouped by chromosome.
#[derive(Debug, Default)]
pub struct CdsIndex {
    intervals_by_chrom: FxHashMap<String, Vec<CodingInterval>>,
    /// Chromosome order as first seen in the input.
    order: Vec<String>,
    len: usize,
}

/// Incremental builder shared by the buffered and memory-mapped loaders.
struct IndexBuilder {
    index: CdsIndex,
    validator: Option<SortValidator>,
}

impl IndexBuilder {
    fn new(validate: bool) -> Self {
        Self {
            index: CdsIndex::new(),
            validator: validate.then(|| SortValidator::new("CDS")),
        }
    }

    fn push_line(&mut self, line: &[u8], line_number: usize) -> Result<()> {
        let line = trim_line_end(line);
        if should_skip_line(line) {
            return Ok(());
        }

        let fields = GffFields::split(line).ok_or_else(|| too_few_columns(line_number))?;
        let chrom = std::str::from_utf8(fields.seqname).map_err(|_| GffError::Parse {
            line: line_number,
            message: "Sequence name is not valid UTF-8".to_string(),
        })?;
        let start = parse_u64_fast(fields.start)
            .ok_or_else(|| invalid_field(line_number, "start", fields.start))?;
        let end = parse_u64_fast(fields.end)
            .ok_or_else(|| invalid_field(line_number, "end", fields.end))?;
        let score = fields.score.ok_or_else(|| GffError::Parse {
            line: line_number,
            message: "CDS record has no score (coverage) column".to_string(),
        })?;
        let coverage =
            parse_coverage(score).ok_or_else(|| invalid_field(line_number, "coverage", score))?;

        if let Some(validator) = self.validator.as_mut() {
            validator.validate(chrom, start, end)?;
        }

        self.index.push(chrom, CodingInterval::new(start, end, coverage));
        Ok(())
    }

    fn finish(self) -> CdsIndex {
        self.index
    }
}

impl CdsIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a sorted CDS file.
    ///
    /// Large files are memory-mapped; smaller ones are read through a
    /// buffered reader. The file is closed before this returns.
    /// With `validate`, out-of-order records are reported as
    /// [`GffError::Unsorted`].
    pub fn from_path<P: AsRef<Path>>(path: P, validate: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len() as usize;

        let index = if file_size >= MMAP_THRESHOLD {
            // SAFETY: the map is read-only and dropped before returning; the
            // file is not expected to be modified while it is being loaded.
            let mmap = unsafe { Mmap::map(&file)? };
            Self::from_bytes(&mmap, validate)?
        } else {
            Self::from_reader(file, validate)?
        };

        info!(
            "Loaded {} CDS intervals on {} chromosomes from {}",
            index.len(),
            index.num_chromosomes(),
            path.display()
        );
        Ok(index)
    }

    /// Load CDS records from any readable source.
    pub fn from_reader<R: Read>(reader: R, validate: bool) -> Result<Self> {
        let mut reader = BufReader::with_capacity(DEFAULT_INPUT_BUFFER, reader);
        let mut buffer = Vec::with_capacity(DEFAULT_LINE_BUFFER);
        let mut builder = IndexBuilder::new(validate);
        let mut line_number = 0;

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;
            builder.push_line(&buffer, line_number)?;
        }

        Ok(builder.finish())
    }

    /// Load CDS records from an in-memory buffer (zero-copy line scanning).
    pub fn from_bytes(data: &[u8], validate: bool) -> Result<Self> {
        let mut builder = IndexBuilder::new(validate);
        let mut pos = 0;
        let mut line_number = 0;

        while pos < data.len() {
            let line_end = memchr(b'\n', &data[pos..]).map_or(data.len(), |i| pos + i);
            line_number += 1;
            builder.push_line(&data[pos..line_end], line_number)?;
            pos = line_end + 1;
        }

        Ok(builder.finish())
    }

    /// Parse CDS records from a string without validation (useful for testing).
    pub fn parse(content: &str) -> Result<Self> {
        Self::from_bytes(content.as_bytes(), false)
    }

    /// Append an interval to a chromosome's list.
    pub fn push(&mut self, chrom: &str, interval: CodingInterval) {
        match self.intervals_by_chrom.get_mut(chrom) {
            Some(list) => list.push(interval),
            None => {
                debug!("CDS index: new chromosome '{}'", chrom);
                self.order.push(chrom.to_string());
                self.intervals_by_chrom
                    .insert(chrom.to_string(), vec![interval]);
            }
        }
        self.len += 1;
    }

    /// Intervals for a chromosome, in input order.
    #[inline]
    pub fn get(&self, chrom: &str) -> Option<&[CodingInterval]> {
        self.intervals_by_chrom.get(chrom).map(Vec::as_slice)
    }

    /// Check if a chromosome has any CDS intervals.
    #[inline]
    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.intervals_by_chrom.contains_key(chrom)
    }

    /// Chromosome names in first-seen order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// Number of chromosomes.
    pub fn num_chromosomes(&self) -> usize {
        self.order.len()
    }

    /// Total number of intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
