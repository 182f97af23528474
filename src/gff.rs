//! Streaming GFF reader for start-codon records, plus the crate error type.

use crate::interval::StartRecord;
use crate::streaming::parsing::{parse_u64_fast, should_skip_line, trim_line_end, GffFields};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading CDS evidence or filtering starts.
#[derive(Error, Debug)]
pub enum GffError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Chromosome '{chrom}' (start record {record}) has no CDS intervals")]
    MissingChromosome { chrom: String, record: usize },

    #[error("{0}")]
    Unsorted(String),
}

pub type Result<T> = std::result::Result<T, GffError>;

/// Build a parse error for an integer column that failed to parse.
pub(crate) fn invalid_field(line: usize, name: &str, value: &[u8]) -> GffError {
    GffError::Parse {
        line,
        message: format!(
            "Invalid {} value: '{}'",
            name,
            String::from_utf8_lossy(value)
        ),
    }
}

/// Build a parse error for a line with too few columns.
pub(crate) fn too_few_columns(line: usize) -> GffError {
    GffError::Parse {
        line,
        message: "Expected at least 5 tab-separated fields".to_string(),
    }
}

/// A streaming reader of start-codon GFF records.
pub struct StartReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
}

impl StartReader<File> {
    /// Open a start-codon file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> StartReader<R> {
    /// Create a new reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, crate::config::DEFAULT_INPUT_BUFFER)
    }

    /// Create a reader with custom buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: Vec::with_capacity(crate::config::DEFAULT_LINE_BUFFER),
        }
    }

    /// Read the next start record.
    pub fn read_record(&mut self) -> Result<Option<StartRecord>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = trim_line_end(&self.buffer);
            if should_skip_line(line) {
                continue;
            }

            return parse_start_line(line, self.line_number).map(Some);
        }
    }

    /// Get an iterator over all records.
    pub fn records(self) -> StartRecordIter<R> {
        StartRecordIter { reader: self }
    }
}

/// Parse one start-codon line into a record.
pub fn parse_start_line(line: &[u8], line_number: usize) -> Result<StartRecord> {
    let fields = GffFields::split(line).ok_or_else(|| too_few_columns(line_number))?;

    let chrom = std::str::from_utf8(fields.seqname).map_err(|_| GffError::Parse {
        line: line_number,
        message: "Sequence name is not valid UTF-8".to_string(),
    })?;
    let start = parse_u64_fast(fields.start)
        .ok_or_else(|| invalid_field(line_number, "start", fields.start))?;
    let end =
        parse_u64_fast(fields.end).ok_or_else(|| invalid_field(line_number, "end", fields.end))?;

    Ok(StartRecord::new(chrom, start, end, line))
}

/// Iterator over start records.
pub struct StartRecordIter<R: Read> {
    reader: StartReader<R>,
}

impl<R: Read> Iterator for StartRecordIter<R> {
    type Item = Result<StartRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Read all start records from a file.
pub fn read_starts<P: AsRef<Path>>(path: P) -> Result<Vec<StartRecord>> {
    StartReader::from_path(path)?.records().collect()
}

/// Parse start records from a string (useful for testing).
pub fn parse_starts(content: &str) -> Result<Vec<StartRecord>> {
    StartReader::new(content.as_bytes()).records().collect()
}
