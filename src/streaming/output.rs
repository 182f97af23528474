//! Output writer for retained start records.

use crate::config::DEFAULT_OUTPUT_BUFFER;
use crate::gff::GffError;
use std::io::{BufWriter, Write};

/// Writes retained records verbatim, one per line.
pub struct GffWriter<W: Write> {
    writer: BufWriter<W>,
    lines_written: usize,
}

impl<W: Write> GffWriter<W> {
    /// Create a new writer with the default buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    /// Create a new writer with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            lines_written: 0,
        }
    }

    /// Write a full line as-is with newline.
    #[inline]
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), GffError> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), GffError> {
        self.writer.flush()?;
        Ok(())
    }
}
