//! Start-codon filter: drop starts strictly straddled by enough CDS coverage.
//!
//! Memory: the CDS file is held in memory as a [`CdsIndex`]; starts are
//! streamed and each kept record is handed to the writer as soon as it is
//! decided.
//!
//! REQUIREMENT: both files sorted by (chrom, start, end) with each
//! chromosome's records contiguous, e.g. `sort -k1,1 -k4,4n -k5,5n`.
//! Use `--assume-sorted` to skip the inline order checks.

use crate::config::MissingChromosome;
use crate::gff::{GffError, Result, StartReader};
use crate::index::CdsIndex;
use crate::interval::StartRecord;
use crate::streaming::{GffWriter, SortValidator};
use crate::sweep::SweepState;
use log::{debug, info, warn};
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Start filter configuration.
#[derive(Debug, Clone)]
pub struct StartFilterCommand {
    /// Starts with this much straddling CDS coverage or more are removed.
    pub threshold: u64,
    pub missing_chromosome: MissingChromosome,
    /// Skip sort-order validation of both inputs.
    pub assume_sorted: bool,
}

impl StartFilterCommand {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            missing_chromosome: MissingChromosome::default(),
            assume_sorted: false,
        }
    }

    pub fn with_missing_chromosome(mut self, policy: MissingChromosome) -> Self {
        self.missing_chromosome = policy;
        self
    }

    pub fn with_assume_sorted(mut self, assume_sorted: bool) -> Self {
        self.assume_sorted = assume_sorted;
        self
    }

    /// Load the CDS file, then filter the start file into `output`.
    ///
    /// A starts path of `-` reads from stdin.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>, W: Write>(
        &self,
        starts_path: P,
        cds_path: Q,
        output: &mut W,
    ) -> Result<FilterStats> {
        let index = CdsIndex::from_path(cds_path, !self.assume_sorted)?;

        let starts_path = starts_path.as_ref();
        if starts_path == Path::new("-") {
            let stdin = io::stdin();
            self.run_with_index(&index, stdin.lock(), output)
        } else {
            let file = File::open(starts_path)?;
            self.run_with_index(&index, file, output)
        }
    }

    /// Filter starts read from `reader` against an already built index.
    pub fn run_with_index<R: Read, W: Write>(
        &self,
        index: &CdsIndex,
        reader: R,
        output: W,
    ) -> Result<FilterStats> {
        let mut writer = GffWriter::new(output);
        let records = StartReader::new(reader).records();
        let stats = self.filter_records(index, records, |rec| writer.write_line(rec.line()))?;
        writer.flush()?;

        info!("Start filter: {}", stats);
        Ok(stats)
    }

    /// Filter in-memory records, returning the kept ones in input order.
    pub fn filter(&self, index: &CdsIndex, starts: &[StartRecord]) -> Result<Vec<StartRecord>> {
        let mut kept = Vec::new();
        self.filter_records(index, starts.iter().cloned().map(Ok), |rec| {
            kept.push(rec.clone());
            Ok(())
        })?;
        Ok(kept)
    }

    /// Core sweep: decide each record in order and pass kept ones to `keep`.
    pub fn filter_records<I, F>(
        &self,
        index: &CdsIndex,
        records: I,
        mut keep: F,
    ) -> Result<FilterStats>
    where
        I: IntoIterator<Item = Result<StartRecord>>,
        F: FnMut(&StartRecord) -> Result<()>,
    {
        let mut stats = FilterStats::default();
        let mut validator = (!self.assume_sorted).then(|| SortValidator::new("start"));

        let mut chrom: Option<String> = None;
        let mut sweep = SweepState::empty();
        let mut warned_behind = false;

        for record in records {
            let rec = record?;
            stats.starts_read += 1;

            if let Some(v) = validator.as_mut() {
                v.validate(rec.chrom(), rec.start, rec.end)?;
            }

            if chrom.as_deref() != Some(rec.chrom()) {
                sweep = self.open_chromosome(index, &rec, stats.starts_read)?;
                chrom = Some(rec.chrom.clone());
                warned_behind = false;
                stats.chromosomes += 1;
            }

            if !warned_behind && sweep.is_behind(rec.end) {
                warn!(
                    "Start {}:{}-{} ends before an earlier start on the same chromosome; \
                     its CDS overlap may be under-counted",
                    rec.chrom(),
                    rec.start,
                    rec.end
                );
                warned_behind = true;
            }

            let coverage = sweep.query(rec.start, rec.end);
            stats.max_overlap = stats.max_overlap.max(coverage);

            if coverage < self.threshold {
                keep(&rec)?;
                stats.starts_kept += 1;
            } else {
                stats.starts_removed += 1;
            }
        }

        Ok(stats)
    }

    /// Fresh sweep state for the chromosome of `rec`.
    fn open_chromosome<'a>(
        &self,
        index: &'a CdsIndex,
        rec: &StartRecord,
        record_number: usize,
    ) -> Result<SweepState<'a>> {
        match index.get(rec.chrom()) {
            Some(intervals) => {
                debug!(
                    "Sweeping chromosome '{}' ({} CDS intervals)",
                    rec.chrom(),
                    intervals.len()
                );
                Ok(SweepState::new(intervals))
            }
            None => match self.missing_chromosome {
                MissingChromosome::Error => Err(GffError::MissingChromosome {
                    chrom: rec.chrom().to_string(),
                    record: record_number,
                }),
                MissingChromosome::KeepAll => {
                    warn!(
                        "Chromosome '{}' has no CDS intervals; its starts have zero overlap",
                        rec.chrom()
                    );
                    Ok(SweepState::empty())
                }
            },
        }
    }
}

/// Counts reported after a filtering run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub starts_read: usize,
    pub starts_kept: usize,
    pub starts_removed: usize,
    /// Chromosome runs swept (a chromosome re-entered counts again).
    pub chromosomes: usize,
    /// Largest straddling coverage seen for any start.
    pub max_overlap: u64,
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Read: {}, Kept: {}, Removed: {}, Chroms: {}, Max overlap: {}",
            self.starts_read,
            self.starts_kept,
            self.starts_removed,
            self.chromosomes,
            self.max_overlap
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gff::parse_starts;

    fn start_line(chrom: &str, start: u64, end: u64) -> String {
        format!("{}\tpred\tstart_codon\t{}\t{}\t.\t+\t0\tid={}", chrom, start, end, start)
    }

    fn starts(coords: &[(&str, u64, u64)]) -> String {
        coords
            .iter()
            .map(|&(c, s, e)| start_line(c, s, e) + "\n")
            .collect()
    }

    fn run(cmd: &StartFilterCommand, cds: &str, starts: &str) -> Result<(String, FilterStats)> {
        let index = CdsIndex::parse(cds)?;
        let mut out = Vec::new();
        let stats = cmd.run_with_index(&index, starts.as_bytes(), &mut out)?;
        Ok((String::from_utf8(out).unwrap(), stats))
    }

    #[test]
    fn test_single_cds_example() {
        let cds = "chr1\tspaln\tCDS\t100\t200\t3\t+\t0\t.\n";
        let cmd = StartFilterCommand::new(3);

        // Overlap 3 is not below the threshold.
        let (out, stats) = run(&cmd, cds, &starts(&[("chr1", 120, 150)])).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.starts_removed, 1);
        assert_eq!(stats.max_overlap, 3);

        // CDS does not start before 90.
        let input = starts(&[("chr1", 90, 250)]);
        let (out, _) = run(&cmd, cds, &input).unwrap();
        assert_eq!(out, input);

        // CDS end 200 is not greater than 200.
        let input = starts(&[("chr1", 120, 200)]);
        let (out, _) = run(&cmd, cds, &input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_mixed_stream_keeps_and_removes() {
        let cds = "chr1\tspaln\tCDS\t100\t200\t3\t+\t0\t.\n\
                   chr1\tspaln\tCDS\t300\t900\t2\t+\t0\t.\n";
        let input = starts(&[
            ("chr1", 50, 52),
            ("chr1", 120, 122),
            ("chr1", 198, 200),
            ("chr1", 400, 402),
        ]);

        let (out, stats) = run(&StartFilterCommand::new(2), cds, &input).unwrap();
        let expected = format!(
            "{}\n{}\n",
            start_line("chr1", 50, 52),
            start_line("chr1", 198, 200)
        );
        assert_eq!(out, expected);
        assert_eq!(stats.starts_read, 4);
        assert_eq!(stats.starts_kept, 2);
        assert_eq!(stats.starts_removed, 2);
        assert_eq!(stats.chromosomes, 1);
    }

    #[test]
    fn test_threshold_boundary() {
        let cds = "chr1\ts\tCDS\t10\t500\t2\t+\t0\t.\nchr1\ts\tCDS\t20\t400\t.\t+\t0\t.\n";
        let input = starts(&[("chr1", 100, 102)]);

        // Overlap is exactly 3: removed at threshold 3, kept at 4.
        let (out, _) = run(&StartFilterCommand::new(3), cds, &input).unwrap();
        assert!(out.is_empty());
        let (out, _) = run(&StartFilterCommand::new(4), cds, &input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_huge_coverages_do_not_wrap() {
        let cds = "chr1\ts\tCDS\t10\t500\t18446744073709551615\t+\t0\t.\n\
                   chr1\ts\tCDS\t20\t400\t1\t+\t0\t.\n";
        let input = starts(&[("chr1", 100, 102)]);

        let (out, stats) = run(&StartFilterCommand::new(5), cds, &input).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.starts_removed, 1);
        assert_eq!(stats.max_overlap, u64::MAX);
    }

    #[test]
    fn test_threshold_zero_removes_everything() {
        let cds = "chr1\ts\tCDS\t10\t20\t1\t+\t0\t.\n";
        let input = starts(&[("chr1", 500, 502)]);
        let (out, stats) = run(&StartFilterCommand::new(0), cds, &input).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.starts_removed, 1);
    }

    #[test]
    fn test_placeholder_coverage_counts_once() {
        let cds = "chr1\ts\tCDS\t10\t500\t.\t+\t0\t.\n";
        let input = starts(&[("chr1", 100, 102)]);
        let (out, _) = run(&StartFilterCommand::new(2), cds, &input).unwrap();
        assert_eq!(out, input);
        let (out, _) = run(&StartFilterCommand::new(1), cds, &input).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_pointer_resets_on_chromosome_change() {
        let cds = "chr1\ts\tCDS\t10\t50\t5\t+\t0\t.\n\
                   chr2\ts\tCDS\t10\t5000\t5\t+\t0\t.\n";
        let input = starts(&[("chr1", 1000, 1002), ("chr2", 100, 102)]);

        let (out, stats) = run(&StartFilterCommand::new(5), cds, &input).unwrap();
        assert_eq!(out, format!("{}\n", start_line("chr1", 1000, 1002)));
        assert_eq!(stats.chromosomes, 2);
    }

    #[test]
    fn test_missing_chromosome_is_error_by_default() {
        let cds = "chr1\ts\tCDS\t10\t50\t1\t+\t0\t.\n";
        let input = starts(&[("chr1", 20, 22), ("chrUn", 5, 7)]);
        match run(&StartFilterCommand::new(1), cds, &input) {
            Err(GffError::MissingChromosome { chrom, record }) => {
                assert_eq!(chrom, "chrUn");
                assert_eq!(record, 2);
            }
            other => panic!("expected missing chromosome, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_chromosome_keep_all() {
        let cds = "chr1\ts\tCDS\t10\t50\t1\t+\t0\t.\n";
        let input = starts(&[("chr1", 20, 22), ("chrUn", 5, 7), ("chrUn", 9, 11)]);
        let cmd = StartFilterCommand::new(1).with_missing_chromosome(MissingChromosome::KeepAll);

        let (out, stats) = run(&cmd, cds, &input).unwrap();
        assert_eq!(
            out,
            format!(
                "{}\n{}\n",
                start_line("chrUn", 5, 7),
                start_line("chrUn", 9, 11)
            )
        );
        assert_eq!(stats.starts_kept, 2);
    }

    #[test]
    fn test_unsorted_starts_rejected_unless_assumed_sorted() {
        let cds = "chr1\ts\tCDS\t10\t50\t1\t+\t0\t.\n";
        let input = starts(&[("chr1", 300, 302), ("chr1", 20, 22)]);

        let result = run(&StartFilterCommand::new(1), cds, &input);
        assert!(matches!(result, Err(GffError::Unsorted(_))));

        // Without validation the sweep runs; (10, 50) was retired by the
        // first start, so the second is (incorrectly) kept.
        let cmd = StartFilterCommand::new(1).with_assume_sorted(true);
        let (out, _) = run(&cmd, cds, &input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_non_contiguous_chromosome_restarts_sweep_when_assumed_sorted() {
        let cds = "chr1\ts\tCDS\t10\t500\t1\t+\t0\t.\n\
                   chr2\ts\tCDS\t10\t500\t1\t+\t0\t.\n";
        let input = starts(&[("chr1", 600, 602), ("chr2", 20, 22), ("chr1", 20, 22)]);
        let cmd = StartFilterCommand::new(1).with_assume_sorted(true);

        let (out, stats) = run(&cmd, cds, &input).unwrap();
        assert_eq!(out, format!("{}\n", start_line("chr1", 600, 602)));
        assert_eq!(stats.chromosomes, 3);
    }

    #[test]
    fn test_output_is_verbatim_including_extra_columns() {
        let cds = "chr1\ts\tCDS\t10\t20\t1\t+\t0\t.\n";
        let line = "chr1\tsrc\tstart_codon\t100\t102\t.\t-\t0\tgene_id \"g1\"; note=\"a\tb\"";
        let input = format!("##gff-version 3\n{}\r\n", line);
        let (out, _) = run(&StartFilterCommand::new(1), cds, &input).unwrap();
        assert_eq!(out, format!("{}\n", line));
    }

    #[test]
    fn test_filter_preserves_order() {
        let cds = "chr1\ts\tCDS\t50\t150\t1\t+\t0\t.\n";
        let index = CdsIndex::parse(cds).unwrap();
        let records =
            parse_starts(&starts(&[("chr1", 10, 12), ("chr1", 100, 102), ("chr1", 200, 202)]))
                .unwrap();

        let kept = StartFilterCommand::new(1).filter(&index, &records).unwrap();
        assert_eq!(kept, vec![records[0].clone(), records[2].clone()]);
    }

    #[test]
    fn test_stats_display() {
        let stats = FilterStats {
            starts_read: 10,
            starts_kept: 7,
            starts_removed: 3,
            chromosomes: 2,
            max_overlap: 12,
        };
        assert_eq!(
            stats.to_string(),
            "Read: 10, Kept: 7, Removed: 3, Chroms: 2, Max overlap: 12"
        );
    }
}
