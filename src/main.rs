//! filter-starts: remove start codons straddled by CDS alignment evidence.
//!
//! Usage: filter-starts [OPTIONS] <STARTS> <CDS> <THRESHOLD>

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;

use cds_start_filter::commands::StartFilterCommand;
use cds_start_filter::config::MissingChromosome;
use cds_start_filter::gff::GffError;

#[derive(Parser)]
#[command(name = "filter-starts")]
#[command(version)]
#[command(
    about = "Filter out starts which are overlapped by at least THRESHOLD CDS alignments",
    long_about = "Filter out starts which are overlapped by at least THRESHOLD CDS alignments. \
CDS regions which start before a start's starting coordinate and end after its ending \
coordinate are considered to be overlapping. Both input files (start codons and CDS \
coordinates in GFF format) need to be sorted by chromosome, start and end, for example: \
sort -k1,1 -k4,4n -k5,5n starts.gff > starts_sorted.gff"
)]
struct Cli {
    /// Sorted start codons in GFF format (use - for stdin)
    #[arg(value_name = "STARTS")]
    starts: PathBuf,

    /// Sorted CDS regions in GFF format. A number in the 6th (score) column
    /// is treated as the coverage of that CDS region; '.' counts as 1.
    #[arg(value_name = "CDS")]
    cds: PathBuf,

    /// Starts with THRESHOLD or more overlapping CDS coverage are filtered out.
    /// Must be a nonnegative integer; 0 removes every start.
    #[arg(value_name = "THRESHOLD")]
    threshold: u64,

    /// Skip sorted validation (faster for pre-sorted input)
    #[arg(long)]
    assume_sorted: bool,

    /// What to do with starts on chromosomes that have no CDS records:
    /// 'error' aborts, 'keep' treats them as having no overlap
    #[arg(long = "missing-chrom", value_name = "POLICY", default_value = "error")]
    missing_chrom: MissingChromosome,

    /// Print filtering statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), GffError> {
    let cmd = StartFilterCommand::new(cli.threshold)
        .with_missing_chromosome(cli.missing_chrom)
        .with_assume_sorted(cli.assume_sorted);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let stats = cmd
        .run(&cli.starts, &cli.cds, &mut handle)
        .map_err(|e| match e {
            GffError::Unsorted(msg) => GffError::Unsorted(format!(
                "{}\n\nFix: sort with 'sort -k1,1 -k4,4n -k5,5n' first, or pass --assume-sorted.",
                msg
            )),
            other => other,
        })?;

    if cli.stats {
        eprintln!("Start filter stats: {}", stats);
    }
    Ok(())
}
