//! Start-codon filtering against CDS alignment evidence.
//!
//! Predicted start codons that fall strictly inside CDS regions with enough
//! supporting alignments are contradicted by that evidence and removed.
//! A CDS interval counts against a start only if it begins strictly before
//! the start begins and ends strictly after the start ends; the coverage of
//! all such intervals is summed and compared with a threshold.
//!
//! # Features
//!
//! - **Single forward sweep**: a per-chromosome pointer retires CDS
//!   intervals that can no longer straddle later starts
//! - **Streaming output**: kept records are written verbatim, in input order
//! - **Sort validation**: out-of-order input is an error unless assumed sorted
//!
//! # Example
//!
//! ```rust,no_run
//! use cds_start_filter::{commands::StartFilterCommand, CdsIndex};
//! use std::fs::File;
//!
//! let index = CdsIndex::from_path("cds_sorted.gff", true).unwrap();
//! let starts = File::open("starts_sorted.gff").unwrap();
//!
//! let cmd = StartFilterCommand::new(4);
//! let stats = cmd
//!     .run_with_index(&index, starts, std::io::stdout().lock())
//!     .unwrap();
//! eprintln!("{}", stats);
//! ```

pub mod commands;
pub mod config;
pub mod gff;
pub mod index;
pub mod interval;
pub mod streaming;
pub mod sweep;

// Re-export commonly used types
pub use gff::{parse_starts, read_starts, GffError, StartReader};
pub use index::CdsIndex;
pub use interval::{CodingInterval, StartRecord};
pub use sweep::SweepState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{FilterStats, StartFilterCommand};
    pub use crate::config::MissingChromosome;
    pub use crate::gff::{parse_starts, read_starts, GffError, StartReader};
    pub use crate::index::CdsIndex;
    pub use crate::interval::{CodingInterval, StartRecord};
    pub use crate::sweep::SweepState;
}
