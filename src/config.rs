//! Runtime configuration and fixed constants for start filtering.
//!
//! The command surface is deliberately small: a threshold, a policy for
//! chromosomes without CDS evidence, and whether sort order is trusted.

use std::fmt;
use std::str::FromStr;

/// Score-column value meaning "coverage not recorded" (counted as 1).
pub const COVERAGE_PLACEHOLDER: &[u8] = b".";

/// Coverage assigned to a CDS interval whose score column holds the placeholder.
pub const DEFAULT_COVERAGE: u64 = 1;

/// CDS files at or above this size are memory-mapped instead of read through a buffer.
pub const MMAP_THRESHOLD: usize = 16 * 1024 * 1024;

/// Default input buffer size (256 KB).
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Default output buffer size (256 KB).
///
/// Records are handed to the writer as soon as each is decided; the
/// buffer only batches those writes into fewer syscalls.
pub const DEFAULT_OUTPUT_BUFFER: usize = 256 * 1024;

/// Default line buffer capacity (1 KB). GFF attribute columns can be long.
pub const DEFAULT_LINE_BUFFER: usize = 1024;

/// What to do when a start's chromosome has no entry in the CDS index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingChromosome {
    /// Abort the run. The two inputs do not describe the same genome.
    #[default]
    Error,
    /// Treat the chromosome as having no CDS evidence: every start on it
    /// has zero overlap.
    KeepAll,
}

impl FromStr for MissingChromosome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "keep" | "keep-all" => Ok(Self::KeepAll),
            other => Err(format!(
                "unknown missing-chromosome policy '{}' (expected 'error' or 'keep')",
                other
            )),
        }
    }
}

impl fmt::Display for MissingChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::KeepAll => write!(f, "keep"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_error() {
        assert_eq!(MissingChromosome::default(), MissingChromosome::Error);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "error".parse::<MissingChromosome>(),
            Ok(MissingChromosome::Error)
        );
        assert_eq!(
            "keep".parse::<MissingChromosome>(),
            Ok(MissingChromosome::KeepAll)
        );
        assert_eq!(
            "keep-all".parse::<MissingChromosome>(),
            Ok(MissingChromosome::KeepAll)
        );
        assert!("skip".parse::<MissingChromosome>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [MissingChromosome::Error, MissingChromosome::KeepAll] {
            assert_eq!(policy.to_string().parse::<MissingChromosome>(), Ok(policy));
        }
    }
}
