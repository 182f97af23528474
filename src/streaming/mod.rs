//! Streaming utilities shared by the index builder and the start filter:
//! - Zero-allocation GFF field parsing
//! - Sort validation
//! - Line output

pub mod output;
pub mod parsing;
pub mod validation;

pub use output::GffWriter;
pub use parsing::{parse_coverage, parse_u64_fast, should_skip_line, trim_line_end, GffFields};
pub use validation::SortValidator;
