//! Command implementations.

pub mod filter_starts;

pub use filter_starts::{FilterStats, StartFilterCommand};
