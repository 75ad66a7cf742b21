//! CLI subcommand implementations.

pub mod input;
pub mod rank;
pub mod report;
pub mod series;
pub mod summary;
