//! CLI subcommand implementations.

pub mod average;
pub mod history;
pub mod open;
pub mod price;
pub mod track;
