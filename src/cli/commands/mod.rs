//! CLI command implementations

pub mod compile;
pub mod list;
pub mod update;
