//! Helpers shared by the CLI and the checker

pub mod glob;
