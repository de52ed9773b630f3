use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::complete::CompletenessCheck;
use super::context::RunContext;
use super::redundant::RedundancyCheck;
use super::types::Outcome;

/// A verification applied to one header at a time
pub trait HeaderCheck: Send + Sync {
    fn check(&self, header: &Path, ctx: &RunContext) -> Result<Outcome>;
}

/// Which check a run performs; chosen once at startup
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// The header compiles on its own
    #[default]
    Complete,
    /// None of the header's includes can be dropped
    Redundant,
}

impl HeaderCheck for CheckKind {
    fn check(&self, header: &Path, ctx: &RunContext) -> Result<Outcome> {
        match self {
            CheckKind::Complete => CompletenessCheck.check(header, ctx),
            CheckKind::Redundant => RedundancyCheck.check(header, ctx),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Complete => f.write_str("complete"),
            CheckKind::Redundant => f.write_str("redundant"),
        }
    }
}
