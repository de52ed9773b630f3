//! Redundant include detection
//!
//! Every directive is tried on its own: the N-th include is removed from the
//! *original* text, the result is compiled, and the directive is redundant if
//! that compile succeeds. Removals never accumulate, so whether one include
//! is needed does not depend on which others were tested before it.
//!
//! The edited copy is written next to the original header rather than into
//! the scratch directory. Quoted includes resolve relative to the including
//! file, and the copy must see exactly what the original sees.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

use super::context::RunContext;
use super::include::remove_include;
use super::strategy::HeaderCheck;
use super::types::{Outcome, RunFault};

#[derive(Debug, Clone, Copy, Default)]
pub struct RedundancyCheck;

impl HeaderCheck for RedundancyCheck {
    fn check(&self, header: &Path, ctx: &RunContext) -> Result<Outcome> {
        let original = fs::read(header)
            .with_context(|| format!("Failed to read header {}", header.display()))?;
        let header_dir = header
            .parent()
            .with_context(|| format!("Header has no parent directory: {}", header.display()))?;
        let extension = header
            .extension()
            .map_or_else(|| ".h".to_string(), |ext| format!(".{}", ext.to_string_lossy()));

        let mut redundant = Vec::new();

        for index in 0.. {
            if ctx.stop().is_requested() {
                tracing::debug!(
                    "Stop requested, abandoning remaining includes of {}",
                    header.display()
                );
                break;
            }

            let removal = remove_include(&original, index);
            let Some(directive) = removal.removed else {
                break;
            };

            let edited = header_dir.join(ctx.scratch().unique_name(&extension));
            write_edited_copy(&edited, &removal.text)?;

            tracing::debug!(
                "{}: trying without `{}` ({})",
                header.display(),
                directive.line.trim(),
                edited.display()
            );

            let compiled = ctx.compile_header(&edited);
            // Cleanup comes first: a stray copy beside real headers is worse
            // than losing this compile result
            remove_edited_copy(&edited)?;

            if compiled?.success {
                redundant.push(directive.target);
            }
        }

        if redundant.is_empty() {
            Ok(Outcome::Ok)
        } else {
            Ok(Outcome::Redundant {
                includes: redundant,
            })
        }
    }
}

/// Write an edited copy. A failed write may leave a truncated file behind,
/// which is removed before the write error is returned.
fn write_edited_copy(path: &Path, contents: &[u8]) -> Result<()> {
    if let Err(e) = fs::write(path, contents) {
        discard_partial_copy(path)?;
        return Err(e).with_context(|| format!("Failed to write {}", path.display()));
    }
    Ok(())
}

fn discard_partial_copy(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e).with_context(|| {
            RunFault(format!(
                "Failed to remove partial edited header {}",
                path.display()
            ))
        }),
        _ => Ok(()),
    }
}

fn remove_edited_copy(path: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| {
        RunFault(format!("Failed to remove edited header {}", path.display()))
    })
}
