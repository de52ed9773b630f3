//! Completeness check: does the header compile with nothing in front of it?

use anyhow::Result;
use std::path::Path;

use super::context::RunContext;
use super::strategy::HeaderCheck;
use super::types::Outcome;

/// Compiles a translation unit containing only `#include "<header>"`.
///
/// A failing compile is an ordinary result for this header; it never stops
/// the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessCheck;

impl HeaderCheck for CompletenessCheck {
    fn check(&self, header: &Path, ctx: &RunContext) -> Result<Outcome> {
        let output = ctx.compile_header(header)?;

        if output.success {
            Ok(Outcome::Ok)
        } else {
            Ok(Outcome::Incomplete {
                diagnostics: output.diagnostics,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::test_support::{fake_context, needs_compiler};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_self_contained_header_is_ok() -> Result<()> {
        let dir = TempDir::new()?;
        let header = dir.path().join("a.h");
        fs::write(&header, "#include <stddef.h>\n// needs: stddef.h\nsize_t f();\n")?;

        let (ctx, _) = fake_context(needs_compiler());
        assert_eq!(CompletenessCheck.check(&header, &ctx)?, Outcome::Ok);
        Ok(())
    }

    #[test]
    fn test_missing_include_reports_diagnostics() -> Result<()> {
        let dir = TempDir::new()?;
        let header = dir.path().join("a.h");
        fs::write(&header, "// needs: stddef.h\nsize_t f();\n")?;

        let (ctx, _) = fake_context(needs_compiler());
        match CompletenessCheck.check(&header, &ctx)? {
            Outcome::Incomplete { diagnostics } => assert!(diagnostics.contains("stddef.h")),
            other => panic!("expected Incomplete, got {other:?}"),
        }
        assert!(!ctx.stop().is_requested());
        Ok(())
    }

    #[test]
    fn test_verdict_is_repeatable() -> Result<()> {
        let dir = TempDir::new()?;
        let header = dir.path().join("a.h");
        fs::write(&header, "// needs: vector\nint f();\n")?;

        let (ctx, _) = fake_context(needs_compiler());
        let first = CompletenessCheck.check(&header, &ctx)?;
        let second = CompletenessCheck.check(&header, &ctx)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_translation_unit_lands_in_scratch() -> Result<()> {
        let dir = TempDir::new()?;
        let header = dir.path().join("a.h");
        fs::write(&header, "int f();\n")?;

        let (ctx, _) = fake_context(needs_compiler());
        CompletenessCheck.check(&header, &ctx)?;

        let generated: Vec<_> = fs::read_dir(ctx.scratch().path())?.collect();
        assert_eq!(generated.len(), 1);
        // Nothing written beside the header
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }
}
