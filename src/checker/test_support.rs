//! Shared fixtures for checker tests
//!
//! [`needs_compiler`] stands in for a real toolchain. It follows the single
//! `#include "..."` of the translation unit it is given and reads that
//! header. Every `// needs: X` line in the header must be matched by an
//! include directive whose target is `X`, or the "compile" fails.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::compiler::{CompileOutput, Compiler, FnCompiler};
use super::context::RunContext;
use super::include::list_includes;
use super::report::Reporter;
use super::scratch::ScratchSpace;
use crate::parallel::StopSignal;

/// Cloneable in-memory writer so tests can read back what was reported
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// The header a generated translation unit includes
pub(crate) fn included_header(source: &Path) -> Result<PathBuf> {
    let text = fs::read(source)?;
    let directive = list_includes(&text)
        .into_iter()
        .next()
        .context("translation unit has no include")?;
    Ok(PathBuf::from(directive.target))
}

pub(crate) fn needs_compiler() -> impl Compiler {
    FnCompiler(|source: &Path| -> Result<CompileOutput> {
        let header = included_header(source)?;
        let text = fs::read(&header)?;

        let included: Vec<String> = list_includes(&text).into_iter().map(|d| d.target).collect();
        let text = String::from_utf8_lossy(&text);
        let missing: Vec<&str> = text
            .lines()
            .filter_map(|line| line.trim().strip_prefix("// needs:"))
            .map(str::trim)
            .filter(|needed| !included.iter().any(|i| i == needed))
            .collect();

        Ok(CompileOutput {
            success: missing.is_empty(),
            diagnostics: missing
                .iter()
                .map(|m| format!("{}: error: '{}' not included\n", header.display(), m))
                .collect(),
        })
    })
}

pub(crate) fn fake_context(compiler: impl Compiler + 'static) -> (RunContext, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let ctx = RunContext {
        scratch: ScratchSpace::create(None).unwrap(),
        compiler: Box::new(compiler),
        reporter: Reporter::new(Box::new(buffer.clone())),
        stop: StopSignal::new(),
    };
    (ctx, buffer)
}

pub(crate) fn with_compiler(mut ctx: RunContext, compiler: impl Compiler + 'static) -> RunContext {
    ctx.compiler = Box::new(compiler);
    ctx
}
