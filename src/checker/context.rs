use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::compiler::{CompileOutput, Compiler};
use super::report::Reporter;
use super::scratch::ScratchSpace;
use super::types::RunFault;
use crate::parallel::StopSignal;

/// Everything a worker needs while checking headers during one run.
///
/// Built once by [`super::HeaderChecker::run`] and shared by reference with
/// every worker; it is dropped only after all workers have joined.
pub struct RunContext {
    pub(crate) scratch: ScratchSpace,
    pub(crate) compiler: Box<dyn Compiler>,
    pub(crate) reporter: Reporter,
    pub(crate) stop: StopSignal,
}

impl RunContext {
    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn stop(&self) -> &StopSignal {
        &self.stop
    }

    /// Write a translation unit that includes `header` into the scratch
    /// directory and compile it.
    pub fn compile_header(&self, header: &Path) -> Result<CompileOutput> {
        let main_file = self.scratch.temp_file_path(&self.scratch.unique_name(".cpp"));

        fs::write(&main_file, translation_unit(header))
            .with_context(|| RunFault(format!("Failed to write {}", main_file.display())))?;

        self.compiler.compile(&main_file)
    }
}

/// Source of a translation unit consisting of a single include of `header`
pub fn translation_unit(header: &Path) -> String {
    format!("#include \"{}\"\n", header.display())
}
