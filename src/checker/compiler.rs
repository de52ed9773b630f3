//! Compiler invocation
//!
//! The checks only need "compile this one file, tell me if it worked and what
//! it printed", so the toolchain sits behind the [`Compiler`] trait. The
//! production implementation expands a command template and runs it through
//! the platform shell.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::Path;
use std::process::Command;

use super::types::RunFault;

/// Placeholder replaced by the source file path in command templates
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Outcome of compiling a single translation unit
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub success: bool,
    /// Standard output followed by standard error
    pub diagnostics: String,
}

/// Anything that can compile a single source file
pub trait Compiler: Send + Sync {
    fn compile(&self, source: &Path) -> Result<CompileOutput>;
}

/// Runs a user-supplied command template such as `gcc {file} -c -o {file}.o`
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    template: String,
}

impl CommandCompiler {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Expand the template for `source`. Every placeholder is replaced with
    /// the shell-quoted path.
    pub fn render(&self, source: &Path) -> String {
        self.template.replace(FILE_PLACEHOLDER, &quote_path(source))
    }

    /// The program the template runs, if it can be found on `PATH`.
    ///
    /// Only the first word is considered, so templates that start with a
    /// shell builtin or an environment assignment report `None`.
    pub fn resolve_program(&self) -> Option<std::path::PathBuf> {
        let program = self.template.split_whitespace().next()?;
        which::which(program).ok()
    }
}

impl Compiler for CommandCompiler {
    fn compile(&self, source: &Path) -> Result<CompileOutput> {
        let command_line = self.render(source);
        tracing::debug!("Running: {}", command_line);

        let output = shell_command(&command_line)
            .output()
            .with_context(|| RunFault(format!("Failed to spawn compiler command: {command_line}")))?;

        let mut diagnostics = String::from_utf8_lossy(&output.stdout).into_owned();
        diagnostics.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CompileOutput {
            success: output.status.success(),
            diagnostics,
        })
    }
}

/// Adapter that turns a closure into a [`Compiler`], handy for embedding and
/// for exercising the checks without a toolchain.
pub struct FnCompiler<F>(pub F);

impl<F> Compiler for FnCompiler<F>
where
    F: Fn(&Path) -> Result<CompileOutput> + Send + Sync,
{
    fn compile(&self, source: &Path) -> Result<CompileOutput> {
        (self.0)(source)
    }
}

#[cfg(unix)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}

/// Quote a path so the shell passes it through as a single argument
fn quote_path(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    shell_escape::escape(Cow::Borrowed(&path_str)).into_owned()
}
