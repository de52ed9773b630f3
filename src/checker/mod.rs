//! Header verification engine
//!
//! [`HeaderChecker`] is the entry point: it creates the run's scratch space,
//! spreads the headers over a [`WorkerPool`], runs the selected
//! [`CheckKind`] on each one and reports one result per header through a
//! shared [`Reporter`]. The scratch directory is removed once every worker
//! has finished, whether or not the run succeeded.

pub mod complete;
pub mod compiler;
pub mod context;
pub mod include;
pub mod redundant;
pub mod report;
pub mod scratch;
pub mod strategy;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use compiler::{CommandCompiler, CompileOutput, Compiler, FnCompiler};
pub use context::RunContext;
pub use include::{IncludeDirective, IncludeRemoval, list_includes, remove_include};
pub use report::Reporter;
pub use scratch::ScratchSpace;
pub use strategy::{CheckKind, HeaderCheck};
pub use types::{CheckReport, Outcome, RunFault, RunSummary};

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::CheckerConfig;
use crate::parallel::{StopSignal, WorkerPool};

/// Runs one kind of check over a set of headers
pub struct HeaderChecker {
    kind: CheckKind,
    workers: usize,
    temp_root: Option<PathBuf>,
    compiler: Box<dyn Compiler>,
    reporter: Reporter,
    stop: StopSignal,
}

impl HeaderChecker {
    pub fn new(kind: CheckKind, compiler: impl Compiler + 'static) -> Self {
        Self {
            kind,
            workers: WorkerPool::calculate_workers(0),
            temp_root: None,
            compiler: Box::new(compiler),
            reporter: Reporter::stdout(),
            stop: StopSignal::new(),
        }
    }

    /// Checker driven by a loaded configuration, compiling with its command
    /// template and reporting to stdout
    pub fn from_config(config: &CheckerConfig) -> Self {
        Self::new(config.action, CommandCompiler::new(&config.command))
            .with_workers(WorkerPool::calculate_workers(config.threads))
            .with_temp_root(config.temp_dir.clone())
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_temp_root(mut self, temp_root: Option<PathBuf>) -> Self {
        self.temp_root = temp_root;
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Handle for asking a running check to stop early
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Check every header and block until all workers are done.
    ///
    /// Fails only if the scratch directory cannot be created or a worker
    /// panics; per-header problems are reported and counted instead.
    pub fn run(self, headers: Vec<PathBuf>) -> Result<RunSummary> {
        let start_time = Instant::now();
        let discovered = headers.len();
        let kind = self.kind;

        let ctx = RunContext {
            scratch: ScratchSpace::create(self.temp_root.as_deref())?,
            compiler: self.compiler,
            reporter: self.reporter,
            stop: self.stop,
        };

        let pool = WorkerPool::new(self.workers);
        let workers = pool.workers().min(discovered.max(1));
        tracing::info!(
            "Running {} check on {} headers with {} workers",
            kind,
            discovered,
            workers
        );

        let processed = pool.run(headers, &ctx.stop, |header, worker_id| {
            check_header(&ctx, kind, &header, worker_id);
        });

        let (passed, failed, faulted) = ctx.reporter.counts();
        let stopped = ctx.stop.is_requested();
        ctx.scratch.close();

        let checked = processed?;
        let summary = RunSummary {
            discovered,
            checked,
            passed,
            failed,
            faulted,
            workers,
            stopped,
            duration: start_time.elapsed(),
        };

        tracing::info!(
            "Checked {}/{} headers in {:.2}s ({} passed, {} failed, {} faulted)",
            summary.checked,
            summary.discovered,
            summary.duration.as_secs_f64(),
            summary.passed,
            summary.failed,
            summary.faulted
        );

        Ok(summary)
    }
}

/// Check a single header and report the outcome. Any error becomes a fault
/// for this header; only a [`RunFault`] also stops the rest of the run.
fn check_header(ctx: &RunContext, kind: CheckKind, header: &Path, worker_id: usize) {
    tracing::debug!("[worker {}] checking {}", worker_id, header.display());

    let outcome = match kind.check(header, ctx) {
        Ok(outcome) => outcome,
        Err(e) => {
            if RunFault::is_run_fault(&e) {
                tracing::error!("Stopping run after fault in {}: {:#}", header.display(), e);
                ctx.stop.request();
            } else {
                tracing::warn!("Could not check {}: {:#}", header.display(), e);
            }
            Outcome::Fault {
                message: format!("{e:#}"),
            }
        }
    };

    ctx.reporter.report(&CheckReport::new(header, outcome));
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use crate::checker::test_support::{SharedBuffer, needs_compiler};
    use std::fs;
    use tempfile::TempDir;

    fn checker(kind: CheckKind, workers: usize, root: &TempDir) -> (HeaderChecker, SharedBuffer) {
        checker_with(kind, workers, root, needs_compiler())
    }

    fn checker_with(
        kind: CheckKind,
        workers: usize,
        root: &TempDir,
        compiler: impl Compiler + 'static,
    ) -> (HeaderChecker, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let checker = HeaderChecker::new(kind, compiler)
            .with_workers(workers)
            .with_temp_root(Some(root.path().to_path_buf()))
            .with_reporter(Reporter::new(Box::new(buffer.clone())));
        (checker, buffer)
    }

    fn headers(dir: &TempDir, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.path().join(format!("h{i}.h"));
                let body = if i % 3 == 0 {
                    "// needs: vector\nint f();\n".to_string()
                } else {
                    format!("#include <vector>\n#include \"h{i}_extra.h\"\n// needs: vector\n")
                };
                fs::write(&path, body).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_every_header_reported_exactly_once() -> Result<()> {
        let sources = TempDir::new()?;
        let scratch_root = TempDir::new()?;
        let headers = headers(&sources, 30);

        let (checker, buffer) = checker(CheckKind::Complete, 4, &scratch_root);
        let summary = checker.run(headers.clone())?;

        assert_eq!(summary.checked, 30);
        assert_eq!(summary.passed, 20);
        assert_eq!(summary.failed, 10);
        assert!(!summary.is_clean());

        let output = buffer.contents();
        for header in &headers {
            let prefix = format!("{} - ", header.display());
            assert_eq!(
                output.lines().filter(|l| l.starts_with(&prefix)).count(),
                1,
                "{} should be reported once",
                header.display()
            );
        }
        Ok(())
    }

    #[test]
    fn test_redundant_run_leaves_no_artifacts() -> Result<()> {
        let sources = TempDir::new()?;
        let scratch_root = TempDir::new()?;
        let headers = headers(&sources, 12);

        let (checker, buffer) = checker(CheckKind::Redundant, 3, &scratch_root);
        let summary = checker.run(headers)?;

        assert_eq!(summary.checked, 12);
        assert_eq!(summary.failed, 8);
        assert!(buffer.contents().contains("ERROR redundant: h1_extra.h"));

        // Only the original headers remain, and the scratch dir is gone
        assert_eq!(fs::read_dir(sources.path())?.count(), 12);
        assert_eq!(fs::read_dir(scratch_root.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_unreadable_header_does_not_stop_run() -> Result<()> {
        let sources = TempDir::new()?;
        let scratch_root = TempDir::new()?;
        let mut headers = headers(&sources, 5);
        headers.insert(0, sources.path().join("missing.h"));

        let (checker, buffer) = checker(CheckKind::Redundant, 1, &scratch_root);
        let summary = checker.run(headers)?;

        assert_eq!(summary.checked, 6);
        assert_eq!(summary.faulted, 1);
        assert!(!summary.stopped);
        assert!(!summary.is_clean());
        assert!(buffer.contents().contains("missing.h - ERROR fault: Failed to read header"));
        Ok(())
    }

    #[test]
    fn test_latin1_header_does_not_stop_run() -> Result<()> {
        let sources = TempDir::new()?;
        let scratch_root = TempDir::new()?;
        let latin1 = sources.path().join("latin1.h");
        fs::write(&latin1, b"// caf\xe9\n#include <vector>\n")?;
        let mut headers = headers(&sources, 4);
        headers.insert(0, latin1);

        let (checker, buffer) = checker(CheckKind::Redundant, 1, &scratch_root);
        let summary = checker.run(headers)?;

        assert_eq!(summary.checked, 5);
        assert_eq!(summary.faulted, 0);
        assert!(!summary.stopped);
        assert!(buffer.contents().contains("latin1.h - ERROR redundant: vector"));
        Ok(())
    }

    #[test]
    fn test_run_fault_stops_run() -> Result<()> {
        let sources = TempDir::new()?;
        let scratch_root = TempDir::new()?;

        let broken = FnCompiler(|_: &Path| -> Result<CompileOutput> {
            Err(anyhow::anyhow!("No such file or directory"))
                .context(RunFault("Failed to spawn compiler command".to_string()))
        });
        let (checker, buffer) = checker_with(CheckKind::Complete, 1, &scratch_root, broken);
        let summary = checker.run(headers(&sources, 5))?;

        assert_eq!(summary.checked, 1);
        assert_eq!(summary.faulted, 1);
        assert!(summary.stopped);
        assert!(buffer.contents().contains("ERROR fault: Failed to spawn compiler command"));
        assert_eq!(fs::read_dir(scratch_root.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_worker_panic_still_removes_scratch() -> Result<()> {
        let sources = TempDir::new()?;
        let scratch_root = TempDir::new()?;

        let panicking = FnCompiler(|_: &Path| -> Result<CompileOutput> {
            panic!("compiler wrapper crashed");
        });
        let (checker, _) = checker_with(CheckKind::Complete, 2, &scratch_root, panicking);

        assert!(checker.run(headers(&sources, 3)).is_err());
        assert_eq!(fs::read_dir(scratch_root.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_external_stop_before_run() -> Result<()> {
        let sources = TempDir::new()?;
        let scratch_root = TempDir::new()?;

        let (checker, buffer) = checker(CheckKind::Complete, 2, &scratch_root);
        checker.stop_signal().request();
        let summary = checker.run(headers(&sources, 4))?;

        assert_eq!(summary.checked, 0);
        assert!(summary.stopped);
        assert!(buffer.contents().is_empty());
        Ok(())
    }

    #[test]
    fn test_scratch_creation_failure_is_fatal() {
        let sources = TempDir::new().unwrap();
        let missing_root = sources.path().join("nope");

        let checker = HeaderChecker::new(CheckKind::Complete, needs_compiler())
            .with_temp_root(Some(missing_root));
        assert!(checker.run(headers(&sources, 1)).is_err());
    }
}
