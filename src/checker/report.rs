//! Serialized result sink shared by all workers

use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::{CheckReport, Outcome};

/// Writes one block per checked header and keeps running totals.
///
/// The writer sits behind a mutex and each report is written and flushed
/// while holding it, so lines from different workers never mix.
pub struct Reporter {
    sink: Mutex<Box<dyn Write + Send>>,
    passed: AtomicUsize,
    failed: AtomicUsize,
    faulted: AtomicUsize,
}

impl Reporter {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
            passed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            faulted: AtomicUsize::new(0),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn report(&self, report: &CheckReport) {
        let counter = match report.outcome {
            Outcome::Ok => &self.passed,
            Outcome::Incomplete { .. } | Outcome::Redundant { .. } => &self.failed,
            Outcome::Fault { .. } => &self.faulted,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        // A poisoned lock only means another worker panicked mid-write
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(sink, "{report}").and_then(|_| sink.flush()) {
            tracing::warn!("Failed to write result for {}: {}", report.header.display(), e);
        }
    }

    /// (passed, failed, faulted)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.passed.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
            self.faulted.load(Ordering::Relaxed),
        )
    }
}
