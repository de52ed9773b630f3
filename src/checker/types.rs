use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Verdict for a single header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The header passed the check
    Ok,
    /// The header does not compile on its own; carries the compiler output
    Incomplete { diagnostics: String },
    /// These includes can be removed without breaking the header, in the
    /// order they appear in it
    Redundant { includes: Vec<String> },
    /// The check could not be completed for this header
    Fault { message: String },
}

/// Context marking an error that makes the rest of the run unsafe or
/// pointless: an edited header copy that could not be removed, a scratch
/// file that could not be written, a compiler that could not be started.
///
/// Attach it with `.context(RunFault(..))`. Errors without it only affect
/// the header being checked.
#[derive(Debug)]
pub struct RunFault(pub String);

impl RunFault {
    pub fn is_run_fault(error: &anyhow::Error) -> bool {
        error.downcast_ref::<RunFault>().is_some()
    }
}

impl fmt::Display for RunFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of run output: a header and what happened to it
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub header: PathBuf,
    pub outcome: Outcome,
}

impl CheckReport {
    pub fn new(header: &Path, outcome: Outcome) -> Self {
        Self {
            header: header.to_path_buf(),
            outcome,
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header.display();
        match &self.outcome {
            Outcome::Ok => write!(f, "{header} - OK"),
            Outcome::Incomplete { diagnostics } => {
                write!(f, "{header} - ERROR\n{}", diagnostics.trim_end())
            }
            Outcome::Redundant { includes } => {
                write!(f, "{header} - ERROR redundant: {}", includes.join(", "))
            }
            Outcome::Fault { message } => write!(f, "{header} - ERROR fault: {message}"),
        }
    }
}

/// Totals for a whole run
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub discovered: usize,
    pub checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub faulted: usize,
    pub workers: usize,
    pub stopped: bool,
    pub duration: Duration,
}

impl RunSummary {
    /// True when every discovered header was checked and passed
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.faulted == 0 && !self.stopped
    }
}
