//! Styled status output for header-checker
//!
//! Result lines belong to the reporter on stdout. Everything printed here
//! goes to stderr so the result stream stays machine-readable.

use console::style;

use crate::checker::RunSummary;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            eprintln!("  {:<10} {}", style(key).dim(), styled_value);
        }
    }

    /// Print the end-of-run totals
    pub fn summary(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }

        eprintln!();
        if summary.stopped {
            self.warning(&format!(
                "Stopped early after {} of {} headers",
                summary.checked, summary.discovered
            ));
        } else if summary.is_clean() {
            self.success(&format!("All {} headers passed", summary.checked));
        } else {
            self.error(&format!(
                "{} of {} headers failed",
                summary.failed + summary.faulted,
                summary.checked
            ));
        }

        self.key_value("Checked:", &summary.checked.to_string(), false);
        self.key_value("Passed:", &summary.passed.to_string(), summary.passed > 0);
        self.key_value("Failed:", &summary.failed.to_string(), false);
        if summary.faulted > 0 {
            self.key_value("Faulted:", &summary.faulted.to_string(), false);
        }
        self.key_value("Workers:", &summary.workers.to_string(), false);
        self.key_value(
            "Elapsed:",
            &format!("{:.2}s", summary.duration.as_secs_f64()),
            false,
        );
    }
}
