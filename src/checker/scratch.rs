//! Run-scoped scratch space for generated translation units
//!
//! One private directory is created per run. Everything the checks generate
//! goes in there, except edited header copies, which have to sit next to the
//! header they were made from (see [`crate::checker::redundant`]).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

const RANDOM_TOKEN_LEN: usize = 12;

/// Exclusively owned temp directory for one run
#[derive(Debug)]
pub struct ScratchSpace {
    dir: Option<TempDir>,
    counter: AtomicU64,
}

impl ScratchSpace {
    /// Create the run directory under `root`, or under the platform temp
    /// directory when no root is configured.
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let root = root.map_or_else(std::env::temp_dir, Path::to_path_buf);

        let dir = tempfile::Builder::new()
            .prefix("header-checker-")
            .tempdir_in(&root)
            .with_context(|| format!("Failed to create scratch directory in {}", root.display()))?;

        tracing::info!("Scratch directory: {}", dir.path().display());

        Ok(Self {
            dir: Some(dir),
            counter: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        // Only `close` takes the directory, and it consumes `self`
        self.dir.as_ref().map_or(Path::new(""), TempDir::path)
    }

    /// Path for a file called `name` inside the scratch directory
    pub fn temp_file_path(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Generate a file name that no other worker in this run will produce.
    ///
    /// The name combines a random lowercase token, the calling thread, a
    /// timestamp and a per-run counter. The counter alone makes names unique
    /// within the run; the other parts keep them apart from leftovers of
    /// earlier runs sharing a header directory.
    pub fn unique_name(&self, ext: &str) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        format!(
            "{}_{}_{}_{}{}",
            random_token(RANDOM_TOKEN_LEN),
            thread_tag(),
            timestamp,
            sequence,
            ext
        )
    }

    /// Remove the directory tree. Failures are logged, never returned.
    pub fn close(mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => tracing::debug!("Removed scratch directory {}", path.display()),
                Err(e) => tracing::warn!(
                    "Failed to remove scratch directory {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }
}

/// Lowercase letters drawn from v4 UUID randomness
fn random_token(len: usize) -> String {
    let mut token = String::with_capacity(len);
    while token.len() < len {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        token.extend(
            bytes
                .iter()
                .take(len - token.len())
                .map(|b| char::from(b'a' + b % 26)),
        );
    }
    token
}

/// Digits of the current thread id, e.g. `ThreadId(7)` becomes `7`
fn thread_tag() -> String {
    format!("{:?}", std::thread::current().id())
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_create_and_close() -> Result<()> {
        let root = TempDir::new()?;
        let scratch = ScratchSpace::create(Some(root.path()))?;
        let path = scratch.path().to_path_buf();

        assert!(path.is_dir());
        assert!(path.starts_with(root.path()));

        fs::write(scratch.temp_file_path("main.cpp"), "int x;")?;
        fs::create_dir(scratch.temp_file_path("nested"))?;
        fs::write(scratch.temp_file_path("nested").join("a.o"), "")?;

        scratch.close();
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_drop_removes_directory() -> Result<()> {
        let root = TempDir::new()?;
        let path = {
            let scratch = ScratchSpace::create(Some(root.path()))?;
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_create_fails_for_missing_root() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("does-not-exist");
        assert!(ScratchSpace::create(Some(&missing)).is_err());
    }

    #[test]
    fn test_temp_file_path_joins_with_separator() -> Result<()> {
        let scratch = ScratchSpace::create(None)?;
        let file = scratch.temp_file_path("x.cpp");
        assert_eq!(file.parent(), Some(scratch.path()));
        assert_eq!(file.file_name().unwrap(), "x.cpp");
        Ok(())
    }

    #[test]
    fn test_unique_names_across_threads() -> Result<()> {
        let scratch = ScratchSpace::create(None)?;

        let names: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..250).map(|_| scratch.unique_name(".h")).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), 1000);
        assert!(names.iter().all(|n| n.ends_with(".h")));
        Ok(())
    }

    #[test]
    fn test_random_token_shape() {
        let token = random_token(40);
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_lowercase()));
    }
}
