//! Glob pattern utilities
//!
//! This module turns `--source` patterns into the list of headers to check.
//! Patterns follow shell conventions: `*`, `?` and `[..]` stay within one
//! path component and `**` spans any number of directories.

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Expand `patterns` relative to `base_dir`, drop paths containing any of
/// `excludes`, and return absolute paths in discovery order without
/// duplicates.
pub fn discover_files<P: AsRef<Path>>(
    patterns: &[String],
    excludes: &[String],
    base_dir: P,
) -> Result<Vec<PathBuf>> {
    let base_dir = base_dir.as_ref();
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let matches = expand_file_pattern(pattern, base_dir)?;
        if matches.is_empty() {
            tracing::warn!("Pattern matched no files: {}", pattern);
        }

        for path in matches {
            let path = normalize(&path);
            if is_excluded(&path, excludes) {
                tracing::debug!("Excluded {}", path.display());
                continue;
            }
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Expand a single pattern, literal path or glob, to the files it names
pub fn expand_file_pattern(pattern: &str, base_dir: &Path) -> Result<Vec<PathBuf>> {
    if !is_glob_pattern(pattern) {
        let path = base_dir.join(pattern);
        return Ok(if path.is_file() { vec![path] } else { Vec::new() });
    }

    let (root, rest) = split_literal_prefix(pattern);
    let root = base_dir.join(root);
    let matcher = compile_matcher(&rest)?;

    let mut walker = WalkDir::new(&root).sort_by_file_name();
    if !rest.contains("**") {
        walker = walker.max_depth(rest.split('/').count());
    }

    let mut matching_paths = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .strip_prefix(&root)
            .map(|relative| matcher.is_match(relative))
            .unwrap_or(false);

        if matches {
            matching_paths.push(path.to_path_buf());
        }
    }

    Ok(matching_paths)
}

/// Check if a string contains glob pattern characters
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// True if the path contains any of the exclude substrings
pub fn is_excluded(path: &Path, excludes: &[String]) -> bool {
    let path = path.to_string_lossy();
    excludes
        .iter()
        .any(|exclude| !exclude.is_empty() && path.contains(exclude.as_str()))
}

/// Split `pattern` at the first component containing glob characters.
/// `include/**/*.h` becomes (`include`, `**/*.h`).
fn split_literal_prefix(pattern: &str) -> (PathBuf, String) {
    let normalized = pattern.replace('\\', "/");
    let components: Vec<&str> = normalized.split('/').collect();
    let first_glob = components
        .iter()
        .position(|c| is_glob_pattern(c))
        .unwrap_or(components.len());

    let mut prefix = components[..first_glob].join("/");
    if prefix.is_empty() && normalized.starts_with('/') {
        prefix = "/".to_string();
    }

    (PathBuf::from(prefix), components[first_glob..].join("/"))
}

fn compile_matcher(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// Lexically resolve `.` and `..` without touching the filesystem, so
/// symlinked headers keep the path they were found under
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
