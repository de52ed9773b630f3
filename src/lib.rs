//! # header-checker - C/C++ header hygiene checks
//!
//! Verifies two properties of a code base's headers by compiling small
//! generated translation units with the project's own compiler:
//!
//! - **complete**: each header compiles when it is the only thing included
//! - **redundant**: no `#include` inside a header can be dropped while the
//!   header still compiles
//!
//! Headers are checked in parallel and every header gets exactly one
//! result line on stdout.
//!
//! ## Quick Start
//!
//! ```bash
//! # Every header under include/ must be self-contained
//! header-checker --source 'include/**/*.h'
//!
//! # Look for includes that can be removed, using clang
//! header-checker redundant -s 'src/**/*.hpp' --command 'clang++ -fsyntax-only {file}'
//! ```

pub mod checker;
pub mod cli;
pub mod config;
pub mod parallel;
pub mod shared;

pub use checker::{CheckKind, HeaderChecker};
pub use cli::{Cli, Output};
pub use config::CheckerConfig;

/// Result type alias for header-checker operations
pub type Result<T> = anyhow::Result<T>;
