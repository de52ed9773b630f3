//! `#include` directive editing
//!
//! Headers are treated as raw bytes, so a stray Latin-1 comment does not get
//! in the way. A directive is any line that starts with optional blanks,
//! `#`, optional blanks and `include`. Conditional blocks and comments are
//! not understood, so a directive inside `#if 0` still counts.

use lazy_static::lazy_static;
use regex::bytes::{Captures, Regex};

lazy_static! {
    /// Line-anchored directive pattern. Leading whitespace is limited to spaces
    /// and tabs so a match never swallows the blank lines above it; the tail
    /// matches any byte so invalid UTF-8 after `include` still matches.
    static ref INCLUDE_DIRECTIVE: Regex =
        Regex::new(r"(?m)^[ \t]*#[ \t]*include((?-u:.)*)$").expect("include pattern is valid");
}

/// A single `#include` line found in a header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// 0-based position among all directives in the header
    pub index: usize,
    /// The full matched line, lossily decoded
    pub line: String,
    /// What is being included, without quotes or angle brackets
    pub target: String,
}

/// Result of removing one directive from a header's contents
#[derive(Debug, Clone)]
pub struct IncludeRemoval {
    /// The edited contents; identical to the input when nothing was removed
    pub text: Vec<u8>,
    /// The directive that was removed, if the requested index existed
    pub removed: Option<IncludeDirective>,
}

impl IncludeRemoval {
    pub fn found(&self) -> bool {
        self.removed.is_some()
    }
}

/// Remove the `n`-th include directive (0-based) from `text`.
///
/// Only the directive's line content is deleted; the newline that ended it
/// stays, so the remaining lines keep their structure. All other directives
/// and every other byte are left untouched. When `n` is past the last
/// directive the text comes back unchanged and `removed` is `None`.
pub fn remove_include(text: &[u8], n: usize) -> IncludeRemoval {
    let found = INCLUDE_DIRECTIVE
        .captures_iter(text)
        .nth(n)
        .and_then(|caps| caps.get(0).map(|whole| (directive_from(n, &caps), whole)));

    let Some((directive, whole)) = found else {
        return IncludeRemoval {
            text: text.to_vec(),
            removed: None,
        };
    };

    let mut edited = Vec::with_capacity(text.len() - whole.len());
    edited.extend_from_slice(&text[..whole.start()]);
    edited.extend_from_slice(&text[whole.end()..]);

    IncludeRemoval {
        text: edited,
        removed: Some(directive),
    }
}

/// List every include directive in `text`, in encounter order.
pub fn list_includes(text: &[u8]) -> Vec<IncludeDirective> {
    INCLUDE_DIRECTIVE
        .captures_iter(text)
        .enumerate()
        .map(|(index, caps)| directive_from(index, &caps))
        .collect()
}

fn directive_from(index: usize, caps: &Captures<'_>) -> IncludeDirective {
    let line = caps.get(0).map_or(&b""[..], |m| m.as_bytes());
    let rest = caps.get(1).map_or(&b""[..], |m| m.as_bytes());

    IncludeDirective {
        index,
        line: String::from_utf8_lossy(line).trim_end().to_string(),
        target: include_target(&String::from_utf8_lossy(rest)),
    }
}

/// Extract the include target from whatever follows the `include` keyword.
///
/// `"a/b.h"` and `<a/b.h>` yield `a/b.h`. Anything else (a macro name, say)
/// is returned with quote and bracket characters stripped.
fn include_target(rest: &str) -> String {
    let rest = rest.trim();

    let delimited = match rest.chars().next() {
        Some('"') => rest[1..].split_once('"').map(|(inner, _)| inner),
        Some('<') => rest[1..].split_once('>').map(|(inner, _)| inner),
        _ => None,
    };

    match delimited {
        Some(inner) => inner.trim().to_string(),
        None => rest
            .chars()
            .filter(|c| !matches!(c, '"' | '\'' | '<' | '>'))
            .collect::<String>()
            .trim()
            .to_string(),
    }
}
