//! Ignore pattern compilation and matching.
//!
//! Pattern syntax:
//! - `system.*` ignores every matching document
//! - `system.site:page.front` ignores only the nested key `page.front`
//! - `~system.site` exempts exactly `system.site` from every other pattern
//!
//! Globs follow `fnmatch` conventions: `*` matches any run of characters
//! (including `.`), `?` matches one character and `[...]` is a character
//! class. Matching is case-sensitive. Braces are literal: there is no
//! `{a,b}` alternation.

use crate::error::{OverlayError, Result};
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;

/// Marker prefix of a force-exclusion entry.
pub const FORCE_EXCLUSION_MARKER: char = '~';

/// Separator between a name glob and a key path.
pub const KEY_SEPARATOR: char = ':';

/// A compiled list of ignore patterns.
#[derive(Debug, Clone)]
pub struct IgnorePatterns {
    raw: Vec<String>,
    documents: GlobSet,
    keys: Vec<KeyPattern>,
    excluded: BTreeSet<String>,
}

#[derive(Debug, Clone)]
struct KeyPattern {
    matcher: GlobMatcher,
    key: String,
}

impl IgnorePatterns {
    /// Compile a pattern list. Blank entries are skipped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut raw = Vec::new();
        let mut documents = GlobSetBuilder::new();
        let mut keys = Vec::new();
        let mut excluded = BTreeSet::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            raw.push(pattern.to_string());

            if let Some(name) = pattern.strip_prefix(FORCE_EXCLUSION_MARKER) {
                excluded.insert(name.to_string());
                continue;
            }

            match pattern.split_once(KEY_SEPARATOR) {
                Some((glob, key)) => {
                    if key.is_empty() || key.split('.').any(str::is_empty) {
                        return Err(OverlayError::InvalidPattern(format!(
                            "'{}' has an empty key path",
                            pattern
                        )));
                    }
                    keys.push(KeyPattern {
                        matcher: compile(glob, pattern)?.compile_matcher(),
                        key: key.to_string(),
                    });
                }
                None => {
                    documents.add(compile(pattern, pattern)?);
                }
            }
        }

        let documents = documents.build().map_err(|e| {
            OverlayError::InvalidPattern(format!("failed to compile ignore patterns: {}", e))
        })?;

        Ok(Self {
            raw,
            documents,
            keys,
            excluded,
        })
    }

    /// The patterns as configured, blank entries removed.
    pub fn patterns(&self) -> &[String] {
        &self.raw
    }

    /// Whether `name` is exempted by a force-exclusion entry.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    /// Whether the whole document `name` is ignored.
    pub fn matches(&self, name: &str) -> bool {
        !self.is_excluded(name) && self.documents.is_match(name)
    }

    /// Key paths ignored within document `name`, in pattern order.
    pub fn ignored_keys(&self, name: &str) -> Vec<&str> {
        if self.is_excluded(name) {
            return Vec::new();
        }
        let mut found: Vec<&str> = Vec::new();
        for pattern in &self.keys {
            if pattern.matcher.is_match(name) && !found.contains(&pattern.key.as_str()) {
                found.push(&pattern.key);
            }
        }
        found
    }

    /// Whether any key-level pattern is configured.
    pub fn has_key_patterns(&self) -> bool {
        !self.keys.is_empty()
    }
}

fn compile(glob: &str, pattern: &str) -> Result<Glob> {
    GlobBuilder::new(&escape_braces(glob))
        .literal_separator(false)
        .backslash_escape(true)
        .case_insensitive(false)
        .build()
        .map_err(|e| OverlayError::InvalidPattern(format!("'{}' - {}", pattern, e)))
}

/// Escape `{` and `}` outside character classes so globset treats them as
/// plain characters.
fn escape_braces(glob: &str) -> String {
    let mut escaped = String::with_capacity(glob.len());
    let mut chars = glob.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' if !in_class => {
                escaped.push(c);
                if let Some(next) = chars.next() {
                    escaped.push(next);
                }
            }
            '[' if !in_class => {
                in_class = true;
                escaped.push(c);
                if let Some(&negation @ ('!' | '^')) = chars.peek() {
                    escaped.push(negation);
                    chars.next();
                }
                // A leading `]` is a member of the class.
                if chars.peek() == Some(&']') {
                    escaped.push(']');
                    chars.next();
                }
            }
            ']' if in_class => {
                in_class = false;
                escaped.push(c);
            }
            '{' | '}' if !in_class => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
