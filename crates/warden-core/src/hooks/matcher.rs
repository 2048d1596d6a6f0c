//! Pattern matching for hooks
//!
//! A pattern is a `|`-separated list of glob alternatives. Within an
//! alternative `*` matches any run of characters and `?` exactly one; every
//! other character is literal. Alternatives are anchored to the whole subject
//! and matching is case-sensitive.

use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::callback_hook::{HookCallback, SharedHookCallback};
use crate::error::{WardenError, WardenResult};

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    let mut literal = String::new();
    for c in glob.chars() {
        match c {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

/// A compiled wildcard pattern
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: String,
    alternatives: Vec<Regex>,
}

impl PatternMatcher {
    /// Compile a pattern. Empty alternatives are dropped.
    pub fn new(pattern: impl Into<String>) -> WardenResult<Self> {
        let pattern = pattern.into();
        let alternatives = pattern
            .split('|')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(|alt| {
                Regex::new(&glob_to_regex(alt)).map_err(|e| {
                    WardenError::config_with_context(
                        format!("Invalid hook pattern alternative '{}': {}", alt, e),
                        format!("Compiling hook pattern '{}'", pattern),
                    )
                })
            })
            .collect::<WardenResult<Vec<_>>>()?;
        Ok(Self {
            pattern,
            alternatives,
        })
    }

    pub fn matches(&self, subject: &str) -> bool {
        self.alternatives.iter().any(|re| re.is_match(subject))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Match a subject against a pattern without keeping the compiled form
///
/// ```
/// use warden_core::hooks::matches;
///
/// assert!(matches("Read|Grep", "Grep"));
/// assert!(!matches("Read|Grep", "ReadMe"));
/// assert!(matches("web_*", "web_search"));
/// assert!(!matches("web_*", "websearch"));
/// assert!(matches("mcp__?ithub__*", "mcp__github__create_issue"));
/// ```
pub fn matches(pattern: &str, subject: &str) -> bool {
    PatternMatcher::new(pattern)
        .map(|m| m.matches(subject))
        .unwrap_or(false)
}

/// A named binding of a pattern to an ordered list of callbacks
#[derive(Clone)]
pub struct HookMatcher {
    name: String,
    pattern: PatternMatcher,
    callbacks: Vec<SharedHookCallback>,
    timeout: Option<Duration>,
}

impl HookMatcher {
    /// Create a matcher with no callbacks yet
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> WardenResult<Self> {
        Ok(Self {
            name: name.into(),
            pattern: PatternMatcher::new(pattern)?,
            callbacks: Vec::new(),
            timeout: None,
        })
    }

    /// Append a callback; callbacks run in the order they were added
    pub fn with_callback(mut self, callback: impl HookCallback + 'static) -> Self {
        self.callbacks.push(Arc::new(callback));
        self
    }

    /// Append a callback that is shared with other matchers
    pub fn with_shared_callback(mut self, callback: SharedHookCallback) -> Self {
        self.callbacks.push(callback);
        self
    }

    /// Bound every callback invocation of this matcher
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn matches(&self, subject: &str) -> bool {
        self.pattern.matches(subject)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.pattern()
    }

    pub fn callbacks(&self) -> &[SharedHookCallback] {
        &self.callbacks
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for HookMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookMatcher")
            .field("name", &self.name)
            .field("pattern", &self.pattern.pattern())
            .field("callbacks", &self.callbacks.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}
