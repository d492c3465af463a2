//! Path list management.
//!
//! The persisted field value is an ordered list of absolute paths:
//!
//! ```text
//! index 0   computed primary path (slug derived, replaced on recompute)
//! index 1.. operator aliases, insertion order, never touched by sync
//! ```
//!
//! Every mutation produces the full list; callers write it back whole.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Accepted alias shape: a leading `/` then letters, digits, `-`, `.` or `/`.
static ALIAS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[/.a-zA-Z0-9-]+$").expect("alias pattern is valid"));

/// Check an operator-entered alias against the path pattern.
pub fn validate_alias(candidate: &str) -> Result<(), ValidationError> {
    if ALIAS_PATTERN.is_match(candidate) {
        Ok(())
    } else {
        Err(ValidationError {
            candidate: candidate.to_string(),
        })
    }
}

/// Ordered path list with the primary path pinned at index 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList {
    paths: Vec<String>,
}

impl PathList {
    /// Load the persisted field value. Its first entry is taken as primary.
    pub fn initialize(persisted: Vec<String>) -> Self {
        Self { paths: persisted }
    }

    pub fn primary(&self) -> Option<&str> {
        self.paths.first().map(String::as_str)
    }

    pub fn aliases(&self) -> &[String] {
        self.paths.get(1..).unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.paths
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.paths.clone()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Pin a freshly computed primary path at index 0.
    ///
    /// Other occurrences of `path` are dropped, the previous primary is
    /// replaced in place. Empty paths are placeholders and are ignored.
    /// Returns whether the list changed.
    pub fn on_primary_path_computed(&mut self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }

        let rest: Vec<String> = self
            .aliases()
            .iter()
            .filter(|alias| alias.as_str() != path)
            .cloned()
            .collect();

        let mut next = Vec::with_capacity(rest.len() + 1);
        next.push(path.to_string());
        next.extend(rest);

        if next == self.paths {
            return false;
        }
        self.paths = next;
        true
    }

    /// Append a validated alias. The list is untouched on error.
    pub fn add_alias(&mut self, candidate: &str) -> Result<(), ValidationError> {
        validate_alias(candidate)?;
        self.paths.push(candidate.to_string());
        Ok(())
    }

    /// Remove the first alias equal to `path`. Index 0 is never removed.
    pub fn remove_alias(&mut self, path: &str) -> bool {
        let Some(pos) = self.aliases().iter().position(|alias| alias == path) else {
            return false;
        };
        self.paths.remove(pos + 1);
        true
    }
}
