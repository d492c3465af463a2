//! Slug segment type.
//!
//! A segment is one level of a hierarchical path: the slug of a single
//! record. Segments never carry separators of their own; the composer
//! adds them.

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Path separator used by composed paths.
pub const SEPARATOR: char = '/';

/// One slug level of a composed path.
///
/// Invariants:
/// - Never empty (empty slugs mark the tree root and are skipped)
/// - Contains no `/` by convention (not enforced, slugs come from editors)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathSegment(Arc<str>);

impl PathSegment {
    /// Create a segment, or `None` for an empty slug.
    pub fn new(slug: &str) -> Option<Self> {
        if slug.is_empty() {
            None
        } else {
            Some(Self(Arc::from(slug)))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PathSegment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PathSegment {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for PathSegment {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for PathSegment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PathSegment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).ok_or_else(|| serde::de::Error::custom("empty path segment"))
    }
}
