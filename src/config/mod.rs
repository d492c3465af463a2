//! Session configuration for `slugtree.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # SlugConfig (this file)
//! ```
//!
//! # Keys
//!
//! | Key                 | Purpose                                          |
//! |---------------------|--------------------------------------------------|
//! | `base_slug_remove`  | Prefix stripped from every composed path         |
//! | `parent_field_name` | Field holding the parent reference               |
//! | `slug_field_name`   | Field holding the record's own slug              |
//! | `locale`            | Locale used for field reads and record fetches   |
//! | `debounce_ms`       | Quiet period before a slug edit is applied       |
//! | `cycle_guard`       | `visited` (any revisit) or `self-only`           |
//! | `max_depth`         | Upper bound on parent chain length               |
//! | `conflict_policy`   | `last-write-wins` or `latest-intent`             |
//!
//! The configuration is read once and stays fixed for a session.

pub mod types;
mod util;

pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Default quiet period for slug edits.
pub const DEFAULT_DEBOUNCE_MS: u64 = 800;
/// Default upper bound on parent chain length.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Longest accepted debounce window.
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// How the resolver detects parent cycles.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CycleGuard {
    /// Stop on any record already seen during the walk (default).
    #[default]
    Visited,
    /// Stop only when the chain reaches the record being edited.
    /// Cycles elsewhere in the chain are cut by `max_depth`.
    SelfOnly,
}

/// How concurrent resolutions are reconciled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Every completed resolution is applied in completion order (default).
    #[default]
    LastWriteWins,
    /// Completions superseded by a newer edit are discarded.
    LatestIntent,
}

/// Root configuration structure representing slugtree.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SlugConfig {
    /// Prefix stripped from composed paths (e.g. `/site`).
    pub base_slug_remove: Option<String>,
    /// Name of the parent reference field.
    pub parent_field_name: String,
    /// Name of the slug field.
    pub slug_field_name: String,
    /// Locale for field reads and record fetches.
    pub locale: String,
    /// Quiet period before a slug edit is applied.
    pub debounce_ms: u64,
    /// Cycle detection mode.
    pub cycle_guard: CycleGuard,
    /// Upper bound on parent chain length.
    pub max_depth: usize,
    /// Concurrent resolution policy.
    pub conflict_policy: ConflictPolicy,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            base_slug_remove: None,
            parent_field_name: "parent".to_string(),
            slug_field_name: "slug".to_string(),
            locale: "en-US".to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cycle_guard: CycleGuard::Visited,
            max_depth: DEFAULT_MAX_DEPTH,
            conflict_policy: ConflictPolicy::LastWriteWins,
        }
    }
}

impl SlugConfig {
    /// Load and validate configuration from a file, warning about unknown keys.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let (config, _) = Self::parse_with_ignored(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Check every key, collecting all problems before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.parent_field_name.trim().is_empty() {
            diag.error(FieldPath::new("parent_field_name"), "must not be empty");
        }
        if self.slug_field_name.trim().is_empty() {
            diag.error(FieldPath::new("slug_field_name"), "must not be empty");
        }
        if !self.parent_field_name.is_empty() && self.parent_field_name == self.slug_field_name {
            diag.error_with_hint(
                FieldPath::new("slug_field_name"),
                "must differ from `parent_field_name`",
                "point the two keys at the reference field and the text field",
            );
        }
        if self.locale.trim().is_empty() {
            diag.error(FieldPath::new("locale"), "must not be empty");
        }
        if let Some(prefix) = &self.base_slug_remove
            && !prefix.is_empty()
            && !prefix.starts_with('/')
        {
            diag.error_with_hint(
                FieldPath::new("base_slug_remove"),
                format!("`{prefix}` must start with `/`"),
                format!("use `/{prefix}`"),
            );
        }
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            diag.error(
                FieldPath::new("debounce_ms"),
                format!("must be at most {MAX_DEBOUNCE_MS}"),
            );
        }
        if self.max_depth == 0 {
            diag.error(FieldPath::new("max_depth"), "must be at least 1");
        }

        diag.into_result()
    }

    /// Configured prefix to strip, if non-empty.
    pub fn base_prefix(&self) -> Option<&str> {
        self.base_slug_remove.as_deref().filter(|p| !p.is_empty())
    }

    /// Debounce window as a `Duration`.
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

// ============================================================================
// tests
// ============================================================================
