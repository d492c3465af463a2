//! Slugtree - slug-derived URL paths for hierarchical content records.
//!
//! An editing session keeps a record's path list in sync with its slug and
//! its chain of parent records:
//!
//! ```text
//! R("widget") --parent--> P("products") --parent--> Root("")
//!
//! paths[0] = /products/widget      computed, replaced on every change
//! paths[1..] = operator aliases    kept as entered
//! ```
//!
//! # Module Structure
//!
//! - `core` - Record snapshots, references and path segments
//! - `host` - Host field and record store boundaries, in-memory versions
//! - `resolve` - Parent chain resolution with cycle detection
//! - `compose` - Segment joining and base prefix stripping
//! - `paths` - Path list with the primary path pinned at index 0
//! - `debounce` - Value settling for slug edits
//! - `actor` - Sync engine and editing session
//! - `view` - State published to a presentation layer
//! - `config` - `slugtree.toml` loading and validation
//! - `cli` - The `slugtree` binary's commands

pub mod actor;
pub mod cli;
pub mod compose;
pub mod config;
pub mod core;
pub mod debounce;
pub mod error;
pub mod host;
pub mod logger;
pub mod paths;
pub mod resolve;
pub mod view;

pub use actor::Session;
pub use config::SlugConfig;
pub use error::{HostError, ResolveError, SessionError, StoreError, ValidationError};
pub use host::{FieldHost, RecordStore, Subscription};
pub use paths::PathList;
pub use resolve::{ResolutionResult, Resolver};
pub use view::{AliasDraft, EditorView};
