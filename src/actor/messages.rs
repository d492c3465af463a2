//! Sync Engine Message Definitions
//!
//! Everything the engine reacts to arrives on one queue:
//!
//! ```text
//! host subscriptions --ParentChanged/SlugChanged--> SyncEngine
//! resolution tasks   --Resolved-------------------> SyncEngine
//! Session            --AddAlias/RemoveAlias/Shutdown--> SyncEngine
//! ```

use tokio::sync::oneshot;

use crate::core::ParentRef;
use crate::error::{ResolveError, ValidationError};

/// Which edit started a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Parent reference re-pointed; applied immediately.
    Parent,
    /// Slug edited with no known ancestors; goes through the debouncer.
    Slug,
}

/// A composed primary path and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub path: String,
    pub cyclic: bool,
}

/// Messages to the Sync Engine
#[derive(Debug)]
pub enum SyncMsg {
    /// Parent reference field changed
    ParentChanged(ParentRef),
    /// Slug field changed (`None` when emptied)
    SlugChanged(Option<String>),
    /// A spawned resolution finished
    Resolved {
        trigger: Trigger,
        /// Edit generation the resolution was started for
        generation: u64,
        result: Result<Composed, ResolveError>,
    },
    /// Append an operator alias
    AddAlias {
        candidate: String,
        reply: oneshot::Sender<Result<(), ValidationError>>,
    },
    /// Remove an operator alias; replies whether anything was removed
    RemoveAlias {
        path: String,
        reply: oneshot::Sender<bool>,
    },
    /// Detach subscriptions and stop
    Shutdown,
}
