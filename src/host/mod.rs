//! Host platform and record store boundaries.
//!
//! The engine never talks to a concrete CMS. It consumes two traits:
//!
//! ```text
//! FieldHost   - the editing context: own field value, sibling fields, change events
//! RecordStore - remote lookup of other records' field snapshots
//! ```
//!
//! Change notifications are callbacks registered per field and locale.
//! Each registration returns a [`Subscription`] that must be detached when
//! the editing session ends; dropping it detaches as well.

pub mod memory;

use std::future::Future;

use crate::core::{ParentRef, RecordRef, RecordSnapshot};
use crate::error::{HostError, StoreError};

pub use memory::{MemoryHost, MemoryStore};

/// Callback for parent reference changes.
pub type ParentHandler = Box<dyn Fn(ParentRef) + Send + Sync>;
/// Callback for slug changes (`None` when the field was emptied).
pub type SlugHandler = Box<dyn Fn(Option<String>) + Send + Sync>;

/// The editing context the engine runs inside.
pub trait FieldHost: Send + Sync + 'static {
    /// Identifier of the record being edited.
    fn record_id(&self) -> &str;

    /// Persisted path list at session start.
    fn read_paths(&self) -> Vec<String>;

    /// Overwrite the whole path list.
    fn write_paths(&self, paths: Vec<String>) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Current value of the parent reference field.
    fn parent_value(&self, field: &str, locale: &str) -> ParentRef;

    /// Current value of the slug field.
    fn slug_value(&self, field: &str, locale: &str) -> Option<String>;

    fn on_parent_changed(&self, field: &str, locale: &str, handler: ParentHandler) -> Subscription;

    fn on_slug_changed(&self, field: &str, locale: &str, handler: SlugHandler) -> Subscription;
}

/// Remote store of content records.
pub trait RecordStore: Send + Sync + 'static {
    /// Fetch a record's full field snapshot. May fail.
    fn fetch(
        &self,
        record: &RecordRef,
    ) -> impl Future<Output = Result<RecordSnapshot, StoreError>> + Send;
}

/// Detach handle for a change subscription.
///
/// Detaches exactly once: explicitly via [`Subscription::detach`] or on drop.
#[must_use = "dropping a subscription detaches it immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
