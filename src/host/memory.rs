//! In-memory host and store.
//!
//! Used by the CLI to run sessions against a JSON fixture, and by tests to
//! fire field edits, inject fetch failures and latency, and inspect writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use super::{FieldHost, ParentHandler, RecordStore, SlugHandler, Subscription};
use crate::core::{FieldValue, ParentRef, RecordRef, RecordSnapshot};
use crate::error::{HostError, StoreError};

// ============================================================================
// MemoryHost
// ============================================================================

/// Handlers registered for one field + locale.
struct Registered<H> {
    field: String,
    locale: String,
    handler: Arc<H>,
}

#[derive(Default)]
struct HostState {
    record: RecordSnapshot,
    paths: Vec<String>,
    writes: Vec<Vec<String>>,
    fail_writes: bool,
    next_id: u64,
    parent_handlers: FxHashMap<u64, Registered<ParentHandler>>,
    slug_handlers: FxHashMap<u64, Registered<SlugHandler>>,
}

/// Editing context backed by a record snapshot held in memory.
#[derive(Clone)]
pub struct MemoryHost {
    record_id: Arc<str>,
    state: Arc<Mutex<HostState>>,
}

impl MemoryHost {
    /// Host editing `record`, with `paths` as the persisted field value.
    pub fn new(record: RecordSnapshot, paths: Vec<String>) -> Self {
        Self {
            record_id: Arc::from(record.id.as_str()),
            state: Arc::new(Mutex::new(HostState {
                record,
                paths,
                ..HostState::default()
            })),
        }
    }

    /// Host whose persisted path list lives in `paths_field` of `record`.
    pub fn from_record(record: RecordSnapshot, paths_field: &str, locale: &str) -> Self {
        let paths = record
            .get(paths_field, locale)
            .and_then(FieldValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        Self::new(record, paths)
    }

    /// Edit the slug field and notify subscribers.
    pub fn set_slug(&self, field: &str, locale: &str, slug: Option<&str>) {
        let handlers: Vec<_> = {
            let mut state = self.state.lock();
            match slug {
                Some(s) => state.record.set(field, locale, FieldValue::text(s)),
                None => state.record.remove(field, locale),
            }
            matching(&state.slug_handlers, field, locale)
        };
        for handler in handlers {
            handler(slug.map(str::to_string));
        }
    }

    /// Edit the parent field and notify subscribers.
    pub fn set_parent(&self, field: &str, locale: &str, parent: ParentRef) {
        let handlers: Vec<_> = {
            let mut state = self.state.lock();
            match parent.record() {
                Some(r) => state.record.set(field, locale, FieldValue::link(r.id.clone())),
                None => state.record.remove(field, locale),
            }
            matching(&state.parent_handlers, field, locale)
        };
        for handler in handlers {
            handler(parent.clone());
        }
    }

    /// Current persisted path list.
    pub fn paths(&self) -> Vec<String> {
        self.state.lock().paths.clone()
    }

    /// Every list written so far, oldest first.
    pub fn writes(&self) -> Vec<Vec<String>> {
        self.state.lock().writes.clone()
    }

    /// Make subsequent writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Number of live subscriptions across both fields.
    pub fn subscriber_count(&self) -> usize {
        let state = self.state.lock();
        state.parent_handlers.len() + state.slug_handlers.len()
    }

    fn detach_handle(&self, id: u64) -> Subscription {
        let state = Arc::clone(&self.state);
        Subscription::new(move || {
            let mut state = state.lock();
            state.parent_handlers.remove(&id);
            state.slug_handlers.remove(&id);
        })
    }
}

fn matching<H>(handlers: &FxHashMap<u64, Registered<H>>, field: &str, locale: &str) -> Vec<Arc<H>> {
    handlers
        .values()
        .filter(|r| r.field == field && r.locale == locale)
        .map(|r| Arc::clone(&r.handler))
        .collect()
}

impl FieldHost for MemoryHost {
    fn record_id(&self) -> &str {
        &self.record_id
    }

    fn read_paths(&self) -> Vec<String> {
        self.paths()
    }

    async fn write_paths(&self, paths: Vec<String>) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(HostError("host rejected write".to_string()));
        }
        state.writes.push(paths.clone());
        state.paths = paths;
        Ok(())
    }

    fn parent_value(&self, field: &str, locale: &str) -> ParentRef {
        self.state.lock().record.parent(field, locale)
    }

    fn slug_value(&self, field: &str, locale: &str) -> Option<String> {
        self.state
            .lock()
            .record
            .text(field, locale)
            .map(str::to_string)
    }

    fn on_parent_changed(&self, field: &str, locale: &str, handler: ParentHandler) -> Subscription {
        let id = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.parent_handlers.insert(
                id,
                Registered {
                    field: field.to_string(),
                    locale: locale.to_string(),
                    handler: Arc::new(handler),
                },
            );
            id
        };
        self.detach_handle(id)
    }

    fn on_slug_changed(&self, field: &str, locale: &str, handler: SlugHandler) -> Subscription {
        let id = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.slug_handlers.insert(
                id,
                Registered {
                    field: field.to_string(),
                    locale: locale.to_string(),
                    handler: Arc::new(handler),
                },
            );
            id
        };
        self.detach_handle(id)
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Store fixture file: `{ "entries": { "<id>": { "fields": { ... } } } }`
#[derive(Debug, Deserialize)]
struct StoreFile {
    #[serde(default)]
    entries: FxHashMap<String, RecordSnapshot>,
}

/// Record store backed by a map, with injectable failures and latency.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<FxHashMap<String, RecordSnapshot>>,
    failing: Mutex<FxHashSet<String>>,
    latency: Mutex<FxHashMap<String, Duration>>,
    fetches: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load entries from store JSON. Entry ids come from the map keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: StoreFile = serde_json::from_str(json)?;
        let store = Self::new();
        for (id, mut record) in file.entries {
            record.id = id;
            store.insert(record);
        }
        Ok(store)
    }

    pub fn insert(&self, record: RecordSnapshot) {
        self.records.lock().insert(record.id.clone(), record);
    }

    /// Stored snapshot of a record.
    pub fn get(&self, id: &str) -> Option<RecordSnapshot> {
        self.records.lock().get(id).cloned()
    }

    /// Make fetches of `id` fail.
    pub fn fail(&self, id: &str) {
        self.failing.lock().insert(id.to_string());
    }

    /// Delay fetches of `id`.
    pub fn delay(&self, id: &str, latency: Duration) {
        self.latency.lock().insert(id.to_string(), latency);
    }

    /// Total fetches served or failed.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RecordStore for MemoryStore {
    async fn fetch(&self, record: &RecordRef) -> Result<RecordSnapshot, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency.lock().get(&record.id).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.lock().contains(&record.id) {
            return Err(StoreError::Unavailable(format!("fetch of `{}` failed", record.id)));
        }

        self.records
            .lock()
            .get(&record.id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(record.id.clone()))
    }
}
