//! Sync Engine
//!
//! Owns the path list and reacts to parent and slug edits:
//!
//! ```text
//! Idle --ParentChanged--> ResolvingFromParentChange --Resolved--> Applying --> Idle
//! Idle --SlugChanged----> ResolvingFromSlugChange --push--> Debouncer --settled--> Applying --> Idle
//! ```
//!
//! Parent re-points are discrete events and are applied as soon as their
//! resolution finishes. Slug edits arrive per keystroke and only the value
//! that stays quiet for the debounce window is applied.
//!
//! Resolutions run as spawned tasks reporting back through the queue, so a
//! parent resolution and a slug debounce can be in flight at once. Under
//! [`ConflictPolicy::LastWriteWins`] both are applied in completion order;
//! under [`ConflictPolicy::LatestIntent`] anything started before the most
//! recent edit is discarded. Under either policy an applied parent change
//! drops slug paths computed before it, since it already used the newest slug.
//!
//! Until a parent change has been resolved, slug edits resolve the full
//! chain instead of reusing the ancestors of the current primary path.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::messages::{Composed, SyncMsg, Trigger};
use crate::compose::{ancestor_segments, compose};
use crate::config::{ConflictPolicy, SlugConfig};
use crate::core::{ParentRef, PathSegment, RecordRef};
use crate::debounce::Debouncer;
use crate::error::ResolveError;
use crate::host::{FieldHost, RecordStore, Subscription};
use crate::paths::PathList;
use crate::resolve::Resolver;
use crate::view::EditorView;
use crate::{debug, log};

/// Engine state, tracked for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    ResolvingFromParentChange,
    ResolvingFromSlugChange,
    Applying,
}

impl EngineState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ResolvingFromParentChange => "resolving(parent)",
            Self::ResolvingFromSlugChange => "resolving(slug)",
            Self::Applying => "applying",
        }
    }
}

/// Slug-derived path waiting in the debouncer.
#[derive(Debug, Clone)]
struct PendingPath {
    path: String,
    generation: u64,
}

pub(crate) struct SyncEngine<H, S> {
    host: Arc<H>,
    resolver: Resolver<S>,
    config: Arc<SlugConfig>,
    rx: mpsc::UnboundedReceiver<SyncMsg>,
    /// Cloned into resolution tasks so they can report back
    tx: mpsc::UnboundedSender<SyncMsg>,
    paths: PathList,
    debouncer: Debouncer<PendingPath>,
    cyclic: bool,
    /// Bumped on every parent or slug edit
    generation: u64,
    /// Generation of the latest parent edit
    parent_generation: u64,
    /// Generation of the latest parent edit whose path was applied
    parent_applied: u64,
    /// A parent re-point has not been resolved yet
    ancestors_stale: bool,
    state: EngineState,
    view_tx: watch::Sender<EditorView>,
    /// Host subscriptions, detached on teardown
    subscriptions: Vec<Subscription>,
}

impl<H: FieldHost, S: RecordStore> SyncEngine<H, S> {
    pub(crate) fn new(
        host: Arc<H>,
        resolver: Resolver<S>,
        config: Arc<SlugConfig>,
        (tx, rx): (mpsc::UnboundedSender<SyncMsg>, mpsc::UnboundedReceiver<SyncMsg>),
        view_tx: watch::Sender<EditorView>,
        subscriptions: Vec<Subscription>,
    ) -> Self {
        let paths = PathList::initialize(host.read_paths());
        let debouncer = Debouncer::new(config.debounce());
        Self {
            host,
            resolver,
            config,
            rx,
            tx,
            paths,
            debouncer,
            cyclic: false,
            generation: 0,
            parent_generation: 0,
            parent_applied: 0,
            ancestors_stale: false,
            state: EngineState::Idle,
            view_tx,
            subscriptions,
        }
    }

    /// Run the engine event loop until shutdown.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                msg = self.rx.recv() => match msg {
                    Some(SyncMsg::Shutdown) | None => break,
                    Some(msg) => self.handle(msg).await,
                },
                _ = tokio::time::sleep(self.debouncer.sleep_duration()), if self.debouncer.is_pending() => {
                    self.flush_debounced().await;
                }
            }
        }
        self.teardown();
    }

    async fn handle(&mut self, msg: SyncMsg) {
        match msg {
            SyncMsg::ParentChanged(parent) => self.on_parent_changed(parent).await,
            SyncMsg::SlugChanged(slug) => self.on_slug_changed(slug),
            SyncMsg::Resolved {
                trigger,
                generation,
                result,
            } => self.on_resolved(trigger, generation, result).await,
            SyncMsg::AddAlias { candidate, reply } => {
                let result = self.paths.add_alias(&candidate);
                match &result {
                    Ok(()) => {
                        debug!("paths"; "alias added: {}", candidate);
                        self.persist().await;
                    }
                    Err(e) => debug!("paths"; "{}", e),
                }
                let _ = reply.send(result);
            }
            SyncMsg::RemoveAlias { path, reply } => {
                let removed = self.paths.remove_alias(&path);
                if removed {
                    debug!("paths"; "alias removed: {}", path);
                    self.persist().await;
                }
                let _ = reply.send(removed);
            }
            SyncMsg::Shutdown => {}
        }
    }

    // ========================================================================
    // Edits
    // ========================================================================

    async fn on_parent_changed(&mut self, parent: ParentRef) {
        self.generation += 1;
        self.parent_generation = self.generation;
        self.ancestors_stale = true;
        self.transition(EngineState::ResolvingFromParentChange);
        self.set_cyclic(false);

        let Some(slug) = self.local_slug() else {
            debug!("sync"; "parent changed without a slug, resolving on next slug edit");
            self.transition(EngineState::Idle);
            return;
        };

        match parent {
            ParentRef::Cleared => {
                let path = compose(&[slug.as_str()], self.config.base_prefix());
                let composed = Composed {
                    path,
                    cyclic: false,
                };
                self.on_resolved(Trigger::Parent, self.generation, Ok(composed))
                    .await;
            }
            ParentRef::Linked(record) => {
                self.spawn_resolution(Trigger::Parent, record, slug);
                self.transition(EngineState::Idle);
            }
        }
    }

    fn on_slug_changed(&mut self, slug: Option<String>) {
        self.generation += 1;
        self.transition(EngineState::ResolvingFromSlugChange);

        let Some(slug) = slug.filter(|s| !s.is_empty()) else {
            debug!("sync"; "slug emptied, keeping current path");
            self.debouncer.cancel();
            self.transition(EngineState::Idle);
            return;
        };

        let needs_full = self.paths.primary().is_none() || self.ancestors_stale;

        let mut segments: Vec<String> = Vec::new();
        if needs_full {
            let parent = self
                .host
                .parent_value(&self.config.parent_field_name, &self.config.locale);
            if let ParentRef::Linked(record) = parent {
                self.spawn_resolution(Trigger::Slug, record, slug);
                self.transition(EngineState::Idle);
                return;
            }
            self.ancestors_stale = false;
        } else if let Some(primary) = self.paths.primary() {
            segments.extend(ancestor_segments(primary).into_iter().map(str::to_string));
        }
        segments.push(slug);

        let path = compose(&segments, self.config.base_prefix());
        self.transition(EngineState::Applying);
        self.debouncer.push(PendingPath {
            path,
            generation: self.generation,
        });
        self.transition(EngineState::Idle);
    }

    /// Resolve `record`'s chain in the background and report back.
    fn spawn_resolution(&self, trigger: Trigger, record: RecordRef, slug: String) {
        let resolver = self.resolver.clone();
        let tx = self.tx.clone();
        let prefix = self.config.base_prefix().map(str::to_string);
        let generation = self.generation;

        debug!("resolve"; "resolving parent chain from `{}`", record.id);
        tokio::spawn(async move {
            let result = resolver.resolve_ancestors(&record).await.map(|resolved| {
                let mut segments = resolved.ancestors;
                segments.extend(PathSegment::new(&slug));
                Composed {
                    path: compose(&segments, prefix.as_deref()),
                    cyclic: resolved.cyclic,
                }
            });
            let _ = tx.send(SyncMsg::Resolved {
                trigger,
                generation,
                result,
            });
        });
    }

    async fn on_resolved(
        &mut self,
        trigger: Trigger,
        generation: u64,
        result: Result<Composed, ResolveError>,
    ) {
        if self.is_superseded(generation) {
            debug!("sync"; "discarding superseded {:?} resolution", trigger);
            return;
        }

        let composed = match result {
            Ok(composed) => composed,
            Err(e) => {
                log!("resolve"; "{}, keeping {}", e, self.paths.primary().unwrap_or("current paths"));
                return;
            }
        };

        if composed.cyclic {
            self.set_cyclic(true);
        }
        if generation >= self.parent_generation {
            self.ancestors_stale = false;
        }

        match trigger {
            Trigger::Parent => {
                // Slug paths queued before this edit carry the old ancestors
                self.parent_applied = self.parent_applied.max(generation);
                if self
                    .debouncer
                    .pending()
                    .is_some_and(|pending| pending.generation < generation)
                {
                    self.debouncer.cancel();
                    debug!("sync"; "dropping slug path queued before parent change");
                }
                self.apply_primary(&composed.path).await;
            }
            Trigger::Slug if generation < self.parent_applied => {
                debug!("sync"; "dropping slug resolution older than applied parent");
            }
            Trigger::Slug => {
                self.transition(EngineState::Applying);
                self.debouncer.push(PendingPath {
                    path: composed.path,
                    generation,
                });
                self.transition(EngineState::Idle);
            }
        }
    }

    async fn flush_debounced(&mut self) {
        let Some(pending) = self.debouncer.take_if_ready() else {
            return;
        };
        if self.is_superseded(pending.generation) {
            debug!("sync"; "discarding superseded slug path {}", pending.path);
            return;
        }
        self.apply_primary(&pending.path).await;
    }

    // ========================================================================
    // State
    // ========================================================================

    fn is_superseded(&self, generation: u64) -> bool {
        self.config.conflict_policy == ConflictPolicy::LatestIntent && generation != self.generation
    }

    async fn apply_primary(&mut self, path: &str) {
        self.transition(EngineState::Applying);
        if self.paths.on_primary_path_computed(path) {
            debug!("paths"; "primary path: {}", path);
            self.persist().await;
        }
        self.transition(EngineState::Idle);
    }

    /// Write the full list back to the host and publish it.
    async fn persist(&mut self) {
        if let Err(e) = self.host.write_paths(self.paths.to_vec()).await {
            log!("error"; "{}", e);
        }
        self.publish();
    }

    fn publish(&self) {
        let next = EditorView {
            paths: self.paths.to_vec(),
            cyclic: self.cyclic,
        };
        self.view_tx.send_if_modified(|view| {
            if *view == next {
                return false;
            }
            *view = next;
            true
        });
    }

    fn set_cyclic(&mut self, cyclic: bool) {
        if self.cyclic == cyclic {
            return;
        }
        self.cyclic = cyclic;
        if cyclic {
            log!("sync"; "possible cyclic redundancy of relationships");
        }
        self.publish();
    }

    fn transition(&mut self, next: EngineState) {
        if self.state != next {
            debug!("sync"; "{} -> {}", self.state.label(), next.label());
            self.state = next;
        }
    }

    fn local_slug(&self) -> Option<String> {
        self.host
            .slug_value(&self.config.slug_field_name, &self.config.locale)
            .filter(|s| !s.is_empty())
    }

    fn teardown(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.detach();
        }
        debug!("sync"; "session closed, subscriptions detached");
    }
}
