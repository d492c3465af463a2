//! Editing Session - Wires a Sync Engine to a host field
//!
//! Starting a session:
//! - Creates the engine queue and the view channel
//! - Subscribes to parent and slug changes on the host
//! - Replays the current parent so the primary path reflects the stored chain
//! - Spawns the engine
//!
//! The returned [`Session`] is the only way to talk to the engine. Dropping
//! it (or calling [`Session::shutdown`]) detaches every host subscription.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::engine::SyncEngine;
use super::messages::SyncMsg;
use crate::config::SlugConfig;
use crate::error::SessionError;
use crate::host::{FieldHost, RecordStore};
use crate::resolve::Resolver;
use crate::view::{AliasDraft, EditorView};

/// Handle to a running editing session.
pub struct Session {
    tx: mpsc::UnboundedSender<SyncMsg>,
    view: watch::Receiver<EditorView>,
    task: Option<JoinHandle<()>>,
}

impl Session {
    /// Start syncing the host's path list. Must be called inside a tokio runtime.
    pub fn start<H: FieldHost, S: RecordStore>(
        config: SlugConfig,
        host: Arc<H>,
        store: Arc<S>,
    ) -> Self {
        let config = Arc::new(config);
        let (tx, rx) = mpsc::unbounded_channel();
        let (view_tx, view) = watch::channel(EditorView {
            paths: host.read_paths(),
            cyclic: false,
        });

        let parent_tx = tx.clone();
        let parent_sub = host.on_parent_changed(
            &config.parent_field_name,
            &config.locale,
            Box::new(move |parent| {
                let _ = parent_tx.send(SyncMsg::ParentChanged(parent));
            }),
        );
        let slug_tx = tx.clone();
        let slug_sub = host.on_slug_changed(
            &config.slug_field_name,
            &config.locale,
            Box::new(move |slug| {
                let _ = slug_tx.send(SyncMsg::SlugChanged(slug));
            }),
        );

        let current = host.parent_value(&config.parent_field_name, &config.locale);
        let _ = tx.send(SyncMsg::ParentChanged(current));

        let resolver = Resolver::new(store, Arc::clone(&config), host.record_id());
        crate::debug!("sync"; "session start for `{}`", host.record_id());

        let engine = SyncEngine::new(
            host,
            resolver,
            config,
            (tx.clone(), rx),
            view_tx,
            vec![parent_sub, slug_sub],
        );
        let task = tokio::spawn(engine.run());

        Self {
            tx,
            view,
            task: Some(task),
        }
    }

    /// Receiver notified whenever the path list or cyclic flag changes.
    pub fn view(&self) -> watch::Receiver<EditorView> {
        self.view.clone()
    }

    /// Latest published view.
    pub fn snapshot(&self) -> EditorView {
        self.view.borrow().clone()
    }

    /// Append an operator alias. Invalid candidates leave the list unchanged.
    pub async fn add_alias(&self, candidate: &str) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SyncMsg::AddAlias {
            candidate: candidate.to_string(),
            reply,
        })?;
        rx.await.map_err(|_| SessionError::Closed)??;
        Ok(())
    }

    /// Remove an operator alias. The primary path is never removed.
    pub async fn remove_alias(&self, path: &str) -> Result<bool, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SyncMsg::RemoveAlias {
            path: path.to_string(),
            reply,
        })?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Submit the typed alias: cleared when accepted, flagged when rejected.
    pub async fn submit_draft(&self, draft: &mut AliasDraft) -> Result<(), SessionError> {
        match self.add_alias(draft.text()).await {
            Ok(()) => {
                draft.accept();
                Ok(())
            }
            Err(SessionError::Validation(e)) => {
                draft.reject();
                Err(e.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Stop the engine and wait until subscriptions are detached.
    pub async fn shutdown(mut self) {
        let _ = self.tx.send(SyncMsg::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    fn send(&self, msg: SyncMsg) -> Result<(), SessionError> {
        self.tx.send(msg).map_err(|_| SessionError::Closed)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.tx.send(SyncMsg::Shutdown);
        }
    }
}
