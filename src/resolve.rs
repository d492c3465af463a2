//! Parent chain resolution.
//!
//! Walks the parent references of a record up to the tree root, collecting
//! each ancestor's slug:
//!
//! ```text
//! resolve(P):  P --parent--> Root
//!              ["products"]           (Root has an empty slug)
//! ```
//!
//! The walk stops with `cyclic = true` when it reaches the record being
//! edited, or (with [`CycleGuard::Visited`]) any record it already passed.
//! Nothing is cached: every call re-fetches the whole chain so edits made
//! by other editors are always picked up.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::config::{CycleGuard, SlugConfig};
use crate::core::{ParentRef, PathSegment, RecordRef};
use crate::error::ResolveError;
use crate::host::RecordStore;

/// Ancestor slugs of a record, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    pub ancestors: Vec<PathSegment>,
    /// The parent graph folds back onto itself.
    pub cyclic: bool,
}

/// Resolves parent chains against a record store.
pub struct Resolver<S> {
    store: Arc<S>,
    config: Arc<SlugConfig>,
    /// Record under edit; reaching it means the chain is cyclic.
    edited_id: Arc<str>,
}

impl<S> Clone for Resolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            edited_id: Arc::clone(&self.edited_id),
        }
    }
}

impl<S: RecordStore> Resolver<S> {
    pub fn new(store: Arc<S>, config: Arc<SlugConfig>, edited_id: &str) -> Self {
        Self {
            store,
            config,
            edited_id: Arc::from(edited_id),
        }
    }

    /// Slugs of `record` and all its ancestors, root first.
    ///
    /// `record` itself is included as the last segment: resolving the
    /// edited record's parent yields the full prefix for its own slug.
    pub async fn resolve_ancestors(
        &self,
        record: &RecordRef,
    ) -> Result<ResolutionResult, ResolveError> {
        let parent_field = self.config.parent_field_name.as_str();
        let slug_field = self.config.slug_field_name.as_str();

        let mut leaf_first = Vec::new();
        let mut visited = FxHashSet::default();
        let mut cyclic = false;
        let mut next = Some(record.clone());

        while let Some(current) = next.take() {
            if *current.id == *self.edited_id {
                crate::debug!("resolve"; "chain reaches edited record `{}`", current.id);
                cyclic = true;
                break;
            }
            if self.config.cycle_guard == CycleGuard::Visited && !visited.insert(current.id.clone())
            {
                crate::debug!("resolve"; "chain revisits `{}`", current.id);
                cyclic = true;
                break;
            }
            if leaf_first.len() >= self.config.max_depth {
                return Err(ResolveError::TooDeep {
                    id: current.id,
                    max_depth: self.config.max_depth,
                });
            }

            let snapshot =
                self.store
                    .fetch(&current)
                    .await
                    .map_err(|source| ResolveError::Fetch {
                        id: current.id.clone(),
                        source,
                    })?;

            let slug = snapshot.text(slug_field, &current.locale).ok_or_else(|| {
                ResolveError::MissingField {
                    id: current.id.clone(),
                    field: slug_field.to_string(),
                    locale: current.locale.clone(),
                }
            })?;
            // Empty slugs mark the root and contribute no segment
            leaf_first.push(PathSegment::new(slug));

            next = match snapshot.parent(parent_field, &current.locale) {
                ParentRef::Linked(parent) => Some(parent),
                ParentRef::Cleared => None,
            };
        }

        Ok(ResolutionResult {
            ancestors: leaf_first.into_iter().rev().flatten().collect(),
            cyclic,
        })
    }

    /// Resolve a parent reference; `Cleared` resolves to no ancestors.
    pub async fn resolve_parent(&self, parent: &ParentRef) -> Result<ResolutionResult, ResolveError> {
        match parent {
            ParentRef::Linked(record) => self.resolve_ancestors(record).await,
            ParentRef::Cleared => Ok(ResolutionResult::default()),
        }
    }
}
