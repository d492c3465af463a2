//! `slugtree resolve`: compose one entry's primary path from a store file.

use std::sync::Arc;

use anyhow::{Context, Result};

use super::{TargetArgs, load_store};
use crate::compose::compose;
use crate::config::SlugConfig;
use crate::core::PathSegment;
use crate::host::MemoryStore;
use crate::logger::{status_success, status_warning};
use crate::resolve::Resolver;

const CYCLIC_WARNING: &str = "possible cyclic redundancy of relationships";

pub async fn resolve_entry(target: &TargetArgs, config: SlugConfig) -> Result<()> {
    let store = Arc::new(load_store(target)?);
    let (path, cyclic) = primary_path(store, &target.entry, config).await?;

    if cyclic {
        status_warning(CYCLIC_WARNING);
    } else {
        status_success(&format!("resolved `{}`", target.entry));
    }
    println!("{path}");
    Ok(())
}

/// Primary path of `entry` and whether its parent graph is cyclic.
async fn primary_path(
    store: Arc<MemoryStore>,
    entry: &str,
    config: SlugConfig,
) -> Result<(String, bool)> {
    let record = store
        .get(entry)
        .with_context(|| format!("entry `{entry}` not found"))?;
    let slug = record
        .text(&config.slug_field_name, &config.locale)
        .and_then(PathSegment::new)
        .with_context(|| {
            format!(
                "entry `{entry}` has no `{}` value for locale `{}`",
                config.slug_field_name, config.locale
            )
        })?;
    let parent = record.parent(&config.parent_field_name, &config.locale);
    let prefix = config.base_prefix().map(str::to_string);

    let resolver = Resolver::new(store, Arc::new(config), entry);
    let resolved = resolver.resolve_parent(&parent).await?;

    let mut segments = resolved.ancestors;
    segments.push(slug);
    Ok((compose(&segments, prefix.as_deref()), resolved.cyclic))
}
