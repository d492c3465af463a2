//! `slugtree edit`: run a real editing session over one store entry.
//!
//! Field edits are applied first and allowed to settle, then alias
//! changes go through the session like an operator's would.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use super::{EditArgs, TargetArgs, load_store};
use crate::actor::Session;
use crate::config::SlugConfig;
use crate::core::ParentRef;
use crate::error::SessionError;
use crate::host::MemoryHost;
use crate::log;
use crate::logger::{status_error, status_success, status_warning};

/// Extra wait after the debounce window for resolutions to land.
const SETTLE_MARGIN: Duration = Duration::from_millis(200);

pub async fn edit_entry(target: &TargetArgs, args: &EditArgs, config: SlugConfig) -> Result<()> {
    let paths = run_edits(target, args, config).await?;
    println!("{}", serde_json::to_string_pretty(&paths)?);
    Ok(())
}

/// Apply the requested edits and return the final path list.
async fn run_edits(target: &TargetArgs, args: &EditArgs, config: SlugConfig) -> Result<Vec<String>> {
    let store = Arc::new(load_store(target)?);
    let record = store
        .get(&target.entry)
        .with_context(|| format!("entry `{}` not found", target.entry))?;

    let settle = config.debounce() + SETTLE_MARGIN;
    let locale = config.locale.clone();
    let slug_field = config.slug_field_name.clone();
    let parent_field = config.parent_field_name.clone();

    let host = Arc::new(MemoryHost::from_record(record, &args.field, &locale));
    let session = Session::start(config, Arc::clone(&host), store);

    if let Some(slug) = &args.slug {
        host.set_slug(&slug_field, &locale, Some(slug.as_str()).filter(|s| !s.is_empty()));
    }
    if args.clear_parent {
        host.set_parent(&parent_field, &locale, ParentRef::Cleared);
    } else if let Some(id) = &args.parent {
        host.set_parent(&parent_field, &locale, ParentRef::linked(id.as_str(), locale.as_str()));
    }
    tokio::time::sleep(settle).await;

    for alias in &args.aliases {
        match session.add_alias(alias).await {
            Ok(()) => log!("paths"; "added {}", alias),
            Err(SessionError::Validation(e)) => status_error("alias rejected", &e.to_string()),
            Err(e) => return Err(e.into()),
        }
    }
    for path in &args.removals {
        if !session.remove_alias(path).await? {
            log!("paths"; "`{}` is not a removable alias", path);
        }
    }

    let view = session.snapshot();
    session.shutdown().await;

    if view.cyclic {
        status_warning("possible cyclic redundancy of relationships");
    } else {
        status_success(&format!("{} path(s) for `{}`", view.paths.len(), target.entry));
    }
    Ok(view.paths)
}
