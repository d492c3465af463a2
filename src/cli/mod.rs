//! Command-line interface module.

mod args;
pub mod edit;
pub mod resolve;

pub use args::{Cli, Commands, EditArgs, TargetArgs};

use anyhow::{Context, Result};

use crate::host::MemoryStore;

/// Load a record store fixture.
fn load_store(target: &TargetArgs) -> Result<MemoryStore> {
    let json = std::fs::read_to_string(&target.store)
        .with_context(|| format!("failed to read store {}", target.store.display()))?;
    MemoryStore::from_json(&json)
        .with_context(|| format!("invalid store {}", target.store.display()))
}
