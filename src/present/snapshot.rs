use anyhow::{Context, Result};
use std::path::Path;

use crate::package::Inventory;
use crate::runtime::Runtime;

/// Serialize the inventory as one JSON object keyed by package name.
pub fn snapshot_json(inventory: &Inventory) -> Result<String> {
    serde_json::to_string_pretty(inventory).context("Failed to serialize package inventory")
}

#[tracing::instrument(skip(runtime, inventory))]
pub fn write_snapshot<R: Runtime>(runtime: &R, path: &Path, inventory: &Inventory) -> Result<()> {
    let mut json = snapshot_json(inventory)?;
    json.push('\n');
    runtime
        .write(path, json.as_bytes())
        .with_context(|| format!("Failed to write JSON snapshot to {}", path.display()))
}
