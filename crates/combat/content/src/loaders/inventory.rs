//! Inventory catalog loader.

use std::path::Path;

use combat_core::{CombatItemReference, InventoryReference};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::oracle::InventoryCatalog;

/// Inventory catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryCatalogRon {
    pub items: Vec<InventoryReference>,
    #[serde(default)]
    pub combat_items: Vec<CombatItemReference>,
}

/// Loader for inventory references from RON files.
pub struct InventoryLoader;

impl InventoryLoader {
    /// Load the inventory catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<InventoryCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<InventoryCatalog> {
        let data: InventoryCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse inventory RON: {}", e))?;

        let mut catalog = InventoryCatalog::new();
        for reference in data.items {
            catalog.add(reference);
        }
        for item in data.combat_items {
            anyhow::ensure!(
                item.range >= 1,
                "Combat item '{}' has range {}",
                item.name,
                item.range
            );
            if !catalog.add_combat_item(item.clone()) {
                anyhow::bail!("Duplicate combat item '{}'", item.name);
            }
        }
        Ok(catalog)
    }
}
