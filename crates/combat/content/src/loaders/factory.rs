//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, CombatEnv};

use crate::loaders::{ConfigLoader, InventoryLoader, LoadResult, MapLoader, SpeciesLoader};
use crate::oracle::{CombatMap, InventoryCatalog, SpeciesTable};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── species.ron
/// ├── inventory.ron
/// └── maps/
///     ├── camp.ron
///     └── dungeon_room.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load species templates from `species.ron`.
    pub fn load_species(&self) -> LoadResult<SpeciesTable> {
        SpeciesLoader::load(&self.data_dir.join("species.ron"))
    }

    /// Load inventory references from `inventory.ron`.
    pub fn load_inventory(&self) -> LoadResult<InventoryCatalog> {
        InventoryLoader::load(&self.data_dir.join("inventory.ron"))
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<CombatMap> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Loads config, species and inventory, and checks that every sprite the
    /// loot tables name has inventory references.
    pub fn load_all(&self) -> LoadResult<LoadedContent> {
        let content = LoadedContent {
            config: self.load_config()?,
            species: self.load_species()?,
            inventory: self.load_inventory()?,
        };
        let loot = &content.config.loot;
        for sprite in loot.chest.iter().chain(&loot.remains) {
            anyhow::ensure!(
                content.inventory.sprites().any(|known| known == *sprite),
                "Loot table sprite {} has no inventory references",
                sprite
            );
        }
        tracing::info!(
            target: "combat::content",
            data_dir = %self.data_dir.display(),
            species = content.species.len(),
            "content loaded"
        );
        Ok(content)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Everything an encounter needs except the map.
#[derive(Debug)]
pub struct LoadedContent {
    pub config: CombatConfig,
    pub species: SpeciesTable,
    pub inventory: InventoryCatalog,
}

impl LoadedContent {
    /// Bundles the loaded oracles with `map` into a rules context.
    pub fn env<'a>(&'a self, map: &'a CombatMap) -> CombatEnv<'a> {
        CombatEnv::with_all(&self.species, map, &self.inventory, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }
}
