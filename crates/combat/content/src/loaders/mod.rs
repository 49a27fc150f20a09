//! Content loaders for reading combat data from files.
//!
//! Each loader turns one RON/TOML file into combat-core types or into one of
//! the oracle implementations in [`crate::oracle`].

pub mod config;
pub mod factory;
pub mod inventory;
pub mod map;
pub mod species;

pub use config::ConfigLoader;
pub use factory::{ContentFactory, LoadedContent};
pub use inventory::InventoryLoader;
pub use map::MapLoader;
pub use species::SpeciesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
