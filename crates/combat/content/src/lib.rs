//! Data-driven combat content and the oracles that serve it.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Combat configuration (TOML)
//! - Species templates (RON)
//! - Inventory references and weapon numbers (RON)
//! - Combat maps with their starting units (RON)
//!
//! Content is consumed through the combat-core oracle traits and never
//! appears in encounter state.

pub mod oracle;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use oracle::{CombatMap, HiddenLoot, InventoryCatalog, Placement, SpeciesTable};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, InventoryLoader, LoadedContent, MapLoader, SpeciesLoader,
};
