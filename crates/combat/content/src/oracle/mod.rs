//! Oracle implementations backed by loaded content.
mod inventory;
mod map;
mod species;

pub use inventory::InventoryCatalog;
pub use map::{CombatMap, HiddenLoot, Placement};
pub use species::SpeciesTable;
