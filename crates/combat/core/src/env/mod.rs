//! Read-only world reference context.
//!
//! Oracles expose species templates, the combat grid and the inventory tables.
//! [`CombatEnv`] bundles them together with [`CombatConfig`] and is passed by
//! reference into every component that needs reference data, so no rule code
//! reaches for global state.
mod error;
mod items;
mod map;
mod rng;
mod species;

use std::fmt;

pub use error::OracleError;
pub use items::{
    CombatItemReference, InventoryItem, InventoryKind, InventoryOracle, InventoryReference,
};
pub use map::{MapDimensions, MapOracle, StaticTile, TerrainKind};
pub use rng::{GameRng, RngOracle};
pub use species::{
    MissileType, MovementDomain, SpeciesAbilities, SpeciesError, SpeciesOracle, SpeciesStats,
    SpeciesTemplate,
};

use crate::config::CombatConfig;

/// Tile-set index identifying what a map object or species looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpriteIndex(pub u16);

impl SpriteIndex {
    /// Sprite 0 is "nothing here".
    pub const NONE: Self = Self(0);
}

impl fmt::Display for SpriteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregates the read-only oracles the combat rules consult.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    species: Option<&'a dyn SpeciesOracle>,
    map: Option<&'a dyn MapOracle>,
    inventory: Option<&'a dyn InventoryOracle>,
    config: &'a CombatConfig,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        species: Option<&'a dyn SpeciesOracle>,
        map: Option<&'a dyn MapOracle>,
        inventory: Option<&'a dyn InventoryOracle>,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            species,
            map,
            inventory,
            config,
        }
    }

    pub fn with_all(
        species: &'a dyn SpeciesOracle,
        map: &'a dyn MapOracle,
        inventory: &'a dyn InventoryOracle,
        config: &'a CombatConfig,
    ) -> Self {
        Self::new(Some(species), Some(map), Some(inventory), config)
    }

    /// # Errors
    ///
    /// Returns `OracleError::SpeciesNotAvailable` if no species oracle was provided.
    pub fn species(&self) -> Result<&'a dyn SpeciesOracle, OracleError> {
        self.species.ok_or(OracleError::SpeciesNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::MapNotAvailable` if no map oracle was provided.
    pub fn map(&self) -> Result<&'a dyn MapOracle, OracleError> {
        self.map.ok_or(OracleError::MapNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::InventoryNotAvailable` if no inventory oracle was provided.
    pub fn inventory(&self) -> Result<&'a dyn InventoryOracle, OracleError> {
        self.inventory.ok_or(OracleError::InventoryNotAvailable)
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    /// Looks up a species template, treating a missing one as corrupt data.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SpeciesNotFound` when the sprite has no template.
    pub fn species_template(
        &self,
        sprite: SpriteIndex,
    ) -> Result<std::sync::Arc<SpeciesTemplate>, OracleError> {
        self.species()?
            .template(sprite)
            .ok_or(OracleError::SpeciesNotFound(sprite))
    }
}

impl fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatEnv")
            .field("species", &self.species.is_some())
            .field("map", &self.map.is_some())
            .field("inventory", &self.inventory.is_some())
            .field("config", self.config)
            .finish()
    }
}
