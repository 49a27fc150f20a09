//! Oracle access errors.

use crate::env::SpriteIndex;
use crate::error::{ErrorSeverity, GameError};
use crate::state::Position;

/// Errors that occur when accessing oracle data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("SpeciesOracle not available")]
    SpeciesNotAvailable,

    #[error("MapOracle not available")]
    MapNotAvailable,

    #[error("InventoryOracle not available")]
    InventoryNotAvailable,

    #[error("position {0} is out of map bounds")]
    PositionOutOfBounds(Position),

    /// No species template is registered for the sprite.
    #[error("species template for sprite {0} not found")]
    SpeciesNotFound(SpriteIndex),

    #[error("combat item '{0}' not found")]
    CombatItemNotFound(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            SpeciesNotAvailable | MapNotAvailable | InventoryNotAvailable => ErrorSeverity::Fatal,
            // A sprite without a template means the reference tables are corrupt.
            SpeciesNotFound(_) => ErrorSeverity::Fatal,
            PositionOutOfBounds(_) | CombatItemNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            SpeciesNotAvailable => "ORACLE_SPECIES_NOT_AVAILABLE",
            MapNotAvailable => "ORACLE_MAP_NOT_AVAILABLE",
            InventoryNotAvailable => "ORACLE_INVENTORY_NOT_AVAILABLE",
            PositionOutOfBounds(_) => "ORACLE_POSITION_OUT_OF_BOUNDS",
            SpeciesNotFound(_) => "ORACLE_SPECIES_NOT_FOUND",
            CombatItemNotFound(_) => "ORACLE_COMBAT_ITEM_NOT_FOUND",
        }
    }
}
