//! Deterministic turn-based combat rules.
//!
//! `combat-core` holds the tactical combat model: units and their stats,
//! attack resolution, traps and loot, enemy navigation and the turn result
//! log presentation consumes. It has no I/O; species, map and inventory data
//! arrive through the oracle traits in [`env`], and every random decision
//! draws from a caller-owned [`RngOracle`].
//!
//! All state mutation flows through [`engine::CombatEncounter`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod loot;
pub mod nav;
pub mod state;
pub mod turn;
pub mod unit;

#[cfg(test)]
mod test_support;

pub use combat::{AttackResolution, HitState};
pub use config::{CombatConfig, DamageRange, LootTables};
pub use engine::{CombatEncounter, CombatError, MoveOutcome, NavigationMode};
pub use env::{
    CombatEnv, CombatItemReference, GameRng, InventoryItem, InventoryKind, InventoryOracle,
    InventoryReference, MapDimensions, MapOracle, MissileType, MovementDomain, OracleError,
    RngOracle, SpeciesAbilities, SpeciesError, SpeciesOracle, SpeciesStats, SpeciesTemplate,
    SpriteIndex, StaticTile, TerrainKind,
};
pub use error::{ErrorSeverity, GameError};
pub use loot::{
    ElementalField, ItemStack, LootError, MoonPhase, NonAttackingKind, NonAttackingUnit,
    NonAttackingUnitFactory, OpenOutcome, SearchOutcome, TrapComplexity, TrapKind, TrapOutcome,
};
pub use state::{CharacterStats, CharacterStatus, CombatCounters, Direction, Position, UnitId};
pub use turn::{TurnResult, TurnResultData, TurnResultError, TurnResultType, TurnResults};
pub use unit::{CharacterClass, CombatUnit, Equipment, HostileUnit, PlayerUnit};
