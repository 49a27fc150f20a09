//! Mutable combat state primitives: identifiers, positions and character stats.
mod common;
mod stats;

pub use common::{Direction, Position, UnitId};
pub use stats::{CharacterStats, CharacterStatus, CombatCounters};
