//! Capability traits implemented by the unit variants.
//!
//! Rule code asks "can this be attacked / moved / looted" through these traits
//! instead of matching on the concrete variant.

use crate::combat::HitState;
use crate::config::CombatConfig;
use crate::env::{MovementDomain, RngOracle, TerrainKind};
use crate::loot::{ItemStack, TrapKind};
use crate::state::{CharacterStats, Position};
use crate::unit::UnitCore;

/// Anything that can take part in an exchange of blows.
pub trait Attackable {
    fn core(&self) -> &UnitCore;
    fn core_mut(&mut self) -> &mut UnitCore;

    /// Armour value subtracted from incoming damage.
    fn defense(&self) -> i32;

    /// Experience handed to whoever kills this unit.
    fn experience_reward(&self) -> u32;

    /// Reach in tiles, measured as king moves.
    fn attack_range(&self) -> i32;

    /// Upper damage bound before strength and defense adjust it.
    fn max_damage(&self, config: &CombatConfig) -> i32;

    fn is_attackable(&self) -> bool {
        true
    }

    fn stats(&self) -> &CharacterStats {
        &self.core().stats
    }

    fn stats_mut(&mut self) -> &mut CharacterStats {
        &mut self.core_mut().stats
    }

    fn hit_state(&self, config: &CombatConfig) -> HitState {
        HitState::from_stats(self.stats(), config.fleeing_hp)
    }

    fn can_reach_for_attack(&self, target: Position) -> bool {
        self.core().position.chebyshev(target) <= self.attack_range()
    }
}

/// Anything that occupies and may move across the combat grid.
pub trait Navigable {
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
    fn movement(&self) -> MovementDomain;

    fn is_immobile(&self) -> bool {
        false
    }

    fn can_enter(&self, terrain: TerrainKind) -> bool {
        self.movement().allows(terrain)
    }
}

/// Anything that holds items and possibly a trap.
pub trait Lootable {
    fn items(&self) -> Option<&ItemStack>;
    fn trap(&self) -> TrapKind;
    fn is_openable(&self) -> bool;
    fn is_searchable(&self) -> bool;
    fn exposes_items_on_open(&self) -> bool;
    fn exposes_items_on_search(&self) -> bool;
    fn does_trigger_trap(&self, dexterity: i32, rng: &mut dyn RngOracle) -> bool;
}
