//! Probability tables for traps, locks and treasure.
//!
//! # Trap trigger formula
//!
//! ```text
//! chance = max(base(complexity) - dexterity * 0.01, 0)
//! ```
//!
//! where `base` is 0.2 for simple traps and 0.4 for complex ones. Untrapped
//! containers never trigger.

use crate::env::RngOracle;
use crate::loot::{TrapComplexity, TrapKind};

pub const CHEST_LOCKED: f32 = 0.2;
pub const SIMPLE_TRAP_ON_CHEST: f32 = 0.2;
pub const COMPLEX_TRAP_ON_CHEST: f32 = 0.2;
pub const SIMPLE_TRAP_BASE_TRIGGER: f32 = 0.2;
pub const COMPLEX_TRAP_BASE_TRIGGER: f32 = 0.4;
/// Trigger chance removed per point of the searcher's dexterity.
pub const DEXTERITY_TRIGGER_ADJUST: f32 = 0.01;
pub const POISON_IN_REMAINS: f32 = 0.5;
pub const TREASURE_IN_REMAINS: f32 = 0.2;

/// Chest trap weights; "no trap" weighs as much as all traps together.
pub const CHEST_TRAP_WEIGHTS: [(TrapKind, u32); 5] = [
    (TrapKind::Acid, 9),
    (TrapKind::Sleep, 3),
    (TrapKind::Poison, 3),
    (TrapKind::Bomb, 1),
    (TrapKind::None, 16),
];

/// Picks a chest trap from [`CHEST_TRAP_WEIGHTS`].
pub fn roll_chest_trap(rng: &mut dyn RngOracle) -> TrapKind {
    let total: u32 = CHEST_TRAP_WEIGHTS.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.below(total);
    for (trap, weight) in CHEST_TRAP_WEIGHTS {
        if roll < weight {
            return trap;
        }
        roll -= weight;
    }
    TrapKind::None
}

pub fn roll_chest_complexity(rng: &mut dyn RngOracle) -> TrapComplexity {
    if rng.chance(SIMPLE_TRAP_ON_CHEST) {
        return TrapComplexity::Simple;
    }
    if rng.chance(COMPLEX_TRAP_ON_CHEST) {
        TrapComplexity::Complex
    } else {
        TrapComplexity::Simple
    }
}

pub fn roll_chest_locked(rng: &mut dyn RngOracle) -> bool {
    rng.chance(CHEST_LOCKED)
}

/// Trap for a freshly dropped body or blood spatter.
pub fn roll_remains_trap(rng: &mut dyn RngOracle) -> TrapKind {
    if rng.chance(POISON_IN_REMAINS) {
        TrapKind::Poison
    } else {
        TrapKind::None
    }
}

pub fn roll_remains_treasure(rng: &mut dyn RngOracle) -> bool {
    rng.chance(TREASURE_IN_REMAINS)
}

/// Probability that a trap of the given complexity goes off for a searcher.
pub fn trigger_chance(complexity: TrapComplexity, dexterity: i32) -> f32 {
    let base = match complexity {
        TrapComplexity::None => return 0.0,
        TrapComplexity::Simple => SIMPLE_TRAP_BASE_TRIGGER,
        TrapComplexity::Complex => COMPLEX_TRAP_BASE_TRIGGER,
    };
    (base - dexterity as f32 * DEXTERITY_TRIGGER_ADJUST).max(0.0)
}

pub fn does_trap_trigger(
    complexity: TrapComplexity,
    dexterity: i32,
    rng: &mut dyn RngOracle,
) -> bool {
    let chance = trigger_chance(complexity, dexterity);
    chance > 0.0 && rng.chance(chance)
}
