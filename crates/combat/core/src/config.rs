//! Combat rule constants and tunable parameters.
use crate::env::SpriteIndex;

/// Inclusive damage range rolled by a damaging trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Item sprites rolled into freshly generated containers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LootTables {
    /// One item is created per listed sprite when a chest is placed.
    pub chest: Vec<SpriteIndex>,
    /// One item is created per listed sprite when remains roll treasure.
    pub remains: Vec<SpriteIndex>,
}

impl Default for LootTables {
    fn default() -> Self {
        let mut chest: Vec<SpriteIndex> = (258..=269).map(SpriteIndex).collect();
        chest.push(SpriteIndex(271));
        Self {
            chest,
            remains: vec![SpriteIndex(258), SpriteIndex(271), SpriteIndex(269)],
        }
    }
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Baseline added to the opponent's dexterity before the to-hit comparison.
    pub hit_offset: i32,
    /// Upper clamp applied to every rolled attack damage.
    pub max_damage: u32,
    /// Units with fewer hit points than this are considered fleeing.
    pub fleeing_hp: i32,
    /// Attack value used by a player with no weapon equipped.
    pub bare_hand_attack: i32,
    pub acid_damage: DamageRange,
    pub bomb_damage: DamageRange,
    pub electric_damage: DamageRange,
    /// Hit points lost each turn by a poisoned character.
    pub poison_damage: u32,
    /// Percent chance that a sleeping enemy wakes at the start of its turn.
    /// At 0 enemies sleep through the rest of the fight.
    pub enemy_wake_percent: u8,
    pub loot: LootTables,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Largest party that can enter combat.
    pub const MAX_PARTY: usize = 6;
    /// Upper bound of the to-hit roll (inclusive).
    pub const HIT_ROLL_MAX: u32 = 255;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HIT_OFFSET: i32 = 128;
    pub const DEFAULT_MAX_DAMAGE: u32 = 99;
    pub const DEFAULT_FLEEING_HP: i32 = 24;
    pub const DEFAULT_BARE_HAND_ATTACK: i32 = 3;
    pub const DEFAULT_ACID_DAMAGE: DamageRange = DamageRange::new(1, 10);
    pub const DEFAULT_BOMB_DAMAGE: DamageRange = DamageRange::new(5, 15);
    pub const DEFAULT_ELECTRIC_DAMAGE: DamageRange = DamageRange::new(5, 15);
    pub const DEFAULT_POISON_DAMAGE: u32 = 1;
    pub const DEFAULT_ENEMY_WAKE_PERCENT: u8 = 0;

    pub fn new() -> Self {
        Self {
            hit_offset: Self::DEFAULT_HIT_OFFSET,
            max_damage: Self::DEFAULT_MAX_DAMAGE,
            fleeing_hp: Self::DEFAULT_FLEEING_HP,
            bare_hand_attack: Self::DEFAULT_BARE_HAND_ATTACK,
            acid_damage: Self::DEFAULT_ACID_DAMAGE,
            bomb_damage: Self::DEFAULT_BOMB_DAMAGE,
            electric_damage: Self::DEFAULT_ELECTRIC_DAMAGE,
            poison_damage: Self::DEFAULT_POISON_DAMAGE,
            enemy_wake_percent: Self::DEFAULT_ENEMY_WAKE_PERCENT,
            loot: LootTables::default(),
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chest_table_skips_unused_sprite() {
        let tables = LootTables::default();
        assert_eq!(tables.chest.len(), 13);
        assert!(!tables.chest.contains(&SpriteIndex(270)));
        assert_eq!(tables.chest.last(), Some(&SpriteIndex(271)));
    }
}
