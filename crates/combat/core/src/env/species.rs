//! Enemy species templates.
//!
//! A [`SpeciesTemplate`] is built once from reference data and shared (through
//! `Arc`) by every hostile unit of that species. Templates never change after
//! construction.

use std::sync::Arc;

use bitflags::bitflags;

use crate::env::{SpriteIndex, TerrainKind};
use crate::error::{ErrorSeverity, GameError};

/// Read-only lookup of species templates by key sprite.
pub trait SpeciesOracle: Send + Sync {
    fn template(&self, sprite: SpriteIndex) -> Option<Arc<SpeciesTemplate>>;
}

bitflags! {
    /// Special abilities a species may have. Bit positions match the packed
    /// reference table.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SpeciesAbilities: u16 {
        const BLUDGEONS = 1 << 0;
        const POSSESS_CHARM = 1 << 1;
        const UNDEAD = 1 << 2;
        const DIVIDE_ON_HIT = 1 << 3;
        const IMMORTAL = 1 << 4;
        const POISON_AT_RANGE = 1 << 5;
        const STEALS_FOOD = 1 << 6;
        const NO_CORPSE = 1 << 7;
        const RANGED_MAGIC = 1 << 8;
        const TELEPORT = 1 << 9;
        const DISAPPEARS_ON_DEATH = 1 << 10;
        const INVISIBILITY = 1 << 11;
        const GATES_IN_DAEMON = 1 << 12;
        const POISON = 1 << 13;
        const INFECT_WITH_PLAGUE = 1 << 14;
    }
}

impl SpeciesAbilities {
    /// Decodes a packed ability word.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesError::UnknownAbilities`] if any undefined bit is set.
    pub fn from_raw(bits: u16) -> Result<Self, SpeciesError> {
        Self::from_bits(bits).ok_or(SpeciesError::UnknownAbilities(bits))
    }
}

bitflags! {
    /// Terrain a species may stand on.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct MovementDomain: u8 {
        const LAND = 1 << 0;
        const WATER = 1 << 1;
        const SAND = 1 << 2;
        const FLIES_OVER_WATER = 1 << 3;
        const PASSES_THROUGH_WALLS = 1 << 4;
    }
}

impl MovementDomain {
    /// Whether a unit with this domain may occupy the terrain.
    pub fn allows(self, terrain: TerrainKind) -> bool {
        match terrain {
            TerrainKind::Floor => self.contains(Self::LAND),
            TerrainKind::Sand => self.intersects(Self::SAND | Self::LAND),
            TerrainKind::Water => self.intersects(Self::WATER | Self::FLIES_OVER_WATER),
            TerrainKind::Wall => self.contains(Self::PASSES_THROUGH_WALLS),
            TerrainKind::Void => false,
        }
    }
}

/// Projectile drawn for ranged attacks.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MissileType {
    #[default]
    None,
    Arrow,
    CannonBall,
    Axe,
    Red,
    Blue,
    Green,
    Violet,
    Rock,
}

/// Default attributes a species spawns with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpeciesStats {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub armour: i32,
    pub damage: i32,
    pub hit_points: i32,
    pub max_per_map: u8,
    pub treasure: u8,
}

/// Immutable per-species reference data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesTemplate {
    pub sprite: SpriteIndex,
    pub name: String,
    /// Empty in data files means "name + s".
    #[cfg_attr(feature = "serde", serde(default))]
    pub plural_name: String,
    pub stats: SpeciesStats,
    /// Experience awarded to whoever kills one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: u32,
    /// Reach in tiles (Chebyshev); 1 is melee.
    pub attack_range: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub missile: MissileType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: SpeciesAbilities,
    pub movement: MovementDomain,
    #[cfg_attr(feature = "serde", serde(default))]
    pub immobile: bool,
    /// Species that fights on the same side, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub friend: Option<SpriteIndex>,
}

impl SpeciesTemplate {
    /// First sprite of the monster block in the tile set.
    pub const FIRST_SPRITE: u16 = 320;
    /// Animation frames per monster.
    pub const FRAMES_PER_SPRITE: u16 = 4;

    /// Key sprite for the n-th species in the reference table.
    pub const fn key_sprite(species_index: u16) -> SpriteIndex {
        SpriteIndex(Self::FIRST_SPRITE + species_index * Self::FRAMES_PER_SPRITE)
    }

    pub fn new(sprite: SpriteIndex, name: impl Into<String>, stats: SpeciesStats) -> Self {
        let name = name.into();
        Self {
            sprite,
            plural_name: format!("{name}s"),
            name,
            stats,
            experience: 0,
            attack_range: 1,
            missile: MissileType::None,
            abilities: SpeciesAbilities::empty(),
            movement: MovementDomain::LAND,
            immobile: false,
            friend: None,
        }
    }

    #[must_use]
    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    #[must_use]
    pub fn with_ranged_attack(mut self, range: i32, missile: MissileType) -> Self {
        self.attack_range = range;
        self.missile = missile;
        self
    }

    #[must_use]
    pub fn with_abilities(mut self, abilities: SpeciesAbilities) -> Self {
        self.abilities = abilities;
        self
    }

    #[must_use]
    pub fn with_movement(mut self, movement: MovementDomain) -> Self {
        self.movement = movement;
        self
    }

    #[must_use]
    pub fn immobile(mut self) -> Self {
        self.immobile = true;
        self
    }

    pub fn has_ability(&self, ability: SpeciesAbilities) -> bool {
        self.abilities.contains(ability)
    }

    pub fn can_enter(&self, terrain: TerrainKind) -> bool {
        self.movement.allows(terrain)
    }

    /// Rejects templates whose combination of fields cannot be simulated.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesError::InvalidAbilityCombination`] when a melee species
    /// carries a missile, a ranged species has neither a missile nor ranged
    /// magic, or a mobile species has no movement domain.
    pub fn validate(&self) -> Result<(), SpeciesError> {
        let invalid = |reason| SpeciesError::InvalidAbilityCombination {
            sprite: self.sprite,
            reason,
        };
        if self.attack_range < 1 {
            return Err(invalid("attack range must be at least 1"));
        }
        if self.attack_range == 1 && self.missile != MissileType::None {
            return Err(invalid("melee species cannot fire missiles"));
        }
        if self.attack_range > 1
            && self.missile == MissileType::None
            && !self.has_ability(SpeciesAbilities::RANGED_MAGIC)
        {
            return Err(invalid("ranged species needs a missile or ranged magic"));
        }
        if !self.immobile && self.movement.is_empty() {
            return Err(invalid("mobile species needs a movement domain"));
        }
        Ok(())
    }
}

/// Errors raised while decoding species reference data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpeciesError {
    #[error("unknown species ability bits {0:#06x}")]
    UnknownAbilities(u16),

    #[error("species {sprite} has an invalid ability combination: {reason}")]
    InvalidAbilityCombination {
        sprite: SpriteIndex,
        reason: &'static str,
    },
}

impl GameError for SpeciesError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAbilities(_) => "SPECIES_UNKNOWN_ABILITIES",
            Self::InvalidAbilityCombination { .. } => "SPECIES_INVALID_ABILITY_COMBINATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat() -> SpeciesTemplate {
        SpeciesTemplate::new(
            SpeciesTemplate::key_sprite(0),
            "Rat",
            SpeciesStats {
                strength: 4,
                dexterity: 14,
                hit_points: 8,
                ..SpeciesStats::default()
            },
        )
    }

    #[test]
    fn key_sprite_steps_by_frame_count() {
        assert_eq!(SpeciesTemplate::key_sprite(0), SpriteIndex(320));
        assert_eq!(SpeciesTemplate::key_sprite(3), SpriteIndex(332));
    }

    #[test]
    fn unknown_ability_bit_is_rejected() {
        assert_eq!(
            SpeciesAbilities::from_raw(1 << 15),
            Err(SpeciesError::UnknownAbilities(1 << 15))
        );
        let ok = SpeciesAbilities::from_raw(0b1000_0000).unwrap();
        assert!(ok.contains(SpeciesAbilities::NO_CORPSE));
    }

    #[test]
    fn melee_species_with_missile_is_invalid() {
        let template = rat().with_ranged_attack(1, MissileType::Arrow);
        let err = template.validate().unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn ranged_magic_needs_no_missile() {
        let mage = rat()
            .with_ranged_attack(4, MissileType::None)
            .with_abilities(SpeciesAbilities::RANGED_MAGIC);
        assert!(mage.validate().is_ok());
        assert!(rat().with_ranged_attack(4, MissileType::None).validate().is_err());
    }

    #[test]
    fn movement_domains() {
        let land = MovementDomain::LAND;
        assert!(land.allows(TerrainKind::Floor));
        assert!(land.allows(TerrainKind::Sand));
        assert!(!land.allows(TerrainKind::Water));
        assert!(!land.allows(TerrainKind::Wall));

        let squid = MovementDomain::WATER;
        assert!(squid.allows(TerrainKind::Water));
        assert!(!squid.allows(TerrainKind::Floor));

        let ghost = MovementDomain::LAND | MovementDomain::PASSES_THROUGH_WALLS;
        assert!(ghost.allows(TerrainKind::Wall));
        assert!(!ghost.allows(TerrainKind::Void));
    }
}
