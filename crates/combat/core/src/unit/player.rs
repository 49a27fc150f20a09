use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::env::{CombatItemReference, MissileType, MovementDomain};
use crate::state::{CharacterStats, Position};
use crate::unit::{Attackable, Navigable, UnitCore};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CharacterClass {
    Avatar,
    Fighter,
    Bard,
    Mage,
}

const ARMOUR_SLOTS: usize = 4;

/// Gear a party member brings into combat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<CombatItemReference>,
    armour: ArrayVec<CombatItemReference, ARMOUR_SLOTS>,
}

impl Equipment {
    /// Helm, shield, body armour and ring.
    pub const MAX_ARMOUR: usize = ARMOUR_SLOTS;

    pub fn with_weapon(weapon: CombatItemReference) -> Self {
        Self {
            weapon: Some(weapon),
            ..Self::default()
        }
    }

    /// Adds an armour piece. Hands the piece back when every slot is taken.
    pub fn equip_armour(&mut self, piece: CombatItemReference) -> Result<(), CombatItemReference> {
        self.armour.try_push(piece).map_err(|err| err.element())
    }

    pub fn armour(&self) -> &[CombatItemReference] {
        &self.armour
    }

    pub fn defense(&self) -> i32 {
        let weapon = self.weapon.as_ref().map_or(0, |weapon| weapon.defense);
        weapon + self.armour.iter().map(|piece| piece.defense).sum::<i32>()
    }

    pub fn attack(&self, config: &CombatConfig) -> i32 {
        self.weapon
            .as_ref()
            .map_or(config.bare_hand_attack, |weapon| weapon.attack)
    }

    pub fn range(&self) -> i32 {
        self.weapon.as_ref().map_or(1, |weapon| weapon.range.max(1))
    }

    pub fn missile(&self) -> MissileType {
        self.weapon
            .as_ref()
            .map_or(MissileType::None, |weapon| weapon.missile)
    }
}

/// A party member on the combat map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerUnit {
    pub core: UnitCore,
    pub name: String,
    pub class: CharacterClass,
    /// Slot of the character in the party roster.
    pub roster_index: usize,
    pub equipment: Equipment,
}

impl PlayerUnit {
    pub fn new(
        name: impl Into<String>,
        class: CharacterClass,
        roster_index: usize,
        stats: CharacterStats,
        position: Position,
    ) -> Self {
        Self {
            core: UnitCore::new(position, stats),
            name: name.into(),
            class,
            roster_index,
            equipment: Equipment::default(),
        }
    }

    #[must_use]
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }
}

impl Attackable for PlayerUnit {
    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut UnitCore {
        &mut self.core
    }

    fn defense(&self) -> i32 {
        self.equipment.defense()
    }

    fn experience_reward(&self) -> u32 {
        0
    }

    fn attack_range(&self) -> i32 {
        self.equipment.range()
    }

    fn max_damage(&self, config: &CombatConfig) -> i32 {
        self.equipment.attack(config)
    }
}

impl Navigable for PlayerUnit {
    fn position(&self) -> Position {
        self.core.position
    }

    fn set_position(&mut self, position: Position) {
        self.core.position = position;
    }

    fn movement(&self) -> MovementDomain {
        MovementDomain::LAND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate() -> CombatItemReference {
        CombatItemReference {
            name: "plate".into(),
            attack: 0,
            defense: 5,
            range: 1,
            missile: MissileType::None,
        }
    }

    #[test]
    fn bare_hands_use_configured_attack() {
        let config = CombatConfig::default();
        let equipment = Equipment::default();
        assert_eq!(equipment.attack(&config), 3);
        assert_eq!(equipment.range(), 1);
    }

    #[test]
    fn armour_slots_are_bounded() {
        let mut equipment = Equipment::default();
        for _ in 0..Equipment::MAX_ARMOUR {
            assert!(equipment.equip_armour(plate()).is_ok());
        }
        assert_eq!(equipment.equip_armour(plate()), Err(plate()));
        assert_eq!(equipment.defense(), 20);
    }

    #[test]
    fn bow_extends_reach() {
        let bow = CombatItemReference {
            name: "bow".into(),
            attack: 10,
            defense: 0,
            range: 3,
            missile: MissileType::Arrow,
        };
        let player = PlayerUnit::new(
            "Iolo",
            CharacterClass::Bard,
            1,
            CharacterStats::new(40),
            Position::ORIGIN,
        )
        .with_equipment(Equipment::with_weapon(bow));
        assert!(player.can_reach_for_attack(Position::new(3, -2)));
        assert!(!player.can_reach_for_attack(Position::new(4, 0)));
        assert_eq!(player.max_damage(&CombatConfig::default()), 10);
    }
}
