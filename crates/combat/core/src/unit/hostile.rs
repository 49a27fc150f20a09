use std::sync::Arc;

use crate::config::CombatConfig;
use crate::env::{MissileType, MovementDomain, SpeciesAbilities, SpeciesTemplate};
use crate::state::{CharacterStats, Position};
use crate::unit::{Attackable, Navigable, UnitCore};

/// An enemy instance spawned from a shared species template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostileUnit {
    pub core: UnitCore,
    template: Arc<SpeciesTemplate>,
    fleeing: bool,
}

impl HostileUnit {
    /// Spawns at level 1 with the template's attributes and full hit points.
    pub fn new(template: Arc<SpeciesTemplate>, position: Position) -> Self {
        let defaults = template.stats;
        let stats = CharacterStats::new(defaults.hit_points)
            .with_attributes(defaults.strength, defaults.dexterity, defaults.intelligence)
            .with_level(1);
        Self {
            core: UnitCore::new(position, stats),
            template,
            fleeing: false,
        }
    }

    pub fn species(&self) -> &SpeciesTemplate {
        &self.template
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn has_ability(&self, ability: SpeciesAbilities) -> bool {
        self.template.has_ability(ability)
    }

    pub fn missile(&self) -> MissileType {
        self.template.missile
    }

    /// Once set, the unit keeps trying to run for the rest of the combat.
    pub fn is_fleeing(&self) -> bool {
        self.fleeing
    }

    pub fn mark_fleeing(&mut self) {
        self.fleeing = true;
    }
}

impl Attackable for HostileUnit {
    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut UnitCore {
        &mut self.core
    }

    fn defense(&self) -> i32 {
        self.template.stats.armour
    }

    fn experience_reward(&self) -> u32 {
        self.template.experience
    }

    fn attack_range(&self) -> i32 {
        self.template.attack_range
    }

    fn max_damage(&self, _config: &CombatConfig) -> i32 {
        self.template.stats.damage
    }
}

impl Navigable for HostileUnit {
    fn position(&self) -> Position {
        self.core.position
    }

    fn set_position(&mut self, position: Position) {
        self.core.position = position;
    }

    fn movement(&self) -> MovementDomain {
        self.template.movement
    }

    fn is_immobile(&self) -> bool {
        self.template.immobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{SpeciesStats, SpriteIndex};

    #[test]
    fn spawns_from_template_defaults() {
        let template = Arc::new(
            SpeciesTemplate::new(
                SpriteIndex(448),
                "Troll",
                SpeciesStats {
                    strength: 20,
                    dexterity: 12,
                    intelligence: 6,
                    armour: 4,
                    damage: 12,
                    hit_points: 60,
                    ..SpeciesStats::default()
                },
            )
            .with_experience(14),
        );
        let troll = HostileUnit::new(Arc::clone(&template), Position::new(4, 4));
        let stats = troll.stats();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.current_hp(), 60);
        assert_eq!(stats.maximum_hp(), 60);
        assert_eq!(stats.strength, 20);
        assert_eq!(troll.defense(), 4);
        assert_eq!(troll.experience_reward(), 14);
        assert!(!troll.is_fleeing());
        assert_eq!(Arc::strong_count(&template), 2);
    }
}
