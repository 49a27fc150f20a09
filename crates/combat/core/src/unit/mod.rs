//! Combat units: party members, hostiles and non-attacking map objects.
//!
//! [`CombatUnit`] is a closed sum over the three variants. Fields every variant
//! has live in [`UnitCore`]; behaviour that only some variants support is
//! reached through the capability traits in [`capability`].
pub mod capability;
mod hostile;
mod player;

pub use capability::{Attackable, Lootable, Navigable};
pub use hostile::HostileUnit;
pub use player::{CharacterClass, Equipment, PlayerUnit};

use crate::config::CombatConfig;
use crate::env::{MovementDomain, RngOracle};
use crate::loot::{ItemStack, NonAttackingUnit, TrapKind};
use crate::state::{CharacterStats, CombatCounters, Position, UnitId};

/// State shared by every unit variant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitCore {
    pub position: Position,
    pub floor: i8,
    pub stats: CharacterStats,
    pub counters: CombatCounters,
    /// Last unit this one swung at. Non-owning; resolve through the encounter.
    pub previous_target: Option<UnitId>,
    /// Left the map by fleeing off the edge.
    pub escaped: bool,
}

impl UnitCore {
    pub fn new(position: Position, stats: CharacterStats) -> Self {
        Self {
            position,
            stats,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombatUnit {
    Player(PlayerUnit),
    Hostile(HostileUnit),
    NonAttacking(NonAttackingUnit),
}

impl CombatUnit {
    pub fn name(&self) -> String {
        match self {
            Self::Player(player) => player.name.clone(),
            Self::Hostile(hostile) => hostile.name().to_owned(),
            Self::NonAttacking(object) => object.name(),
        }
    }

    /// Dead, escaped and used-up units stay in the arena but take no part.
    pub fn is_active(&self) -> bool {
        match self {
            Self::Player(_) | Self::Hostile(_) => {
                let core = self.core();
                core.stats.is_alive() && !core.escaped
            }
            Self::NonAttacking(object) => object.is_active(),
        }
    }

    /// Whether this unit fights on the other side from `other`.
    pub fn is_opponent_of(&self, other: &CombatUnit) -> bool {
        matches!(
            (self, other),
            (Self::Player(_), Self::Hostile(_)) | (Self::Hostile(_), Self::Player(_))
        )
    }

    /// Blocks movement into its cell. Walk-through objects (fields, loose
    /// items, hidden loot) do not.
    pub fn blocks_movement(&self) -> bool {
        match self {
            Self::Player(_) | Self::Hostile(_) => self.is_active(),
            Self::NonAttacking(object) => {
                object.is_active() && matches!(object.kind(), crate::loot::NonAttackingKind::Chest)
            }
        }
    }

    pub fn as_player(&self) -> Option<&PlayerUnit> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerUnit> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_hostile(&self) -> Option<&HostileUnit> {
        match self {
            Self::Hostile(hostile) => Some(hostile),
            _ => None,
        }
    }

    pub fn as_hostile_mut(&mut self) -> Option<&mut HostileUnit> {
        match self {
            Self::Hostile(hostile) => Some(hostile),
            _ => None,
        }
    }

    pub fn as_non_attacking(&self) -> Option<&NonAttackingUnit> {
        match self {
            Self::NonAttacking(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_non_attacking_mut(&mut self) -> Option<&mut NonAttackingUnit> {
        match self {
            Self::NonAttacking(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_lootable(&self) -> Option<&dyn Lootable> {
        self.as_non_attacking().map(|object| object as &dyn Lootable)
    }
}

impl Attackable for CombatUnit {
    fn core(&self) -> &UnitCore {
        match self {
            Self::Player(player) => &player.core,
            Self::Hostile(hostile) => &hostile.core,
            Self::NonAttacking(object) => &object.core,
        }
    }

    fn core_mut(&mut self) -> &mut UnitCore {
        match self {
            Self::Player(player) => &mut player.core,
            Self::Hostile(hostile) => &mut hostile.core,
            Self::NonAttacking(object) => &mut object.core,
        }
    }

    fn defense(&self) -> i32 {
        match self {
            Self::Player(player) => player.defense(),
            Self::Hostile(hostile) => hostile.defense(),
            Self::NonAttacking(_) => 0,
        }
    }

    fn experience_reward(&self) -> u32 {
        match self {
            Self::Player(player) => player.experience_reward(),
            Self::Hostile(hostile) => hostile.experience_reward(),
            Self::NonAttacking(_) => 0,
        }
    }

    fn attack_range(&self) -> i32 {
        match self {
            Self::Player(player) => player.attack_range(),
            Self::Hostile(hostile) => hostile.attack_range(),
            Self::NonAttacking(_) => 0,
        }
    }

    fn max_damage(&self, config: &CombatConfig) -> i32 {
        match self {
            Self::Player(player) => player.max_damage(config),
            Self::Hostile(hostile) => hostile.max_damage(config),
            Self::NonAttacking(_) => 0,
        }
    }

    fn is_attackable(&self) -> bool {
        !matches!(self, Self::NonAttacking(_))
    }
}

impl Navigable for CombatUnit {
    fn position(&self) -> Position {
        self.core().position
    }

    fn set_position(&mut self, position: Position) {
        self.core_mut().position = position;
    }

    fn movement(&self) -> MovementDomain {
        match self {
            Self::Player(player) => player.movement(),
            Self::Hostile(hostile) => hostile.movement(),
            Self::NonAttacking(_) => MovementDomain::empty(),
        }
    }

    fn is_immobile(&self) -> bool {
        match self {
            Self::Player(_) => false,
            Self::Hostile(hostile) => hostile.is_immobile(),
            Self::NonAttacking(_) => true,
        }
    }
}

impl Lootable for NonAttackingUnit {
    fn items(&self) -> Option<&ItemStack> {
        NonAttackingUnit::items(self)
    }

    fn trap(&self) -> TrapKind {
        NonAttackingUnit::trap(self)
    }

    fn is_openable(&self) -> bool {
        NonAttackingUnit::is_openable(self)
    }

    fn is_searchable(&self) -> bool {
        NonAttackingUnit::is_searchable(self)
    }

    fn exposes_items_on_open(&self) -> bool {
        NonAttackingUnit::exposes_items_on_open(self)
    }

    fn exposes_items_on_search(&self) -> bool {
        NonAttackingUnit::exposes_items_on_search(self)
    }

    fn does_trigger_trap(&self, dexterity: i32, rng: &mut dyn RngOracle) -> bool {
        NonAttackingUnit::does_trigger_trap(self, dexterity, rng)
    }
}
