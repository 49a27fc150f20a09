//! Payload shapes attached to turn results, and the capability views over them.

use crate::combat::HitState;
use crate::env::{InventoryItem, MissileType};
use crate::loot::{TrapHit, TrapKind};
use crate::state::{CharacterStats, Position, UnitId};

/// Snapshot of a unit at the moment a record was made.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitRef {
    pub id: UnitId,
    pub name: String,
    pub position: Position,
}

impl UnitRef {
    pub fn new(id: UnitId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputToConsole {
    pub text: String,
}

/// One swing or shot and how it landed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackerResult {
    pub attacker: UnitRef,
    pub opponent: UnitRef,
    pub missile: MissileType,
    pub hit_state: HitState,
    pub damage: u32,
    /// Where a missed ranged attack came down.
    pub missed_point: Option<Position>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTakesDamage {
    pub unit: UnitRef,
    /// Stats after the damage was applied.
    pub stats: CharacterStats,
    pub damage: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SinglePlayerCharacterAffected {
    pub unit: UnitRef,
    pub stats: CharacterStats,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyFocused {
    pub enemy: UnitRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyMoved {
    pub enemy: UnitRef,
    pub from: Position,
    pub to: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatPlayerMoved {
    pub player: UnitRef,
    pub from: Position,
    pub to: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootDropped {
    /// The unit whose death left the loot behind.
    pub enemy: UnitRef,
    pub loot: UnitRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapTriggered {
    pub source: UnitRef,
    pub trap: TrapKind,
    pub trigger_point: Position,
    pub hits: Vec<TrapHit>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTaken {
    pub loot: UnitRef,
    pub item: InventoryItem,
}

/// Payload of a turn result.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnResultData {
    Basic,
    OutputToConsole(OutputToConsole),
    Attacker(AttackerResult),
    UnitTakesDamage(UnitTakesDamage),
    SinglePlayerCharacterAffected(SinglePlayerCharacterAffected),
    EnemyFocused(EnemyFocused),
    EnemyMoved(EnemyMoved),
    CombatPlayerMoved(CombatPlayerMoved),
    LootDropped(LootDropped),
    TrapTriggered(TrapTriggered),
    ItemTaken(ItemTaken),
}

/// Discriminant of [`TurnResultData`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ShapeKind {
    Basic,
    OutputToConsole,
    Attacker,
    UnitTakesDamage,
    SinglePlayerCharacterAffected,
    EnemyFocused,
    EnemyMoved,
    CombatPlayerMoved,
    LootDropped,
    TrapTriggered,
    ItemTaken,
}

impl TurnResultData {
    pub fn shape(&self) -> ShapeKind {
        match self {
            Self::Basic => ShapeKind::Basic,
            Self::OutputToConsole(_) => ShapeKind::OutputToConsole,
            Self::Attacker(_) => ShapeKind::Attacker,
            Self::UnitTakesDamage(_) => ShapeKind::UnitTakesDamage,
            Self::SinglePlayerCharacterAffected(_) => ShapeKind::SinglePlayerCharacterAffected,
            Self::EnemyFocused(_) => ShapeKind::EnemyFocused,
            Self::EnemyMoved(_) => ShapeKind::EnemyMoved,
            Self::CombatPlayerMoved(_) => ShapeKind::CombatPlayerMoved,
            Self::LootDropped(_) => ShapeKind::LootDropped,
            Self::TrapTriggered(_) => ShapeKind::TrapTriggered,
            Self::ItemTaken(_) => ShapeKind::ItemTaken,
        }
    }
}

/// A concrete payload struct that can be looked up by type.
pub trait ResultShape: Sized {
    const SHAPE: ShapeKind;

    fn from_data(data: &TurnResultData) -> Option<&Self>;
}

macro_rules! result_shape {
    ($($shape:ident),* $(,)?) => {
        $(
            impl ResultShape for $shape {
                const SHAPE: ShapeKind = ShapeKind::$shape;

                fn from_data(data: &TurnResultData) -> Option<&Self> {
                    match data {
                        TurnResultData::$shape(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$shape> for TurnResultData {
                fn from(inner: $shape) -> Self {
                    TurnResultData::$shape(inner)
                }
            }
        )*
    };
}

result_shape!(
    OutputToConsole,
    UnitTakesDamage,
    SinglePlayerCharacterAffected,
    EnemyFocused,
    EnemyMoved,
    CombatPlayerMoved,
    LootDropped,
    TrapTriggered,
    ItemTaken,
);

impl ResultShape for AttackerResult {
    const SHAPE: ShapeKind = ShapeKind::Attacker;

    fn from_data(data: &TurnResultData) -> Option<&Self> {
        match data {
            TurnResultData::Attacker(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<AttackerResult> for TurnResultData {
    fn from(inner: AttackerResult) -> Self {
        TurnResultData::Attacker(inner)
    }
}

// ---------------------------------------------------------------------------
// Capability views
// ---------------------------------------------------------------------------

pub trait HasDamageAmount {
    fn damage_amount(&self) -> u32;
}

pub trait HasEnemyFocus {
    fn enemy(&self) -> &UnitRef;
}

pub trait HasAttacker {
    fn attacker(&self) -> &UnitRef;
    fn missile(&self) -> MissileType;
}

pub trait HasOpponent {
    fn opponent(&self) -> &UnitRef;
}

pub trait HasHitState {
    fn hit_state(&self) -> HitState;
}

pub trait HasMovedPosition {
    fn moved_from(&self) -> Position;
    fn moved_to(&self) -> Position;
}

pub trait HasOutputString {
    fn output(&self) -> &str;
}

pub trait HasLoot {
    fn loot(&self) -> &UnitRef;
}

pub trait HasTriggerPoint {
    fn trigger_point(&self) -> Position;
}

impl HasOutputString for OutputToConsole {
    fn output(&self) -> &str {
        &self.text
    }
}

impl HasAttacker for AttackerResult {
    fn attacker(&self) -> &UnitRef {
        &self.attacker
    }

    fn missile(&self) -> MissileType {
        self.missile
    }
}

impl HasHitState for AttackerResult {
    fn hit_state(&self) -> HitState {
        self.hit_state
    }
}

impl HasDamageAmount for AttackerResult {
    fn damage_amount(&self) -> u32 {
        self.damage
    }
}

impl HasOpponent for AttackerResult {
    fn opponent(&self) -> &UnitRef {
        &self.opponent
    }
}

impl HasTriggerPoint for AttackerResult {
    fn trigger_point(&self) -> Position {
        self.missed_point.unwrap_or(self.opponent.position)
    }
}

impl HasDamageAmount for UnitTakesDamage {
    fn damage_amount(&self) -> u32 {
        self.damage
    }
}

impl HasEnemyFocus for EnemyFocused {
    fn enemy(&self) -> &UnitRef {
        &self.enemy
    }
}

impl HasEnemyFocus for EnemyMoved {
    fn enemy(&self) -> &UnitRef {
        &self.enemy
    }
}

impl HasMovedPosition for EnemyMoved {
    fn moved_from(&self) -> Position {
        self.from
    }

    fn moved_to(&self) -> Position {
        self.to
    }
}

impl HasMovedPosition for CombatPlayerMoved {
    fn moved_from(&self) -> Position {
        self.from
    }

    fn moved_to(&self) -> Position {
        self.to
    }
}

impl HasEnemyFocus for LootDropped {
    fn enemy(&self) -> &UnitRef {
        &self.enemy
    }
}

impl HasLoot for LootDropped {
    fn loot(&self) -> &UnitRef {
        &self.loot
    }
}

impl HasLoot for TrapTriggered {
    fn loot(&self) -> &UnitRef {
        &self.source
    }
}

impl HasTriggerPoint for TrapTriggered {
    fn trigger_point(&self) -> Position {
        self.trigger_point
    }
}

impl HasLoot for ItemTaken {
    fn loot(&self) -> &UnitRef {
        &self.loot
    }
}

impl TurnResultData {
    pub fn as_damage_amount(&self) -> Option<&dyn HasDamageAmount> {
        match self {
            Self::Attacker(inner) => Some(inner),
            Self::UnitTakesDamage(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_enemy_focus(&self) -> Option<&dyn HasEnemyFocus> {
        match self {
            Self::EnemyFocused(inner) => Some(inner),
            Self::EnemyMoved(inner) => Some(inner),
            Self::LootDropped(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_attacker(&self) -> Option<&dyn HasAttacker> {
        match self {
            Self::Attacker(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_opponent(&self) -> Option<&dyn HasOpponent> {
        match self {
            Self::Attacker(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_hit_state(&self) -> Option<&dyn HasHitState> {
        match self {
            Self::Attacker(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_moved_position(&self) -> Option<&dyn HasMovedPosition> {
        match self {
            Self::EnemyMoved(inner) => Some(inner),
            Self::CombatPlayerMoved(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_output(&self) -> Option<&dyn HasOutputString> {
        match self {
            Self::OutputToConsole(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_loot(&self) -> Option<&dyn HasLoot> {
        match self {
            Self::LootDropped(inner) => Some(inner),
            Self::TrapTriggered(inner) => Some(inner),
            Self::ItemTaken(inner) => Some(inner),
            _ => None,
        }
    }

    /// Trap trigger points, and the landing point of missed ranged attacks.
    pub fn as_trigger_point(&self) -> Option<&dyn HasTriggerPoint> {
        match self {
            Self::TrapTriggered(inner) => Some(inner),
            Self::Attacker(inner) if inner.missed_point.is_some() => Some(inner),
            _ => None,
        }
    }
}
