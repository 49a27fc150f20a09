//! Turn result log.
//!
//! The simulation never talks to presentation directly. Every observable
//! event (a move, a swing, a trap going off, loot appearing) becomes a
//! [`TurnResult`] pushed onto [`TurnResults`]; the UI drains the queue in
//! order and renders each record from its tag and payload.
mod data;
mod kind;
mod log;

pub use data::{
    AttackerResult, CombatPlayerMoved, EnemyFocused, EnemyMoved, HasAttacker, HasDamageAmount,
    HasEnemyFocus, HasHitState, HasLoot, HasMovedPosition, HasOpponent, HasOutputString,
    HasTriggerPoint, ItemTaken, LootDropped, OutputToConsole, ResultShape, ShapeKind,
    SinglePlayerCharacterAffected, TrapTriggered, TurnResultData, UnitRef, UnitTakesDamage,
};
pub use kind::TurnResultType;
pub use log::{TurnResult, TurnResultError, TurnResults};
