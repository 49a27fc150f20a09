//! Encounter orchestration.
//!
//! [`CombatEncounter`] is the only place where units, rules and the turn
//! result log meet. Each player action or enemy turn runs to completion and
//! leaves its observable effects in [`TurnResults`](crate::turn::TurnResults).
mod encounter;
mod errors;

pub use encounter::{CombatEncounter, MoveOutcome, NavigationMode};
pub use errors::CombatError;
