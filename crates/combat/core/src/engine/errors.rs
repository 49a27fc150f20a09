//! Error type surfaced by the encounter.

use crate::env::{OracleError, SpeciesError};
use crate::error::{ErrorSeverity, GameError};
use crate::loot::LootError;
use crate::state::UnitId;
use crate::turn::TurnResultError;

/// Errors surfaced while running an encounter.
///
/// Subsystem errors are wrapped unchanged so their severity and code survive.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error(transparent)]
    Loot(#[from] LootError),

    #[error(transparent)]
    TurnResult(#[from] TurnResultError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Species(#[from] SpeciesError),

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {attacker} cannot attack {target}")]
    NotAnOpponent { attacker: UnitId, target: UnitId },

    #[error("unit {unit} is not a valid target for {action}")]
    InvalidTarget { unit: UnitId, action: &'static str },

    #[error("unit {target} is out of reach of {actor}")]
    OutOfReach { actor: UnitId, target: UnitId },

    #[error("unit {0} cannot act")]
    InactiveUnit(UnitId),
}

impl CombatError {
    pub(crate) fn invalid_target(unit: UnitId, action: &'static str) -> Self {
        Self::InvalidTarget { unit, action }
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Loot(err) => err.severity(),
            Self::TurnResult(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
            Self::Species(err) => err.severity(),
            Self::UnitNotFound(_)
            | Self::NotAnOpponent { .. }
            | Self::InvalidTarget { .. }
            | Self::InactiveUnit(_) => ErrorSeverity::Validation,
            Self::OutOfReach { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Loot(err) => err.error_code(),
            Self::TurnResult(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
            Self::Species(err) => err.error_code(),
            Self::UnitNotFound(_) => "COMBAT_UNIT_NOT_FOUND",
            Self::NotAnOpponent { .. } => "COMBAT_NOT_AN_OPPONENT",
            Self::InvalidTarget { .. } => "COMBAT_INVALID_TARGET",
            Self::OutOfReach { .. } => "COMBAT_OUT_OF_REACH",
            Self::InactiveUnit(_) => "COMBAT_INACTIVE_UNIT",
        }
    }
}
