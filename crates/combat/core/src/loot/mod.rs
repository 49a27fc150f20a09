//! Non-attacking map objects: traps, item stacks and the factory that builds
//! them from sprite codes.
mod factory;
mod item_stack;
mod non_attacking;
pub mod odds;
mod trap;

pub use factory::{
    BLOOD_SPATTER, CHEST, ChestSetup, DEAD_BODY, MOONSTONE, NonAttackingUnitFactory, WHIRLPOOL,
};
pub use item_stack::ItemStack;
pub use non_attacking::{
    ElementalField, MoonPhase, NonAttackingKind, NonAttackingUnit, OpenOutcome, SearchOutcome,
};
pub use trap::{TrapComplexity, TrapEffect, TrapHit, TrapKind, TrapOutcome, spring_trap};

use crate::env::{OracleError, SpriteIndex};
use crate::error::{ErrorSeverity, GameError};
use crate::state::UnitId;

/// Errors raised by the trap and loot subsystem.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LootError {
    #[error("unknown trap code {0}")]
    UnknownTrap(u8),

    #[error("no inventory references for sprite {0}")]
    NoLootCandidates(SpriteIndex),

    #[error("popped an empty item stack")]
    EmptyItemStack,

    #[error("items have not been exposed yet")]
    ItemsNotExposed,

    #[error("trap target {0} is not in the party")]
    TargetNotInParty(UnitId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for LootError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownTrap(_) | Self::NoLootCandidates(_) | Self::EmptyItemStack => {
                ErrorSeverity::Fatal
            }
            Self::ItemsNotExposed => ErrorSeverity::Recoverable,
            Self::TargetNotInParty(_) => ErrorSeverity::Validation,
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTrap(_) => "LOOT_UNKNOWN_TRAP",
            Self::NoLootCandidates(_) => "LOOT_NO_CANDIDATES",
            Self::EmptyItemStack => "LOOT_EMPTY_ITEM_STACK",
            Self::ItemsNotExposed => "LOOT_ITEMS_NOT_EXPOSED",
            Self::TargetNotInParty(_) => "LOOT_TARGET_NOT_IN_PARTY",
            Self::Oracle(err) => err.error_code(),
        }
    }
}
