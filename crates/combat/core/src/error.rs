//! Common error infrastructure for combat-core.
//!
//! Domain errors (`LootError`, `SpeciesError`, `TurnResultError`, ...) live next to
//! the subsystem that raises them; this module only holds the shared
//! classification used across all of them.
//!
//! Two classes of failure exist in the combat rules:
//!
//! - **Recoverable outcomes** are plain data, never errors: an unreachable goal
//!   is `None`, a missed attack is `HitState::Missed`, a blocked step is
//!   `MoveOutcome::Blocked`.
//! - **Programmer errors** (an unknown trap code, an empty loot candidate list,
//!   a turn result pushed with the wrong shape) are `Err` values classified as
//!   [`ErrorSeverity::Fatal`]. Callers must propagate them, never swallow them.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative action.
    ///
    /// Examples: target out of reach, chest is locked
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unit not found, target is not an opponent
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,

    /// Reference data or rule tables are corrupt; the encounter cannot continue.
    ///
    /// Examples: unknown trap code, no inventory candidates for a sprite
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
