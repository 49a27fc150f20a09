//! FIFO log of everything a turn produced.

use std::collections::VecDeque;

use crate::error::{ErrorSeverity, GameError};
use crate::turn::{
    HasAttacker, HasDamageAmount, HasEnemyFocus, HasHitState, HasLoot, HasMovedPosition,
    HasOpponent, HasOutputString, HasTriggerPoint, OutputToConsole, ResultShape, ShapeKind,
    TurnResultData, TurnResultType,
};

/// One immutable record: a category tag plus its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnResult {
    kind: TurnResultType,
    data: TurnResultData,
}

impl TurnResult {
    pub fn new(kind: TurnResultType, data: impl Into<TurnResultData>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// A record with no payload.
    pub fn basic(kind: TurnResultType) -> Self {
        Self {
            kind,
            data: TurnResultData::Basic,
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self::new(
            TurnResultType::OutputToConsole,
            OutputToConsole { text: text.into() },
        )
    }

    pub fn kind(&self) -> TurnResultType {
        self.kind
    }

    pub fn data(&self) -> &TurnResultData {
        &self.data
    }

    pub fn shape(&self) -> ShapeKind {
        self.data.shape()
    }

    pub fn downcast<T: ResultShape>(&self) -> Option<&T> {
        T::from_data(&self.data)
    }

    pub fn as_damage_amount(&self) -> Option<&dyn HasDamageAmount> {
        self.data.as_damage_amount()
    }

    pub fn as_enemy_focus(&self) -> Option<&dyn HasEnemyFocus> {
        self.data.as_enemy_focus()
    }

    pub fn as_attacker(&self) -> Option<&dyn HasAttacker> {
        self.data.as_attacker()
    }

    pub fn as_opponent(&self) -> Option<&dyn HasOpponent> {
        self.data.as_opponent()
    }

    pub fn as_hit_state(&self) -> Option<&dyn HasHitState> {
        self.data.as_hit_state()
    }

    pub fn as_moved_position(&self) -> Option<&dyn HasMovedPosition> {
        self.data.as_moved_position()
    }

    pub fn as_output(&self) -> Option<&dyn HasOutputString> {
        self.data.as_output()
    }

    pub fn as_loot(&self) -> Option<&dyn HasLoot> {
        self.data.as_loot()
    }

    pub fn as_trigger_point(&self) -> Option<&dyn HasTriggerPoint> {
        self.data.as_trigger_point()
    }
}

/// Errors raised by the turn result log.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnResultError {
    #[error("turn result {kind} must carry {expected}, got {actual}")]
    ShapeMismatch {
        kind: TurnResultType,
        expected: ShapeKind,
        actual: ShapeKind,
    },
}

impl GameError for TurnResultError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { .. } => "TURN_RESULT_SHAPE_MISMATCH",
        }
    }
}

/// Queue of turn results, drained by presentation in push order.
///
/// Only [`TurnResults::pop`] consumes; every query leaves the queue intact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnResults {
    queue: VecDeque<TurnResult>,
}

impl TurnResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record after checking its shape against the tag.
    ///
    /// # Errors
    ///
    /// [`TurnResultError::ShapeMismatch`] when a pinned tag carries the wrong
    /// payload; the record is not enqueued.
    pub fn push(&mut self, result: TurnResult) -> Result<(), TurnResultError> {
        if let Some(expected) = result.kind.expected_shape() {
            let actual = result.shape();
            if actual != expected {
                return Err(TurnResultError::ShapeMismatch {
                    kind: result.kind,
                    expected,
                    actual,
                });
            }
        }
        tracing::trace!(target: "combat::turn", kind = %result.kind, "push");
        self.queue.push_back(result);
        Ok(())
    }

    pub fn push_output_to_console(&mut self, text: impl Into<String>) {
        self.queue.push_back(TurnResult::output(text));
    }

    pub fn pop(&mut self) -> Option<TurnResult> {
        self.queue.pop_front()
    }

    pub fn peek(&self) -> Option<&TurnResult> {
        self.queue.front()
    }

    pub fn has_result(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnResult> {
        self.queue.iter()
    }

    pub fn contains_kind(&self, kind: TurnResultType) -> bool {
        self.queue.iter().any(|result| result.kind == kind)
    }

    pub fn contains_result_of_type<T: ResultShape>(&self) -> bool {
        self.queue.iter().any(|result| result.shape() == T::SHAPE)
    }

    pub fn first_result_of_type<T: ResultShape>(&self) -> Option<&T> {
        self.queue.iter().find_map(TurnResult::downcast::<T>)
    }

    /// Drains every queued record in push order.
    pub fn drain(&mut self) -> impl Iterator<Item = TurnResult> + '_ {
        self.queue.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Position, UnitId};
    use crate::turn::{EnemyFocused, EnemyMoved, UnitRef};

    fn goblin() -> UnitRef {
        UnitRef::new(UnitId(3), "goblin", Position::new(1, 1))
    }

    fn moved() -> TurnResult {
        TurnResult::new(
            TurnResultType::CombatEnemyMoved,
            EnemyMoved {
                enemy: goblin(),
                from: Position::new(1, 1),
                to: Position::new(2, 1),
            },
        )
    }

    #[test]
    fn pops_in_push_order() {
        let mut log = TurnResults::new();
        log.push_output_to_console("first");
        log.push(moved()).unwrap();
        log.push(TurnResult::basic(TurnResultType::PassTurn)).unwrap();

        assert_eq!(log.len(), 3);
        assert_eq!(log.pop().unwrap().kind(), TurnResultType::OutputToConsole);
        assert_eq!(log.pop().unwrap().kind(), TurnResultType::CombatEnemyMoved);
        assert_eq!(log.pop().unwrap().kind(), TurnResultType::PassTurn);
        assert!(log.pop().is_none());
    }

    #[test]
    fn mismatched_shape_is_rejected_and_not_enqueued() {
        let mut log = TurnResults::new();
        let wrong = TurnResult::new(
            TurnResultType::CombatEnemyMoved,
            EnemyFocused { enemy: goblin() },
        );
        let err = log.push(wrong).unwrap_err();
        assert_eq!(
            err,
            TurnResultError::ShapeMismatch {
                kind: TurnResultType::CombatEnemyMoved,
                expected: ShapeKind::EnemyMoved,
                actual: ShapeKind::EnemyFocused,
            }
        );
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(!log.has_result());
    }

    #[test]
    fn basic_payload_fails_pinned_tag() {
        let mut log = TurnResults::new();
        assert!(log.push(TurnResult::basic(TurnResultType::DamageFromAcid)).is_err());
        assert!(log.push(TurnResult::basic(TurnResultType::CombatEnemyEscaped)).is_ok());
    }

    #[test]
    fn queries_do_not_consume() {
        let mut log = TurnResults::new();
        log.push(moved()).unwrap();

        assert!(log.contains_result_of_type::<EnemyMoved>());
        assert!(!log.contains_result_of_type::<EnemyFocused>());
        assert!(log.contains_kind(TurnResultType::CombatEnemyMoved));
        let first = log.first_result_of_type::<EnemyMoved>().unwrap();
        assert_eq!(first.to, Position::new(2, 1));
        assert_eq!(log.peek().map(TurnResult::kind), Some(TurnResultType::CombatEnemyMoved));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn capability_views() {
        let result = moved();
        assert_eq!(result.as_enemy_focus().unwrap().enemy().name, "goblin");
        assert_eq!(result.as_moved_position().unwrap().moved_to(), Position::new(2, 1));
        assert!(result.as_damage_amount().is_none());
        assert!(result.as_trigger_point().is_none());

        let output = TurnResult::output("hello");
        assert_eq!(output.as_output().unwrap().output(), "hello");
    }
}
