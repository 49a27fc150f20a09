use crate::turn::ShapeKind;

/// Category tag of a turn result.
///
/// The tag says what happened; the attached [`TurnResultData`](crate::turn::TurnResultData)
/// carries the details. Tags whose payload presentation code relies on are
/// pinned to a shape by [`TurnResultType::expected_shape`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TurnResultType {
    Ignore,
    PassTurn,
    AdvanceClockNoComputation,
    CombatMapLoaded,
    OutputToConsole,

    // Status and damage over time
    DamageOverTimePoisoned,
    DamageOverTimeBurning,
    DamageFromAcid,
    DamageFromExplosion,
    DamageFromElectricity,
    PlayerCharacterPoisoned,
    PlayerCharacterAsleep,

    // Player actions
    ActionMovedCombatPlayerOnCombatMap,
    ActionMoveBlocked,
    ActionAttackNothingToAttack,
    ActionAttackCombatMapEnemy,
    ActionOpened,
    ActionOpenedTrapped,
    ActionOpenedLocked,
    ActionOpenNothingToOpen,
    ActionGetMoonstone,
    ActionGetExposedItem,
    ActionGetStackableItem,
    ActionGetNothingToGet,
    ActionSearchRemoveComplex,
    ActionSearchRemoveSimple,
    ActionSearchTriggerComplexTrap,
    ActionSearchTriggerSimpleTrap,
    ActionSearchNoTrap,
    ActionSearchThingDisappears,
    ActionSearchNothingFound,
    ActionSearchFoundItems,

    // Enemy turn
    CombatEnemyEscaped,
    CombatEnemyToAttackRequiresInput,
    CombatEnemyIsSleeping,
    CombatEnemyIsFleeing,
    CombatEnemyWantsToFleeButNoPath,
    CombatEnemyMoved,
    CombatEnemyBeginsAttack,
    CombatEnemyMissedTarget,

    // Player combat
    CombatCombatPlayerTriedToAttackSelf,
    CombatCombatPlayerTriedToAttackNothing,
    CombatCombatPlayerRangedAttackBlocked,
    CombatCombatPlayerMoved,
    CombatCombatPlayerBeginsAttack,

    // Attack outcomes
    CombatResultEnemyGrazedTarget,
    CombatResultCombatPlayerGrazedTarget,
    CombatResultCombatPlayerMissedRangedAttack,
    CombatResultEnemyMissedRangedAttack,
    CombatResultEnemyMissedButHit,
    CombatResultCombatPlayerMissedButHit,
    CombatResultMissedCombatPlayerMelee,
    CombatResultMissedEnemyMelee,
    CombatResultCombatPlayerReceivedDamage,
    CombatResultHitAndEnemyReceivedDamage,
    CombatResultCombatPlayerKilled,
    CombatResultEnemyKilled,
    CombatLootDropped,
}

impl TurnResultType {
    /// Shape a record of this tag must carry, if the tag is pinned.
    pub const fn expected_shape(self) -> Option<ShapeKind> {
        match self {
            Self::DamageOverTimePoisoned | Self::DamageOverTimeBurning | Self::DamageFromAcid => {
                Some(ShapeKind::UnitTakesDamage)
            }
            Self::PlayerCharacterPoisoned | Self::PlayerCharacterAsleep => {
                Some(ShapeKind::SinglePlayerCharacterAffected)
            }
            Self::OutputToConsole => Some(ShapeKind::OutputToConsole),
            Self::CombatEnemyMoved => Some(ShapeKind::EnemyMoved),
            Self::CombatLootDropped => Some(ShapeKind::LootDropped),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn pinned_tags() {
        let pinned: Vec<_> = TurnResultType::iter()
            .filter(|kind| kind.expected_shape().is_some())
            .collect();
        assert_eq!(pinned.len(), 8);
        assert_eq!(
            TurnResultType::CombatEnemyMoved.expected_shape(),
            Some(ShapeKind::EnemyMoved)
        );
        assert_eq!(TurnResultType::CombatEnemyEscaped.expected_shape(), None);
    }

    #[test]
    fn tag_names_are_snake_case() {
        assert_eq!(TurnResultType::CombatLootDropped.as_ref(), "combat_loot_dropped");
        assert_eq!(
            TurnResultType::from_str("damage_from_acid"),
            Ok(TurnResultType::DamageFromAcid)
        );
    }
}
