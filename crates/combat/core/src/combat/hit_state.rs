use crate::state::CharacterStats;

/// How an opponent fared after an attack, and how wounded any unit looks.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HitState {
    Missed,
    Grazed,
    BarelyWounded,
    LightlyWounded,
    HeavilyWounded,
    CriticallyWounded,
    Fleeing,
    Dead,
}

impl HitState {
    /// Classifies a unit by its remaining hit points.
    ///
    /// # Formula
    ///
    /// ```text
    /// critical = max >> 2
    /// heavy    = max >> 1
    /// light    = critical + heavy
    ///
    /// hp <= 0          -> Dead
    /// hp <  fleeing_hp -> Fleeing
    /// hp <  critical   -> CriticallyWounded
    /// hp <  heavy      -> HeavilyWounded
    /// hp <  light      -> LightlyWounded
    /// otherwise        -> BarelyWounded
    /// ```
    pub fn from_stats(stats: &CharacterStats, fleeing_hp: i32) -> Self {
        let hp = stats.current_hp();
        let max = stats.maximum_hp();
        let critical = max >> 2;
        let heavy = max >> 1;
        let light = critical + heavy;

        if hp <= 0 {
            Self::Dead
        } else if hp < fleeing_hp {
            Self::Fleeing
        } else if hp < critical {
            Self::CriticallyWounded
        } else if hp < heavy {
            Self::HeavilyWounded
        } else if hp < light {
            Self::LightlyWounded
        } else {
            Self::BarelyWounded
        }
    }

    /// True when the attack connected and did damage.
    pub fn is_damaging(self) -> bool {
        !matches!(self, Self::Missed | Self::Grazed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLEE: i32 = 24;

    fn state(max: i32, hp: i32) -> HitState {
        HitState::from_stats(&CharacterStats::new(max).with_current_hp(hp), FLEE)
    }

    #[test]
    fn fleeing_boundary() {
        assert_eq!(state(100, 24), HitState::HeavilyWounded);
        assert_eq!(state(100, 23), HitState::Fleeing);
    }

    #[test]
    fn quarter_boundary_separates_heavy_from_critical() {
        assert_eq!(state(100, 25), HitState::HeavilyWounded);
        assert_eq!(state(200, 50), HitState::HeavilyWounded);
        assert_eq!(state(200, 49), HitState::CriticallyWounded);
    }

    #[test]
    fn upper_bands() {
        assert_eq!(state(200, 100), HitState::LightlyWounded);
        assert_eq!(state(200, 149), HitState::LightlyWounded);
        assert_eq!(state(200, 150), HitState::BarelyWounded);
        assert_eq!(state(200, 200), HitState::BarelyWounded);
    }

    #[test]
    fn zero_hp_is_dead() {
        assert_eq!(state(100, 0), HitState::Dead);
        assert_eq!(state(100, -4), HitState::Dead);
    }
}
