//! Trap descriptors and their effects on the party.
//!
//! A trap fires at most once: [`spring_trap`] is always paired with clearing
//! the owner's descriptor, see `NonAttackingUnit::trigger_trap`.

use crate::config::{CombatConfig, DamageRange};
use crate::env::RngOracle;
use crate::loot::LootError;
use crate::state::{CharacterStats, UnitId};

/// What happens when a trap goes off.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum TrapKind {
    #[default]
    None = 0,
    Acid = 1,
    Sleep = 2,
    Poison = 3,
    Bomb = 4,
    SleepAll = 5,
    ElectricAll = 6,
    PoisonAll = 7,
}

impl TrapKind {
    /// Affects every party member rather than only the one who set it off.
    pub const fn is_party_wide(self) -> bool {
        matches!(self, Self::SleepAll | Self::ElectricAll | Self::PoisonAll)
    }

    pub const fn is_armed(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl TryFrom<u8> for TrapKind {
    type Error = LootError;

    /// Decodes a saved trap code.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::None,
            1 => Self::Acid,
            2 => Self::Sleep,
            3 => Self::Poison,
            4 => Self::Bomb,
            5 => Self::SleepAll,
            6 => Self::ElectricAll,
            7 => Self::PoisonAll,
            other => return Err(LootError::UnknownTrap(other)),
        })
    }
}

/// How hard a trap is to avoid.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TrapComplexity {
    #[default]
    None,
    Simple,
    Complex,
}

/// Result of a trap on one character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapEffect {
    Damaged(u32),
    Poisoned,
    Slept,
    /// Already dead, or immune (e.g. poisoned characters cannot be put to sleep).
    Unaffected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapHit {
    pub unit: UnitId,
    pub effect: TrapEffect,
}

/// Everything a sprung trap did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapOutcome {
    pub trap: TrapKind,
    pub hits: Vec<TrapHit>,
}

impl TrapOutcome {
    pub fn fired(&self) -> bool {
        self.trap.is_armed()
    }
}

/// Applies a trap's effect to the triggering character or the whole party.
///
/// # Arguments
///
/// * `target` - the character who set the trap off
/// * `party` - every party member's stats, including the target
///
/// # Errors
///
/// Returns [`LootError::TargetNotInParty`] when a single-target trap names a
/// character that is not in `party`.
pub fn spring_trap(
    trap: TrapKind,
    target: UnitId,
    party: &mut [(UnitId, &mut CharacterStats)],
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> Result<TrapOutcome, LootError> {
    let mut outcome = TrapOutcome {
        trap,
        hits: Vec::new(),
    };

    if !trap.is_armed() {
        return Ok(outcome);
    }

    if trap.is_party_wide() {
        for (unit, stats) in party.iter_mut() {
            let effect = apply_effect(trap, stats, rng, config);
            outcome.hits.push(TrapHit {
                unit: *unit,
                effect,
            });
        }
    } else {
        let (unit, stats) = party
            .iter_mut()
            .find(|(unit, _)| *unit == target)
            .ok_or(LootError::TargetNotInParty(target))?;
        let effect = apply_effect(trap, stats, rng, config);
        outcome.hits.push(TrapHit {
            unit: *unit,
            effect,
        });
    }

    tracing::debug!(
        target: "combat::trap",
        trap = %trap,
        trigger = %target,
        hits = outcome.hits.len(),
        "trap sprung"
    );
    Ok(outcome)
}

fn apply_effect(
    trap: TrapKind,
    stats: &mut CharacterStats,
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> TrapEffect {
    if stats.is_dead() {
        return TrapEffect::Unaffected;
    }
    match trap {
        TrapKind::None => TrapEffect::Unaffected,
        TrapKind::Acid => damage(stats, config.acid_damage, rng),
        TrapKind::Bomb => damage(stats, config.bomb_damage, rng),
        TrapKind::ElectricAll => damage(stats, config.electric_damage, rng),
        TrapKind::Poison | TrapKind::PoisonAll => {
            if stats.poison() {
                TrapEffect::Poisoned
            } else {
                TrapEffect::Unaffected
            }
        }
        TrapKind::Sleep | TrapKind::SleepAll => {
            if stats.sleep() {
                TrapEffect::Slept
            } else {
                TrapEffect::Unaffected
            }
        }
    }
}

fn damage(stats: &mut CharacterStats, range: DamageRange, rng: &mut dyn RngOracle) -> TrapEffect {
    let rolled = rng.range_inclusive(range.min, range.max);
    TrapEffect::Damaged(stats.take_damage(rolled))
}
