//! Attack resolution between two units.
//!
//! # Formula
//!
//! ```text
//! hit    = forced || opponent.dexterity + hit_offset >= random(0..=255)
//! bound  = max_damage + attacker.strength - opponent.defense
//! damage = min(bound > 0 ? random(0..bound) : 0, 99)
//! ```
//!
//! The routine mutates both units but records nothing in the turn log; the
//! caller wraps the [`AttackResolution`] into turn results.

use crate::combat::HitState;
use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::state::UnitId;
use crate::unit::Attackable;

/// What a single attack did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackResolution {
    pub hit_state: HitState,
    /// Hit points actually removed from the opponent.
    pub damage: u32,
    pub killed: bool,
}

impl AttackResolution {
    const fn without_damage(hit_state: HitState) -> Self {
        Self {
            hit_state,
            damage: 0,
            killed: false,
        }
    }
}

/// Rolls the to-hit check against the opponent's dexterity.
pub fn roll_to_hit(
    opponent_dexterity: i32,
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> bool {
    let roll = rng.range_inclusive(0, CombatConfig::HIT_ROLL_MAX) as i32;
    opponent_dexterity + config.hit_offset >= roll
}

/// Rolls raw damage in `[0, config.max_damage]`.
pub fn roll_damage(
    max_damage: i32,
    strength: i32,
    defense: i32,
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> u32 {
    let bound = max_damage.saturating_add(strength).saturating_sub(defense);
    if bound <= 0 {
        return 0;
    }
    rng.below(bound as u32).min(config.max_damage)
}

/// Resolves one attack of `attacker` on `opponent`.
///
/// # Arguments
///
/// * `opponent_id` - recorded as the attacker's previous target
/// * `max_damage` - weapon or species damage before strength/defense
/// * `forced_hit` - skips the to-hit roll
///
/// # Returns
///
/// `Missed` and `Grazed` leave the opponent untouched; otherwise the
/// opponent's hit state after the damage is applied. An opponent that is
/// already dead reports `Dead` without a roll and credits no kill.
pub fn attack<A, O>(
    attacker: &mut A,
    opponent: &mut O,
    opponent_id: UnitId,
    max_damage: i32,
    forced_hit: bool,
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> AttackResolution
where
    A: Attackable + ?Sized,
    O: Attackable + ?Sized,
{
    attacker.core_mut().previous_target = Some(opponent_id);
    if opponent.stats().is_dead() {
        return AttackResolution::without_damage(HitState::Dead);
    }

    if !forced_hit && !roll_to_hit(opponent.stats().dexterity, rng, config) {
        tracing::debug!(target: "combat::attack", opponent = %opponent_id, "missed");
        return AttackResolution::without_damage(HitState::Missed);
    }

    let rolled = roll_damage(
        max_damage,
        attacker.stats().strength,
        opponent.defense(),
        rng,
        config,
    );
    if rolled == 0 {
        tracing::debug!(target: "combat::attack", opponent = %opponent_id, "grazed");
        return AttackResolution::without_damage(HitState::Grazed);
    }

    let dealt = opponent.stats_mut().take_damage(rolled);
    opponent.core_mut().counters.damage_taken += dealt;
    attacker.core_mut().counters.damage_given += dealt;

    let killed = opponent.stats().is_dead();
    if killed {
        let reward = opponent.experience_reward();
        let counters = &mut attacker.core_mut().counters;
        counters.kills += 1;
        counters.experience_gained += reward;
        attacker.stats_mut().experience += reward;
    }

    let hit_state = opponent.hit_state(config);
    tracing::debug!(
        target: "combat::attack",
        opponent = %opponent_id,
        rolled,
        dealt,
        hit_state = %hit_state,
        "hit"
    );
    AttackResolution {
        hit_state,
        damage: dealt,
        killed,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::env::{GameRng, SpeciesStats, SpeciesTemplate, SpriteIndex};
    use crate::state::{CharacterStats, Position};
    use crate::test_support::ScriptedRng;
    use crate::unit::{CharacterClass, HostileUnit, PlayerUnit};

    fn fighter(strength: i32) -> PlayerUnit {
        PlayerUnit::new(
            "Dupre",
            CharacterClass::Fighter,
            0,
            CharacterStats::new(100).with_attributes(strength, 20, 10),
            Position::ORIGIN,
        )
    }

    fn orc(hp: i32, armour: i32) -> HostileUnit {
        let template = SpeciesTemplate::new(
            SpriteIndex(384),
            "Orc",
            SpeciesStats {
                strength: 12,
                dexterity: 10,
                armour,
                damage: 8,
                hit_points: hp,
                ..SpeciesStats::default()
            },
        )
        .with_experience(9);
        HostileUnit::new(Arc::new(template), Position::new(1, 0))
    }

    #[test]
    fn miss_changes_nothing_but_target() {
        let config = CombatConfig::default();
        let mut attacker = fighter(10);
        let mut target = orc(40, 0);
        // dex 10 + 128 = 138 < 200
        let mut rng = ScriptedRng::new([200]);
        let result = attack(&mut attacker, &mut target, UnitId(1), 8, false, &mut rng, &config);
        assert_eq!(result.hit_state, HitState::Missed);
        assert_eq!(target.stats().current_hp(), 40);
        assert_eq!(attacker.core.previous_target, Some(UnitId(1)));
    }

    #[test]
    fn zero_bound_grazes() {
        let config = CombatConfig::default();
        let mut attacker = fighter(0);
        let mut target = orc(40, 10);
        let mut rng = ScriptedRng::new([0]);
        let result = attack(&mut attacker, &mut target, UnitId(1), 5, false, &mut rng, &config);
        assert_eq!(result.hit_state, HitState::Grazed);
        assert_eq!(target.stats().current_hp(), 40);
    }

    #[test]
    fn overkill_counts_only_remaining_hp() {
        let config = CombatConfig::default();
        let mut attacker = fighter(30);
        let mut target = orc(6, 0);
        // forced hit; damage roll 20 of bound 38
        let mut rng = ScriptedRng::new([20]);
        let result = attack(&mut attacker, &mut target, UnitId(1), 8, true, &mut rng, &config);
        assert_eq!(result.hit_state, HitState::Dead);
        assert!(result.killed);
        assert_eq!(result.damage, 6);
        assert_eq!(target.core.counters.damage_taken, 6);
        assert_eq!(attacker.core.counters.damage_given, 6);
        assert_eq!(attacker.core.counters.kills, 1);
        assert_eq!(attacker.core.counters.experience_gained, 9);
        assert_eq!(attacker.stats().experience, 9);
    }

    #[test]
    fn striking_a_corpse_credits_no_second_kill() {
        let config = CombatConfig::default();
        let mut attacker = fighter(30);
        let mut target = orc(6, 0);
        let mut rng = ScriptedRng::new([20, 20]);
        attack(&mut attacker, &mut target, UnitId(1), 8, true, &mut rng, &config);

        let again = attack(&mut attacker, &mut target, UnitId(1), 8, true, &mut rng, &config);
        assert_eq!(again.hit_state, HitState::Dead);
        assert!(!again.killed);
        assert_eq!(again.damage, 0);
        assert_eq!(attacker.core.counters.kills, 1);
        assert_eq!(attacker.core.counters.experience_gained, 9);
        assert_eq!(attacker.stats().experience, 9);
    }

    #[test]
    fn wounded_state_reflects_remaining_hp() {
        let config = CombatConfig::default();
        let mut attacker = fighter(30);
        let mut target = orc(100, 0);
        let mut rng = ScriptedRng::new([30]);
        let result = attack(&mut attacker, &mut target, UnitId(1), 8, true, &mut rng, &config);
        assert_eq!(result.damage, 30);
        assert_eq!(result.hit_state, HitState::LightlyWounded);
    }

    proptest! {
        #[test]
        fn damage_never_exceeds_cap(
            seed in any::<u64>(),
            max_damage in -50i32..400,
            strength in 0i32..200,
            defense in 0i32..100
        ) {
            let config = CombatConfig::default();
            let mut rng = GameRng::new(seed);
            let rolled = roll_damage(max_damage, strength, defense, &mut rng, &config);
            prop_assert!(rolled <= 99);
            if max_damage + strength - defense <= 0 {
                prop_assert_eq!(rolled, 0);
            }
        }

        #[test]
        fn opponent_hp_stays_in_bounds(
            seed in any::<u64>(),
            hp in 1i32..120,
            strength in 0i32..300
        ) {
            let config = CombatConfig::default();
            let mut rng = GameRng::new(seed);
            let mut attacker = fighter(strength);
            let mut target = orc(hp, 2);
            for _ in 0..5 {
                attack(&mut attacker, &mut target, UnitId(1), 20, false, &mut rng, &config);
                let stats = target.stats();
                prop_assert!(stats.current_hp() >= 0 && stats.current_hp() <= stats.maximum_hp());
            }
        }
    }
}
