//! Character statistics shared by every combat participant.
//!
//! Hit points are stored clamped: every write goes through
//! [`CharacterStats::set_current_hp`], which keeps `0 <= current <= maximum`.
//! The dead status is derived from the hit points rather than stored, so the
//! two can never disagree.

/// Persistent condition of a character.
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
pub enum CharacterStatus {
    #[default]
    Good,
    Poisoned,
    Charmed,
    Asleep,
    Dead,
}

/// Attribute and resource block for a player character, hostile or map object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub level: i32,
    pub current_mp: i32,
    pub experience: u32,
    current_hp: i32,
    maximum_hp: i32,
    /// Never `Dead`; death is derived from `current_hp`.
    status: CharacterStatus,
}

impl CharacterStats {
    /// Creates a healthy character at full hit points.
    pub fn new(maximum_hp: i32) -> Self {
        let maximum_hp = maximum_hp.max(0);
        Self {
            level: 1,
            current_hp: maximum_hp,
            maximum_hp,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, strength: i32, dexterity: i32, intelligence: i32) -> Self {
        self.strength = strength;
        self.dexterity = dexterity;
        self.intelligence = intelligence;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_current_hp(mut self, current_hp: i32) -> Self {
        self.set_current_hp(current_hp);
        self
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn maximum_hp(&self) -> i32 {
        self.maximum_hp
    }

    /// Writes hit points, clamping into `[0, maximum_hp]`.
    pub fn set_current_hp(&mut self, value: i32) {
        self.current_hp = value.clamp(0, self.maximum_hp);
    }

    /// Changes the maximum and re-clamps the current value.
    pub fn set_maximum_hp(&mut self, value: i32) {
        self.maximum_hp = value.max(0);
        self.set_current_hp(self.current_hp);
    }

    pub fn status(&self) -> CharacterStatus {
        if self.is_dead() {
            CharacterStatus::Dead
        } else {
            self.status
        }
    }

    /// Sets the status directly. Setting `Dead` drops hit points to zero;
    /// setting any other status on a dead character has no effect.
    pub fn set_status(&mut self, status: CharacterStatus) {
        match status {
            CharacterStatus::Dead => self.current_hp = 0,
            _ if self.is_dead() => {}
            other => self.status = other,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// Removes hit points and returns how many were actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.set_current_hp(before.saturating_sub(amount));
        (before - self.current_hp) as u32
    }

    /// Restores hit points up to the maximum and returns the amount healed.
    /// The dead cannot be healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let before = self.current_hp;
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.set_current_hp(before.saturating_add(amount));
        (self.current_hp - before) as u32
    }

    /// Returns `false` if the character is dead.
    pub fn poison(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.status = CharacterStatus::Poisoned;
        true
    }

    pub fn cure_poison(&mut self) -> bool {
        if self.status() != CharacterStatus::Poisoned {
            return false;
        }
        self.status = CharacterStatus::Good;
        true
    }

    /// Returns `false` if the character is dead or poisoned.
    pub fn sleep(&mut self) -> bool {
        if self.is_dead() || self.status == CharacterStatus::Poisoned {
            return false;
        }
        self.status = CharacterStatus::Asleep;
        true
    }

    pub fn wake_up(&mut self) -> bool {
        if self.status() != CharacterStatus::Asleep {
            return false;
        }
        self.status = CharacterStatus::Good;
        true
    }

    /// Returns `false` if the character is dead.
    pub fn charm(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.status = CharacterStatus::Charmed;
        true
    }

    /// Brings a dead character back at full health. Returns `false` if the
    /// character was not dead.
    pub fn resurrect(&mut self) -> bool {
        if !self.is_dead() || self.maximum_hp == 0 {
            return false;
        }
        self.current_hp = self.maximum_hp;
        self.status = CharacterStatus::Good;
        true
    }
}

/// Running totals accumulated by a unit over the course of one combat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatCounters {
    pub damage_given: u32,
    pub damage_taken: u32,
    pub kills: u32,
    pub experience_gained: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_character_is_healthy() {
        let stats = CharacterStats::new(30);
        assert_eq!(stats.current_hp(), 30);
        assert_eq!(stats.status(), CharacterStatus::Good);
    }

    #[test]
    fn dead_iff_zero_hp() {
        let mut stats = CharacterStats::new(10);
        stats.set_current_hp(-5);
        assert_eq!(stats.current_hp(), 0);
        assert_eq!(stats.status(), CharacterStatus::Dead);

        let mut stats = CharacterStats::new(10);
        stats.set_status(CharacterStatus::Dead);
        assert_eq!(stats.current_hp(), 0);
    }

    #[test]
    fn dead_cannot_be_poisoned_or_put_to_sleep() {
        let mut stats = CharacterStats::new(10).with_current_hp(0);
        assert!(!stats.poison());
        assert!(!stats.sleep());
        assert_eq!(stats.status(), CharacterStatus::Dead);
    }

    #[test]
    fn poisoned_cannot_sleep() {
        let mut stats = CharacterStats::new(10);
        assert!(stats.poison());
        assert!(!stats.sleep());
        assert_eq!(stats.status(), CharacterStatus::Poisoned);
        assert!(stats.cure_poison());
        assert!(stats.sleep());
        assert_eq!(stats.status(), CharacterStatus::Asleep);
    }

    #[test]
    fn heal_caps_at_maximum() {
        let mut stats = CharacterStats::new(20).with_current_hp(15);
        assert_eq!(stats.heal(10), 5);
        assert_eq!(stats.current_hp(), 20);
    }

    #[test]
    fn resurrect_restores_full_health() {
        let mut stats = CharacterStats::new(20);
        stats.poison();
        stats.take_damage(50);
        assert!(stats.is_dead());
        assert_eq!(stats.heal(5), 0);
        assert!(stats.resurrect());
        assert_eq!(stats.current_hp(), 20);
        assert_eq!(stats.status(), CharacterStatus::Good);
        assert!(!stats.resurrect());
    }

    #[test]
    fn take_damage_reports_actual_loss() {
        let mut stats = CharacterStats::new(10).with_current_hp(4);
        assert_eq!(stats.take_damage(9), 4);
    }

    proptest! {
        #[test]
        fn hp_stays_within_bounds(
            max in 0i32..500,
            start in -100i32..600,
            hits in proptest::collection::vec(0u32..200, 0..8)
        ) {
            let mut stats = CharacterStats::new(max).with_current_hp(start);
            for hit in hits {
                stats.take_damage(hit);
                prop_assert!(stats.current_hp() >= 0);
                prop_assert!(stats.current_hp() <= stats.maximum_hp());
                prop_assert_eq!(stats.status() == CharacterStatus::Dead, stats.current_hp() == 0);
            }
        }
    }
}
