//! The combat encounter: unit arena, enemy turn and player actions.

use crate::combat::{self, AttackResolution, HitState};
use crate::env::{CombatEnv, InventoryItem, MapOracle, MissileType, MovementDomain, RngOracle};
use crate::env::{SpeciesAbilities, SpriteIndex};
use crate::loot::{
    NonAttackingKind, NonAttackingUnit, NonAttackingUnitFactory, OpenOutcome, SearchOutcome,
    TrapComplexity, TrapEffect, TrapKind, TrapOutcome,
};
use crate::nav::{self, WalkableGrid};
use crate::state::{CharacterStats, CharacterStatus, Direction, Position, UnitId};
use crate::turn::{
    AttackerResult, CombatPlayerMoved, EnemyFocused, EnemyMoved, ItemTaken, LootDropped,
    SinglePlayerCharacterAffected, TrapTriggered, TurnResult, TurnResultData, TurnResultType,
    TurnResults, UnitRef, UnitTakesDamage,
};
use crate::unit::{Attackable, CombatUnit, HostileUnit, Navigable, PlayerUnit};

use super::CombatError;

/// How hostiles pick their next step when they cannot attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum NavigationMode {
    /// One greedy step per turn.
    Heuristic,
    /// Shortest path over the combat grid, greedy step as fallback.
    #[default]
    PathFinding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: Position, to: Position },
    Blocked,
}

/// A running combat.
///
/// Owns every unit taking part (the index in the arena is the [`UnitId`]) and
/// the [`TurnResults`] log. Units are never removed; dead, escaped and
/// used-up units are skipped instead.
pub struct CombatEncounter<'a> {
    env: CombatEnv<'a>,
    units: Vec<CombatUnit>,
    results: TurnResults,
    navigation: NavigationMode,
    paused: bool,
    round: u32,
}

impl<'a> CombatEncounter<'a> {
    pub fn new(env: CombatEnv<'a>) -> Self {
        Self {
            env,
            units: Vec::new(),
            results: TurnResults::new(),
            navigation: NavigationMode::default(),
            paused: false,
            round: 0,
        }
    }

    #[must_use]
    pub fn with_navigation(mut self, navigation: NavigationMode) -> Self {
        self.navigation = navigation;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn env(&self) -> CombatEnv<'a> {
        self.env
    }

    pub fn navigation(&self) -> NavigationMode {
        self.navigation
    }

    /// Number of completed enemy turns.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn units(&self) -> &[CombatUnit] {
        &self.units
    }

    pub fn results(&self) -> &TurnResults {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut TurnResults {
        &mut self.results
    }

    pub fn unit(&self, id: UnitId) -> Result<&CombatUnit, CombatError> {
        self.units.get(id.index()).ok_or(CombatError::UnitNotFound(id))
    }

    pub fn stats(&self, id: UnitId) -> Result<&CharacterStats, CombatError> {
        Ok(self.unit(id)?.stats())
    }

    pub fn position(&self, id: UnitId) -> Result<Position, CombatError> {
        Ok(self.unit(id)?.position())
    }

    pub fn hit_state(&self, id: UnitId) -> Result<HitState, CombatError> {
        Ok(self.unit(id)?.hit_state(self.env.config()))
    }

    pub fn is_fleeing(&self, id: UnitId) -> Result<bool, CombatError> {
        Ok(self
            .unit(id)?
            .as_hostile()
            .is_some_and(HostileUnit::is_fleeing))
    }

    /// The first active unit standing on `position`.
    pub fn unit_at(&self, position: Position) -> Option<UnitId> {
        self.units
            .iter()
            .position(|unit| unit.is_active() && unit.position() == position)
            .map(|index| UnitId(index as u32))
    }

    /// True once one side has no active units left.
    pub fn is_finished(&self) -> bool {
        let side_active = |hostile: bool| {
            self.units.iter().any(|unit| {
                unit.is_active()
                    && match unit {
                        CombatUnit::Player(_) => !hostile,
                        CombatUnit::Hostile(_) => hostile,
                        CombatUnit::NonAttacking(_) => false,
                    }
            })
        };
        !side_active(true) || !side_active(false)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            tracing::debug!(target: "combat::encounter", round = self.round, "paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            tracing::debug!(target: "combat::encounter", round = self.round, "resumed");
        }
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    pub fn add_player(&mut self, player: PlayerUnit) -> UnitId {
        self.insert(CombatUnit::Player(player))
    }

    pub fn add_enemy(&mut self, hostile: HostileUnit) -> UnitId {
        self.insert(CombatUnit::Hostile(hostile))
    }

    /// Spawns an enemy of the species drawn with `sprite`.
    ///
    /// # Errors
    ///
    /// A sprite without a species template, or a template with contradictory
    /// abilities, is corrupt reference data and fails fatally.
    pub fn spawn_enemy(
        &mut self,
        sprite: SpriteIndex,
        position: Position,
    ) -> Result<UnitId, CombatError> {
        let template = self.env.species_template(sprite)?;
        template.validate()?;
        Ok(self.add_enemy(HostileUnit::new(template, position)))
    }

    pub fn place_object(&mut self, object: NonAttackingUnit) -> UnitId {
        self.insert(CombatUnit::NonAttacking(object))
    }

    /// Places the map object drawn with `sprite`; sprite 0 places nothing.
    pub fn place_sprite(
        &mut self,
        sprite: SpriteIndex,
        position: Position,
        rng: &mut dyn RngOracle,
    ) -> Result<Option<UnitId>, CombatError> {
        let factory = NonAttackingUnitFactory::new(self.env);
        Ok(factory
            .create(sprite, position, rng)?
            .map(|object| self.place_object(object)))
    }

    fn insert(&mut self, unit: CombatUnit) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        tracing::debug!(
            target: "combat::encounter",
            unit = %id,
            name = %unit.name(),
            x = unit.position().x,
            y = unit.position().y,
            "unit added"
        );
        self.units.push(unit);
        id
    }

    // ------------------------------------------------------------------
    // Enemy turn
    // ------------------------------------------------------------------

    /// Runs one enemy turn.
    ///
    /// Poisoned party members take damage first, then every active hostile
    /// acts in id order. Does nothing while paused.
    pub fn advance_enemies(&mut self, rng: &mut dyn RngOracle) -> Result<(), CombatError> {
        if self.paused {
            return Ok(());
        }
        self.round += 1;
        self.apply_damage_over_time()?;

        let hostiles: Vec<UnitId> =
            self.ids_matching(|unit| matches!(unit, CombatUnit::Hostile(_)));
        for id in hostiles {
            if self.unit(id)?.is_active() {
                self.enemy_turn(id, rng)?;
            }
        }
        Ok(())
    }

    fn apply_damage_over_time(&mut self) -> Result<(), CombatError> {
        let amount = self.env.config().poison_damage;
        let poisoned = self.ids_matching(|unit| {
            matches!(unit, CombatUnit::Player(_))
                && unit.is_active()
                && unit.stats().status() == CharacterStatus::Poisoned
        });
        for id in poisoned {
            let unit = self.unit_mut(id)?;
            let damage = unit.stats_mut().take_damage(amount);
            unit.core_mut().counters.damage_taken += damage;
            let stats = unit.stats().clone();
            let unit = self.unit_ref(id)?;
            self.push(
                TurnResultType::DamageOverTimePoisoned,
                UnitTakesDamage {
                    unit,
                    stats,
                    damage,
                },
            )?;
        }
        Ok(())
    }

    fn enemy_turn(&mut self, id: UnitId, rng: &mut dyn RngOracle) -> Result<(), CombatError> {
        let hostile = self.hostile(id)?;
        let asleep = hostile.core.stats.status() == CharacterStatus::Asleep;
        let fleeing = hostile.is_fleeing();

        if asleep && !self.roll_enemy_wake(id, rng)? {
            let enemy = self.unit_ref(id)?;
            return self.push(TurnResultType::CombatEnemyIsSleeping, EnemyFocused { enemy });
        }
        if fleeing {
            return self.flee(id);
        }

        let Some(target) = self.nearest_opponent(id)? else {
            return Ok(());
        };
        let target_position = self.position(target)?;
        if self.unit(id)?.can_reach_for_attack(target_position) {
            self.enemy_attack(id, target, rng)
        } else {
            self.chase(id, target_position)
        }
    }

    /// No roll is drawn while `enemy_wake_percent` is 0.
    fn roll_enemy_wake(
        &mut self,
        id: UnitId,
        rng: &mut dyn RngOracle,
    ) -> Result<bool, CombatError> {
        let percent = u32::from(self.env.config().enemy_wake_percent);
        if percent == 0 || rng.below(100) >= percent {
            return Ok(false);
        }
        self.unit_mut(id)?.stats_mut().wake_up();
        tracing::debug!(target: "combat::encounter", enemy = %id, "enemy woke up");
        Ok(true)
    }

    fn enemy_attack(
        &mut self,
        id: UnitId,
        target: UnitId,
        rng: &mut dyn RngOracle,
    ) -> Result<(), CombatError> {
        let enemy = self.unit_ref(id)?;
        self.push(TurnResultType::CombatEnemyBeginsAttack, EnemyFocused { enemy })?;

        let resolution = self.resolve_attack(id, target, rng)?;
        let kind = match resolution.hit_state {
            HitState::Missed if self.missile_of(id) != MissileType::None => {
                TurnResultType::CombatResultEnemyMissedRangedAttack
            }
            HitState::Missed => TurnResultType::CombatResultMissedEnemyMelee,
            HitState::Grazed => TurnResultType::CombatResultEnemyGrazedTarget,
            HitState::Dead => TurnResultType::CombatResultCombatPlayerKilled,
            _ => TurnResultType::CombatResultCombatPlayerReceivedDamage,
        };
        self.push_attack(kind, id, target, resolution)
    }

    fn chase(&mut self, id: UnitId, target: Position) -> Result<(), CombatError> {
        let unit = self.unit(id)?;
        if unit.is_immobile() {
            return Ok(());
        }
        let from = unit.position();
        let domain = unit.movement();
        let map = self.env.map()?;

        let mut next = None;
        if self.navigation == NavigationMode::PathFinding {
            let mut grid = WalkableGrid::from_map(map, domain, |cell| self.is_blocked(cell, id));
            grid.set_walkable(target, true);
            next = nav::find_path(&grid, from, target)
                .and_then(|path| path.get(1).copied())
                .filter(|step| *step != target);
            if next.is_none() {
                tracing::warn!(
                    target: "combat::nav",
                    enemy = %id,
                    %from,
                    %target,
                    "no path, falling back to greedy step"
                );
            }
        }
        if next.is_none() {
            next = nav::dumb_step(from, target, |cell| self.can_enter(map, domain, cell, id));
        }

        match next {
            Some(to) => self.move_enemy(id, from, to),
            None => {
                tracing::debug!(target: "combat::nav", enemy = %id, "holds position");
                Ok(())
            }
        }
    }

    fn flee(&mut self, id: UnitId) -> Result<(), CombatError> {
        let map = self.env.map()?;
        let unit = self.unit(id)?;
        let from = unit.position();
        let domain = unit.movement();
        let immobile = unit.is_immobile();
        let enemy = self.unit_ref(id)?;

        if immobile {
            return self.push(
                TurnResultType::CombatEnemyWantsToFleeButNoPath,
                EnemyFocused { enemy },
            );
        }
        if map.dimensions().is_edge(from) {
            self.unit_mut(id)?.core_mut().escaped = true;
            tracing::debug!(target: "combat::encounter", enemy = %id, %from, "escaped");
            return self.push(TurnResultType::CombatEnemyEscaped, EnemyFocused { enemy });
        }

        let threat = match self.nearest_opponent(id)? {
            Some(opponent) => Some(self.position(opponent)?),
            None => None,
        };
        let next = threat.and_then(|threat| {
            nav::flee_step(from, threat, |cell| self.can_enter(map, domain, cell, id))
        });
        match next {
            Some(to) => {
                self.push(TurnResultType::CombatEnemyIsFleeing, EnemyFocused { enemy })?;
                self.move_enemy(id, from, to)
            }
            None => self.push(
                TurnResultType::CombatEnemyWantsToFleeButNoPath,
                EnemyFocused { enemy },
            ),
        }
    }

    fn move_enemy(&mut self, id: UnitId, from: Position, to: Position) -> Result<(), CombatError> {
        self.unit_mut(id)?.set_position(to);
        tracing::debug!(target: "combat::nav", enemy = %id, %from, %to, "moved");
        let enemy = self.unit_ref(id)?;
        self.push(TurnResultType::CombatEnemyMoved, EnemyMoved { enemy, from, to })
    }

    fn nearest_opponent(&self, id: UnitId) -> Result<Option<UnitId>, CombatError> {
        let unit = self.unit(id)?;
        let origin = unit.position();
        Ok(self
            .units
            .iter()
            .enumerate()
            .filter(|(_, other)| other.is_active() && unit.is_opponent_of(other))
            .min_by_key(|(index, other)| (origin.manhattan(other.position()), *index))
            .map(|(index, _)| UnitId(index as u32)))
    }

    // ------------------------------------------------------------------
    // Player actions
    // ------------------------------------------------------------------

    /// A party member attacks `opponent`.
    ///
    /// Returns `Ok(None)` when the character swings at itself. A hostile that
    /// drops to the fleeing threshold starts fleeing; one that dies leaves
    /// remains according to its species.
    ///
    /// # Errors
    ///
    /// [`CombatError::NotAnOpponent`] for targets on the same side or already
    /// out of the fight, [`CombatError::OutOfReach`] beyond weapon range.
    pub fn player_attack(
        &mut self,
        attacker: UnitId,
        opponent: UnitId,
        rng: &mut dyn RngOracle,
    ) -> Result<Option<AttackResolution>, CombatError> {
        self.active_player(attacker)?;
        if attacker == opponent {
            self.results
                .push(TurnResult::basic(TurnResultType::CombatCombatPlayerTriedToAttackSelf))?;
            return Ok(None);
        }
        let target = self.unit(opponent)?;
        if !target.is_active() || !matches!(target, CombatUnit::Hostile(_)) {
            return Err(CombatError::NotAnOpponent {
                attacker,
                target: opponent,
            });
        }
        if !self.unit(attacker)?.can_reach_for_attack(target.position()) {
            return Err(CombatError::OutOfReach {
                actor: attacker,
                target: opponent,
            });
        }

        let resolution = self.resolve_attack(attacker, opponent, rng)?;
        if resolution.hit_state == HitState::Fleeing {
            if let Some(hostile) = self.unit_mut(opponent)?.as_hostile_mut() {
                hostile.mark_fleeing();
            }
        }

        let kind = match resolution.hit_state {
            HitState::Missed if self.missile_of(attacker) != MissileType::None => {
                TurnResultType::CombatResultCombatPlayerMissedRangedAttack
            }
            HitState::Missed => TurnResultType::CombatResultMissedCombatPlayerMelee,
            HitState::Grazed => TurnResultType::CombatResultCombatPlayerGrazedTarget,
            HitState::Dead => TurnResultType::CombatResultEnemyKilled,
            _ => TurnResultType::CombatResultHitAndEnemyReceivedDamage,
        };
        self.push_attack(kind, attacker, opponent, resolution)?;

        if resolution.killed {
            self.drop_loot(opponent, rng)?;
        }
        Ok(Some(resolution))
    }

    /// Moves a party member one cell. Stepping onto an armed elemental field
    /// sets it off.
    pub fn player_move(
        &mut self,
        player: UnitId,
        direction: Direction,
        rng: &mut dyn RngOracle,
    ) -> Result<MoveOutcome, CombatError> {
        let unit = self.active_player(player)?;
        let from = unit.position();
        let domain = unit.movement();
        let to = from.offset(direction);
        let map = self.env.map()?;

        if !self.can_enter(map, domain, to, player) {
            tracing::debug!(target: "combat::encounter", player = %player, %to, "move blocked");
            self.results
                .push(TurnResult::basic(TurnResultType::ActionMoveBlocked))?;
            return Ok(MoveOutcome::Blocked);
        }

        self.unit_mut(player)?.set_position(to);
        let reference = self.unit_ref(player)?;
        self.push(
            TurnResultType::ActionMovedCombatPlayerOnCombatMap,
            CombatPlayerMoved {
                player: reference,
                from,
                to,
            },
        )?;

        if let Some(field) = self.armed_field_at(to) {
            self.spring(field, player, None, rng)?;
        }
        Ok(MoveOutcome::Moved { from, to })
    }

    /// Searches a map object, possibly setting off or disarming its trap.
    pub fn search(
        &mut self,
        player: UnitId,
        target: UnitId,
        rng: &mut dyn RngOracle,
    ) -> Result<SearchOutcome, CombatError> {
        let dexterity = self.active_player(player)?.core.stats.dexterity;
        self.require_adjacent(player, target)?;
        let object = self.non_attacking(target, "search")?;
        if !object.is_searchable() {
            return Ok(SearchOutcome::NotSearchable);
        }

        if object.is_trapped() {
            let complex = object.trap_complexity() == TrapComplexity::Complex;
            if object.does_trigger_trap(dexterity, rng) {
                let header = if complex {
                    TurnResultType::ActionSearchTriggerComplexTrap
                } else {
                    TurnResultType::ActionSearchTriggerSimpleTrap
                };
                self.spring(target, player, Some(header), rng)?;
            } else {
                self.non_attacking_mut(target, "search")?.disarm();
                let kind = if complex {
                    TurnResultType::ActionSearchRemoveComplex
                } else {
                    TurnResultType::ActionSearchRemoveSimple
                };
                self.results.push(TurnResult::basic(kind))?;
            }
        } else {
            self.results
                .push(TurnResult::basic(TurnResultType::ActionSearchNoTrap))?;
        }

        let object = self.non_attacking_mut(target, "search")?;
        let outcome = object.search();
        if let Some(mut remains) = object.take_alternate() {
            remains.core.position = object.position();
            let placed = self.place_object(remains);
            tracing::debug!(
                target: "combat::encounter",
                loot = %target,
                remains = %placed,
                "hidden remains uncovered"
            );
        }

        let kind = match outcome {
            SearchOutcome::Found { .. } => TurnResultType::ActionSearchFoundItems,
            _ => TurnResultType::ActionSearchNothingFound,
        };
        self.results.push(TurnResult::basic(kind))?;
        Ok(outcome)
    }

    /// Opens a chest. A locked chest stays shut and its trap stays untested.
    pub fn open(
        &mut self,
        player: UnitId,
        target: UnitId,
        rng: &mut dyn RngOracle,
    ) -> Result<OpenOutcome, CombatError> {
        let dexterity = self.active_player(player)?.core.stats.dexterity;
        self.require_adjacent(player, target)?;
        let object = self.non_attacking(target, "open")?;

        if !object.is_openable() {
            self.results
                .push(TurnResult::basic(TurnResultType::ActionOpenNothingToOpen))?;
            return Ok(OpenOutcome::NotOpenable);
        }
        if object.is_locked() {
            self.results
                .push(TurnResult::basic(TurnResultType::ActionOpenedLocked))?;
            return Ok(OpenOutcome::Locked);
        }
        if !object.items_exposed() && object.does_trigger_trap(dexterity, rng) {
            self.spring(target, player, Some(TurnResultType::ActionOpenedTrapped), rng)?;
        }

        let outcome = self.non_attacking_mut(target, "open")?.open();
        if matches!(outcome, OpenOutcome::Opened { .. }) {
            self.results
                .push(TurnResult::basic(TurnResultType::ActionOpened))?;
        }
        Ok(outcome)
    }

    /// Picks up the top item of an exposed stack.
    ///
    /// Returns `Ok(None)` when nothing is left.
    ///
    /// # Errors
    ///
    /// [`LootError::ItemsNotExposed`](crate::loot::LootError::ItemsNotExposed)
    /// until the object has been opened or searched.
    pub fn take_item(
        &mut self,
        player: UnitId,
        target: UnitId,
    ) -> Result<Option<InventoryItem>, CombatError> {
        self.active_player(player)?;
        self.require_adjacent(player, target)?;
        let object = self.non_attacking_mut(target, "get")?;
        if !object.has_items() {
            self.results
                .push(TurnResult::basic(TurnResultType::ActionGetNothingToGet))?;
            return Ok(None);
        }

        let kind = match object.kind() {
            NonAttackingKind::Moonstone(_) => TurnResultType::ActionGetMoonstone,
            NonAttackingKind::ItemStack => TurnResultType::ActionGetStackableItem,
            _ => TurnResultType::ActionGetExposedItem,
        };
        let item = object.take_item()?;
        let loot = self.unit_ref(target)?;
        self.push(
            kind,
            ItemTaken {
                loot,
                item: item.clone(),
            },
        )?;
        Ok(Some(item))
    }

    // ------------------------------------------------------------------
    // Shared rules
    // ------------------------------------------------------------------

    fn resolve_attack(
        &mut self,
        attacker: UnitId,
        opponent: UnitId,
        rng: &mut dyn RngOracle,
    ) -> Result<AttackResolution, CombatError> {
        let config = self.env.config();
        let (attacker_unit, opponent_unit) = self.pair_mut(attacker, opponent)?;
        let max_damage = attacker_unit.max_damage(config);
        Ok(combat::attack(
            attacker_unit,
            opponent_unit,
            opponent,
            max_damage,
            false,
            rng,
            config,
        ))
    }

    fn push_attack(
        &mut self,
        kind: TurnResultType,
        attacker: UnitId,
        opponent: UnitId,
        resolution: AttackResolution,
    ) -> Result<(), CombatError> {
        let missile = self.missile_of(attacker);
        let opponent = self.unit_ref(opponent)?;
        let missed_point = (missile != MissileType::None
            && resolution.hit_state == HitState::Missed)
            .then_some(opponent.position);
        let record = AttackerResult {
            attacker: self.unit_ref(attacker)?,
            opponent,
            missile,
            hit_state: resolution.hit_state,
            damage: resolution.damage,
            missed_point,
        };
        self.push(kind, record)
    }

    /// Leaves remains where a hostile died.
    fn drop_loot(
        &mut self,
        enemy: UnitId,
        rng: &mut dyn RngOracle,
    ) -> Result<Option<UnitId>, CombatError> {
        let hostile = self.hostile(enemy)?;
        let kind = if hostile.has_ability(SpeciesAbilities::DISAPPEARS_ON_DEATH) {
            tracing::debug!(target: "combat::loot", enemy = %enemy, "vanished on death");
            return Ok(None);
        } else if hostile.has_ability(SpeciesAbilities::NO_CORPSE) {
            NonAttackingKind::BloodSpatter
        } else {
            NonAttackingKind::DeadBody
        };
        let position = hostile.core.position;

        let remains = NonAttackingUnitFactory::new(self.env).remains(kind, position, rng)?;
        let loot = self.place_object(remains);
        let record = LootDropped {
            enemy: self.unit_ref(enemy)?,
            loot: self.unit_ref(loot)?,
        };
        self.push(TurnResultType::CombatLootDropped, record)?;
        Ok(Some(loot))
    }

    /// Fires the trap on `source` with `target` as the trigger.
    ///
    /// `header` is logged before the per-character effects.
    fn spring(
        &mut self,
        source: UnitId,
        target: UnitId,
        header: Option<TurnResultType>,
        rng: &mut dyn RngOracle,
    ) -> Result<TrapOutcome, CombatError> {
        let config = self.env.config();
        let mut object = None;
        let mut party: Vec<(UnitId, &mut CharacterStats)> = Vec::new();
        for (index, unit) in self.units.iter_mut().enumerate() {
            match unit {
                CombatUnit::NonAttacking(candidate) if index == source.index() => {
                    object = Some(candidate);
                }
                CombatUnit::Player(member) => {
                    party.push((UnitId(index as u32), &mut member.core.stats));
                }
                _ => {}
            }
        }
        let object = object.ok_or(CombatError::invalid_target(source, "trap"))?;
        let trigger_point = object.position();
        let outcome = object.trigger_trap(target, &mut party, rng, config)?;
        drop(party);
        if !outcome.fired() {
            return Ok(outcome);
        }

        if let Some(kind) = header {
            let record = TrapTriggered {
                source: self.unit_ref(source)?,
                trap: outcome.trap,
                trigger_point,
                hits: outcome.hits.clone(),
            };
            self.push(kind, record)?;
        }

        for hit in &outcome.hits {
            let kind = match hit.effect {
                TrapEffect::Damaged(damage) => {
                    self.unit_mut(hit.unit)?.core_mut().counters.damage_taken += damage;
                    match outcome.trap {
                        TrapKind::Acid => TurnResultType::DamageFromAcid,
                        TrapKind::Bomb => TurnResultType::DamageFromExplosion,
                        _ => TurnResultType::DamageFromElectricity,
                    }
                }
                TrapEffect::Poisoned => TurnResultType::PlayerCharacterPoisoned,
                TrapEffect::Slept => TurnResultType::PlayerCharacterAsleep,
                TrapEffect::Unaffected => continue,
            };
            let unit = self.unit_ref(hit.unit)?;
            let stats = self.stats(hit.unit)?.clone();
            let data: TurnResultData = match hit.effect {
                TrapEffect::Damaged(damage) => UnitTakesDamage {
                    unit,
                    stats,
                    damage,
                }
                .into(),
                _ => SinglePlayerCharacterAffected { unit, stats }.into(),
            };
            self.push(kind, data)?;
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Lookup helpers
    // ------------------------------------------------------------------

    fn unit_mut(&mut self, id: UnitId) -> Result<&mut CombatUnit, CombatError> {
        self.units
            .get_mut(id.index())
            .ok_or(CombatError::UnitNotFound(id))
    }

    fn pair_mut(
        &mut self,
        first: UnitId,
        second: UnitId,
    ) -> Result<(&mut CombatUnit, &mut CombatUnit), CombatError> {
        let (i, j) = (first.index(), second.index());
        for id in [first, second] {
            if id.index() >= self.units.len() {
                return Err(CombatError::UnitNotFound(id));
            }
        }
        if i == j {
            return Err(CombatError::NotAnOpponent {
                attacker: first,
                target: second,
            });
        }
        if i < j {
            let (left, right) = self.units.split_at_mut(j);
            Ok((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.units.split_at_mut(i);
            Ok((&mut right[0], &mut left[j]))
        }
    }

    fn active_player(&self, id: UnitId) -> Result<&PlayerUnit, CombatError> {
        let unit = self.unit(id)?;
        let player = unit
            .as_player()
            .ok_or(CombatError::invalid_target(id, "party action"))?;
        if !unit.is_active() {
            return Err(CombatError::InactiveUnit(id));
        }
        Ok(player)
    }

    fn hostile(&self, id: UnitId) -> Result<&HostileUnit, CombatError> {
        self.unit(id)?
            .as_hostile()
            .ok_or(CombatError::invalid_target(id, "enemy turn"))
    }

    fn non_attacking(
        &self,
        id: UnitId,
        action: &'static str,
    ) -> Result<&NonAttackingUnit, CombatError> {
        self.unit(id)?
            .as_non_attacking()
            .ok_or(CombatError::invalid_target(id, action))
    }

    fn non_attacking_mut(
        &mut self,
        id: UnitId,
        action: &'static str,
    ) -> Result<&mut NonAttackingUnit, CombatError> {
        self.unit_mut(id)?
            .as_non_attacking_mut()
            .ok_or(CombatError::invalid_target(id, action))
    }

    fn require_adjacent(&self, actor: UnitId, target: UnitId) -> Result<(), CombatError> {
        if self.position(actor)?.chebyshev(self.position(target)?) > 1 {
            return Err(CombatError::OutOfReach { actor, target });
        }
        Ok(())
    }

    fn unit_ref(&self, id: UnitId) -> Result<UnitRef, CombatError> {
        let unit = self.unit(id)?;
        Ok(UnitRef::new(id, unit.name(), unit.position()))
    }

    fn missile_of(&self, id: UnitId) -> MissileType {
        match self.units.get(id.index()) {
            Some(CombatUnit::Player(player)) => player.equipment.missile(),
            Some(CombatUnit::Hostile(hostile)) => hostile.missile(),
            _ => MissileType::None,
        }
    }

    fn ids_matching(&self, predicate: impl Fn(&CombatUnit) -> bool) -> Vec<UnitId> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, unit)| predicate(unit))
            .map(|(index, _)| UnitId(index as u32))
            .collect()
    }

    fn armed_field_at(&self, position: Position) -> Option<UnitId> {
        self.units
            .iter()
            .position(|unit| {
                unit.as_non_attacking().is_some_and(|object| {
                    matches!(object.kind(), NonAttackingKind::ElementalField(_))
                        && object.position() == position
                        && object.is_trapped()
                })
            })
            .map(|index| UnitId(index as u32))
    }

    fn is_blocked(&self, cell: Position, mover: UnitId) -> bool {
        self.units.iter().enumerate().any(|(index, unit)| {
            index != mover.index() && unit.blocks_movement() && unit.position() == cell
        })
    }

    fn can_enter(
        &self,
        map: &dyn MapOracle,
        domain: MovementDomain,
        cell: Position,
        mover: UnitId,
    ) -> bool {
        map.tile(cell)
            .is_some_and(|tile| domain.allows(tile.terrain()))
            && !self.is_blocked(cell, mover)
    }

    fn push(
        &mut self,
        kind: TurnResultType,
        data: impl Into<TurnResultData>,
    ) -> Result<(), CombatError> {
        self.results.push(TurnResult::new(kind, data))?;
        Ok(())
    }
}
