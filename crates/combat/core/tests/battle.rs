use std::collections::HashMap;
use std::sync::Arc;

use combat_core::unit::{Attackable, Navigable};
use combat_core::{
    CharacterClass, CharacterStats, CombatConfig, CombatEncounter, CombatEnv, CombatItemReference,
    CombatUnit, Direction, Equipment, GameRng, InventoryKind, InventoryOracle, InventoryReference,
    MapDimensions, MapOracle, PlayerUnit, Position, SpeciesOracle, SpeciesStats, SpeciesTemplate,
    SpriteIndex, StaticTile, TerrainKind, TurnResultType, TurnResults, UnitId,
};

const ORC: SpriteIndex = SpriteIndex(332);
const MAX_ROUNDS: u32 = 100;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Species(HashMap<SpriteIndex, Arc<SpeciesTemplate>>);

impl SpeciesOracle for Species {
    fn template(&self, sprite: SpriteIndex) -> Option<Arc<SpeciesTemplate>> {
        self.0.get(&sprite).cloned()
    }
}

/// One generic item per sprite, so every loot roll finds a candidate.
struct AnyItem;

impl InventoryOracle for AnyItem {
    fn candidates(&self, sprite: SpriteIndex) -> Vec<InventoryReference> {
        vec![InventoryReference::new(format!("item {sprite}"), InventoryKind::Gold, sprite)]
    }

    fn combat_item(&self, name: &str) -> Option<CombatItemReference> {
        (name == "short sword").then(|| CombatItemReference {
            name: name.to_owned(),
            attack: 6,
            defense: 0,
            range: 1,
            missile: Default::default(),
        })
    }
}

/// Open field with a short wall in the middle.
struct Field;

impl MapOracle for Field {
    fn dimensions(&self) -> MapDimensions {
        MapDimensions::new(9, 7)
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        if !self.dimensions().contains(position) {
            return None;
        }
        let terrain = if position.x == 4 && (2..=4).contains(&position.y) {
            TerrainKind::Wall
        } else {
            TerrainKind::Floor
        };
        Some(StaticTile::new(terrain))
    }
}

fn orcs() -> Species {
    let orc = SpeciesTemplate::new(
        ORC,
        "orc",
        SpeciesStats {
            strength: 12,
            dexterity: 12,
            armour: 2,
            damage: 8,
            hit_points: 30,
            treasure: 2,
            ..SpeciesStats::default()
        },
    )
    .with_experience(8);
    Species(HashMap::from([(ORC, Arc::new(orc))]))
}

struct Outcome {
    results: TurnResults,
    units: Vec<CombatUnit>,
    rounds: u32,
}

fn party_member(name: &str, roster_index: usize, position: Position) -> PlayerUnit {
    let sword = AnyItem.combat_item("short sword").unwrap();
    PlayerUnit::new(
        name,
        CharacterClass::Fighter,
        roster_index,
        CharacterStats::new(150).with_attributes(30, 25, 10),
        position,
    )
    .with_equipment(Equipment::with_weapon(sword))
}

fn nearest_enemy(encounter: &CombatEncounter<'_>, from: Position) -> Option<(UnitId, Position)> {
    encounter
        .units()
        .iter()
        .enumerate()
        .filter(|(_, unit)| unit.is_active() && matches!(unit, CombatUnit::Hostile(_)))
        .map(|(index, unit)| (UnitId(index as u32), unit.position()))
        .min_by_key(|(_, position)| from.chebyshev(*position))
}

/// The party walks toward the nearest enemy and swings once in reach.
fn party_turn(encounter: &mut CombatEncounter<'_>, party: &[UnitId], rng: &mut GameRng) {
    for &member in party {
        let unit = encounter.unit(member).unwrap();
        if !unit.is_active() {
            continue;
        }
        let from = unit.position();
        let Some((target, at)) = nearest_enemy(encounter, from) else {
            return;
        };
        if encounter.unit(member).unwrap().can_reach_for_attack(at) {
            encounter.player_attack(member, target, rng).unwrap();
            continue;
        }
        let step = [Direction::North, Direction::South, Direction::East, Direction::West]
            .into_iter()
            .min_by_key(|direction| from.offset(*direction).manhattan(at))
            .unwrap();
        encounter.player_move(member, step, rng).unwrap();
    }
}

fn run_battle(seed: u64) -> Outcome {
    let species = orcs();
    let config = CombatConfig::default();
    let env = CombatEnv::with_all(&species, &Field, &AnyItem, &config);
    let mut encounter = CombatEncounter::new(env);
    let mut rng = GameRng::new(seed);

    let party = vec![
        encounter.add_player(party_member("Shamino", 0, Position::new(0, 2))),
        encounter.add_player(party_member("Iolo", 1, Position::new(0, 4))),
    ];
    for position in [Position::new(8, 1), Position::new(8, 3), Position::new(8, 5)] {
        encounter.spawn_enemy(ORC, position).unwrap();
    }

    while !encounter.is_finished() && encounter.round() < MAX_ROUNDS {
        party_turn(&mut encounter, &party, &mut rng);
        encounter.advance_enemies(&mut rng).unwrap();
    }

    Outcome {
        results: encounter.results().clone(),
        units: encounter.units().to_vec(),
        rounds: encounter.round(),
    }
}

#[test]
fn same_seed_replays_the_same_battle() {
    init_tracing();
    let first = run_battle(7);
    let second = run_battle(7);

    assert!(first.rounds > 0);
    assert_eq!(first.rounds, second.rounds);
    assert_eq!(first.units, second.units);
    assert_eq!(first.results, second.results);
}

#[test]
fn hit_points_stay_in_bounds() {
    init_tracing();
    for seed in [1, 2, 3, 42] {
        let outcome = run_battle(seed);
        for unit in &outcome.units {
            if let CombatUnit::Player(_) | CombatUnit::Hostile(_) = unit {
                let stats = unit.stats();
                assert!(stats.current_hp() >= 0, "seed {seed}: {} below zero", unit.name());
                assert!(stats.current_hp() <= stats.maximum_hp());
            }
        }
    }
}

#[test]
fn every_dead_enemy_is_credited_to_the_party() {
    init_tracing();
    let outcome = run_battle(11);

    let dead = outcome
        .units
        .iter()
        .filter(|unit| matches!(unit, CombatUnit::Hostile(_)) && unit.stats().is_dead())
        .count() as u32;
    let kills: u32 = outcome
        .units
        .iter()
        .filter(|unit| matches!(unit, CombatUnit::Player(_)))
        .map(|unit| unit.core().counters.kills)
        .sum();
    assert_eq!(dead, kills);

    let kill_records = outcome
        .results
        .iter()
        .filter(|result| result.kind() == TurnResultType::CombatResultEnemyKilled)
        .count() as u32;
    assert_eq!(kill_records, dead);
}

#[test]
fn recorded_moves_stay_on_the_map() {
    init_tracing();
    let outcome = run_battle(5);
    let dimensions = Field.dimensions();

    for result in outcome.results.iter() {
        if let Some(moved) = result.as_moved_position() {
            assert!(dimensions.contains(moved.moved_to()));
            assert_ne!(
                Field.tile(moved.moved_to()).map(StaticTile::terrain),
                Some(TerrainKind::Wall)
            );
        }
    }
}
