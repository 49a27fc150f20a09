use std::fs;
use std::path::PathBuf;

use combat_content::{ContentFactory, LoadedContent};
use combat_core::unit::Attackable;
use combat_core::{
    CharacterClass, CharacterStats, CombatEncounter, CombatUnit, Equipment, GameRng,
    InventoryOracle, MoonPhase, NonAttackingKind, PlayerUnit, Position, SpeciesOracle, SpriteIndex,
    TurnResults,
};

fn shipped_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn party(content: &LoadedContent, size: usize) -> Vec<PlayerUnit> {
    let names = ["Avatar", "Shamino", "Iolo", "Dupre", "Geoffrey", "Jaana"];
    names
        .iter()
        .take(size)
        .enumerate()
        .map(|(index, name)| {
            let weapon = content.inventory.combat_item("short sword").unwrap();
            PlayerUnit::new(
                *name,
                CharacterClass::Fighter,
                index,
                CharacterStats::new(120).with_attributes(20, 20, 10),
                Position::ORIGIN,
            )
            .with_equipment(Equipment::with_weapon(weapon))
        })
        .collect()
}

#[test]
fn shipped_content_loads() {
    let factory = ContentFactory::new(shipped_data());
    let content = factory.load_all().unwrap();

    assert_eq!(content.species.len(), 13);
    let orc = content.species.template(SpriteIndex(332)).unwrap();
    assert_eq!(orc.name, "orc");
    assert_eq!(orc.plural_name, "orcs");

    // Animation frames resolve to the key sprite.
    let frame = content.species.template(SpriteIndex(334)).unwrap();
    assert_eq!(frame.sprite, SpriteIndex(332));

    assert_eq!(content.inventory.candidates(SpriteIndex(259)).len(), 3);
    assert_eq!(content.inventory.combat_item("bow").unwrap().range, 4);
    assert_eq!(content.config.fleeing_hp, 24);
}

#[test]
fn shipped_maps_populate_an_encounter() {
    let factory = ContentFactory::new(shipped_data());
    let content = factory.load_all().unwrap();
    let mut rng = GameRng::new(3);

    let camp = factory.load_map("camp").unwrap();
    let mut encounter = CombatEncounter::new(content.env(&camp));
    let deployed = camp.deploy_party(&mut encounter, party(&content, 4));
    assert_eq!(deployed.len(), 4);
    assert_eq!(encounter.position(deployed[0]).unwrap(), Position::new(1, 3));
    let spawned = camp.spawn_units(&mut encounter, &mut rng).unwrap();
    assert_eq!(spawned.len(), 4);

    let room = factory.load_map("dungeon_room").unwrap();
    let mut encounter = CombatEncounter::new(content.env(&room));
    let deployed = room.deploy_party(&mut encounter, party(&content, 6));
    assert_eq!(deployed.len(), 4);
    let spawned = room.spawn_units(&mut encounter, &mut rng).unwrap();
    assert_eq!(spawned.len(), 9);

    let kinds: Vec<&NonAttackingKind> = encounter
        .units()
        .iter()
        .filter_map(CombatUnit::as_non_attacking)
        .map(|object| object.kind())
        .collect();
    assert!(kinds.contains(&&NonAttackingKind::Chest));
    assert!(kinds.contains(&&NonAttackingKind::ItemStack));
    assert!(kinds.contains(&&NonAttackingKind::Moonstone(MoonPhase::FullMoon)));

    let buried = encounter
        .units()
        .iter()
        .filter_map(CombatUnit::as_non_attacking)
        .find(|object| matches!(object.kind(), NonAttackingKind::DiscoverableLoot { .. }))
        .unwrap();
    assert!(buried.is_invisible());
    assert_eq!(buried.position(), Position::new(6, 6));
    assert_eq!(buried.items().unwrap().len(), 2);
    assert_eq!(buried.alternate().unwrap().kind(), &NonAttackingKind::DeadBody);
}

#[test]
fn missing_map_is_an_error() {
    let factory = ContentFactory::new(shipped_data());
    let err = factory.load_map("nowhere").unwrap_err();
    assert!(err.to_string().contains("nowhere.ron"));
}

fn write_content(dir: &std::path::Path, config: &str) {
    fs::write(dir.join("config.toml"), config).unwrap();
    fs::write(
        dir.join("species.ron"),
        r#"(species: [(
            sprite: 320,
            name: "wolf",
            stats: (strength: 8, dexterity: 16, damage: 5, hit_points: 20),
            experience: 4,
            attack_range: 1,
            movement: "LAND",
        )])"#,
    )
    .unwrap();
    fs::write(
        dir.join("inventory.ron"),
        r#"(items: [
            (name: "gold", kind: Gold, sprite: 258),
            (name: "food", kind: Food, sprite: 271),
        ])"#,
    )
    .unwrap();
    fs::create_dir(dir.join("maps")).unwrap();
    fs::write(
        dir.join("maps").join("pen.ron"),
        r#"(rows: ["....", "....", "...."], party: [(0, 1)], enemies: [(3, 1, 320)])"#,
    )
    .unwrap();
}

#[test]
fn content_directory_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_content(
        dir.path(),
        "fleeing_hp = 5\n\n[loot]\nchest = [258]\nremains = [258, 271]\n",
    );

    let factory = ContentFactory::new(dir.path());
    let content = factory.load_all().unwrap();
    assert_eq!(content.config.fleeing_hp, 5);
    assert_eq!(content.config.loot.chest, vec![SpriteIndex(258)]);
    assert_eq!(content.species.len(), 1);

    let pen = factory.load_map("pen").unwrap();
    assert_eq!(pen.enemies()[0].sprite, SpriteIndex(320));
}

#[test]
fn loot_sprite_without_inventory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_content(dir.path(), "[loot]\nchest = [258, 300]\nremains = [258]\n");

    let err = ContentFactory::new(dir.path()).load_all().unwrap_err();
    assert!(err.to_string().contains("300"));
}

fn run_room(seed: u64, rounds: u32) -> (TurnResults, Vec<CombatUnit>) {
    let factory = ContentFactory::new(shipped_data());
    let content = factory.load_all().unwrap();
    let room = factory.load_map("dungeon_room").unwrap();
    let mut rng = GameRng::new(seed);

    let mut encounter = CombatEncounter::new(content.env(&room));
    room.deploy_party(&mut encounter, party(&content, 4));
    room.spawn_units(&mut encounter, &mut rng).unwrap();
    for _ in 0..rounds {
        if encounter.is_finished() {
            break;
        }
        encounter.advance_enemies(&mut rng).unwrap();
    }
    (encounter.results().clone(), encounter.units().to_vec())
}

#[test]
fn seeded_room_is_reproducible() {
    let (first_log, first_units) = run_room(99, 20);
    let (second_log, second_units) = run_room(99, 20);

    assert!(first_log.has_result());
    assert_eq!(first_log, second_log);
    assert_eq!(first_units, second_units);

    for unit in &first_units {
        if !matches!(unit, CombatUnit::NonAttacking(_)) {
            let stats = unit.stats();
            assert!((0..=stats.maximum_hp()).contains(&stats.current_hp()));
        }
    }
    // Only the enemies act, so the party is still on its slots.
    let slots = [
        Position::new(1, 1),
        Position::new(1, 2),
        Position::new(2, 1),
        Position::new(2, 2),
    ];
    for (unit, slot) in first_units.iter().zip(slots) {
        assert_eq!(unit.as_player().unwrap().core.position, slot);
    }
}
