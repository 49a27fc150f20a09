//! In-memory oracles and a scripted random source for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::env::{
    CombatItemReference, InventoryKind, InventoryOracle, InventoryReference, MapDimensions,
    MapOracle, MissileType, RngOracle, SpeciesOracle, SpeciesTemplate, SpriteIndex, StaticTile,
    TerrainKind,
};
use crate::state::Position;

/// Replays a fixed list of raw values, then yields zeros.
#[derive(Debug, Default)]
pub struct ScriptedRng {
    values: VecDeque<u32>,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.values.pop_front().unwrap_or(0)
    }
}

/// Inventory tables covering the default loot tables.
#[derive(Debug, Default)]
pub struct TestInventory {
    by_sprite: HashMap<SpriteIndex, Vec<InventoryReference>>,
    combat: HashMap<String, CombatItemReference>,
}

impl TestInventory {
    pub fn standard() -> Self {
        let mut inventory = Self::default();
        let kinds = [
            (258, InventoryKind::Gold, "gold"),
            (259, InventoryKind::Potion, "cure potion"),
            (260, InventoryKind::Scroll, "light scroll"),
            (261, InventoryKind::Weapon, "dagger"),
            (262, InventoryKind::Shield, "small shield"),
            (263, InventoryKind::Key, "key"),
            (264, InventoryKind::Gem, "gem"),
            (265, InventoryKind::Helm, "leather helm"),
            (266, InventoryKind::Ring, "ring"),
            (267, InventoryKind::Armour, "cloth armour"),
            (268, InventoryKind::Amulet, "amulet"),
            (269, InventoryKind::Torch, "torch"),
            (271, InventoryKind::Food, "food"),
        ];
        for (sprite, kind, name) in kinds {
            inventory.add(InventoryReference::new(name, kind, SpriteIndex(sprite)));
        }
        inventory.add(InventoryReference::new(
            "heal potion",
            InventoryKind::Potion,
            SpriteIndex(259),
        ));
        inventory.add_combat_item(CombatItemReference {
            name: "dagger".into(),
            attack: 8,
            defense: 0,
            range: 1,
            missile: MissileType::None,
        });
        inventory.add_combat_item(CombatItemReference {
            name: "bow".into(),
            attack: 10,
            defense: 0,
            range: 5,
            missile: MissileType::Arrow,
        });
        inventory
    }

    pub fn add(&mut self, reference: InventoryReference) {
        self.by_sprite
            .entry(reference.sprite)
            .or_default()
            .push(reference);
    }

    pub fn add_combat_item(&mut self, item: CombatItemReference) {
        self.combat.insert(item.name.clone(), item);
    }
}

impl InventoryOracle for TestInventory {
    fn candidates(&self, sprite: SpriteIndex) -> Vec<InventoryReference> {
        self.by_sprite.get(&sprite).cloned().unwrap_or_default()
    }

    fn combat_item(&self, name: &str) -> Option<CombatItemReference> {
        self.combat.get(name).cloned()
    }
}

#[derive(Debug, Default)]
pub struct TestSpecies {
    templates: HashMap<SpriteIndex, Arc<SpeciesTemplate>>,
}

impl TestSpecies {
    pub fn with(mut self, template: SpeciesTemplate) -> Self {
        self.templates.insert(template.sprite, Arc::new(template));
        self
    }
}

impl SpeciesOracle for TestSpecies {
    fn template(&self, sprite: SpriteIndex) -> Option<Arc<SpeciesTemplate>> {
        self.templates.get(&sprite).cloned()
    }
}

/// Floor everywhere except the listed cells.
#[derive(Debug)]
pub struct TestMap {
    dimensions: MapDimensions,
    overrides: HashMap<Position, TerrainKind>,
}

impl TestMap {
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
            overrides: HashMap::new(),
        }
    }

    pub fn with_terrain(mut self, position: Position, terrain: TerrainKind) -> Self {
        self.overrides.insert(position, terrain);
        self
    }
}

impl MapOracle for TestMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        if !self.dimensions.contains(position) {
            return None;
        }
        let terrain = self
            .overrides
            .get(&position)
            .copied()
            .unwrap_or(TerrainKind::Floor);
        Some(StaticTile::new(terrain))
    }
}
