use std::collections::HashMap;

use combat_core::{CombatItemReference, InventoryOracle, InventoryReference, SpriteIndex};

/// [`InventoryOracle`] over the loaded inventory tables.
///
/// Candidates for a sprite keep their file order; loot rolls index into
/// that order.
#[derive(Debug, Default)]
pub struct InventoryCatalog {
    by_sprite: HashMap<SpriteIndex, Vec<InventoryReference>>,
    combat: HashMap<String, CombatItemReference>,
}

impl InventoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reference: InventoryReference) {
        self.by_sprite
            .entry(reference.sprite)
            .or_default()
            .push(reference);
    }

    /// Returns `false` when an item with the same name exists.
    pub fn add_combat_item(&mut self, item: CombatItemReference) -> bool {
        if self.combat.contains_key(&item.name) {
            return false;
        }
        self.combat.insert(item.name.clone(), item);
        true
    }

    pub fn sprites(&self) -> impl Iterator<Item = SpriteIndex> + '_ {
        self.by_sprite.keys().copied()
    }
}

impl InventoryOracle for InventoryCatalog {
    fn candidates(&self, sprite: SpriteIndex) -> Vec<InventoryReference> {
        self.by_sprite.get(&sprite).cloned().unwrap_or_default()
    }

    fn combat_item(&self, name: &str) -> Option<CombatItemReference> {
        self.combat.get(name).cloned()
    }
}
