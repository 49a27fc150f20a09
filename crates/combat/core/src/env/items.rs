use crate::env::{MissileType, SpriteIndex};

/// Inventory oracle: the game's item reference tables and item factory.
pub trait InventoryOracle: Send + Sync {
    /// All inventory references whose map sprite matches `sprite`.
    fn candidates(&self, sprite: SpriteIndex) -> Vec<InventoryReference>;

    /// Builds a concrete item for a reference.
    fn create_item(&self, reference: &InventoryReference) -> InventoryItem {
        InventoryItem::new(reference.clone(), 1)
    }

    /// Attack and defense numbers for an equippable item.
    fn combat_item(&self, name: &str) -> Option<CombatItemReference>;
}

/// Broad inventory category.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum InventoryKind {
    Gold,
    Potion,
    Scroll,
    Weapon,
    Shield,
    Key,
    Gem,
    Helm,
    Ring,
    Armour,
    Amulet,
    Torch,
    Food,
    Reagent,
    Moonstone,
}

/// Static description of an inventory item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryReference {
    pub name: String,
    pub kind: InventoryKind,
    pub sprite: SpriteIndex,
}

impl InventoryReference {
    pub fn new(name: impl Into<String>, kind: InventoryKind, sprite: SpriteIndex) -> Self {
        Self {
            name: name.into(),
            kind,
            sprite,
        }
    }
}

/// A concrete item with a quantity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryItem {
    pub reference: InventoryReference,
    pub quantity: u16,
}

impl InventoryItem {
    pub fn new(reference: InventoryReference, quantity: u16) -> Self {
        Self {
            reference,
            quantity,
        }
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }
}

/// Combat numbers for a weapon, shield or armour piece.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatItemReference {
    pub name: String,
    pub attack: i32,
    pub defense: i32,
    /// Reach in tiles; melee weapons have range 1.
    pub range: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub missile: MissileType,
}
