//! Builds non-attacking map objects from sprite codes.
//!
//! | sprite      | object                         |
//! |-------------|--------------------------------|
//! | 0           | nothing                        |
//! | 257         | chest                          |
//! | 286         | dead body                      |
//! | 287         | blood spatter                  |
//! | 488..=491   | poison/sleep/fire/electric field |
//! | 492         | whirlpool                      |
//! | other       | single-item stack              |

use crate::env::{
    CombatEnv, InventoryItem, InventoryKind, InventoryReference, RngOracle, SpriteIndex,
};
use crate::loot::{
    ElementalField, ItemStack, LootError, MoonPhase, NonAttackingKind, NonAttackingUnit,
    TrapComplexity, TrapKind, odds,
};
use crate::state::Position;

pub const CHEST: SpriteIndex = SpriteIndex(257);
pub const DEAD_BODY: SpriteIndex = SpriteIndex(286);
pub const BLOOD_SPATTER: SpriteIndex = SpriteIndex(287);
pub const WHIRLPOOL: SpriteIndex = SpriteIndex(492);
pub const MOONSTONE: SpriteIndex = SpriteIndex(281);

/// Fixed chest setup used when a map specifies its chests exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChestSetup {
    pub trap: TrapKind,
    pub complexity: TrapComplexity,
    pub locked: bool,
}

/// Factory for non-attacking units, bound to a world reference context.
#[derive(Clone, Copy, Debug)]
pub struct NonAttackingUnitFactory<'a> {
    env: CombatEnv<'a>,
}

impl<'a> NonAttackingUnitFactory<'a> {
    pub fn new(env: CombatEnv<'a>) -> Self {
        Self { env }
    }

    /// Creates the object drawn with `sprite` at `position`.
    ///
    /// Returns `Ok(None)` for sprite 0.
    ///
    /// # Errors
    ///
    /// Fails with [`LootError::NoLootCandidates`] when an item sprite has no
    /// inventory references, or when the inventory oracle is missing.
    pub fn create(
        &self,
        sprite: SpriteIndex,
        position: Position,
        rng: &mut dyn RngOracle,
    ) -> Result<Option<NonAttackingUnit>, LootError> {
        if sprite == SpriteIndex::NONE {
            return Ok(None);
        }
        if let Some(field) = ElementalField::from_sprite(sprite) {
            return Ok(Some(NonAttackingUnit::new(
                NonAttackingKind::ElementalField(field),
                position,
            )));
        }
        let unit = match sprite {
            WHIRLPOOL => NonAttackingUnit::new(NonAttackingKind::Whirlpool, position),
            DEAD_BODY => self.remains(NonAttackingKind::DeadBody, position, rng)?,
            BLOOD_SPATTER => self.remains(NonAttackingKind::BloodSpatter, position, rng)?,
            CHEST => self.chest(position, rng)?,
            _ => {
                let item = self.create_stackable_item(sprite, rng)?;
                NonAttackingUnit::new(NonAttackingKind::ItemStack, position)
                    .with_items(ItemStack::from_iter([item]))
            }
        };
        tracing::debug!(
            target: "combat::loot",
            sprite = %sprite,
            x = position.x,
            y = position.y,
            name = %unit.name(),
            "created map object"
        );
        Ok(Some(unit))
    }

    /// Picks one inventory item drawn with `sprite`, uniformly at random.
    ///
    /// # Errors
    ///
    /// An empty candidate list means the reference tables are incomplete and
    /// returns [`LootError::NoLootCandidates`].
    pub fn create_stackable_item(
        &self,
        sprite: SpriteIndex,
        rng: &mut dyn RngOracle,
    ) -> Result<InventoryItem, LootError> {
        let inventory = self.env.inventory()?;
        let candidates = inventory.candidates(sprite);
        if candidates.is_empty() {
            return Err(LootError::NoLootCandidates(sprite));
        }
        let pick = rng.below(candidates.len() as u32) as usize;
        let mut item = inventory.create_item(&candidates[pick]);
        item.quantity = 1;
        Ok(item)
    }

    /// A chest with a random lock, trap and complexity, filled from the
    /// configured chest loot table.
    pub fn chest(
        &self,
        position: Position,
        rng: &mut dyn RngOracle,
    ) -> Result<NonAttackingUnit, LootError> {
        let complexity = odds::roll_chest_complexity(rng);
        let locked = odds::roll_chest_locked(rng);
        let trap = odds::roll_chest_trap(rng);
        self.chest_with(
            ChestSetup {
                trap,
                complexity,
                locked,
            },
            position,
            rng,
        )
    }

    pub fn chest_with(
        &self,
        setup: ChestSetup,
        position: Position,
        rng: &mut dyn RngOracle,
    ) -> Result<NonAttackingUnit, LootError> {
        let items = self.fill(&self.env.config().loot.chest, rng)?;
        Ok(NonAttackingUnit::new(NonAttackingKind::Chest, position)
            .with_items(items)
            .with_trap(setup.trap, setup.complexity)
            .with_lock(setup.locked))
    }

    /// A dead body or blood spatter that may be poisoned and may hold treasure.
    pub fn remains(
        &self,
        kind: NonAttackingKind,
        position: Position,
        rng: &mut dyn RngOracle,
    ) -> Result<NonAttackingUnit, LootError> {
        let trap = odds::roll_remains_trap(rng);
        let mut unit =
            NonAttackingUnit::new(kind, position).with_trap(trap, TrapComplexity::Simple);
        if odds::roll_remains_treasure(rng) {
            unit = unit.with_items(self.fill(&self.env.config().loot.remains, rng)?);
        }
        Ok(unit)
    }

    /// Hidden loot holding `items`, optionally concealing disarmed remains.
    pub fn discoverable_loot(
        &self,
        position: Position,
        items: Vec<InventoryItem>,
        alternate: Option<NonAttackingUnit>,
    ) -> NonAttackingUnit {
        let alternate = alternate
            .filter(|unit| {
                matches!(
                    unit.kind(),
                    NonAttackingKind::DeadBody | NonAttackingKind::BloodSpatter
                )
            })
            .map(|unit| Box::new(unit.with_trap(TrapKind::None, TrapComplexity::None)));
        let unit =
            NonAttackingUnit::new(NonAttackingKind::DiscoverableLoot { alternate }, position);
        if items.is_empty() {
            unit
        } else {
            unit.with_items(items.into_iter().collect())
        }
    }

    /// Hidden loot built from search sprites, one random item each.
    pub fn discoverable_loot_from_sprites(
        &self,
        position: Position,
        sprites: &[SpriteIndex],
        alternate: Option<NonAttackingUnit>,
        rng: &mut dyn RngOracle,
    ) -> Result<NonAttackingUnit, LootError> {
        let items = sprites
            .iter()
            .map(|sprite| self.create_stackable_item(*sprite, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.discoverable_loot(position, items, alternate))
    }

    pub fn moonstone(&self, phase: MoonPhase, position: Position) -> NonAttackingUnit {
        let reference = InventoryReference::new(
            format!("{phase} moonstone"),
            InventoryKind::Moonstone,
            MOONSTONE,
        );
        NonAttackingUnit::new(NonAttackingKind::Moonstone(phase), position)
            .with_items(ItemStack::from_iter([InventoryItem::new(reference, 1)]))
    }

    fn fill(
        &self,
        sprites: &[SpriteIndex],
        rng: &mut dyn RngOracle,
    ) -> Result<ItemStack, LootError> {
        sprites
            .iter()
            .map(|sprite| self.create_stackable_item(*sprite, rng))
            .collect()
    }
}
