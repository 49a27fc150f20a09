//! Map objects that take no part in the fighting but carry traps and items.

use crate::config::CombatConfig;
use crate::env::{InventoryItem, RngOracle, SpriteIndex};
use crate::loot::{
    ItemStack, LootError, TrapComplexity, TrapKind, TrapOutcome, odds, trap::spring_trap,
};
use crate::state::{CharacterStats, Position, UnitId};
use crate::unit::UnitCore;

/// Kind of elemental field, keyed by its exact sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ElementalField {
    Poison,
    Sleep,
    Fire,
    Electric,
}

impl ElementalField {
    pub const fn sprite(self) -> SpriteIndex {
        SpriteIndex(match self {
            Self::Poison => 488,
            Self::Sleep => 489,
            Self::Fire => 490,
            Self::Electric => 491,
        })
    }

    pub const fn from_sprite(sprite: SpriteIndex) -> Option<Self> {
        match sprite.0 {
            488 => Some(Self::Poison),
            489 => Some(Self::Sleep),
            490 => Some(Self::Fire),
            491 => Some(Self::Electric),
            _ => None,
        }
    }

    /// Poison, sleep and electric fields hit the whole party. Fire burns only
    /// the character who walks in.
    pub const fn trap(self) -> TrapKind {
        match self {
            Self::Poison => TrapKind::PoisonAll,
            Self::Sleep => TrapKind::SleepAll,
            Self::Fire => TrapKind::Bomb,
            Self::Electric => TrapKind::ElectricAll,
        }
    }
}

/// Phase a buried moonstone belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    CrescentWaxing,
    FirstQuarter,
    GibbousWaxing,
    FullMoon,
    GibbousWaning,
    LastQuarter,
    CrescentWaning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NonAttackingKind {
    Chest,
    DeadBody,
    BloodSpatter,
    ElementalField(ElementalField),
    Whirlpool,
    ItemStack,
    Moonstone(MoonPhase),
    /// Invisible loot revealed by searching. May hide a body or blood
    /// spatter that appears once found.
    DiscoverableLoot {
        alternate: Option<Box<NonAttackingUnit>>,
    },
}

/// Result of trying to open a map object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    NotOpenable,
    Locked,
    AlreadyOpen,
    Opened { items: usize },
}

/// Result of searching a map object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    NotSearchable,
    NothingFound,
    Found { items: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonAttackingUnit {
    pub core: UnitCore,
    kind: NonAttackingKind,
    trap: TrapKind,
    complexity: TrapComplexity,
    locked: bool,
    items: Option<ItemStack>,
    exposed: bool,
    revealed: bool,
    depleted: bool,
}

impl NonAttackingUnit {
    pub fn new(kind: NonAttackingKind, position: Position) -> Self {
        let (trap, complexity) = match &kind {
            NonAttackingKind::ElementalField(field) => (field.trap(), TrapComplexity::Simple),
            _ => (TrapKind::None, TrapComplexity::None),
        };
        let exposed = matches!(
            kind,
            NonAttackingKind::ItemStack | NonAttackingKind::Moonstone(_)
        );
        Self {
            core: UnitCore::new(position, CharacterStats::default()),
            kind,
            trap,
            complexity,
            locked: false,
            items: None,
            exposed,
            revealed: false,
            depleted: false,
        }
    }

    #[must_use]
    pub fn with_items(mut self, items: ItemStack) -> Self {
        self.items = Some(items);
        self
    }

    /// Arms the object. Kinds that cannot carry traps ignore this.
    #[must_use]
    pub fn with_trap(mut self, trap: TrapKind, complexity: TrapComplexity) -> Self {
        if self.can_be_trapped() {
            self.trap = trap;
            self.complexity = if trap.is_armed() {
                complexity
            } else {
                TrapComplexity::None
            };
        }
        self
    }

    #[must_use]
    pub fn with_lock(mut self, locked: bool) -> Self {
        self.locked = locked && self.is_openable();
        self
    }

    pub fn kind(&self) -> &NonAttackingKind {
        &self.kind
    }

    pub fn position(&self) -> Position {
        self.core.position
    }

    pub fn name(&self) -> String {
        match &self.kind {
            NonAttackingKind::Chest => "chest".to_owned(),
            NonAttackingKind::DeadBody => "body".to_owned(),
            NonAttackingKind::BloodSpatter => "blood spatter".to_owned(),
            NonAttackingKind::ElementalField(field) => format!("{field} field"),
            NonAttackingKind::Whirlpool => "whirlpool".to_owned(),
            NonAttackingKind::ItemStack => self
                .items
                .as_ref()
                .and_then(ItemStack::peek)
                .map_or_else(|| "items".to_owned(), |item| item.name().to_owned()),
            NonAttackingKind::Moonstone(_) => "moonstone".to_owned(),
            NonAttackingKind::DiscoverableLoot { .. } => "hidden loot".to_owned(),
        }
    }

    pub fn is_openable(&self) -> bool {
        matches!(self.kind, NonAttackingKind::Chest)
    }

    pub fn is_searchable(&self) -> bool {
        matches!(
            self.kind,
            NonAttackingKind::Chest
                | NonAttackingKind::DeadBody
                | NonAttackingKind::BloodSpatter
                | NonAttackingKind::DiscoverableLoot { .. }
        )
    }

    pub fn exposes_items_on_open(&self) -> bool {
        matches!(self.kind, NonAttackingKind::Chest)
    }

    pub fn exposes_items_on_search(&self) -> bool {
        matches!(
            self.kind,
            NonAttackingKind::DeadBody
                | NonAttackingKind::BloodSpatter
                | NonAttackingKind::DiscoverableLoot { .. }
        )
    }

    pub fn can_be_trapped(&self) -> bool {
        matches!(
            self.kind,
            NonAttackingKind::Chest
                | NonAttackingKind::DeadBody
                | NonAttackingKind::BloodSpatter
                | NonAttackingKind::ElementalField(_)
        )
    }

    /// Terrain hazards persist even without items.
    pub fn is_hazard(&self) -> bool {
        matches!(
            self.kind,
            NonAttackingKind::ElementalField(_) | NonAttackingKind::Whirlpool
        )
    }

    pub fn is_invisible(&self) -> bool {
        matches!(self.kind, NonAttackingKind::DiscoverableLoot { .. }) && !self.revealed
    }

    pub fn trap(&self) -> TrapKind {
        self.trap
    }

    pub fn trap_complexity(&self) -> TrapComplexity {
        self.complexity
    }

    pub fn is_trapped(&self) -> bool {
        self.trap.is_armed()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn items(&self) -> Option<&ItemStack> {
        self.items.as_ref()
    }

    pub fn has_items(&self) -> bool {
        self.items.as_ref().is_some_and(ItemStack::has_items)
    }

    /// Items can be picked up once the object has been opened or searched.
    pub fn items_exposed(&self) -> bool {
        self.exposed
    }

    pub fn alternate(&self) -> Option<&NonAttackingUnit> {
        match &self.kind {
            NonAttackingKind::DiscoverableLoot { alternate } => alternate.as_deref(),
            _ => None,
        }
    }

    /// Detaches the hidden body or spatter so it can be placed on the map.
    pub fn take_alternate(&mut self) -> Option<NonAttackingUnit> {
        match &mut self.kind {
            NonAttackingKind::DiscoverableLoot { alternate } => alternate.take().map(|unit| *unit),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        match &self.kind {
            NonAttackingKind::ElementalField(_) | NonAttackingKind::Whirlpool => true,
            NonAttackingKind::DiscoverableLoot { alternate } => {
                !self.depleted && (self.has_items() || alternate.is_some())
            }
            _ => !self.depleted,
        }
    }

    /// Rolls whether the armed trap goes off for a searcher or opener.
    pub fn does_trigger_trap(&self, dexterity: i32, rng: &mut dyn RngOracle) -> bool {
        if !self.is_trapped() {
            return false;
        }
        match self.kind {
            NonAttackingKind::Chest => odds::does_trap_trigger(self.complexity, dexterity, rng),
            NonAttackingKind::DeadBody | NonAttackingKind::BloodSpatter => {
                odds::does_trap_trigger(TrapComplexity::Simple, dexterity, rng)
            }
            NonAttackingKind::ElementalField(_) => true,
            _ => false,
        }
    }

    /// Fires the trap on `target` (or the whole party) and disarms it.
    ///
    /// The descriptor is cleared before dispatch, so a second call is a no-op
    /// returning an outcome with `TrapKind::None`.
    ///
    /// # Errors
    ///
    /// Propagates [`LootError::TargetNotInParty`] from the dispatch.
    pub fn trigger_trap(
        &mut self,
        target: UnitId,
        party: &mut [(UnitId, &mut CharacterStats)],
        rng: &mut dyn RngOracle,
        config: &CombatConfig,
    ) -> Result<TrapOutcome, LootError> {
        let trap = std::mem::take(&mut self.trap);
        self.complexity = TrapComplexity::None;
        spring_trap(trap, target, party, rng, config)
    }

    /// Removes the trap without firing it.
    pub fn disarm(&mut self) {
        self.trap = TrapKind::None;
        self.complexity = TrapComplexity::None;
    }

    pub fn open(&mut self) -> OpenOutcome {
        if !self.is_openable() {
            return OpenOutcome::NotOpenable;
        }
        if self.locked {
            return OpenOutcome::Locked;
        }
        if self.exposed {
            return OpenOutcome::AlreadyOpen;
        }
        if self.exposes_items_on_open() {
            self.exposed = true;
        }
        OpenOutcome::Opened {
            items: self.items.as_ref().map_or(0, ItemStack::len),
        }
    }

    pub fn search(&mut self) -> SearchOutcome {
        if !self.is_searchable() {
            return SearchOutcome::NotSearchable;
        }
        self.revealed = true;
        if self.exposes_items_on_search() {
            self.exposed = true;
        }
        match self.items.as_ref().map_or(0, ItemStack::len) {
            0 => SearchOutcome::NothingFound,
            items => SearchOutcome::Found { items },
        }
    }

    /// Picks up the top item. Emptying a non-hazard object uses it up.
    ///
    /// # Errors
    ///
    /// Returns [`LootError::ItemsNotExposed`] before the object has been opened
    /// or searched, and [`LootError::EmptyItemStack`] when nothing is left.
    pub fn take_item(&mut self) -> Result<InventoryItem, LootError> {
        if !self.exposed {
            return Err(LootError::ItemsNotExposed);
        }
        let stack = self.items.as_mut().ok_or(LootError::EmptyItemStack)?;
        let item = stack.pop()?;
        if !stack.has_items() && !self.is_hazard() {
            self.depleted = true;
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{InventoryKind, InventoryReference};
    use crate::state::CharacterStatus;
    use crate::test_support::ScriptedRng;

    fn gold() -> InventoryItem {
        InventoryItem::new(
            InventoryReference::new("gold", InventoryKind::Gold, SpriteIndex(258)),
            1,
        )
    }

    fn chest_with_gold() -> NonAttackingUnit {
        NonAttackingUnit::new(NonAttackingKind::Chest, Position::new(2, 2))
            .with_items(ItemStack::from_iter([gold()]))
    }

    #[test]
    fn only_fire_fields_hit_a_single_character() {
        for field in [ElementalField::Poison, ElementalField::Sleep, ElementalField::Electric] {
            assert!(field.trap().is_party_wide(), "{field}");
        }
        assert!(!ElementalField::Fire.trap().is_party_wide());
    }

    #[test]
    fn trap_fires_only_once() {
        let config = CombatConfig::default();
        let mut rng = ScriptedRng::new([]);
        let mut chest =
            chest_with_gold().with_trap(TrapKind::Poison, TrapComplexity::Simple);
        let mut stats = CharacterStats::new(20);
        let mut party = [(UnitId(0), &mut stats)];

        let first = chest
            .trigger_trap(UnitId(0), &mut party, &mut rng, &config)
            .unwrap();
        assert!(first.fired());
        assert_eq!(chest.trap(), TrapKind::None);

        let second = chest
            .trigger_trap(UnitId(0), &mut party, &mut rng, &config)
            .unwrap();
        assert!(!second.fired());
        assert!(second.hits.is_empty());
        assert_eq!(stats.status(), CharacterStatus::Poisoned);
    }

    #[test]
    fn locked_chest_stays_closed() {
        let mut chest = chest_with_gold().with_lock(true);
        assert_eq!(chest.open(), OpenOutcome::Locked);
        assert_eq!(chest.take_item(), Err(LootError::ItemsNotExposed));
        chest.unlock();
        assert_eq!(chest.open(), OpenOutcome::Opened { items: 1 });
        assert_eq!(chest.open(), OpenOutcome::AlreadyOpen);
    }

    #[test]
    fn emptied_chest_is_used_up() {
        let mut chest = chest_with_gold();
        chest.open();
        assert!(chest.is_active());
        assert_eq!(chest.take_item().unwrap().name(), "gold");
        assert!(!chest.is_active());
    }

    #[test]
    fn fields_always_trigger_and_persist() {
        let field = NonAttackingUnit::new(
            NonAttackingKind::ElementalField(ElementalField::Sleep),
            Position::ORIGIN,
        );
        assert_eq!(field.trap(), TrapKind::SleepAll);
        assert!(field.does_trigger_trap(99, &mut ScriptedRng::new([])));
        assert!(field.is_active());
        assert!(!field.is_searchable());
        assert!(!field.is_openable());
    }

    #[test]
    fn whirlpool_cannot_be_trapped() {
        let whirlpool = NonAttackingUnit::new(NonAttackingKind::Whirlpool, Position::ORIGIN)
            .with_trap(TrapKind::Bomb, TrapComplexity::Complex);
        assert!(!whirlpool.is_trapped());
        assert!(!whirlpool.does_trigger_trap(0, &mut ScriptedRng::new([])));
    }

    #[test]
    fn discoverable_loot_is_revealed_by_search() {
        let body = NonAttackingUnit::new(NonAttackingKind::DeadBody, Position::ORIGIN);
        let mut loot = NonAttackingUnit::new(
            NonAttackingKind::DiscoverableLoot {
                alternate: Some(Box::new(body)),
            },
            Position::ORIGIN,
        );
        assert!(loot.is_invisible());
        assert!(loot.is_active());
        assert_eq!(loot.search(), SearchOutcome::NothingFound);
        assert!(!loot.is_invisible());
        assert!(loot.take_alternate().is_some());
        assert!(!loot.is_active());
    }

    #[test]
    fn loose_stack_name_is_top_item() {
        let stack = NonAttackingUnit::new(NonAttackingKind::ItemStack, Position::ORIGIN)
            .with_items(ItemStack::from_iter([gold()]));
        assert_eq!(stack.name(), "gold");
        assert!(stack.items_exposed());
    }
}
