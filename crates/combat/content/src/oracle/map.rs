use combat_core::{
    CombatConfig, CombatEncounter, CombatError, MapDimensions, MapOracle, MoonPhase,
    NonAttackingKind, NonAttackingUnit, NonAttackingUnitFactory, PlayerUnit, Position, RngOracle,
    SpriteIndex, StaticTile, UnitId,
};

/// A sprite placed at a fixed cell when the map is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub position: Position,
    pub sprite: SpriteIndex,
}

impl Placement {
    pub const fn new(position: Position, sprite: SpriteIndex) -> Self {
        Self { position, sprite }
    }
}

/// Loot that stays invisible until a party member searches its cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HiddenLoot {
    pub position: Position,
    /// One item is rolled per sprite when the map is spawned.
    pub items: Vec<SpriteIndex>,
    /// Body or blood spatter left on the cell once the loot is found.
    pub remains: Option<NonAttackingKind>,
}

/// Static combat map served through [`MapOracle`], plus the units it starts
/// with.
///
/// Terrain never changes during combat; everything that moves or can be
/// used up lives in the encounter.
#[derive(Debug, Clone)]
pub struct CombatMap {
    dimensions: MapDimensions,
    /// Row-major.
    tiles: Vec<StaticTile>,
    party_slots: Vec<Position>,
    enemies: Vec<Placement>,
    objects: Vec<Placement>,
    hidden: Vec<HiddenLoot>,
    moonstones: Vec<(Position, MoonPhase)>,
}

impl CombatMap {
    /// `tiles` must hold `width * height` entries in row-major order; missing
    /// entries read as off-map.
    pub fn new(dimensions: MapDimensions, tiles: Vec<StaticTile>) -> Self {
        Self {
            dimensions,
            tiles,
            party_slots: Vec::new(),
            enemies: Vec::new(),
            objects: Vec::new(),
            hidden: Vec::new(),
            moonstones: Vec::new(),
        }
    }

    pub fn add_party_slot(&mut self, position: Position) {
        self.party_slots.push(position);
    }

    pub fn add_enemy(&mut self, placement: Placement) {
        self.enemies.push(placement);
    }

    pub fn add_object(&mut self, placement: Placement) {
        self.objects.push(placement);
    }

    pub fn add_hidden(&mut self, hidden: HiddenLoot) {
        self.hidden.push(hidden);
    }

    pub fn add_moonstone(&mut self, position: Position, phase: MoonPhase) {
        self.moonstones.push((position, phase));
    }

    pub fn party_slots(&self) -> &[Position] {
        &self.party_slots
    }

    pub fn enemies(&self) -> &[Placement] {
        &self.enemies
    }

    pub fn objects(&self) -> &[Placement] {
        &self.objects
    }

    pub fn hidden(&self) -> &[HiddenLoot] {
        &self.hidden
    }

    pub fn moonstones(&self) -> &[(Position, MoonPhase)] {
        &self.moonstones
    }

    pub fn tile_at(&self, position: Position) -> Option<StaticTile> {
        if !self.dimensions.contains(position) {
            return None;
        }
        let index = position.y as usize * self.dimensions.width as usize + position.x as usize;
        self.tiles.get(index).copied()
    }

    /// Moves party members onto the map's party slots in roster order.
    ///
    /// Members beyond the last slot, or beyond the party size limit, stay out
    /// of the fight.
    pub fn deploy_party(
        &self,
        encounter: &mut CombatEncounter<'_>,
        party: impl IntoIterator<Item = PlayerUnit>,
    ) -> Vec<UnitId> {
        let mut ids = Vec::new();
        let mut party = party.into_iter();
        for slot in self.party_slots.iter().take(CombatConfig::MAX_PARTY) {
            let Some(mut member) = party.next() else {
                break;
            };
            member.core.position = *slot;
            ids.push(encounter.add_player(member));
        }
        let left_out = party.count();
        if left_out > 0 {
            tracing::warn!(
                target: "combat::content",
                left_out,
                slots = self.party_slots.len(),
                "not enough party slots"
            );
        }
        ids
    }

    /// Spawns the map's enemies, then its objects, hidden loot and moonstones.
    ///
    /// # Errors
    ///
    /// An enemy sprite without a species template or an item sprite without
    /// inventory references is corrupt content and fails the whole load.
    pub fn spawn_units(
        &self,
        encounter: &mut CombatEncounter<'_>,
        rng: &mut dyn RngOracle,
    ) -> Result<Vec<UnitId>, CombatError> {
        let mut ids = Vec::with_capacity(
            self.enemies.len() + self.objects.len() + self.hidden.len() + self.moonstones.len(),
        );
        for placement in &self.enemies {
            ids.push(encounter.spawn_enemy(placement.sprite, placement.position)?);
        }
        for placement in &self.objects {
            if let Some(id) = encounter.place_sprite(placement.sprite, placement.position, rng)? {
                ids.push(id);
            }
        }

        let factory = NonAttackingUnitFactory::new(encounter.env());
        for hidden in &self.hidden {
            let remains = hidden
                .remains
                .clone()
                .map(|kind| NonAttackingUnit::new(kind, hidden.position));
            let loot = factory.discoverable_loot_from_sprites(
                hidden.position,
                &hidden.items,
                remains,
                rng,
            )?;
            ids.push(encounter.place_object(loot));
        }
        for &(position, phase) in &self.moonstones {
            ids.push(encounter.place_object(factory.moonstone(phase, position)));
        }
        Ok(ids)
    }
}

impl MapOracle for CombatMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.tile_at(position)
    }
}
