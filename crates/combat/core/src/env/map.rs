use crate::state::Position;

/// Static combat grid exposing immutable terrain.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;
    fn tile(&self, position: Position) -> Option<StaticTile>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    /// True for cells on the outermost ring; fleeing units escape from here.
    pub fn is_edge(&self, position: Position) -> bool {
        self.contains(position)
            && (position.x == 0
                || position.y == 0
                || position.x == self.width as i32 - 1
                || position.y == self.height as i32 - 1)
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Immutable descriptor for a tile in the static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    terrain: TerrainKind,
    /// Pathfinder step cost for entering the tile.
    weight: u8,
}

impl StaticTile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self { terrain, weight: 1 }
    }

    pub const fn with_weight(terrain: TerrainKind, weight: u8) -> Self {
        Self { terrain, weight }
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn weight(self) -> u8 {
        self.weight
    }
}

/// Canonical terrain classes for combat tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TerrainKind {
    Floor,
    Sand,
    Water,
    Wall,
    Void,
}
