//! Walkability snapshot of the combat grid and the pathfinder's node arena.

use crate::env::{MapDimensions, MapOracle, MovementDomain};
use crate::state::Position;

/// Per-mover view of which cells can be entered and at what cost.
///
/// Built fresh for each search: it bakes in the mover's movement domain and
/// the cells other units currently block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkableGrid {
    dimensions: MapDimensions,
    /// `Some(weight)` for walkable cells.
    cells: Vec<Option<u8>>,
}

impl WalkableGrid {
    /// A grid with every cell blocked.
    pub fn blocked(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![None; dimensions.area()],
        }
    }

    /// A grid with every cell walkable at weight 1.
    pub fn open(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![Some(1); dimensions.area()],
        }
    }

    /// Derives walkability from the map terrain for a mover's domain.
    ///
    /// `occupied` marks cells held by other units; they are blocked too.
    pub fn from_map(
        map: &dyn MapOracle,
        domain: MovementDomain,
        occupied: impl Fn(Position) -> bool,
    ) -> Self {
        let dimensions = map.dimensions();
        let mut grid = Self::blocked(dimensions);
        for y in 0..dimensions.height as i32 {
            for x in 0..dimensions.width as i32 {
                let position = Position::new(x, y);
                let Some(tile) = map.tile(position) else {
                    continue;
                };
                if domain.allows(tile.terrain()) && !occupied(position) {
                    grid.set(position, Some(tile.weight().max(1)));
                }
            }
        }
        grid
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.weight(position).is_some()
    }

    pub fn weight(&self, position: Position) -> Option<u8> {
        self.index(position).and_then(|index| self.cells[index])
    }

    pub fn set_walkable(&mut self, position: Position, walkable: bool) {
        self.set(position, walkable.then_some(1));
    }

    pub fn set_weight(&mut self, position: Position, weight: u8) {
        if self.is_walkable(position) {
            self.set(position, Some(weight.max(1)));
        }
    }

    fn set(&mut self, position: Position, cell: Option<u8>) {
        if let Some(index) = self.index(position) {
            self.cells[index] = cell;
        }
    }

    pub(crate) fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.dimensions.width as usize + position.x as usize)
    }
}

/// Index of a node in a search arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// One cell's bookkeeping during a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridNode {
    pub position: Position,
    pub walkable: bool,
    pub weight: i32,
    pub parent: Option<NodeId>,
    /// Accumulated step cost from the start; -1 until reached.
    pub cost: i32,
    /// Manhattan estimate to the goal; -1 until computed.
    pub distance_to_target: i32,
}

impl GridNode {
    pub const UNSET: i32 = -1;

    pub fn new(position: Position, weight: Option<u8>) -> Self {
        Self {
            position,
            walkable: weight.is_some(),
            weight: weight.map_or(1, i32::from),
            parent: None,
            cost: Self::UNSET,
            distance_to_target: Self::UNSET,
        }
    }

    /// Estimated total cost, or -1 while either component is unset.
    pub fn f(&self) -> i32 {
        if self.cost == Self::UNSET || self.distance_to_target == Self::UNSET {
            Self::UNSET
        } else {
            self.cost + self.distance_to_target
        }
    }
}
