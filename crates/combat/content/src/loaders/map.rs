//! Combat map loader.
//!
//! Maps are drawn as rows of characters, one per tile:
//!
//! | char | terrain |
//! |------|---------|
//! | `.`  | floor   |
//! | `:`  | sand    |
//! | `~`  | water   |
//! | `#`  | wall    |
//! | ` `  | void    |
//!
//! Unit placement follows as `(x, y)` party slots, `(x, y, sprite)` enemies
//! and `(x, y, sprite)` map objects. Optional `hidden` entries bury loot
//! under a cell:
//!
//! ```ron
//! hidden: [(x: 4, y: 2, items: [258, 271], remains: Some(286))],
//! moonstones: [(6, 1, FullMoon)],
//! ```
//!
//! `remains` is the dead body (286) or blood spatter (287) sprite left behind
//! once the loot is found.

use std::path::Path;

use combat_core::loot::{BLOOD_SPATTER, DEAD_BODY};
use combat_core::{
    MapDimensions, MoonPhase, NonAttackingKind, Position, SpriteIndex, StaticTile, TerrainKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::oracle::{CombatMap, HiddenLoot, Placement};

/// Map data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    rows: Vec<String>,
    #[serde(default)]
    party: Vec<(i32, i32)>,
    #[serde(default)]
    enemies: Vec<(i32, i32, u16)>,
    #[serde(default)]
    objects: Vec<(i32, i32, u16)>,
    #[serde(default)]
    hidden: Vec<HiddenLootRon>,
    #[serde(default)]
    moonstones: Vec<(i32, i32, MoonPhase)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HiddenLootRon {
    x: i32,
    y: i32,
    #[serde(default)]
    items: Vec<u16>,
    #[serde(default)]
    remains: Option<u16>,
}

/// Loader for combat maps from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a combat map from a RON file.
    pub fn load(path: &Path) -> LoadResult<CombatMap> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatMap> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let height = data.rows.len();
        let width = data.rows.first().map_or(0, |row| row.chars().count());
        anyhow::ensure!(width > 0 && height > 0, "Map has no tiles");

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in data.rows.iter().enumerate() {
            anyhow::ensure!(
                row.chars().count() == width,
                "Map row {} has {} tiles, expected {}",
                y,
                row.chars().count(),
                width
            );
            for (x, symbol) in row.chars().enumerate() {
                let terrain = terrain_for(symbol).ok_or_else(|| {
                    anyhow::anyhow!("Unknown map symbol '{}' at ({}, {})", symbol, x, y)
                })?;
                tiles.push(StaticTile::new(terrain));
            }
        }

        let dimensions = MapDimensions::new(width as u32, height as u32);
        let mut map = CombatMap::new(dimensions, tiles);

        for (x, y) in data.party {
            let position = standable(&map, x, y, "party slot")?;
            map.add_party_slot(position);
        }
        for (x, y, sprite) in data.enemies {
            let position = standable(&map, x, y, "enemy")?;
            map.add_enemy(Placement::new(position, SpriteIndex(sprite)));
        }
        for (x, y, sprite) in data.objects {
            let position = Position::new(x, y);
            anyhow::ensure!(
                dimensions.contains(position),
                "Object {} at {} is off the map",
                sprite,
                position
            );
            map.add_object(Placement::new(position, SpriteIndex(sprite)));
        }
        for hidden in data.hidden {
            let position = standable(&map, hidden.x, hidden.y, "hidden loot")?;
            let remains = hidden
                .remains
                .map(|sprite| remains_kind(SpriteIndex(sprite)))
                .transpose()?;
            anyhow::ensure!(
                !hidden.items.is_empty() || remains.is_some(),
                "Hidden loot at {} hides nothing",
                position
            );
            map.add_hidden(HiddenLoot {
                position,
                items: hidden.items.into_iter().map(SpriteIndex).collect(),
                remains,
            });
        }
        for (x, y, phase) in data.moonstones {
            let position = standable(&map, x, y, "moonstone")?;
            map.add_moonstone(position, phase);
        }
        Ok(map)
    }
}

fn terrain_for(symbol: char) -> Option<TerrainKind> {
    Some(match symbol {
        '.' => TerrainKind::Floor,
        ':' => TerrainKind::Sand,
        '~' => TerrainKind::Water,
        '#' => TerrainKind::Wall,
        ' ' => TerrainKind::Void,
        _ => return None,
    })
}

fn remains_kind(sprite: SpriteIndex) -> LoadResult<NonAttackingKind> {
    match sprite {
        DEAD_BODY => Ok(NonAttackingKind::DeadBody),
        BLOOD_SPATTER => Ok(NonAttackingKind::BloodSpatter),
        other => anyhow::bail!("Sprite {} is not a body or blood spatter", other),
    }
}

fn standable(map: &CombatMap, x: i32, y: i32, what: &str) -> LoadResult<Position> {
    let position = Position::new(x, y);
    let tile = map
        .tile_at(position)
        .ok_or_else(|| anyhow::anyhow!("{} at {} is off the map", what, position))?;
    anyhow::ensure!(
        !matches!(tile.terrain(), TerrainKind::Wall | TerrainKind::Void),
        "{} at {} stands on {}",
        what,
        position,
        tile.terrain()
    );
    Ok(position)
}
