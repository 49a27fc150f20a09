//! Species table loader.

use std::path::Path;

use combat_core::SpeciesTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::oracle::SpeciesTable;

/// Species catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesCatalog {
    pub species: Vec<SpeciesTemplate>,
}

/// Loader for species templates from RON files.
pub struct SpeciesLoader;

impl SpeciesLoader {
    /// Load and validate every species template in a RON file.
    ///
    /// # Errors
    ///
    /// Fails on unreadable or malformed files, on a template that does not
    /// pass [`SpeciesTemplate::validate`], and on two templates sharing a
    /// sprite.
    pub fn load(path: &Path) -> LoadResult<SpeciesTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SpeciesTable> {
        let catalog: SpeciesCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse species RON: {}", e))?;

        let mut table = SpeciesTable::new();
        for mut template in catalog.species {
            if template.plural_name.is_empty() {
                template.plural_name = format!("{}s", template.name);
            }
            template
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid species '{}': {}", template.name, e))?;
            let sprite = template.sprite;
            if !table.insert(template) {
                anyhow::bail!("Duplicate species sprite {}", sprite);
            }
        }

        tracing::debug!(target: "combat::content", species = table.len(), "loaded species");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{MissileType, MovementDomain, SpeciesAbilities, SpeciesOracle, SpriteIndex};

    use super::*;

    const BATS: &str = r#"(
        species: [
            (
                sprite: 320,
                name: "bat",
                stats: (strength: 4, dexterity: 20, hit_points: 6, damage: 2),
                experience: 2,
                attack_range: 1,
                movement: "LAND | FLIES_OVER_WATER",
            ),
            (
                sprite: 324,
                name: "gazer",
                plural_name: "gazers",
                stats: (strength: 10, dexterity: 12, hit_points: 30, damage: 8),
                attack_range: 4,
                abilities: "RANGED_MAGIC",
                movement: "LAND",
            ),
        ],
    )"#;

    #[test]
    fn parses_templates_with_defaults() {
        let table = SpeciesLoader::parse(BATS).unwrap();
        assert_eq!(table.len(), 2);

        let bat = table.template(SpriteIndex(320)).unwrap();
        assert_eq!(bat.plural_name, "bats");
        assert_eq!(bat.stats.armour, 0);
        assert_eq!(bat.missile, MissileType::None);
        assert!(bat.movement.contains(MovementDomain::FLIES_OVER_WATER));

        let gazer = table.template(SpriteIndex(324)).unwrap();
        assert_eq!(gazer.experience, 0);
        assert!(gazer.has_ability(SpeciesAbilities::RANGED_MAGIC));
    }

    #[test]
    fn invalid_template_names_the_species() {
        let broken = r#"(species: [(
            sprite: 328, name: "archer", stats: (hit_points: 5), attack_range: 1,
            missile: Arrow, movement: "LAND",
        )])"#;
        let err = SpeciesLoader::parse(broken).unwrap_err();
        assert!(err.to_string().contains("archer"));
    }

    #[test]
    fn duplicate_sprite_is_rejected() {
        let twice = r#"(species: [
            (sprite: 320, name: "rat", stats: (hit_points: 5), attack_range: 1, movement: "LAND"),
            (sprite: 320, name: "bat", stats: (hit_points: 5), attack_range: 1, movement: "LAND"),
        ])"#;
        assert!(SpeciesLoader::parse(twice).is_err());
    }
}
