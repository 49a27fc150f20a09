//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults, so an empty file yields
    /// [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        anyhow::ensure!(
            config.fleeing_hp >= 0,
            "fleeing_hp must not be negative (got {})",
            config.fleeing_hp
        );
        anyhow::ensure!(
            config.enemy_wake_percent <= 100,
            "enemy_wake_percent must be at most 100 (got {})",
            config.enemy_wake_percent
        );
        for (name, range) in [
            ("acid_damage", config.acid_damage),
            ("bomb_damage", config.bomb_damage),
            ("electric_damage", config.electric_damage),
        ] {
            anyhow::ensure!(
                range.min <= range.max,
                "{name}: min {} exceeds max {}",
                range.min,
                range.max
            );
            anyhow::ensure!(
                range.max <= config.max_damage,
                "{name}: max {} exceeds max_damage {}",
                range.max,
                config.max_damage
            );
        }
        Ok(config)
    }
}
