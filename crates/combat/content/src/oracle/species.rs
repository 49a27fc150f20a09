use std::collections::HashMap;
use std::sync::Arc;

use combat_core::{SpeciesOracle, SpeciesTemplate, SpriteIndex};

/// [`SpeciesOracle`] backed by templates keyed by their key sprite.
///
/// Lookups accept any animation frame of a species, not only the key
/// sprite.
#[derive(Debug, Default)]
pub struct SpeciesTable {
    templates: HashMap<SpriteIndex, Arc<SpeciesTemplate>>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template. Returns `false` and keeps the existing entry when the
    /// sprite is already taken.
    pub fn insert(&mut self, template: SpeciesTemplate) -> bool {
        if self.templates.contains_key(&template.sprite) {
            return false;
        }
        self.templates.insert(template.sprite, Arc::new(template));
        true
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates sorted by sprite.
    pub fn iter(&self) -> impl Iterator<Item = &SpeciesTemplate> {
        let mut all: Vec<&SpeciesTemplate> = self.templates.values().map(Arc::as_ref).collect();
        all.sort_by_key(|template| template.sprite);
        all.into_iter()
    }

    fn key_sprite(sprite: SpriteIndex) -> SpriteIndex {
        let first = SpeciesTemplate::FIRST_SPRITE;
        let frames = SpeciesTemplate::FRAMES_PER_SPRITE;
        if sprite.0 < first {
            return sprite;
        }
        SpriteIndex(first + (sprite.0 - first) / frames * frames)
    }
}

impl SpeciesOracle for SpeciesTable {
    fn template(&self, sprite: SpriteIndex) -> Option<Arc<SpeciesTemplate>> {
        self.templates
            .get(&sprite)
            .or_else(|| self.templates.get(&Self::key_sprite(sprite)))
            .cloned()
    }
}
