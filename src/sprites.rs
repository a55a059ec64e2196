//! Sprite catalog and per-level load tracking
//!
//! The catalog only knows dimensions and where each image lives. Loading is
//! done by the host, which reports completion with [`SpriteCatalog::mark_ready`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::sim::{Level, ObjectKind};

/// Key into the sprite catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpriteKey {
    pub kind: ObjectKind,
    /// Horizontally flipped variant, used when facing left
    pub mirrored: bool,
}

impl SpriteKey {
    pub const fn base(kind: ObjectKind) -> Self {
        Self {
            kind,
            mirrored: false,
        }
    }

    pub const fn mirrored(kind: ObjectKind) -> Self {
        Self {
            kind,
            mirrored: true,
        }
    }
}

impl fmt::Display for SpriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            ObjectKind::Wizard => "wizard",
            ObjectKind::Fireball => "fireball",
        };
        if self.mirrored {
            write!(f, "{name}-reversed")
        } else {
            f.write_str(name)
        }
    }
}

/// Image metadata for one sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    /// URL of the image
    pub src: String,
}

impl Sprite {
    pub fn new(width: u32, height: u32, src: impl Into<String>) -> Self {
        Self {
            width,
            height,
            src: src.into(),
        }
    }
}

/// Sprite definitions plus which of them are loaded
///
/// Loaded-state is per catalog instance, never global.
#[derive(Debug, Clone)]
pub struct SpriteCatalog {
    sprites: BTreeMap<SpriteKey, Sprite>,
    ready: BTreeSet<SpriteKey>,
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            SpriteKey::base(ObjectKind::Wizard),
            Sprite::new(61, 84, "img/wizard.gif"),
        );
        catalog.insert(
            SpriteKey::mirrored(ObjectKind::Wizard),
            Sprite::new(61, 84, "img/wizard-reversed.gif"),
        );
        catalog.insert(
            SpriteKey::base(ObjectKind::Fireball),
            Sprite::new(24, 24, "img/fireball.gif"),
        );
        catalog
    }
}

impl SpriteCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self {
            sprites: BTreeMap::new(),
            ready: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, key: SpriteKey, sprite: Sprite) {
        self.ready.remove(&key);
        self.sprites.insert(key, sprite);
    }

    pub fn get(&self, key: SpriteKey) -> Option<&Sprite> {
        self.sprites.get(&key)
    }

    /// Key to draw for an object, preferring the mirrored variant when facing
    /// left and falling back to the base sprite if there is none
    pub fn resolve(&self, kind: ObjectKind, facing_left: bool) -> SpriteKey {
        let mirrored = SpriteKey::mirrored(kind);
        if facing_left && self.sprites.contains_key(&mirrored) {
            mirrored
        } else {
            SpriteKey::base(kind)
        }
    }

    /// All catalog keys a level draws (base and any mirrored variants)
    pub fn keys_for_level(&self, level: Level) -> Vec<SpriteKey> {
        self.sprites
            .keys()
            .filter(|key| level.object_kinds().contains(&key.kind))
            .copied()
            .collect()
    }

    /// True once every sprite the level draws has loaded
    pub fn is_level_ready(&self, level: Level) -> bool {
        self.keys_for_level(level)
            .into_iter()
            .all(|key| self.is_ready(key))
    }

    /// Sprites the host still has to load before the level can start
    pub fn pending_for_level(&self, level: Level) -> Vec<(SpriteKey, Sprite)> {
        self.keys_for_level(level)
            .into_iter()
            .filter(|key| !self.is_ready(*key))
            .filter_map(|key| self.get(key).map(|s| (key, s.clone())))
            .collect()
    }

    /// Record that the host finished loading a sprite.
    /// Returns false for keys the catalog does not know.
    pub fn mark_ready(&mut self, key: SpriteKey) -> bool {
        if self.sprites.contains_key(&key) {
            self.ready.insert(key);
            true
        } else {
            false
        }
    }

    pub fn is_ready(&self, key: SpriteKey) -> bool {
        self.ready.contains(&key)
    }

    /// Startup check: every level has a base sprite for each kind it uses
    /// and every entry is drawable
    pub fn validate(&self) -> Result<()> {
        for level in Level::SEQUENCE {
            for &kind in level.object_kinds() {
                let key = SpriteKey::base(kind);
                if !self.sprites.contains_key(&key) {
                    return Err(GameError::MissingSprite(key));
                }
            }
        }

        for (key, sprite) in &self.sprites {
            if sprite.width == 0 || sprite.height == 0 {
                return Err(GameError::InvalidSprite {
                    key: *key,
                    reason: format!("dimensions {}x{}", sprite.width, sprite.height),
                });
            }
            if sprite.src.trim().is_empty() {
                return Err(GameError::InvalidSprite {
                    key: *key,
                    reason: "empty source".to_string(),
                });
            }
        }

        Ok(())
    }
}
