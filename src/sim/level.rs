//! Level definitions
//!
//! A level is a closed set of variants; each one knows how to populate a
//! fresh frame state, which rules decide its outcome and which object kinds
//! it draws.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rules::{self, Rule};
use super::state::{Direction, FrameState, GameObject, Horizontal, ObjectKind};
use crate::tuning::Tuning;

const INTRO_RULES: [Rule; 1] = [rules::fence_hit];

/// Playable levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Cast a fireball into the fence in the bottom-left corner
    Intro,
}

impl Level {
    /// Play order
    pub const SEQUENCE: [Level; 1] = [Level::Intro];

    /// First level of a session
    pub const INITIAL: Level = Level::SEQUENCE[0];

    /// Populate a fresh state with the level's starting objects
    pub fn initialize(&self, state: &mut FrameState, tuning: &Tuning) {
        match self {
            Level::Intro => {
                // Wizard stands on the ground looking right
                let (x, y) = tuning.wizard_start();
                state.objects.push(GameObject::new(
                    ObjectKind::Wizard,
                    Vec2::new(x, y),
                    Vec2::new(tuning.wizard.width, tuning.wizard.height()),
                    Direction::facing(Horizontal::Right),
                    tuning.wizard.speed,
                ));
            }
        }
    }

    /// Level-specific rules, checked after the shared ones
    pub fn rules(&self) -> &'static [Rule] {
        match self {
            Level::Intro => &INTRO_RULES,
        }
    }

    /// Object kinds whose sprites must be loaded before the level starts
    pub fn object_kinds(&self) -> &'static [ObjectKind] {
        match self {
            Level::Intro => &[ObjectKind::Wizard, ObjectKind::Fireball],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Level::Intro => "Intro",
        }
    }
}
