//! Game balance and playfield configuration
//!
//! Every value the hosting page may override lives here. Defaults match the
//! standalone game; `demo_page` is the preset the character-setup page uses.

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::error::{GameError, Result};

/// Playfield bounds in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Where the wizard starts along one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// A fraction of the field extent (0.0 = left/top edge)
    Fraction { of_field: f32 },
    /// Centered: (field - object) / 2
    Centered,
    /// Fixed distance back from the far edge (right/bottom)
    FromFarEdge { offset: f32 },
}

impl Placement {
    /// Resolve to a coordinate for an object of `extent` in a field of `field`
    pub fn resolve(&self, field: f32, extent: f32) -> f32 {
        match *self {
            Placement::Fraction { of_field } => field * of_field,
            Placement::Centered => (field - extent) / 2.0,
            Placement::FromFarEdge { offset } => field - offset,
        }
    }
}

/// Wizard (player character) tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardTuning {
    /// Pixels per time unit
    pub speed: f32,
    pub width: f32,
    /// Height as a multiple of width (sprite aspect)
    pub height_ratio: f32,
    pub start_x: Placement,
    pub start_y: Placement,
}

impl WizardTuning {
    pub fn height(&self) -> f32 {
        self.width * self.height_ratio
    }
}

/// Fireball (projectile) tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireballTuning {
    /// Square side length
    pub size: f32,
    /// Speed when cast to the left (pixels per time unit)
    pub speed_left: f32,
    /// Speed when cast to the right
    pub speed_right: f32,
}

impl FireballTuning {
    pub fn speed(&self, moving_left: bool) -> f32 {
        if moving_left {
            self.speed_left
        } else {
            self.speed_right
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub field: Playfield,
    pub wizard: WizardTuning,
    pub fireball: FireballTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field: Playfield::default(),
            wizard: WizardTuning {
                speed: 2.0,
                width: 61.0,
                height_ratio: 1.377,
                start_x: Placement::Fraction { of_field: 1.0 / 3.0 },
                start_y: Placement::FromFarEdge { offset: 100.0 },
            },
            fireball: FireballTuning {
                size: 24.0,
                speed_left: 2.0,
                speed_right: 5.0,
            },
        }
    }
}

impl Tuning {
    /// Preset used by the character setup page
    pub fn demo_page() -> Self {
        Self {
            field: Playfield::default(),
            wizard: WizardTuning {
                speed: 3.0,
                width: 70.0,
                height_ratio: 1.337,
                start_x: Placement::Centered,
                start_y: Placement::Fraction { of_field: 1.0 / 3.0 },
            },
            fireball: FireballTuning {
                size: 22.0,
                speed_left: 2.0,
                speed_right: 5.0,
            },
        }
    }

    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("field.width", self.field.width),
            ("field.height", self.field.height),
            ("wizard.width", self.wizard.width),
            ("wizard.height_ratio", self.wizard.height_ratio),
            ("fireball.size", self.fireball.size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidTuning(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let speeds = [
            ("wizard.speed", self.wizard.speed),
            ("fireball.speed_left", self.fireball.speed_left),
            ("fireball.speed_right", self.fireball.speed_right),
        ];
        for (name, value) in speeds {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GameError::InvalidTuning(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if self.wizard.width > self.field.width || self.wizard.height() > self.field.height {
            return Err(GameError::InvalidTuning(
                "wizard does not fit in the playfield".to_string(),
            ));
        }

        Ok(())
    }

    /// Wizard start position, already inside the field
    pub fn wizard_start(&self) -> (f32, f32) {
        let w = &self.wizard;
        let x = w.start_x.resolve(self.field.width, w.width);
        let y = w.start_y.resolve(self.field.height, w.height());
        (
            x.clamp(0.0, self.field.width - w.width),
            y.clamp(0.0, self.field.height - w.height()),
        )
    }
}
