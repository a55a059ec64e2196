//! Fireball Wizard - a canvas arcade game
//!
//! Core modules:
//! - `sim`: Frame simulation (objects, behaviors, level rules, tick)
//! - `game`: Game state machine (intro, running, paused, won, lost)
//! - `renderer`: Renderer interface and scene/overlay composition
//! - `platform`: Browser wiring (canvas, images, keyboard, visibility)
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod game;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod sprites;
pub mod stats;
pub mod tuning;

pub use error::{GameError, Result};
pub use game::{Game, GamePhase, GameSnapshot, StartOutcome};
pub use input::{Key, PressedKeys};
pub use sprites::{Sprite, SpriteCatalog, SpriteKey};
pub use stats::RunStatistics;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Wall-clock milliseconds per simulation time unit (speeds are px/unit)
    pub const TIME_UNIT_MS: f64 = 10.0;

    /// Session length after which the run is failed (3 minutes)
    pub const SESSION_LIMIT_MS: f64 = 3.0 * 60.0 * 1000.0;

    /// Default playfield dimensions
    pub const FIELD_WIDTH: f32 = 700.0;
    pub const FIELD_HEIGHT: f32 = 300.0;

    /// Intro level target: a fireball must leave the field past this corner
    pub const INTRO_TARGET_MAX_X: f32 = 10.0;
    pub const INTRO_TARGET_MIN_Y: f32 = 240.0;
}
