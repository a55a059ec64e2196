//! Error types for game configuration and rendering

use thiserror::Error;

use crate::sprites::SpriteKey;

/// Errors surfaced by the game core
///
/// Configuration variants are fatal at startup. Gameplay outcomes (win, lose,
/// pause) are never errors; they are verdicts.
#[derive(Debug, Error)]
pub enum GameError {
    /// A level needs a sprite the catalog does not provide
    #[error("sprite catalog has no entry for {0}")]
    MissingSprite(SpriteKey),

    /// Sprite entry with unusable dimensions or source
    #[error("sprite {key} is malformed: {reason}")]
    InvalidSprite { key: SpriteKey, reason: String },

    /// Tuning values out of range
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Tuning JSON could not be parsed, or a snapshot could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// External command named a verdict that does not exist
    #[error("unknown verdict: {0:?}")]
    UnknownVerdict(String),

    /// Command issued before any level was started
    #[error("no level has been started")]
    NotStarted,

    /// Drawing backend failure
    #[error("render failed: {0}")]
    Render(String),
}

/// Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;
