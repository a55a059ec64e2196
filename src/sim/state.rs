//! Frame state and core object types
//!
//! Everything a tick reads or writes lives in [`FrameState`].

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::input::PressedKeys;

/// Kinds of objects on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// The player character
    Wizard,
    /// A cast projectile
    Fireball,
}

/// Object lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Alive,
    /// Marked for removal; moved to garbage in the same tick
    Disposed,
}

/// Horizontal facing/movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horizontal {
    Left,
    Right,
}

/// Vertical movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vertical {
    Up,
    Down,
}

/// Direction over two independent axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Direction {
    pub horizontal: Option<Horizontal>,
    pub vertical: Option<Vertical>,
}

impl Direction {
    pub const fn facing(horizontal: Horizontal) -> Self {
        Self {
            horizontal: Some(horizontal),
            vertical: None,
        }
    }

    #[inline]
    pub fn is_left(&self) -> bool {
        self.horizontal == Some(Horizontal::Left)
    }

    #[inline]
    pub fn is_right(&self) -> bool {
        self.horizontal == Some(Horizontal::Right)
    }
}

/// An in-world entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub kind: ObjectKind,
    /// Top-left corner, canvas coordinates
    pub pos: Vec2,
    pub size: Vec2,
    pub direction: Direction,
    /// Pixels per time unit
    pub speed: f32,
    pub lifecycle: Lifecycle,
}

impl GameObject {
    pub fn new(kind: ObjectKind, pos: Vec2, size: Vec2, direction: Direction, speed: f32) -> Self {
        Self {
            kind,
            pos,
            size,
            direction,
            speed,
            lifecycle: Lifecycle::Alive,
        }
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    pub fn dispose(&mut self) {
        self.lifecycle = Lifecycle::Disposed;
    }
}

/// Outcome of evaluating the level rules for a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verdict {
    /// Round not over, keep ticking
    #[default]
    Continue,
    Win,
    Fail,
    Pause,
    Intro,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Continue => "continue",
            Verdict::Win => "win",
            Verdict::Fail => "fail",
            Verdict::Pause => "pause",
            Verdict::Intro => "intro",
        }
    }

    /// Win and fail end the round; resuming from them restarts the level
    pub fn is_terminal(&self) -> bool {
        matches!(self, Verdict::Win | Verdict::Fail)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(Verdict::Continue),
            "win" => Ok(Verdict::Win),
            "fail" | "lose" => Ok(Verdict::Fail),
            "pause" => Ok(Verdict::Pause),
            "intro" => Ok(Verdict::Intro),
            _ => Err(GameError::UnknownVerdict(s.to_string())),
        }
    }
}

/// Complete per-level state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    /// Verdict of the last rule check (or forced externally)
    pub verdict: Verdict,
    /// Live objects, in draw order
    pub objects: Vec<GameObject>,
    /// Objects disposed during the last tick
    pub garbage: Vec<GameObject>,
    pub keys: PressedKeys,
    /// Wall clock (ms) of the last completed tick; `None` restarts delta timing
    pub last_tick: Option<f64>,
    /// Wall clock (ms) when the level was (re)entered
    pub level_start: Option<f64>,
    /// Wall clock (ms) when the session began; set once
    pub game_start: Option<f64>,
}

impl FrameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live wizard, if any
    pub fn wizard(&self) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.kind == ObjectKind::Wizard)
    }

    /// Number of live objects of a kind
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }
}
