//! Frame simulation
//!
//! All gameplay logic lives here and stays free of rendering and platform
//! concerns:
//! - Time comes in as wall-clock milliseconds from the caller
//! - Behaviors and rules are plain functions dispatched by exhaustive match
//! - Stable iteration order (insertion order of live objects)

pub mod behavior;
pub mod level;
pub mod rules;
pub mod state;
pub mod tick;

pub use level::Level;
pub use rules::{Rule, SHARED_RULES, evaluate};
pub use state::{
    Direction, FrameState, GameObject, Horizontal, Lifecycle, ObjectKind, Verdict, Vertical,
};
pub use tick::{check_status, spawn_fireball, tick, update_objects};
