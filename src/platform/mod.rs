//! Platform layer
//!
//! Browser wiring lives in `web`: canvas mount, sprite loading, keyboard,
//! visibility and the animation-frame loop. Native builds drive [`crate::Game`]
//! directly with a headless renderer.

#[cfg(target_arch = "wasm32")]
pub mod web;
