//! Rendering interface
//!
//! The core decides what to draw and when; a backend implementing
//! [`Renderer`] puts pixels on screen. `canvas` is the browser backend,
//! `headless` records draw calls for the native build and tests.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use headless::{DrawCommand, HeadlessRenderer};

use crate::error::Result;
use crate::sim::{FrameState, Verdict};
use crate::sprites::{SpriteCatalog, SpriteKey};
use crate::stats::RunStatistics;
use crate::tuning::Playfield;

/// Look of an overlay panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStyle {
    /// Short status message (pause, intro, lost)
    Notice,
    /// Win screen with a statistics table
    Statistics,
}

/// Drawing backend
pub trait Renderer {
    /// Wipe the viewport
    fn clear(&mut self, width: f32, height: f32) -> Result<()>;

    /// Draw a loaded sprite scaled to the given rectangle
    fn draw_sprite(&mut self, key: SpriteKey, x: f32, y: f32, width: f32, height: f32)
        -> Result<()>;

    /// Draw a message panel over the scene, one entry per line
    fn draw_overlay_message(&mut self, lines: &[String], style: OverlayStyle) -> Result<()>;
}

/// Draw every live object in insertion order
pub fn draw_scene<R: Renderer + ?Sized>(
    renderer: &mut R,
    catalog: &SpriteCatalog,
    state: &FrameState,
    field: &Playfield,
) -> Result<()> {
    renderer.clear(field.width, field.height)?;
    for object in &state.objects {
        let key = catalog.resolve(object.kind, object.direction.is_left());
        renderer.draw_sprite(key, object.pos.x, object.pos.y, object.size.x, object.size.y)?;
    }
    Ok(())
}

/// Overlay text for a stopped game
pub fn overlay_for(verdict: Verdict, stats: Option<&RunStatistics>) -> (Vec<String>, OverlayStyle) {
    let lines = |text: &[&str]| text.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    match verdict {
        Verdict::Win => {
            let mut out = lines(&["You have defeated Gazebo!", "Hooray!"]);
            match stats {
                Some(stats) => {
                    out.extend(stats.lines());
                    (out, OverlayStyle::Statistics)
                }
                None => (out, OverlayStyle::Notice),
            }
        }
        Verdict::Fail => (lines(&["You lost!"]), OverlayStyle::Notice),
        Verdict::Pause | Verdict::Continue => (
            lines(&["Pause game!", "Press Space to continue"]),
            OverlayStyle::Notice,
        ),
        Verdict::Intro => (
            lines(&["Welcome!", "Press Space to start the game"]),
            OverlayStyle::Notice,
        ),
    }
}

/// Colors for overlay panels
pub mod colors {
    pub const PANEL_SHADOW: &str = "rgba(0, 0, 0, 0.7)";
    pub const PANEL: &str = "rgba(255, 255, 255, 1.0)";
    pub const TEXT: &str = "#000";
    pub const FONT: &str = "16px PT Mono";
}
