//! Renderer that records draw calls instead of drawing

use super::{OverlayStyle, Renderer};
use crate::error::{GameError, Result};
use crate::sprites::SpriteKey;

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Sprite { key: SpriteKey, x: f32, y: f32, width: f32, height: f32 },
    Overlay { lines: Vec<String>, style: OverlayStyle },
}

/// Off-screen renderer for native runs and tests
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub commands: Vec<DrawCommand>,
    /// Make the next draw call fail (exercises error paths)
    pub fail_next: bool,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprite keys drawn, in order
    pub fn sprites(&self) -> Vec<SpriteKey> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { key, .. } => Some(*key),
                _ => None,
            })
            .collect()
    }

    /// Most recent overlay, if any
    pub fn last_overlay(&self) -> Option<&[String]> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Overlay { lines, .. } => Some(lines.as_slice()),
            _ => None,
        })
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
    }

    fn record(&mut self, command: DrawCommand) -> Result<()> {
        if std::mem::take(&mut self.fail_next) {
            return Err(GameError::Render("headless renderer told to fail".to_string()));
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Renderer for HeadlessRenderer {
    fn clear(&mut self, width: f32, height: f32) -> Result<()> {
        self.record(DrawCommand::Clear { width, height })
    }

    fn draw_sprite(&mut self, key: SpriteKey, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.record(DrawCommand::Sprite {
            key,
            x,
            y,
            width,
            height,
        })
    }

    fn draw_overlay_message(&mut self, lines: &[String], style: OverlayStyle) -> Result<()> {
        for line in lines {
            log::info!("| {line}");
        }
        self.record(DrawCommand::Overlay {
            lines: lines.to_vec(),
            style,
        })
    }
}
