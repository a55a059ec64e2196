//! Canvas 2D backend

use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::{OverlayStyle, Renderer, colors};
use crate::error::{GameError, Result};
use crate::sprites::SpriteKey;

/// Panel geometry: shadow is offset down-right from the panel
const PANEL_X: f64 = 180.0;
const PANEL_Y: f64 = 30.0;
const PANEL_WIDTH: f64 = 320.0;
const PANEL_MIN_HEIGHT: f64 = 100.0;
const SHADOW_OFFSET: f64 = 10.0;
const TEXT_X: f64 = 200.0;
const TEXT_TOP: f64 = 80.0;
const LINE_HEIGHT: f64 = 20.0;

fn js_err(what: &str, err: JsValue) -> GameError {
    GameError::Render(format!("{what}: {err:?}"))
}

/// Draws onto a `<canvas>` 2D context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    images: HashMap<SpriteKey, HtmlImageElement>,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            images: HashMap::new(),
        }
    }

    /// Register the image element for a sprite (it may still be loading)
    pub fn add_image(&mut self, key: SpriteKey, image: HtmlImageElement) {
        self.images.insert(key, image);
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self, width: f32, height: f32) -> Result<()> {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
        Ok(())
    }

    fn draw_sprite(&mut self, key: SpriteKey, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        let image = self
            .images
            .get(&key)
            .ok_or(GameError::MissingSprite(key))?;
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                x as f64,
                y as f64,
                width as f64,
                height as f64,
            )
            .map_err(|e| js_err("drawImage", e))
    }

    fn draw_overlay_message(&mut self, lines: &[String], style: OverlayStyle) -> Result<()> {
        // Statistics panels grow with the table
        let height = match style {
            OverlayStyle::Notice => PANEL_MIN_HEIGHT,
            OverlayStyle::Statistics => {
                PANEL_MIN_HEIGHT.max(TEXT_TOP - PANEL_Y + LINE_HEIGHT * lines.len() as f64)
            }
        };

        self.ctx.set_fill_style_str(colors::PANEL_SHADOW);
        self.ctx.fill_rect(
            PANEL_X + SHADOW_OFFSET,
            PANEL_Y + SHADOW_OFFSET,
            PANEL_WIDTH,
            height,
        );
        self.ctx.set_fill_style_str(colors::PANEL);
        self.ctx.fill_rect(PANEL_X, PANEL_Y, PANEL_WIDTH, height);

        self.ctx.set_fill_style_str(colors::TEXT);
        self.ctx.set_font(colors::FONT);
        for (i, line) in lines.iter().enumerate() {
            self.ctx
                .fill_text(line, TEXT_X, TEXT_TOP + LINE_HEIGHT * i as f64)
                .map_err(|e| js_err("fillText", e))?;
        }
        Ok(())
    }
}
