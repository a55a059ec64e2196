//! Browser host: mounts a game into a page element and drives it

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlImageElement, KeyboardEvent,
    VisibilityState,
};

use crate::error::GameError;
use crate::game::{Game, StartOutcome};
use crate::input::Key;
use crate::renderer::CanvasRenderer;
use crate::sim::Verdict;
use crate::sprites::{Sprite, SpriteCatalog, SpriteKey};
use crate::tuning::Tuning;

/// Element the default entry point mounts into
pub const DEFAULT_CONTAINER: &str = ".demo";

/// Attribute holding optional tuning JSON
pub const TUNING_ATTRIBUTE: &str = "data-tuning";

struct Shared {
    game: RefCell<Game<CanvasRenderer>>,
    /// An animation frame is already requested
    frame_pending: Cell<bool>,
}

fn to_js(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Milliseconds on the same clock as animation-frame timestamps
fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Handle given to the hosting page
#[wasm_bindgen]
pub struct GameHandle {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl GameHandle {
    /// Start the level; `restart` (default true) rebuilds it, false resumes
    #[wasm_bindgen(js_name = initializeLevelAndStart)]
    pub fn initialize_level_and_start(&self, restart: Option<bool>) {
        let outcome = self
            .shared
            .game
            .borrow_mut()
            .initialize_level_and_start(restart.unwrap_or(true), now());
        if let StartOutcome::AwaitingSprites(pending) = outcome {
            log::info!("Start waits for {} sprites", pending.len());
        }
        ensure_frame(&self.shared);
    }

    /// Stop now and show the overlay for `verdict` (default: current one)
    #[wasm_bindgen(js_name = pauseLevel)]
    pub fn pause_level(&self, verdict: Option<String>) -> Result<(), JsValue> {
        self.shared
            .game
            .borrow_mut()
            .pause_level_named(verdict.as_deref(), now())
            .map_err(to_js)
    }

    /// Force a verdict by name ("pause", "intro", "win", "fail", "continue")
    #[wasm_bindgen(js_name = forceStatus)]
    pub fn force_status(&self, name: &str) -> Result<(), JsValue> {
        self.shared
            .game
            .borrow_mut()
            .force_status_named(name, now())
            .map_err(to_js)?;
        ensure_frame(&self.shared);
        Ok(())
    }

    #[wasm_bindgen(js_name = setDeactivated)]
    pub fn set_deactivated(&self, deactivated: bool) {
        self.shared.game.borrow_mut().set_deactivated(deactivated);
    }

    #[wasm_bindgen(js_name = isDeactivated)]
    pub fn is_deactivated(&self) -> bool {
        self.shared.game.borrow().is_deactivated()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.shared.game.borrow().is_running()
    }

    /// JSON snapshot of the game for debugging
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<String, JsValue> {
        self.shared.game.borrow().state_json().map_err(to_js)
    }
}

thread_local! {
    /// Game mounted by [`run`]
    static DEFAULT_GAME: RefCell<Option<Rc<Shared>>> = const { RefCell::new(None) };
}

/// Handle to the game the page bootstrap mounted, if it started
#[wasm_bindgen(js_name = defaultGame)]
pub fn default_game() -> Option<GameHandle> {
    DEFAULT_GAME.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|shared| GameHandle {
                shared: shared.clone(),
            })
    })
}

/// Mount a game into the first element matching `selector`
#[wasm_bindgen(js_name = mountGame)]
pub fn mount_game(selector: &str) -> Result<GameHandle, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let container = document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("no element matches {selector}")))?;
    mount(&container)
}

/// Create the canvas inside `container`, load sprites and show the intro
pub fn mount(container: &Element) -> Result<GameHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let tuning = match container.get_attribute(TUNING_ATTRIBUTE) {
        Some(json) => Tuning::from_json(&json).map_err(to_js)?,
        None => Tuning::default(),
    };

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("not a canvas"))?;
    canvas.set_width(tuning.field.width as u32);
    canvas.set_height(tuning.field.height as u32);
    container.append_child(&canvas)?;

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("not a 2d context"))?;

    let seed = js_sys::Date::now() as u64;
    let game = Game::new(
        tuning,
        SpriteCatalog::default(),
        CanvasRenderer::new(ctx),
        seed,
    )
    .map_err(to_js)?;

    let shared = Rc::new(Shared {
        game: RefCell::new(game),
        frame_pending: Cell::new(false),
    });

    setup_keyboard(&window, shared.clone())?;
    setup_auto_pause(&window, shared.clone())?;

    let outcome = shared
        .game
        .borrow_mut()
        .initialize_level_and_start(true, now());
    if let StartOutcome::AwaitingSprites(pending) = outcome {
        for (key, sprite) in pending {
            load_sprite(&shared, key, &sprite)?;
        }
    }
    shared
        .game
        .borrow_mut()
        .force_status(Verdict::Intro, now())
        .map_err(to_js)?;
    ensure_frame(&shared);

    log::info!("Game mounted ({}x{})", canvas.width(), canvas.height());
    Ok(GameHandle { shared })
}

fn load_sprite(shared: &Rc<Shared>, key: SpriteKey, sprite: &Sprite) -> Result<(), JsValue> {
    let image = HtmlImageElement::new_with_width_and_height(sprite.width, sprite.height)?;

    {
        let shared = shared.clone();
        let onload = Closure::<dyn FnMut()>::new(move || {
            let started = shared.game.borrow_mut().sprite_ready(key);
            if started {
                ensure_frame(&shared);
            }
        });
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
    }

    {
        let src = sprite.src.clone();
        let onerror = Closure::<dyn FnMut()>::new(move || {
            log::error!("Sprite {key} failed to load from {src}");
        });
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }

    shared
        .game
        .borrow_mut()
        .renderer_mut()
        .add_image(key, image.clone());
    image.set_src(&sprite.src);
    Ok(())
}

/// Logical key of an event, falling back to the legacy key code
fn event_key(event: &KeyboardEvent) -> Option<Key> {
    Key::from_key_name(&event.key()).or_else(|| Key::from_key_code(event.key_code()))
}

fn setup_keyboard(window: &web_sys::Window, shared: Rc<Shared>) -> Result<(), JsValue> {
    {
        let shared = shared.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Auto-repeat would re-arm the cast while shift is held
            if event.repeat() {
                return;
            }
            let key = event_key(&event);
            let consumed = shared
                .game
                .borrow_mut()
                .on_key_down(key, event.shift_key(), now());
            if consumed && key.is_some() {
                event.prevent_default();
            }
            // Resume key may have restarted the loop
            ensure_frame(&shared);
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
        let key = event_key(&event);
        shared.game.borrow_mut().on_key_up(key, event.shift_key());
    });
    window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn auto_pause(shared: &Shared, reason: &str) {
    let mut game = shared.game.borrow_mut();
    if !game.is_running() {
        return;
    }
    match game.force_status(Verdict::Pause, now()) {
        Ok(()) => log::info!("Auto-paused ({reason})"),
        Err(e) => log::warn!("Auto-pause failed: {e}"),
    }
}

fn setup_auto_pause(window: &web_sys::Window, shared: Rc<Shared>) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Visibility change (tab switch, minimize)
    {
        let shared = shared.clone();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == VisibilityState::Hidden;
            if hidden {
                auto_pause(&shared, "tab hidden");
            }
            shared.game.borrow_mut().set_deactivated(hidden);
        });
        document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Window blur (click outside)
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
        auto_pause(&shared, "window blur");
    });
    window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Request the next animation frame if the game is running and none is queued
fn ensure_frame(shared: &Rc<Shared>) {
    if shared.frame_pending.get() || !shared.game.borrow().is_running() {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let next = shared.clone();
    let closure = Closure::once(move |time: f64| {
        game_loop(next, time);
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(_) => shared.frame_pending.set(true),
        Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
    }
    closure.forget();
}

fn game_loop(shared: Rc<Shared>, time: f64) {
    shared.frame_pending.set(false);
    shared.game.borrow_mut().advance(time);
    ensure_frame(&shared);
}

/// Default page bootstrap: logging, then a game in [`DEFAULT_CONTAINER`]
pub fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    log::info!("Fireball Wizard starting...");

    match mount_game(DEFAULT_CONTAINER) {
        Ok(handle) => {
            DEFAULT_GAME.with(|slot| *slot.borrow_mut() = Some(handle.shared));
            log::info!("Fireball Wizard running!");
        }
        Err(e) => log::error!("Could not start the game: {e:?}"),
    }
}
