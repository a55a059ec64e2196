//! Fireball Wizard entry point
//!
//! On the web this mounts the game into the page. Natively there is no
//! window; a scripted session runs against the headless renderer and logs
//! what happens, which is handy for checking balance changes.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    fireball_wizard::platform::web::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fireball Wizard (native) starting...");
    log::info!("Native mode has no display - serve the wasm build for the playable version");

    if let Err(e) = demo::run() {
        log::error!("Demo session failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use fireball_wizard::renderer::HeadlessRenderer;
    use fireball_wizard::sim::Verdict;
    use fireball_wizard::{Game, GamePhase, Key, Result, SpriteCatalog, StartOutcome, Tuning};

    /// Frame interval of the scripted session (ms)
    const FRAME_MS: f64 = 16.0;

    /// Tuning from `FIREBALL_TUNING` (a JSON file path), else the defaults
    fn load_tuning() -> Result<Tuning> {
        match std::env::var("FIREBALL_TUNING") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path).map_err(|e| {
                    fireball_wizard::GameError::InvalidTuning(format!("{path}: {e}"))
                })?;
                log::info!("Tuning loaded from {path}");
                Tuning::from_json(&json)
            }
            Err(_) => Ok(Tuning::default()),
        }
    }

    /// Play the intro level: dismiss the welcome screen, turn left, cast
    /// once and wait for the fireball to reach the fence.
    pub fn run() -> Result<()> {
        let mut game = Game::new(
            load_tuning()?,
            SpriteCatalog::default(),
            HeadlessRenderer::new(),
            42,
        )?;

        let mut now = 0.0;
        if let StartOutcome::AwaitingSprites(pending) = game.initialize_level_and_start(true, now)
        {
            for (key, sprite) in pending {
                log::info!("Loading {key} from {} ({}x{})", sprite.src, sprite.width, sprite.height);
                game.sprite_ready(key);
            }
        }
        game.force_status(Verdict::Intro, now)?;
        game.advance(now);

        now += FRAME_MS;
        game.on_key_down(Some(Key::Space), false, now);

        // Face left, then cast
        game.on_key_down(Some(Key::Left), false, now);
        now += FRAME_MS;
        game.advance(now);
        game.on_key_up(Some(Key::Left), false);
        game.on_key_down(None, true, now);
        now += FRAME_MS;
        game.advance(now);
        game.on_key_up(None, true);

        while game.is_running() {
            now += FRAME_MS;
            game.advance(now);
        }

        match game.phase() {
            GamePhase::Won => {
                if let Some(stats) = game.last_statistics() {
                    for line in stats.lines() {
                        println!("{line}");
                    }
                }
            }
            phase => log::warn!("Session ended in {phase:?}"),
        }
        log::debug!("Final state: {}", game.state_json()?);
        Ok(())
    }
}
