//! Game state machine
//!
//! Owns the current level's [`FrameState`] and drives it through
//! intro → running → paused/won/lost → resume or restart. The host calls
//! [`Game::advance`] once per animation frame while [`Game::is_running`] is
//! true; stopping the loop is just leaving the `Running` phase.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::error::{GameError, Result};
use crate::input::Key;
use crate::renderer::{self, Renderer};
use crate::sim::{FrameState, Level, Verdict, tick};
use crate::sprites::{Sprite, SpriteCatalog, SpriteKey};
use crate::stats::RunStatistics;
use crate::tuning::Tuning;

/// Top-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Constructed, no level started yet
    Idle,
    /// Level state built, waiting for sprites
    Loading,
    /// Ticking every frame
    Running,
    /// Welcome screen, waiting for the resume key
    Intro,
    /// Paused, waiting for the resume key
    Paused,
    /// Level won, resume key restarts
    Won,
    /// Level lost, resume key restarts
    Lost,
}

impl GamePhase {
    /// Phase shown for a stopped game with the given verdict
    fn stopped_with(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Win => GamePhase::Won,
            Verdict::Fail => GamePhase::Lost,
            Verdict::Intro => GamePhase::Intro,
            Verdict::Pause | Verdict::Continue => GamePhase::Paused,
        }
    }

    /// True on overlay screens that wait for the resume key
    pub fn awaits_resume(&self) -> bool {
        matches!(
            self,
            GamePhase::Intro | GamePhase::Paused | GamePhase::Won | GamePhase::Lost
        )
    }
}

/// Result of asking a level to start
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// Sprites were ready; the game is running
    Started,
    /// The host must load these sprites and report each with
    /// [`Game::sprite_ready`]; the run begins after the last one
    AwaitingSprites(Vec<(SpriteKey, Sprite)>),
}

/// Which key handlers are live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
enum InputMode {
    None,
    /// Movement, escape and cast go into the frame state
    Gameplay,
    /// One-shot: the next resume key press resumes or restarts
    AwaitResume,
}

/// Read-only diagnostics view
#[derive(Debug, Serialize)]
pub struct GameSnapshot<'a> {
    pub level: Level,
    pub phase: GamePhase,
    pub deactivated: bool,
    pub state: Option<&'a FrameState>,
    pub statistics: Option<&'a RunStatistics>,
}

fn parse_verdict(name: &str) -> Result<Verdict> {
    name.parse::<Verdict>()
        .inspect_err(|e| log::warn!("Rejected: {e}"))
}

/// One game widget: level, frame state, sprites and drawing backend
pub struct Game<R: Renderer> {
    level: Level,
    tuning: Tuning,
    catalog: SpriteCatalog,
    renderer: R,
    state: Option<FrameState>,
    phase: GamePhase,
    input: InputMode,
    deactivated: bool,
    rng: Pcg32,
    last_statistics: Option<RunStatistics>,
}

impl<R: Renderer> Game<R> {
    /// Create a game, rejecting broken configuration up front
    pub fn new(tuning: Tuning, catalog: SpriteCatalog, renderer: R, seed: u64) -> Result<Self> {
        tuning.validate()?;
        catalog.validate()?;
        log::info!("Game created (level {}, seed {})", Level::INITIAL.name(), seed);

        Ok(Self {
            level: Level::INITIAL,
            tuning,
            catalog,
            renderer,
            state: None,
            phase: GamePhase::Idle,
            input: InputMode::None,
            deactivated: false,
            rng: Pcg32::seed_from_u64(seed),
            last_statistics: None,
        })
    }

    /// Start the current level.
    ///
    /// With `restart` (or when nothing was started yet) the frame state is
    /// rebuilt from the level initializer. Otherwise the existing state is
    /// kept and only its verdict is cleared, which is how a pause resumes.
    pub fn initialize_level_and_start(&mut self, restart: bool, now: f64) -> StartOutcome {
        let state = match self.state.take() {
            Some(mut state) if !restart => {
                state.verdict = Verdict::Continue;
                state
            }
            _ => {
                let mut state = FrameState::new();
                self.level.initialize(&mut state, &self.tuning);
                self.last_statistics = None;
                state
            }
        };
        let state = self.state.insert(state);

        state.level_start = Some(now);
        state.game_start.get_or_insert(now);

        if self.catalog.is_level_ready(self.level) {
            self.begin_run();
            StartOutcome::Started
        } else {
            self.phase = GamePhase::Loading;
            let pending = self.catalog.pending_for_level(self.level);
            log::info!("Loading {} sprites for {}", pending.len(), self.level.name());
            StartOutcome::AwaitingSprites(pending)
        }
    }

    /// Host callback: a sprite finished loading. Returns true if this
    /// completed the level's sprites and the run began.
    pub fn sprite_ready(&mut self, key: SpriteKey) -> bool {
        if !self.catalog.mark_ready(key) {
            log::warn!("Ignoring load notice for unknown sprite {key}");
            return false;
        }
        if self.phase == GamePhase::Loading && self.catalog.is_level_ready(self.level) {
            self.begin_run();
            return true;
        }
        false
    }

    /// Preview frame, gameplay input on, loop running
    fn begin_run(&mut self) {
        self.render_scene();
        self.input = InputMode::Gameplay;
        self.phase = GamePhase::Running;
        log::info!("Level {} running", self.level.name());
    }

    /// Run one tick at wall clock `now` (ms). Does nothing unless running.
    pub fn advance(&mut self, now: f64) -> GamePhase {
        if self.phase != GamePhase::Running {
            return self.phase;
        }
        let Some(state) = self.state.as_mut() else {
            log::error!("Running without a frame state; stopping");
            self.phase = GamePhase::Idle;
            return self.phase;
        };

        // A verdict forced from outside stops the loop before anything moves
        if state.verdict != Verdict::Continue {
            self.pause_level(None, now);
            return self.phase;
        }

        match tick(state, self.level, &self.tuning, now) {
            Verdict::Continue => {
                state.last_tick = Some(now);
                self.render_scene();
            }
            _ => self.pause_level(None, now),
        }
        self.phase
    }

    /// Stop the loop and show the overlay for the current (or given) verdict
    pub fn pause_level(&mut self, verdict: Option<Verdict>, now: f64) {
        let Some(state) = self.state.as_mut() else {
            log::warn!("pause_level called before any level was started");
            return;
        };

        if let Some(verdict) = verdict {
            state.verdict = verdict;
        }
        state.keys.esc = false;
        state.last_tick = None;

        let verdict = state.verdict;
        if verdict == Verdict::Win {
            self.record_win(now);
        }

        self.input = InputMode::AwaitResume;
        self.phase = GamePhase::stopped_with(verdict);
        log::info!("Level {} stopped: {}", self.level.name(), verdict);
        self.draw_overlay();
    }

    /// Statistics for a win at wall clock `now`
    fn record_win(&mut self, now: f64) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let elapsed = now - state.game_start.unwrap_or(now);
        let stats = RunStatistics::generate(elapsed, &mut self.rng);
        if let (Some(rank), Some(best)) = (stats.player_rank(), stats.best()) {
            log::info!(
                "Won in {elapsed:.0} ms, rank {rank} of {} (best: {})",
                stats.entries.len(),
                best.name
            );
        }
        self.last_statistics = Some(stats);
    }

    /// Force the verdict from outside (e.g. the page was hidden).
    ///
    /// Setting the verdict it already has is a no-op. A running game stops
    /// on its next frame; a stopped one is re-paused with the new verdict.
    pub fn force_status(&mut self, verdict: Verdict, now: f64) -> Result<()> {
        let state = self.state.as_mut().ok_or(GameError::NotStarted)?;
        if state.verdict == verdict {
            return Ok(());
        }
        state.verdict = verdict;
        log::info!("Status forced to {verdict}");

        if self.phase.awaits_resume() {
            self.pause_level(None, now);
        }
        Ok(())
    }

    /// [`Game::force_status`] by name; unknown names leave the game untouched
    pub fn force_status_named(&mut self, name: &str, now: f64) -> Result<()> {
        let verdict = parse_verdict(name)?;
        self.force_status(verdict, now)
    }

    /// [`Game::pause_level`] by name; unknown names leave the game untouched
    pub fn pause_level_named(&mut self, name: Option<&str>, now: f64) -> Result<()> {
        let verdict = name.map(parse_verdict).transpose()?;
        self.pause_level(verdict, now);
        Ok(())
    }

    /// Ignore all keyboard input while deactivated
    pub fn set_deactivated(&mut self, deactivated: bool) {
        if self.deactivated == deactivated {
            return;
        }
        self.deactivated = deactivated;
        log::info!("Game {}", if deactivated { "deactivated" } else { "activated" });
    }

    /// Key press. Returns true if the key was consumed.
    pub fn on_key_down(&mut self, key: Option<Key>, shift: bool, now: f64) -> bool {
        if self.deactivated {
            return false;
        }
        match self.input {
            InputMode::Gameplay => match self.state.as_mut() {
                Some(state) => {
                    state.keys.key_down(key, shift);
                    key.is_some() || shift
                }
                None => false,
            },
            InputMode::AwaitResume if key == Some(Key::Space) => {
                let restart = self
                    .state
                    .as_ref()
                    .is_some_and(|state| state.verdict.is_terminal());
                self.input = InputMode::None;
                self.initialize_level_and_start(restart, now);
                true
            }
            _ => false,
        }
    }

    /// Key release. Always applied, so held flags never outlive the key.
    pub fn on_key_up(&mut self, key: Option<Key>, shift: bool) {
        if let Some(state) = self.state.as_mut() {
            state.keys.key_up(key, shift);
        }
    }

    fn render_scene(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        if let Err(e) =
            renderer::draw_scene(&mut self.renderer, &self.catalog, state, &self.tuning.field)
        {
            log::warn!("Frame not drawn: {e}");
        }
    }

    fn draw_overlay(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let (lines, style) = renderer::overlay_for(state.verdict, self.last_statistics.as_ref());
        if let Err(e) = self.renderer.draw_overlay_message(&lines, style) {
            log::warn!("Overlay not drawn: {e}");
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_deactivated(&self) -> bool {
        self.deactivated
    }

    /// Current frame state, read-only
    pub fn state(&self) -> Option<&FrameState> {
        self.state.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn catalog(&self) -> &SpriteCatalog {
        &self.catalog
    }

    /// Statistics of the most recent win
    pub fn last_statistics(&self) -> Option<&RunStatistics> {
        self.last_statistics.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn snapshot(&self) -> GameSnapshot<'_> {
        GameSnapshot {
            level: self.level,
            phase: self.phase,
            deactivated: self.deactivated,
            state: self.state.as_ref(),
            statistics: self.last_statistics.as_ref(),
        }
    }

    /// Diagnostics dump of the snapshot
    pub fn state_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SESSION_LIMIT_MS;
    use crate::renderer::{DrawCommand, HeadlessRenderer, OverlayStyle};
    use crate::sim::{Horizontal, ObjectKind};
    use glam::Vec2;

    fn new_game() -> Game<HeadlessRenderer> {
        Game::new(
            Tuning::default(),
            SpriteCatalog::default(),
            HeadlessRenderer::new(),
            1234,
        )
        .unwrap()
    }

    /// Game with every sprite loaded
    fn ready_game() -> Game<HeadlessRenderer> {
        let mut game = new_game();
        for key in game.catalog().keys_for_level(Level::Intro) {
            game.sprite_ready(key);
        }
        game
    }

    /// Started game, one tick in so timing is primed
    fn running_game() -> Game<HeadlessRenderer> {
        let mut game = ready_game();
        assert_eq!(game.initialize_level_and_start(true, 0.0), StartOutcome::Started);
        game.advance(0.0);
        game
    }

    fn press(game: &mut Game<HeadlessRenderer>, key: Key, now: f64) {
        game.on_key_down(Some(key), false, now);
    }

    #[test]
    fn test_new_rejects_missing_sprites() {
        let result = Game::new(
            Tuning::default(),
            SpriteCatalog::new(),
            HeadlessRenderer::new(),
            1,
        );
        assert!(matches!(result, Err(GameError::MissingSprite(_))));
    }

    #[test]
    fn test_start_waits_for_sprites() {
        let mut game = new_game();
        let outcome = game.initialize_level_and_start(true, 0.0);
        let StartOutcome::AwaitingSprites(pending) = outcome else {
            panic!("expected to wait for sprites");
        };
        assert_eq!(pending.len(), 3);
        assert_eq!(game.phase(), GamePhase::Loading);
        assert_eq!(game.advance(16.0), GamePhase::Loading);

        let keys: Vec<_> = pending.iter().map(|(key, _)| *key).collect();
        assert!(!game.sprite_ready(keys[0]));
        assert!(!game.sprite_ready(keys[1]));
        assert!(game.sprite_ready(keys[2]));
        assert!(game.is_running());
        // Preview frame drawn
        assert_eq!(game.renderer().sprites().len(), 1);
    }

    #[test]
    fn test_intro_then_resume_keeps_state() {
        let mut game = ready_game();
        game.initialize_level_and_start(true, 0.0);
        game.force_status(Verdict::Intro, 0.0).unwrap();

        assert_eq!(game.advance(16.0), GamePhase::Intro);
        assert!(!game.is_running());
        assert_eq!(
            game.renderer().last_overlay().map(|l| l[0].as_str()),
            Some("Welcome!")
        );

        let before = game.state().unwrap().objects.clone();
        press(&mut game, Key::Space, 500.0);
        assert!(game.is_running());
        let state = game.state().unwrap();
        assert_eq!(state.verdict, Verdict::Continue);
        assert_eq!(state.objects, before);
        assert_eq!(state.level_start, Some(500.0));
        assert_eq!(state.game_start, Some(0.0));
    }

    #[test]
    fn test_pause_and_resume_preserves_objects() {
        let mut game = running_game();
        game.on_key_down(Some(Key::Left), false, 0.0);
        game.advance(100.0);
        game.on_key_up(Some(Key::Left), false);
        press(&mut game, Key::Escape, 150.0);
        assert_eq!(game.advance(200.0), GamePhase::Paused);

        let paused = game.state().unwrap().clone();
        assert_eq!(paused.verdict, Verdict::Pause);
        assert!(!paused.keys.esc);
        assert_eq!(paused.last_tick, None);

        press(&mut game, Key::Space, 1000.0);
        let resumed = game.state().unwrap();
        assert_eq!(resumed.objects, paused.objects);
        assert_eq!(resumed.verdict, Verdict::Continue);
        assert_eq!(resumed.last_tick, None);
        assert!(game.is_running());
    }

    #[test]
    fn test_key_released_while_paused_stops_movement() {
        let mut game = running_game();
        game.on_key_down(Some(Key::Left), false, 0.0);
        press(&mut game, Key::Escape, 5.0);
        assert_eq!(game.advance(10.0), GamePhase::Paused);

        game.on_key_up(Some(Key::Left), false);
        press(&mut game, Key::Space, 30.0);
        assert!(!game.state().unwrap().keys.left);

        game.advance(30.0);
        let x = game.state().unwrap().wizard().unwrap().pos.x;
        game.advance(130.0);
        assert_eq!(game.state().unwrap().wizard().unwrap().pos.x, x);
    }

    #[test]
    fn test_key_released_while_deactivated_is_applied() {
        let mut game = running_game();
        game.on_key_down(Some(Key::Up), false, 0.0);
        game.set_deactivated(true);
        game.on_key_up(Some(Key::Up), false);
        assert!(!game.state().unwrap().keys.up);
    }

    #[test]
    fn test_forcing_win_on_stopped_game_records_statistics() {
        let mut game = running_game();
        game.pause_level(Some(Verdict::Pause), 10.0);
        assert!(game.last_statistics().is_none());

        game.force_status(Verdict::Win, 5_000.0).unwrap();
        assert_eq!(game.phase(), GamePhase::Won);
        assert_eq!(
            game.last_statistics().and_then(RunStatistics::player_time),
            Some(5_000.0)
        );
        assert!(matches!(
            game.renderer().commands.last(),
            Some(DrawCommand::Overlay {
                style: OverlayStyle::Statistics,
                ..
            })
        ));
    }

    #[test]
    fn test_pause_level_by_name() {
        let mut game = running_game();
        assert!(matches!(
            game.pause_level_named(Some("sleep"), 10.0),
            Err(GameError::UnknownVerdict(_))
        ));
        assert!(game.is_running());

        game.pause_level_named(None, 20.0).unwrap();
        assert_eq!(game.phase(), GamePhase::Paused);

        game.pause_level_named(Some("fail"), 30.0).unwrap();
        assert_eq!(game.phase(), GamePhase::Lost);
        assert_eq!(game.state().unwrap().verdict, Verdict::Fail);
    }

    #[test]
    fn test_restart_after_loss_rebuilds_level() {
        let mut game = running_game();
        game.on_key_down(Some(Key::Right), false, 0.0);
        game.advance(500.0);
        game.on_key_down(None, true, 500.0);
        game.advance(510.0);
        assert_eq!(game.state().unwrap().count(ObjectKind::Fireball), 1);

        assert_eq!(game.advance(SESSION_LIMIT_MS + 1.0), GamePhase::Lost);
        assert_eq!(
            game.renderer().last_overlay().map(|l| l[0].as_str()),
            Some("You lost!")
        );

        press(&mut game, Key::Space, SESSION_LIMIT_MS + 100.0);
        let state = game.state().unwrap();
        let (x, y) = game.tuning().wizard_start();
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.count(ObjectKind::Wizard), 1);
        assert_eq!(state.objects[0].pos, Vec2::new(x, y));
        assert!(state.objects[0].direction.is_right());
        assert_eq!(state.game_start, Some(SESSION_LIMIT_MS + 100.0));
        assert_eq!(state.keys, Default::default());
    }

    #[test]
    fn test_casting_into_fence_wins() {
        let mut game = running_game();

        // Turn around, then cast
        game.on_key_down(Some(Key::Left), false, 0.0);
        game.advance(10.0);
        game.on_key_up(Some(Key::Left), false);
        game.on_key_down(None, true, 10.0);
        game.advance(20.0);
        game.on_key_up(None, true);
        let ball = game
            .state()
            .unwrap()
            .objects
            .iter()
            .find(|o| o.kind == ObjectKind::Fireball)
            .cloned()
            .unwrap();
        assert!(ball.direction.is_left());
        assert!(ball.pos.y > 240.0);

        let mut now = 20.0;
        while game.is_running() && now < 10_000.0 {
            now += 100.0;
            game.advance(now);
        }
        assert_eq!(game.phase(), GamePhase::Won);

        let stats = game.last_statistics().unwrap();
        assert_eq!(stats.player_time(), Some(now));
        assert!(matches!(
            game.renderer().commands.last(),
            Some(DrawCommand::Overlay {
                style: OverlayStyle::Statistics,
                ..
            })
        ));

        // Won: resume key restarts from scratch
        press(&mut game, Key::Space, now + 50.0);
        assert_eq!(game.state().unwrap().objects.len(), 1);
        assert!(game.last_statistics().is_none());
    }

    #[test]
    fn test_force_pause_is_idempotent() {
        let mut once = running_game();
        let mut twice = running_game();

        once.force_status(Verdict::Pause, 0.0).unwrap();
        twice.force_status(Verdict::Pause, 0.0).unwrap();
        twice.force_status(Verdict::Pause, 0.0).unwrap();
        assert_eq!(once.state(), twice.state());
        assert_eq!(once.phase(), twice.phase());

        once.advance(50.0);
        twice.advance(50.0);
        assert_eq!(twice.phase(), GamePhase::Paused);
        let overlays = twice.renderer().commands.len();
        twice.force_status(Verdict::Pause, 0.0).unwrap();
        assert_eq!(twice.renderer().commands.len(), overlays);
        assert_eq!(once.state(), twice.state());
    }

    #[test]
    fn test_forced_pause_does_not_move_objects() {
        let mut game = running_game();
        game.on_key_down(Some(Key::Right), false, 0.0);
        let before = game.state().unwrap().objects.clone();
        game.force_status(Verdict::Pause, 0.0).unwrap();
        game.advance(5_000.0);
        assert_eq!(game.state().unwrap().objects, before);
        assert_eq!(game.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut game = running_game();
        let result = game.force_status_named("teleport", 0.0);
        assert!(matches!(result, Err(GameError::UnknownVerdict(_))));
        assert_eq!(game.state().unwrap().verdict, Verdict::Continue);
        assert!(game.is_running());

        game.force_status_named("pause", 0.0).unwrap();
        assert_eq!(game.state().unwrap().verdict, Verdict::Pause);
    }

    #[test]
    fn test_force_status_before_start() {
        let mut game = ready_game();
        assert!(matches!(
            game.force_status(Verdict::Pause, 0.0),
            Err(GameError::NotStarted)
        ));
    }

    #[test]
    fn test_deactivated_ignores_keys() {
        let mut game = running_game();
        game.set_deactivated(true);
        assert!(game.is_deactivated());
        assert!(!game.on_key_down(Some(Key::Up), false, 0.0));
        assert!(!game.state().unwrap().keys.up);

        game.pause_level(Some(Verdict::Pause), 10.0);
        assert!(!game.on_key_down(Some(Key::Space), false, 20.0));
        assert_eq!(game.phase(), GamePhase::Paused);

        game.set_deactivated(false);
        assert!(game.on_key_down(Some(Key::Space), false, 30.0));
        assert!(game.is_running());
    }

    #[test]
    fn test_paused_game_ignores_movement_keys() {
        let mut game = running_game();
        game.pause_level(Some(Verdict::Pause), 10.0);
        assert!(!game.on_key_down(Some(Key::Left), false, 20.0));
        assert!(!game.state().unwrap().keys.left);
    }

    #[test]
    fn test_render_failure_keeps_state_consistent() {
        let mut game = running_game();
        game.on_key_down(Some(Key::Left), false, 0.0);
        game.renderer_mut().fail_next = true;
        assert_eq!(game.advance(100.0), GamePhase::Running);

        let state = game.state().unwrap();
        assert_eq!(state.last_tick, Some(100.0));
        assert!(state.objects[0].direction.is_left());

        // Next frame draws normally
        game.renderer_mut().clear_log();
        game.advance(110.0);
        assert_eq!(game.renderer().sprites().len(), 1);
    }

    #[test]
    fn test_state_json_snapshot() {
        let game = running_game();
        let json = game.state_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "Running");
        assert_eq!(value["state"]["verdict"], "Continue");
        assert_eq!(value["state"]["objects"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_wizard_faces_left_after_input() {
        let mut game = running_game();
        game.on_key_down(Some(Key::Left), false, 0.0);
        game.advance(10.0);
        let me = game.state().unwrap().wizard().unwrap();
        assert_eq!(me.direction.horizontal, Some(Horizontal::Left));
        assert_eq!(
            game.renderer().sprites().last(),
            Some(&SpriteKey::mirrored(ObjectKind::Wizard))
        );
    }
}
