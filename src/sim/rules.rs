//! Level completion rules
//!
//! A rule looks at the state after this tick's updates and returns a verdict.
//! Shared rules run first, then the level's own rules; the first verdict
//! other than `Continue` decides the tick. Pause and session expiry must win
//! over any level outcome, so the order here is load-bearing.

use super::level::Level;
use super::state::{FrameState, ObjectKind, Verdict};
use crate::consts::{INTRO_TARGET_MAX_X, INTRO_TARGET_MIN_Y, SESSION_LIMIT_MS};

/// A rule: state after updates plus the current wall clock (ms)
pub type Rule = fn(&FrameState, f64) -> Verdict;

/// Rules that apply to every level, in evaluation order
pub const SHARED_RULES: [Rule; 3] = [wizard_disposed, escape_pressed, session_expired];

/// Evaluate all rules for `level`, short-circuiting on the first decision
pub fn evaluate(state: &FrameState, level: Level, now: f64) -> Verdict {
    SHARED_RULES
        .iter()
        .chain(level.rules())
        .map(|rule| rule(state, now))
        .find(|verdict| *verdict != Verdict::Continue)
        .unwrap_or(Verdict::Continue)
}

/// The run is lost once the wizard is gone
pub fn wizard_disposed(state: &FrameState, _now: f64) -> Verdict {
    let in_garbage = state
        .garbage
        .iter()
        .any(|o| o.kind == ObjectKind::Wizard);
    let alive = state.wizard().is_some_and(|me| !me.is_disposed());

    if in_garbage || !alive {
        Verdict::Fail
    } else {
        Verdict::Continue
    }
}

/// Escape pauses the game
pub fn escape_pressed(state: &FrameState, _now: f64) -> Verdict {
    if state.keys.esc {
        Verdict::Pause
    } else {
        Verdict::Continue
    }
}

/// Sessions are capped at three minutes of wall clock
pub fn session_expired(state: &FrameState, now: f64) -> Verdict {
    match state.game_start {
        Some(start) if now - start > SESSION_LIMIT_MS => Verdict::Fail,
        _ => Verdict::Continue,
    }
}

/// Intro: a fireball that left the field through the fence in the
/// bottom-left corner wins the level. Any one match is enough.
pub fn fence_hit(state: &FrameState, _now: f64) -> Verdict {
    let hit = state
        .garbage
        .iter()
        .filter(|o| o.kind == ObjectKind::Fireball)
        .any(|ball| ball.pos.x < INTRO_TARGET_MAX_X && ball.pos.y > INTRO_TARGET_MIN_Y);

    if hit { Verdict::Win } else { Verdict::Continue }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Direction, GameObject, Horizontal};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn running_state() -> FrameState {
        let mut state = FrameState::new();
        Level::Intro.initialize(&mut state, &Tuning::default());
        state.game_start = Some(0.0);
        state
    }

    fn spent_fireball(x: f32, y: f32) -> GameObject {
        let mut ball = GameObject::new(
            ObjectKind::Fireball,
            Vec2::new(x, y),
            Vec2::splat(24.0),
            Direction::facing(Horizontal::Left),
            2.0,
        );
        ball.dispose();
        ball
    }

    #[test]
    fn test_quiet_state_continues() {
        let state = running_state();
        assert_eq!(evaluate(&state, Level::Intro, 1000.0), Verdict::Continue);
    }

    #[test]
    fn test_fence_hit_wins() {
        let mut state = running_state();
        state.garbage.push(spent_fireball(5.0, 250.0));
        assert_eq!(evaluate(&state, Level::Intro, 1000.0), Verdict::Win);
    }

    #[test]
    fn test_fireball_above_fence_continues() {
        let mut state = running_state();
        state.garbage.push(spent_fireball(5.0, 100.0));
        assert_eq!(evaluate(&state, Level::Intro, 1000.0), Verdict::Continue);
    }

    #[test]
    fn test_any_qualifying_fireball_wins() {
        let mut state = running_state();
        state.garbage.push(spent_fireball(705.0, 250.0));
        state.garbage.push(spent_fireball(-3.0, 260.0));
        state.garbage.push(spent_fireball(-1.0, 270.0));
        assert_eq!(fence_hit(&state, 0.0), Verdict::Win);
    }

    #[test]
    fn test_pause_beats_win() {
        let mut state = running_state();
        state.keys.esc = true;
        state.garbage.push(spent_fireball(5.0, 250.0));
        assert_eq!(evaluate(&state, Level::Intro, 1000.0), Verdict::Pause);
    }

    #[test]
    fn test_session_limit_fails() {
        let mut state = running_state();
        state.garbage.push(spent_fireball(5.0, 250.0));
        assert_eq!(
            evaluate(&state, Level::Intro, SESSION_LIMIT_MS),
            Verdict::Win
        );
        assert_eq!(
            evaluate(&state, Level::Intro, SESSION_LIMIT_MS + 1.0),
            Verdict::Fail
        );
    }

    #[test]
    fn test_missing_wizard_fails() {
        let mut state = running_state();
        state.objects.clear();
        state.keys.esc = true;
        assert_eq!(evaluate(&state, Level::Intro, 0.0), Verdict::Fail);
    }

    #[test]
    fn test_disposed_wizard_fails() {
        let mut state = running_state();
        let mut me = state.objects.remove(0);
        me.dispose();
        state.garbage.push(me);
        assert_eq!(wizard_disposed(&state, 0.0), Verdict::Fail);
    }
}
