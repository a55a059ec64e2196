//! One simulation step
//!
//! Order within a tick is fixed: spawn, object updates, garbage collection,
//! then rule evaluation. Rules read the garbage produced by this very tick.

use glam::Vec2;

use super::behavior;
use super::level::Level;
use super::rules;
use super::state::{FrameState, GameObject, ObjectKind, Verdict};
use crate::consts::TIME_UNIT_MS;
use crate::tuning::Tuning;

/// Time units elapsed since the last tick; the first tick of a run is zero
pub fn elapsed_units(state: &mut FrameState, now: f64) -> f32 {
    let last = *state.last_tick.get_or_insert(now);
    ((now - last).max(0.0) / TIME_UNIT_MS) as f32
}

/// Advance the state to `now` and return the resulting verdict
pub fn tick(state: &mut FrameState, level: Level, tuning: &Tuning, now: f64) -> Verdict {
    let dt = elapsed_units(state, now);
    update_objects(state, tuning, dt);
    check_status(state, level, now);
    state.verdict
}

/// Spawn on cast, run every behavior, move disposed objects to garbage
pub fn update_objects(state: &mut FrameState, tuning: &Tuning, dt: f32) {
    if state.keys.take_cast() {
        if let Some(ball) = state.wizard().map(|me| spawn_fireball(me, tuning)) {
            log::debug!("Fireball cast at ({:.1}, {:.1})", ball.pos.x, ball.pos.y);
            state.objects.push(ball);
        }
    }

    state.garbage.clear();

    let keys = state.keys;
    let objects = std::mem::take(&mut state.objects);
    for mut object in objects {
        behavior::apply(&mut object, &keys, &tuning.field, dt);
        if object.is_disposed() {
            state.garbage.push(object);
        } else {
            state.objects.push(object);
        }
    }
}

/// Build a fireball leaving the wizard's hand.
///
/// It inherits the wizard's direction, starts just outside the side it is
/// facing at half its height, and flies slower when cast to the left.
pub fn spawn_fireball(wizard: &GameObject, tuning: &Tuning) -> GameObject {
    let size = tuning.fireball.size;
    let x = if wizard.direction.is_right() {
        wizard.pos.x + wizard.size.x
    } else {
        wizard.pos.x - size
    };
    let y = wizard.pos.y + wizard.size.y / 2.0;

    GameObject::new(
        ObjectKind::Fireball,
        Vec2::new(x, y),
        Vec2::splat(size),
        wizard.direction,
        tuning.fireball.speed(wizard.direction.is_left()),
    )
}

/// Update the verdict. A verdict that is already decided (for example one
/// forced from outside) is left alone.
pub fn check_status(state: &mut FrameState, level: Level, now: f64) {
    if state.verdict != Verdict::Continue {
        return;
    }
    state.verdict = rules::evaluate(state, level, now);
}
