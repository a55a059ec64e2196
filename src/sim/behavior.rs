//! Per-kind object behaviors
//!
//! Each behavior mutates only the object it is given. Disposal is signalled
//! through the object's lifecycle; moving it to garbage is the caller's job.

use super::state::{GameObject, Horizontal, ObjectKind, Vertical};
use crate::input::PressedKeys;
use crate::tuning::Playfield;

/// Advance one object by `dt` time units
pub fn apply(object: &mut GameObject, keys: &PressedKeys, field: &Playfield, dt: f32) {
    if object.is_disposed() {
        return;
    }
    match object.kind {
        ObjectKind::Wizard => update_wizard(object, keys, field, dt),
        ObjectKind::Fireball => update_fireball(object, field, dt),
    }
}

/// Wizard movement.
///
/// Holding UP rises at twice the speed until the top edge; releasing it lets
/// the wizard drift back down at a third of the speed. Left/right move
/// directly. Canvas y grows downward, so "up" is negative y.
fn update_wizard(object: &mut GameObject, keys: &PressedKeys, field: &Playfield, dt: f32) {
    let ground = field.height - object.size.y;

    if keys.up && object.pos.y > 0.0 {
        object.direction.vertical = Some(Vertical::Up);
        object.pos.y -= object.speed * dt * 2.0;
    }

    if !keys.up && object.pos.y < ground {
        object.direction.vertical = Some(Vertical::Down);
        object.pos.y += object.speed * dt / 3.0;
    }

    if keys.left {
        object.direction.horizontal = Some(Horizontal::Left);
        object.pos.x -= object.speed * dt;
    }

    // Applied after left: with both held, the last input wins
    if keys.right {
        object.direction.horizontal = Some(Horizontal::Right);
        object.pos.x += object.speed * dt;
    }

    object.pos.x = object.pos.x.clamp(0.0, (field.width - object.size.x).max(0.0));
    object.pos.y = object.pos.y.clamp(0.0, ground.max(0.0));
}

/// Fireballs fly straight and vanish once past either side of the field
fn update_fireball(object: &mut GameObject, field: &Playfield, dt: f32) {
    match object.direction.horizontal {
        Some(Horizontal::Left) => object.pos.x -= object.speed * dt,
        Some(Horizontal::Right) => object.pos.x += object.speed * dt,
        None => {}
    }

    if object.pos.x < 0.0 || object.pos.x > field.width {
        object.dispose();
    }
}
