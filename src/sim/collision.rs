//! Collision response for bubbles
//!
//! Two cases: a bubble leaving the visible area (bounce) and two bubbles
//! overlapping (separation impulse). Both are deliberately simple: no mass,
//! no restitution, no positional correction.

use glam::Vec2;

use super::camera::ViewBounds;

/// Which velocity axes a bounce inverted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

impl Bounce {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Keep a moving point inside `bounds`.
///
/// Each axis is handled independently: if the point left the area on that
/// axis, it is clamped back onto the edge and that velocity component is
/// negated. A point that never leaves (e.g. zero velocity) is untouched.
pub fn bounce_into(pos: &mut Vec2, vel: &mut Vec2, bounds: &ViewBounds) -> Bounce {
    let (exit_x, exit_y) = bounds.exits(*pos);

    if exit_x {
        pos.x = pos.x.clamp(bounds.min.x, bounds.max.x);
        vel.x = -vel.x;
    }
    if exit_y {
        pos.y = pos.y.clamp(bounds.min.y, bounds.max.y);
        vel.y = -vel.y;
    }

    Bounce {
        x: exit_x,
        y: exit_y,
    }
}

/// Impulse to add to `a` (and subtract from `b`) for an overlapping pair.
///
/// Returns `None` when the circles don't overlap, are separating, or share a
/// center (no usable normal). Otherwise the impulse cancels the approaching
/// part of the relative velocity along the separation normal, so afterwards
/// the pair neither approaches nor separates along it.
pub fn separation_impulse(
    pos_a: Vec2,
    vel_a: Vec2,
    radius_a: f32,
    pos_b: Vec2,
    vel_b: Vec2,
    radius_b: f32,
) -> Option<Vec2> {
    let offset = pos_a - pos_b;
    let distance = offset.length();
    if distance >= radius_a + radius_b {
        return None;
    }

    let normal = offset.normalize_or_zero();
    if normal == Vec2::ZERO {
        log::trace!("coincident bubble centers at {pos_a:?}, skipping impulse");
        return None;
    }

    let along = (vel_a - vel_b).dot(normal);
    if along >= 0.0 {
        return None;
    }

    // Split evenly: each side absorbs half of the approach
    Some(normal * (-along * 0.5))
}
