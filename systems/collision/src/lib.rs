#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-separated collision resolution against static rectangles.
//!
//! Actors move along X first and then along Y. Each axis pass is reverted
//! independently when the moved hitbox would overlap any obstacle, which lets
//! an actor pushing diagonally into a wall keep sliding along it.

use angkor_escape_core::Rect;
use glam::Vec2;

/// Outcome of resolving a displacement against a set of obstacles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Hitbox after both axis passes.
    pub hitbox: Rect,
    /// Displacement that was actually applied.
    pub applied: Vec2,
    /// Whether the horizontal component was reverted.
    pub blocked_x: bool,
    /// Whether the vertical component was reverted.
    pub blocked_y: bool,
}

impl Resolution {
    /// Reports whether the hitbox moved at all.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.applied != Vec2::ZERO
    }
}

/// Applies `displacement` to `hitbox`, reverting each axis that collides.
///
/// The returned hitbox never overlaps an obstacle that the input hitbox did
/// not already overlap.
#[must_use]
pub fn resolve(hitbox: Rect, displacement: Vec2, obstacles: &[Rect]) -> Resolution {
    let (after_x, blocked_x) = step_axis(hitbox, Vec2::new(displacement.x, 0.0), obstacles);
    let (after_y, blocked_y) = step_axis(after_x, Vec2::new(0.0, displacement.y), obstacles);

    Resolution {
        hitbox: after_y,
        applied: after_y.origin() - hitbox.origin(),
        blocked_x,
        blocked_y,
    }
}

/// Clamps a hitbox so that it lies entirely inside `bounds`.
///
/// Used as the final containment pass in the arena, where the playable area
/// is a single rectangle rather than a tile grid.
#[must_use]
pub fn clamp_inside(hitbox: Rect, bounds: &Rect) -> Rect {
    hitbox.clamped_inside(bounds)
}

/// Reports whether `hitbox` overlaps any obstacle.
#[must_use]
pub fn overlaps_any(hitbox: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|obstacle| hitbox.intersects(obstacle))
}

fn step_axis(hitbox: Rect, delta: Vec2, obstacles: &[Rect]) -> (Rect, bool) {
    if delta == Vec2::ZERO {
        return (hitbox, false);
    }

    let moved = hitbox.translated(delta);
    if overlaps_any(&moved, obstacles) {
        (hitbox, true)
    } else {
        (moved, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unobstructed_motion_applies_fully() {
        let hitbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let resolution = resolve(hitbox, Vec2::new(3.0, -2.0), &[]);

        assert_eq!(resolution.hitbox.origin(), Vec2::new(3.0, -2.0));
        assert!(resolution.moved());
        assert!(!resolution.blocked_x);
        assert!(!resolution.blocked_y);
    }

    #[test]
    fn zero_displacement_is_never_blocked() {
        let hitbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let wall = Rect::new(10.0, 0.0, 10.0, 10.0);
        let resolution = resolve(hitbox, Vec2::ZERO, &[wall]);

        assert_eq!(resolution.hitbox, hitbox);
        assert!(!resolution.moved());
        assert!(!resolution.blocked_x);
    }

    #[test]
    fn clamp_inside_keeps_hitbox_in_bounds() {
        let bounds = Rect::new(64.0, 64.0, 512.0, 512.0);
        let clamped = clamp_inside(Rect::new(600.0, 0.0, 16.0, 32.0), &bounds);

        assert_eq!(clamped.origin(), Vec2::new(560.0, 64.0));
    }
}
