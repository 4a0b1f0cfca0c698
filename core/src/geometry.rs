//! Continuous-space geometry shared by the simulation crates.
//!
//! All coordinates use screen conventions: the origin sits in the upper-left
//! corner and the Y axis grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle measured in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle anchored at its upper-left corner.
    ///
    /// Negative dimensions collapse to zero so that every rectangle has a
    /// well-defined area.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Creates a rectangle of the provided size centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    /// Horizontal coordinate of the left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Horizontal coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Vertical coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Geometric centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Reports whether the two rectangles share interior area.
    ///
    /// Rectangles that merely touch along an edge do not intersect, which
    /// lets actors slide flush against walls.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Returns a copy shifted by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Returns a copy whose upper-left corner sits at `origin`.
    #[must_use]
    pub fn with_origin(&self, origin: Vec2) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..*self
        }
    }

    /// Returns a copy whose centre sits at `center`.
    #[must_use]
    pub fn with_center(&self, center: Vec2) -> Self {
        Self::from_center(center, self.size())
    }

    /// Grows (or shrinks, for negative deltas) the rectangle around its centre.
    #[must_use]
    pub fn inflated(&self, delta_width: f32, delta_height: f32) -> Self {
        let size = Vec2::new(
            (self.width + delta_width).max(0.0),
            (self.height + delta_height).max(0.0),
        );
        Self::from_center(self.center(), size)
    }

    /// Moves the rectangle the minimum distance required to lie inside `bounds`.
    ///
    /// When the rectangle is larger than `bounds` along an axis it is centred
    /// on that axis instead.
    #[must_use]
    pub fn clamped_inside(&self, bounds: &Rect) -> Self {
        let x = clamp_axis(self.x, self.width, bounds.left(), bounds.width());
        let y = clamp_axis(self.y, self.height, bounds.top(), bounds.height());
        Self { x, y, ..*self }
    }
}

fn clamp_axis(start: f32, extent: f32, bound_start: f32, bound_extent: f32) -> f32 {
    if extent >= bound_extent {
        return bound_start + (bound_extent - extent) / 2.0;
    }
    start.clamp(bound_start, bound_start + bound_extent - extent)
}

/// Direction an actor faces, used to select animation strips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward decreasing Y.
    Up,
    /// Toward increasing Y.
    Down,
    /// Toward decreasing X.
    Left,
    /// Toward increasing X.
    Right,
}

impl Facing {
    /// Unit vector pointing in the facing direction.
    #[must_use]
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Buckets a heading vector into one of four 90 degree quadrants.
    ///
    /// The angle is measured counter-clockwise from the positive X axis with
    /// the Y component flipped, so "up" on screen spans 45..135 degrees.
    /// Returns `None` for a zero-length heading.
    #[must_use]
    pub fn from_heading(heading: Vec2) -> Option<Self> {
        if heading.length_squared() <= f32::EPSILON {
            return None;
        }

        let degrees = (-heading.y).atan2(heading.x).to_degrees().rem_euclid(360.0);
        let facing = if (45.0..135.0).contains(&degrees) {
            Self::Up
        } else if (135.0..225.0).contains(&degrees) {
            Self::Left
        } else if (225.0..315.0).contains(&degrees) {
            Self::Down
        } else {
            Self::Right
        };
        Some(facing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let left = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!left.intersects(&right));
        assert!(left.intersects(&right.translated(Vec2::new(-0.5, 0.0))));
    }

    #[test]
    fn inflate_preserves_center() {
        let rect = Rect::new(100.0, 100.0, 128.0, 128.0);
        let hitbox = rect.inflated(-40.0, -40.0);
        assert_eq!(hitbox.center(), rect.center());
        assert_eq!(hitbox.size(), Vec2::splat(88.0));
    }

    #[test]
    fn clamped_inside_moves_minimum_distance() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let rect = Rect::new(95.0, -5.0, 10.0, 10.0);
        let clamped = rect.clamped_inside(&bounds);
        assert_eq!(clamped.origin(), Vec2::new(90.0, 0.0));
    }

    #[test]
    fn heading_buckets_match_screen_quadrants() {
        assert_eq!(Facing::from_heading(Vec2::new(0.0, -1.0)), Some(Facing::Up));
        assert_eq!(Facing::from_heading(Vec2::new(0.0, 1.0)), Some(Facing::Down));
        assert_eq!(Facing::from_heading(Vec2::new(-1.0, 0.0)), Some(Facing::Left));
        assert_eq!(Facing::from_heading(Vec2::new(1.0, 0.0)), Some(Facing::Right));
        assert_eq!(Facing::from_heading(Vec2::new(1.0, -0.9)), Some(Facing::Right));
        assert_eq!(Facing::from_heading(Vec2::new(1.0, -1.1)), Some(Facing::Up));
        assert_eq!(Facing::from_heading(Vec2::ZERO), None);
    }
}
