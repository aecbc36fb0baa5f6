//! Collision detection and response for circles against boxes
//!
//! Balls and items are circles, bricks are axis-aligned rectangles. The
//! reflection-axis decision lives here so gameplay and the aim preview bounce
//! identically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (origin is the top-left corner, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Y of the bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            origin: self.origin - Vec2::splat(margin),
            size: self.size + Vec2::splat(margin * 2.0),
        }
    }

    /// Strict containment (points on the border are outside)
    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.origin += offset;
    }
}

/// Which velocity component a bounce flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Flip the velocity component along this axis (speed is preserved)
    #[inline]
    pub fn reflect(self, vel: Vec2) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(-vel.x, vel.y),
            Axis::Vertical => Vec2::new(vel.x, -vel.y),
        }
    }
}

/// Closest-point test: does the circle overlap the rectangle?
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min(), rect.max());
    (center - closest).length_squared() < radius * radius
}

/// Do two circles overlap?
pub fn circle_intersects_circle(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Pick the bounce axis from the dominant offset between a point and a box centre.
///
/// Ties go to `Vertical`, so a ball entering exactly through a corner
/// diagonal bounces back up or down.
pub fn bounce_axis(point: Vec2, rect: &Rect) -> Axis {
    let offset = point - rect.center();
    if offset.x.abs() > offset.y.abs() {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}
