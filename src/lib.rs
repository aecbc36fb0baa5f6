//! Swipe Bricks - A turn-based brick shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, turns, spawning)
//! - `tuning`: Data-driven game balance and field dimensions
//! - `platform`: Presentation adapter contract (frame view, frame clock, browser binding)

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Aim angle that points straight up (degrees, screen space y-down)
    pub const STRAIGHT_UP: f32 = -90.0;

    /// Per-tick downward acceleration for particles
    pub const PARTICLE_GRAVITY: f32 = 0.15;

    /// Preview line: number of segments and velocity multiplier per segment
    pub const PREVIEW_SEGMENTS: usize = 100;
    pub const PREVIEW_STRIDE: f32 = 3.0;
    /// Preview wall clamp distance and brick inflation
    pub const PREVIEW_WALL_MARGIN: f32 = 5.0;
    pub const PREVIEW_BRICK_MARGIN: f32 = 2.0;
}

/// Unit direction for an aim angle in degrees (screen space, y grows downward)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Angle in degrees of a direction vector (screen space, y grows downward)
#[inline]
pub fn degrees_from_direction(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees()
}
