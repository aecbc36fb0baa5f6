//! Aim preview
//!
//! A coarse, side-effect-free trace of where a shot along the current aim
//! would go. Bricks bounce the trace but are never damaged.

use glam::Vec2;

use super::collision::bounce_axis;
use super::state::GameState;
use crate::consts::{PREVIEW_BRICK_MARGIN, PREVIEW_SEGMENTS, PREVIEW_STRIDE, PREVIEW_WALL_MARGIN};
use crate::direction_from_degrees;

/// Polyline of the predicted path, starting at the launcher
pub fn preview_path(state: &GameState) -> Vec<Vec2> {
    let width = state.tuning.field_width;
    let mut pos = state.launcher.pos;
    let mut vel = direction_from_degrees(state.launcher.aim) * state.tuning.ball_speed;

    let mut points = Vec::with_capacity(PREVIEW_SEGMENTS + 1);
    points.push(pos);

    for _ in 0..PREVIEW_SEGMENTS {
        if pos.x < PREVIEW_WALL_MARGIN {
            pos.x = PREVIEW_WALL_MARGIN;
            vel.x = -vel.x;
        }
        if pos.x > width - PREVIEW_WALL_MARGIN {
            pos.x = width - PREVIEW_WALL_MARGIN;
            vel.x = -vel.x;
        }
        if pos.y < PREVIEW_WALL_MARGIN {
            pos.y = PREVIEW_WALL_MARGIN;
            vel.y = -vel.y;
        }

        for brick in &state.bricks {
            if brick.rect.inflate(PREVIEW_BRICK_MARGIN).contains(pos) {
                vel = bounce_axis(pos, &brick.rect).reflect(vel);
            }
        }

        pos += vel * PREVIEW_STRIDE;
        points.push(pos);
    }

    points
}
