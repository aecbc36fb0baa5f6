//! Idle/demo mode
//!
//! Sweeps the aim toward the most dangerous brick (the lowest one) one step
//! per tick, then fires.

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;
use crate::consts::STRAIGHT_UP;
use crate::degrees_from_direction;

/// Centre of the brick closest to the fatal line
pub fn lowest_brick_target(state: &GameState) -> Option<Vec2> {
    state
        .bricks
        .iter()
        .max_by(|a, b| {
            a.rect
                .bottom()
                .partial_cmp(&b.rect.bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|b| b.rect.center())
}

/// Produce this tick's intents for the autopilot
pub fn steer(state: &GameState) -> TickInput {
    if !state.accepts_aim() {
        return TickInput::default();
    }

    let desired = lowest_brick_target(state)
        .map(|target| degrees_from_direction(target - state.launcher.pos))
        .unwrap_or(STRAIGHT_UP);
    let desired = state.tuning.clamp_angle(desired);

    let step = state.tuning.angle_step;
    let delta = desired - state.launcher.aim;
    if delta.abs() <= step {
        TickInput {
            aim_delta: delta,
            fire: true,
            idle_mode: false,
        }
    } else {
        TickInput {
            aim_delta: step * delta.signum(),
            fire: false,
            idle_mode: false,
        }
    }
}
