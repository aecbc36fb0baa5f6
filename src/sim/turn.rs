//! Turn controller: aiming, volley scheduling, and row advance
//!
//! A volley is a set of launches queued at fire time and released on tick
//! boundaries, so the simulation stays deterministic without wall-clock timers.

use std::collections::VecDeque;

use glam::Vec2;

use super::state::{Ball, GameEvent, GameState, TurnPhase};
use crate::consts::STRAIGHT_UP;
use crate::direction_from_degrees;

/// A ball waiting for its launch tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledLaunch {
    pub due_tick: u64,
    pub vel: Vec2,
}

/// Pending launches, ordered by due tick
#[derive(Debug, Clone, Default)]
pub struct LaunchQueue {
    pending: VecDeque<ScheduledLaunch>,
}

impl LaunchQueue {
    /// Queue `count` launches starting at `start`, `delay` ticks apart
    pub fn schedule_volley(&mut self, start: u64, count: u32, delay: u32, vel: Vec2) {
        for i in 0..count as u64 {
            self.pending.push_back(ScheduledLaunch {
                due_tick: start + i * delay as u64,
                vel,
            });
        }
    }

    /// Pop every launch due at or before `now`
    pub fn take_due(&mut self, now: u64) -> Vec<ScheduledLaunch> {
        let mut due = Vec::new();
        while self.pending.front().is_some_and(|l| l.due_tick <= now) {
            if let Some(launch) = self.pending.pop_front() {
                due.push(launch);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Rotate the aim by `delta` degrees. Ignored outside the aiming phase.
pub fn adjust_aim(state: &mut GameState, delta: f32) {
    if !state.accepts_aim() || delta == 0.0 {
        return;
    }
    state.launcher.aim = state.tuning.clamp_angle(state.launcher.aim + delta);
}

/// Start a volley of `balls_to_shoot` balls along the current aim.
///
/// Ignored while a volley is in flight or after game over. Returns true if a
/// volley was started.
pub fn fire(state: &mut GameState) -> bool {
    if !state.accepts_aim() {
        log::debug!("Fire ignored in {:?}", state.phase);
        return false;
    }
    let vel = direction_from_degrees(state.launcher.aim) * state.tuning.ball_speed;
    state.launches.schedule_volley(
        state.time_ticks,
        state.balls_to_shoot,
        state.tuning.launch_delay_ticks,
        vel,
    );
    state.phase = TurnPhase::Shooting;
    log::debug!(
        "Round {}: firing {} balls at {:.0} degrees",
        state.round,
        state.balls_to_shoot,
        state.launcher.aim
    );
    true
}

/// Put every launch that is due this tick into play
pub fn release_due_launches(state: &mut GameState) {
    for launch in state.launches.take_due(state.time_ticks) {
        state.balls.push(Ball::new(
            state.launcher.pos,
            launch.vel,
            state.tuning.ball_radius,
        ));
        state.events.push(GameEvent::BallLaunched);
    }
}

/// True once every ball of the volley has been launched and has left the field
pub fn volley_finished(state: &GameState) -> bool {
    state.phase == TurnPhase::Shooting && state.balls.is_empty() && state.launches.is_empty()
}

/// Close the turn: move the launcher, advance the round, drop rows, spawn the
/// next row and check for game over.
pub fn resolve_turn(state: &mut GameState) {
    state.phase = TurnPhase::Resolving;

    state.launcher.pos.x = state.landing_x;
    state.launcher.aim = STRAIGHT_UP;
    state.round += 1;
    state.events.push(GameEvent::HudChanged);
    state.events.push(GameEvent::RoundAdvanced { round: state.round });
    log::info!("Round {} (score {})", state.round, state.score);

    state.shift_rows_down();
    state.spawn_row();

    if !state.check_game_over() {
        state.phase = TurnPhase::Aiming;
    }
}
