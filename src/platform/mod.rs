//! Presentation adapter contract
//!
//! The renderer/HUD side of the game talks to the simulation only through:
//! - `FrameView`: a borrowed, serializable snapshot read once per frame
//! - `FrameUpdate`: the view plus the events raised since the last frame
//! - `TickInput`: intents buffered between frames and applied by `tick`
//! - `FrameClock`: turns variable frame time into fixed simulation ticks

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;
use serde::Serialize;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{
    Ball, Brick, GameEvent, GameOverSummary, GameState, Item, Launcher, Particle, TickInput,
    TurnPhase, tick,
};

/// Everything a renderer needs for one frame
#[derive(Debug, Serialize)]
pub struct FrameView<'a> {
    pub field: Vec2,
    pub fatal_line_y: f32,
    pub balls: &'a [Ball],
    pub bricks: &'a [Brick],
    pub items: &'a [Item],
    pub particles: &'a [Particle],
    pub launcher: &'a Launcher,
    pub score: u64,
    pub balls_to_shoot: u32,
    pub round: u32,
    pub phase: TurnPhase,
    pub game_over: bool,
    pub summary: Option<GameOverSummary>,
}

impl<'a> FrameView<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self {
            field: Vec2::new(state.tuning.field_width, state.tuning.field_height),
            fatal_line_y: state.tuning.fatal_line_y(),
            balls: &state.balls,
            bricks: &state.bricks,
            items: &state.items,
            particles: &state.particles,
            launcher: &state.launcher,
            score: state.score,
            balls_to_shoot: state.balls_to_shoot,
            round: state.round,
            phase: state.phase,
            game_over: state.game_over,
            summary: state.game_over.then(|| state.summary()),
        }
    }
}

/// One frame for the adapter: the snapshot with the drained event queue
/// alongside it, so HUD refreshes and sound cues survive the hand-off
#[derive(Debug, Serialize)]
pub struct FrameUpdate<'a> {
    #[serde(flatten)]
    pub view: FrameView<'a>,
    pub events: Vec<GameEvent>,
}

impl<'a> FrameUpdate<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        let events = state.drain_events();
        Self {
            view: FrameView::new(state),
            events,
        }
    }
}

/// Session seed: the caller's if given, otherwise derived from a wall-clock
/// reading in milliseconds
pub fn seed_or_clock(seed: Option<u64>, now_ms: f64) -> u64 {
    seed.unwrap_or_else(|| {
        if now_ms.is_finite() && now_ms > 0.0 {
            now_ms as u64
        } else {
            0
        }
    })
}

/// Colour slot for a brick, keyed by the last digit of its hit points
#[inline]
pub fn brick_palette_slot(hp: u32) -> u8 {
    (hp.max(1) % 10) as u8
}

/// Fixed-step accumulator that decouples simulation speed from frame rate
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    /// Add elapsed seconds; returns how many ticks to run this frame
    pub fn advance(&mut self, dt: f32) -> u32 {
        // Long stalls (tab hidden, debugger) are dropped rather than replayed
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Run the ticks owed for one frame. One-shot intents (fire) are consumed by
/// the first tick; the aim delta is applied once.
pub fn run_frame(state: &mut GameState, clock: &mut FrameClock, input: &mut TickInput, dt: f32) {
    for _ in 0..clock.advance(dt) {
        tick(state, input);

        // Clear one-shot inputs after processing
        input.fire = false;
        input.aim_delta = 0.0;
    }
}
