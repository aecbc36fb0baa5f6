//! Game state and core simulation types
//!
//! Everything the adapter reads each frame lives here. Only `tick` and the
//! turn controller mutate it.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::spawner::spawn_row;
use super::turn::LaunchQueue;
use crate::consts::STRAIGHT_UP;
use crate::tuning::Tuning;

/// Where the current turn stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for aim adjustments and a fire command
    Aiming,
    /// Balls of the current volley are in flight or still queued
    Shooting,
    /// Row advance in progress (transient within a tick)
    Resolving,
    /// A brick crossed the fatal line; only a restart leaves this state
    GameOver,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Past positions for rendering (newest first)
    pub trail: Vec<Vec2>,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            trail: Vec::new(),
        }
    }

    /// Record current position to trail (call each tick before moving)
    pub fn record_trail(&mut self, capacity: usize) {
        if capacity == 0 {
            return;
        }
        self.trail.insert(0, self.pos);
        self.trail.truncate(capacity);
    }
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub hp: u32,
}

impl Brick {
    pub fn new(rect: Rect, hp: u32) -> Self {
        Self { rect, hp }
    }

    /// Take one hit. Returns true if the brick is now destroyed.
    pub fn hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }
}

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// +1 ball for every following volley
    ExtraBall,
}

/// A collectible item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ItemKind,
    /// Visual wobble phase (radians), not gameplay-affecting
    pub wobble: f32,
}

/// Particle flavours, mapped to colours by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Wall,
    Pickup,
    Hit,
    Shatter,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// Remaining lifetime in ticks
    pub life: f32,
    pub size: f32,
}

/// The ball launcher at the bottom of the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    pub pos: Vec2,
    /// Aim in degrees (screen space, -90 is straight up)
    pub aim: f32,
}

/// End-of-session numbers shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    /// Rounds fully survived (the round in progress does not count)
    pub rounds_survived: u32,
    pub score: u64,
}

/// Signals for the presentation layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score, ball count or round changed
    HudChanged,
    BallLaunched,
    WallBounce { pos: Vec2 },
    ItemCollected { pos: Vec2 },
    BrickHit { pos: Vec2, hp_left: u32 },
    BrickDestroyed { pos: Vec2 },
    RoundAdvanced { round: u32 },
    GameOver(GameOverSummary),
}

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Outgoing event buffer, bounded so an embedder that never drains it does
/// not grow without limit
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        if self.pending.len() >= MAX_PENDING_EVENTS {
            self.pending.pop_front();
        }
        self.pending.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.pending.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    pub fn contains(&self, event: &GameEvent) -> bool {
        self.pending.contains(event)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG (spawner only)
    pub rng: Pcg32,
    /// Current round (1-based)
    pub round: u32,
    /// Volley size for the next fire
    pub balls_to_shoot: u32,
    pub score: u64,
    /// Latched once a brick crosses the fatal line
    pub game_over: bool,
    pub phase: TurnPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub launcher: Launcher,
    /// Where the launcher moves at turn end (last ball to reach launcher depth)
    pub landing_x: f32,
    /// Balls in flight, in launch order
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub items: Vec<Item>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Pending staggered launches of the current volley
    pub launches: LaunchQueue,
    /// Outgoing signals since the last drain
    pub events: EventQueue,
}

impl GameState {
    /// Create a new session and spawn the first row.
    ///
    /// `tuning` is assumed validated; see [`Tuning::validate`].
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let center_x = tuning.field_width / 2.0;
        let launcher = Launcher {
            pos: Vec2::new(center_x, tuning.launcher_y()),
            aim: STRAIGHT_UP,
        };

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: 1,
            balls_to_shoot: 1,
            score: 0,
            game_over: false,
            phase: TurnPhase::Aiming,
            time_ticks: 0,
            launcher,
            landing_x: center_x,
            balls: Vec::new(),
            bricks: Vec::new(),
            items: Vec::new(),
            particles: Vec::new(),
            launches: LaunchQueue::default(),
            events: EventQueue::default(),
            tuning,
        };

        state.spawn_row();
        log::info!("New session (seed {seed})");
        state
    }

    /// Spawn the row for the current round at the top of the field
    pub fn spawn_row(&mut self) {
        let row = spawn_row(self.round, &self.tuning, &mut self.rng);
        log::debug!(
            "Round {}: spawned {} bricks, {} items",
            self.round,
            row.bricks.len(),
            row.items.len()
        );
        self.bricks.extend(row.bricks);
        self.items.extend(row.items);
        self.events.push(GameEvent::HudChanged);
    }

    /// Move every brick and item down by one row
    pub fn shift_rows_down(&mut self) {
        let offset = Vec2::new(0.0, self.tuning.row_height);
        for brick in &mut self.bricks {
            brick.rect.translate(offset);
        }
        for item in &mut self.items {
            item.pos += offset;
        }
    }

    /// Latch game over if any brick reached the fatal line. Returns true on the
    /// tick it latches.
    pub fn check_game_over(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let line_y = self.tuning.fatal_line_y();
        if self.bricks.iter().any(|b| b.rect.bottom() >= line_y) {
            self.game_over = true;
            self.phase = TurnPhase::GameOver;
            let summary = self.summary();
            log::info!(
                "Game over: survived {} rounds, score {}",
                summary.rounds_survived,
                summary.score
            );
            self.events.push(GameEvent::GameOver(summary));
            return true;
        }
        false
    }

    pub fn summary(&self) -> GameOverSummary {
        GameOverSummary {
            rounds_survived: self.round.saturating_sub(1),
            score: self.score,
        }
    }

    /// True while the player may aim and fire
    pub fn accepts_aim(&self) -> bool {
        self.phase == TurnPhase::Aiming && !self.game_over
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}
