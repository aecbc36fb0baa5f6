//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick step only
//! - Seeded RNG only (spawner); cosmetics use tick-derived hashes
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod preview;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod turn;

pub use collision::{
    Axis, Rect, bounce_axis, circle_intersects_circle, circle_intersects_rect,
};
pub use preview::preview_path;
pub use spawner::{Row, spawn_row};
pub use state::{
    Ball, Brick, EventQueue, GameEvent, GameOverSummary, GameState, Item, ItemKind, Launcher,
    MAX_PENDING_EVENTS, Particle, ParticleKind, TurnPhase,
};
pub use tick::{TickInput, tick};
pub use turn::{LaunchQueue, ScheduledLaunch, adjust_aim, fire};
