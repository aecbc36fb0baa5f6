//! Browser binding
//!
//! The page owns the canvas and the DOM score fields; it calls `frame` from
//! `requestAnimationFrame`, draws the returned JSON view, and forwards
//! keyboard/pointer input as intents.

use wasm_bindgen::prelude::*;

use super::{FrameClock, FrameUpdate, run_frame, seed_or_clock};
use crate::sim::{GameState, TickInput, preview_path};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    clock: FrameClock,
    input: TickInput,
    last_time: f64,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a session. `tuning_json` may be empty for the built-in defaults;
    /// without a seed the session is seeded from the current time.
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str, seed: Option<u64>) -> Result<WebGame, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let seed = seed_or_clock(seed, js_sys::Date::now());
        Ok(Self {
            state: GameState::new(tuning, seed),
            clock: FrameClock::default(),
            input: TickInput::default(),
            last_time: 0.0,
        })
    }

    /// Arrow keys / drag: rotate the aim by this many angle steps
    pub fn adjust_aim(&mut self, steps: f32) {
        if self.state.accepts_aim() {
            self.input.aim_delta += steps * self.state.tuning.angle_step;
        }
    }

    /// Space / pointer release
    pub fn fire(&mut self) {
        if self.state.accepts_aim() {
            self.input.fire = true;
        }
    }

    pub fn set_idle(&mut self, idle: bool) {
        self.input.idle_mode = idle;
        log::info!("Idle mode: {idle}");
    }

    /// Advance to `time` (ms, from requestAnimationFrame) and return the frame
    /// view as JSON, with the events raised since the last call under `events`
    pub fn frame(&mut self, time: f64) -> Result<String, JsValue> {
        let dt = if self.last_time > 0.0 {
            ((time - self.last_time) / 1000.0) as f32
        } else {
            crate::consts::SIM_DT
        };
        self.last_time = time;

        run_frame(&mut self.state, &mut self.clock, &mut self.input, dt);

        serde_json::to_string(&FrameUpdate::new(&mut self.state))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Aim preview polyline as JSON `[[x, y], ...]`
    pub fn preview(&self) -> Result<String, JsValue> {
        let points: Vec<[f32; 2]> = preview_path(&self.state)
            .into_iter()
            .map(|p| [p.x, p.y])
            .collect();
        serde_json::to_string(&points).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Full restart after the game-over summary is acknowledged
    pub fn restart(&mut self, seed: Option<u64>) {
        let seed = seed_or_clock(seed, js_sys::Date::now());
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(tuning, seed);
        self.clock.reset();
        self.input = TickInput {
            idle_mode: self.input.idle_mode,
            ..Default::default()
        };
        log::info!("Game restarted with seed: {seed}");
    }

    pub fn game_over(&self) -> bool {
        self.state.game_over
    }
}
