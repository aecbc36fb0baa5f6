//! Game balance and field dimensions
//!
//! Every tunable the simulation reads lives here. Defaults reproduce the
//! classic 400x700 field; a JSON file can override any subset of fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rejected configuration, reported once at startup
#[derive(Debug)]
pub enum TuningError {
    /// The JSON document could not be parsed
    Parse(serde_json::Error),
    /// A field that must be strictly positive was not
    NonPositive(&'static str),
    /// `min_angle` must be below `max_angle` and both must point upward
    AngleRange { min: f32, max: f32 },
    /// The fatal line must sit inside the field, below the first row
    FatalLine { line_y: f32 },
    /// The brick inset leaves no room for a brick inside its lane
    InsetTooLarge { inset: f32, lane_width: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "invalid tuning JSON: {e}"),
            TuningError::NonPositive(field) => write!(f, "`{field}` must be greater than zero"),
            TuningError::AngleRange { min, max } => write!(
                f,
                "aim range [{min}, {max}] must satisfy -180 < min_angle < max_angle < 0"
            ),
            TuningError::FatalLine { line_y } => {
                write!(f, "fatal line at y={line_y} lies outside the play field")
            }
            TuningError::InsetTooLarge { inset, lane_width } => write!(
                f,
                "brick inset {inset} leaves no room in a {lane_width}px lane"
            ),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Distance of the fatal line above the bottom edge
    pub fatal_line_offset: f32,
    /// Launcher distance above the bottom edge
    pub launcher_offset: f32,
    /// How far below the field a ball travels before it is gone
    pub exit_margin: f32,

    // === Rows ===
    pub lane_count: usize,
    pub row_height: f32,
    /// Top of a freshly spawned row
    pub row_top: f32,
    /// Gap between a brick and its lane bounds on every side
    pub brick_inset: f32,
    pub item_radius: f32,

    // === Shooting ===
    pub ball_speed: f32,
    pub ball_radius: f32,
    /// Aim bounds in degrees (screen space, -90 is straight up)
    pub min_angle: f32,
    pub max_angle: f32,
    /// Degrees per aim step
    pub angle_step: f32,
    /// Ticks between consecutive balls of one volley
    pub launch_delay_ticks: u32,

    // === Cosmetics ===
    pub trail_length: usize,
    /// Item wobble phase advance per tick (radians)
    pub wobble_rate: f32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 400.0,
            field_height: 700.0,
            fatal_line_offset: 50.0,
            launcher_offset: 10.0,
            exit_margin: 50.0,

            lane_count: 7,
            row_height: 50.0,
            row_top: 50.0,
            brick_inset: 6.0,
            item_radius: 12.0,

            ball_speed: 7.0,
            ball_radius: 6.0,
            min_angle: -160.0,
            max_angle: -20.0,
            angle_step: 2.0,
            launch_delay_ticks: 5,

            trail_length: 8,
            wobble_rate: 0.12,
            max_particles: 256,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("row_height", self.row_height),
            ("ball_speed", self.ball_speed),
            ("ball_radius", self.ball_radius),
            ("item_radius", self.item_radius),
            ("angle_step", self.angle_step),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NonPositive(name));
            }
        }
        if self.lane_count == 0 {
            return Err(TuningError::NonPositive("lane_count"));
        }

        if !(self.min_angle > -180.0 && self.min_angle < self.max_angle && self.max_angle < 0.0) {
            return Err(TuningError::AngleRange {
                min: self.min_angle,
                max: self.max_angle,
            });
        }

        let line_y = self.fatal_line_y();
        if line_y <= self.row_top + self.row_height || line_y > self.field_height {
            return Err(TuningError::FatalLine { line_y });
        }

        let lane_width = self.lane_width();
        if self.brick_inset < 0.0 || self.brick_inset * 2.0 >= lane_width.min(self.row_height) {
            return Err(TuningError::InsetTooLarge {
                inset: self.brick_inset,
                lane_width,
            });
        }

        if self.trail_length == 0 {
            log::warn!("trail_length is 0, ball trails disabled");
        }
        Ok(())
    }

    /// Width of one lane slot
    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.field_width / self.lane_count as f32
    }

    /// Y of the line a brick's bottom edge must not reach
    #[inline]
    pub fn fatal_line_y(&self) -> f32 {
        self.field_height - self.fatal_line_offset
    }

    /// Launcher y (fixed for the whole session)
    #[inline]
    pub fn launcher_y(&self) -> f32 {
        self.field_height - self.launcher_offset
    }

    /// Clamp an aim angle into the allowed range
    #[inline]
    pub fn clamp_angle(&self, degrees: f32) -> f32 {
        degrees.clamp(self.min_angle, self.max_angle)
    }
}
