//! Physics tuning
//!
//! Every constant the update rules read lives here so a run can be
//! reshaped from a JSON file without recompiling. Missing fields fall
//! back to the values in [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating tuning
#[derive(Debug)]
pub enum TuningError {
    /// Failed to read the tuning file
    Io(std::io::Error),
    /// File contents were not valid tuning JSON
    Parse(serde_json::Error),
    /// A field holds a value the rules cannot work with
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "Failed to read tuning file: {}", e),
            TuningError::Parse(e) => write!(f, "Failed to parse tuning JSON: {}", e),
            TuningError::Invalid(msg) => write!(f, "Invalid tuning: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Data-driven physics constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Scheduling ===
    /// Fixed timestep in seconds
    pub step: f32,
    /// Backlog (seconds) after which the accumulator is reset to one step
    pub max_backlog: f32,

    // === Population ===
    pub ball_count: usize,
    pub ball_radius: f32,
    pub ball_start_speed: f32,
    pub max_speed: f32,

    // === Rules ===
    pub wall_boost: f32,
    /// Speed lost per simulated second
    pub friction: f32,
    pub lever_divisor: f32,
    pub pointer_radius: f32,
    pub pointer_boost: f32,

    // === Spawning ===
    pub spawn_margin: f32,
    pub spawn_scale: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            step: SIM_DT,
            max_backlog: MAX_BACKLOG,

            ball_count: BALL_COUNT,
            ball_radius: BALL_RADIUS,
            ball_start_speed: BALL_START_SPEED,
            max_speed: BALL_MAX_SPEED,

            wall_boost: WALL_BOOST,
            friction: FRICTION,
            lever_divisor: LEVER_DIVISOR,
            pointer_radius: POINTER_RADIUS,
            pointer_boost: POINTER_BOOST,

            spawn_margin: SPAWN_MARGIN,
            spawn_scale: SPAWN_SCALE,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would break the per-tick invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(name: &str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )))
            }
        }
        fn non_negative(name: &str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )))
            }
        }

        positive("step", self.step)?;
        positive("max_backlog", self.max_backlog)?;
        positive("ball_radius", self.ball_radius)?;
        positive("max_speed", self.max_speed)?;
        positive("lever_divisor", self.lever_divisor)?;
        positive("pointer_radius", self.pointer_radius)?;
        positive("spawn_scale", self.spawn_scale)?;
        non_negative("ball_start_speed", self.ball_start_speed)?;
        non_negative("wall_boost", self.wall_boost)?;
        non_negative("friction", self.friction)?;
        non_negative("pointer_boost", self.pointer_boost)?;
        non_negative("spawn_margin", self.spawn_margin)?;

        if self.ball_start_speed > self.max_speed {
            return Err(TuningError::Invalid(format!(
                "ball_start_speed ({}) exceeds max_speed ({})",
                self.ball_start_speed, self.max_speed
            )));
        }
        if self.max_backlog < self.step {
            return Err(TuningError::Invalid(format!(
                "max_backlog ({}) is shorter than one step ({})",
                self.max_backlog, self.step
            )));
        }
        Ok(())
    }

    /// Add `amount` to a speed, never exceeding `max_speed`
    #[inline]
    pub fn boost(&self, speed: f32, amount: f32) -> f32 {
        (speed + amount).min(self.max_speed)
    }
}
