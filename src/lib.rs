//! Werble - bouncing balls in a rectangular arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, per-tick rules)
//! - `scheduler`: Fixed-timestep accumulator decoupling physics from frame rate
//! - `tuning`: Data-driven physics constants
//! - `renderer`: Canvas 2D drawing (wasm only)

pub mod scheduler;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use scheduler::Scheduler;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;
use std::f32::consts::TAU;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Accumulated time (seconds) above which the backlog is dropped
    pub const MAX_BACKLOG: f32 = 1.0;

    /// Population spawned on every reset
    pub const BALL_COUNT: usize = 100;
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_START_SPEED: f32 = 50.0;
    /// Speed cap applied whenever a ball gains velocity
    pub const BALL_MAX_SPEED: f32 = 100.0;

    /// Speed added on each wall contact
    pub const WALL_BOOST: f32 = 30.0;
    /// Speed lost per simulated second
    pub const FRICTION: f32 = 300.0;
    /// Faster body hands over `velocity / LEVER_DIVISOR` on a peer hit
    pub const LEVER_DIVISOR: f32 = 5.0;

    /// Pointer body defaults
    pub const POINTER_RADIUS: f32 = 40.0;
    /// Multiplier on pointer speed (units per tick) when it strikes a ball
    pub const POINTER_BOOST: f32 = 30.0;

    /// Spawn range is [SPAWN_MARGIN, dimension / SPAWN_SCALE]
    pub const SPAWN_MARGIN: f32 = 10.0;
    pub const SPAWN_SCALE: f32 = 1.05;
}

/// Degrees to radians
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Dot product of two vectors.
///
/// Only the sign matters to callers (aligned vs opposed headings).
#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.x * b.x + a.y * b.y
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
