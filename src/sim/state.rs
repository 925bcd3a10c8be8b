//! Simulation state and body types
//!
//! Everything a tick reads or writes lives in [`SimState`]; no globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::to_radians;
use crate::tuning::Tuning;

/// An RGBA color. Cosmetic only, never read by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in [0, 1]
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string for canvas fill styles
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Ball colors, picked once per ball at spawn
pub const PALETTE: [Color; 6] = [
    Color::rgb(0xED, 0x42, 0x45),
    Color::rgb(0xFF, 0xA5, 0x00),
    Color::rgb(0xDE, 0xC9, 0x51),
    Color::rgb(0x3A, 0xB0, 0x2E),
    Color::rgb(0x22, 0x4A, 0xCF),
    Color::rgb(0x93, 0x4A, 0x9E),
];

/// Translucent yellow of the pointer body
pub const POINTER_COLOR: Color = Color::rgba(254, 231, 92, 0.6);

/// Background fill behind the arena
pub const BACKGROUND_COLOR: Color = Color::rgb(0x2C, 0x2F, 0x33);

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Scalar speed, kept in [0, max_speed]
    pub velocity: f32,
    /// Heading in radians, kept in [0, 2π)
    pub angle: f32,
    pub color: Color,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, radius: f32, velocity: f32, angle: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            velocity,
            angle,
            color: PALETTE[0],
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// The input-driven body tracking the user's cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerBody {
    pub pos: Vec2,
    /// Position at the end of the previous tick
    pub prev_pos: Vec2,
    /// Distance moved during the last tick
    pub velocity: f32,
    pub radius: f32,
    pub color: Color,
}

impl PointerBody {
    /// A resting pointer at `pos`
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            prev_pos: pos,
            velocity: 0.0,
            radius,
            color: POINTER_COLOR,
        }
    }
}

/// Arena bounds. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Spawn a fresh population inside `arena`.
///
/// Ids are handed out from `first_id` upward. Each coordinate is drawn from
/// `[spawn_margin, dimension / spawn_scale]`; headings are whole degrees.
pub fn spawn_balls<R: Rng>(
    tuning: &Tuning,
    arena: Arena,
    first_id: u32,
    rng: &mut R,
) -> Vec<Ball> {
    let (x_lo, x_hi) = spawn_range(tuning, arena.width);
    let (y_lo, y_hi) = spawn_range(tuning, arena.height);

    (0..tuning.ball_count)
        .map(|i| {
            let pos = Vec2::new(rng.random_range(x_lo..=x_hi), rng.random_range(y_lo..=y_hi));
            let angle = to_radians(rng.random_range(0..360u32) as f32);
            let color = PALETTE[rng.random_range(0..PALETTE.len())];
            Ball::new(first_id + i as u32, pos, tuning.ball_radius, tuning.ball_start_speed, angle)
                .with_color(color)
        })
        .collect()
}

/// Valid spawn interval along one axis.
///
/// Collapses to the margin in tiny arenas, and whenever the upper bound is
/// not finite (unbounded arena or an overflowing scale).
pub fn spawn_range(tuning: &Tuning, dimension: f32) -> (f32, f32) {
    let lo = if tuning.spawn_margin.is_finite() {
        tuning.spawn_margin
    } else {
        0.0
    };
    let hi = dimension / tuning.spawn_scale;
    if !hi.is_finite() {
        return (lo, lo);
    }
    (lo, hi.max(lo))
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub arena: Arena,
    /// Live balls, updated in slot order every tick
    pub balls: Vec<Ball>,
    pub pointer: PointerBody,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl SimState {
    /// Create a populated state in a `width` x `height` arena
    pub fn new(tuning: Tuning, width: f32, height: f32, seed: u64) -> Self {
        Self::with_rng(tuning, width, height, seed, Pcg32::seed_from_u64(seed))
    }

    /// Create a populated state drawing from an explicit generator
    pub fn with_rng(tuning: Tuning, width: f32, height: f32, seed: u64, rng: Pcg32) -> Self {
        let arena = Arena::new(width, height);
        let pointer = PointerBody::new(arena.center(), tuning.pointer_radius);
        let mut state = Self {
            seed,
            tuning,
            arena,
            balls: Vec::new(),
            pointer,
            time_ticks: 0,
            rng,
            next_id: 1,
        };
        state.reset(width, height);
        state
    }

    /// Create a state with no balls, for hand-built scenarios
    pub fn empty(tuning: Tuning, width: f32, height: f32) -> Self {
        let arena = Arena::new(width, height);
        let pointer = PointerBody::new(arena.center(), tuning.pointer_radius);
        Self {
            seed: 0,
            tuning,
            arena,
            balls: Vec::new(),
            pointer,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(0),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a hand-built ball, assigning it a fresh id
    pub fn push_ball(&mut self, pos: Vec2, velocity: f32, angle: f32) -> u32 {
        let id = self.next_entity_id();
        let ball = Ball::new(id, pos, self.tuning.ball_radius, velocity, angle);
        self.balls.push(ball);
        id
    }

    /// Discard every ball and respawn the full population for new bounds.
    ///
    /// Takes `&mut self`, so it can never run while a tick holds the state.
    pub fn reset(&mut self, width: f32, height: f32) {
        self.arena = Arena::new(width, height);
        let first_id = self.next_id;
        self.balls = spawn_balls(&self.tuning, self.arena, first_id, &mut self.rng);
        self.next_id = first_id + self.balls.len() as u32;
        log::info!(
            "Spawned {} balls in {}x{} arena",
            self.balls.len(),
            width,
            height
        );
    }

    /// Arena size changed: full stop and reinitialise
    pub fn resize(&mut self, width: f32, height: f32) {
        log::debug!(
            "Arena resized {}x{} -> {}x{}",
            self.arena.width,
            self.arena.height,
            width,
            height
        );
        self.reset(width, height);
    }

    /// Input adapter entry point: move the pointer body between ticks
    pub fn move_pointer(&mut self, x: f32, y: f32) {
        self.pointer.pos = Vec2::new(x, y);
    }
}
