//! Collision predicates
//!
//! Pure tests only. Deciding what a hit *does* is the job of `tick`.

use glam::Vec2;

use super::state::Arena;
use crate::{distance, dot, heading_vector};

/// Anything with a circular footprint
pub trait Circle {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

impl Circle for super::state::Ball {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Circle for super::state::PointerBody {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Strict overlap: circles that merely touch do not collide
#[inline]
pub fn circles_overlap(a: &impl Circle, b: &impl Circle) -> bool {
    distance(a.center(), b.center()) < a.radius() + b.radius()
}

/// Heading and speed of a moving body, for the receding test
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    pub velocity: f32,
    pub angle: f32,
}

impl From<&super::state::Ball> for Motion {
    fn from(ball: &super::state::Ball) -> Self {
        Self {
            velocity: ball.velocity,
            angle: ball.angle,
        }
    }
}

/// Whether two bodies are already separating and should be left alone.
///
/// A body at rest is never receding, so it always gets knocked.
/// Otherwise broadly aligned headings (positive dot product) count as
/// separating.
pub fn is_receding(a: Motion, b: Motion) -> bool {
    if a.velocity == 0.0 || b.velocity == 0.0 {
        return false;
    }
    dot(heading_vector(a.angle), heading_vector(b.angle)) > 0.0
}

/// Which walls a circle is touching or beyond
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Left or right wall
    pub horizontal: bool,
    /// Top or bottom wall
    pub vertical: bool,
}

/// Check a circle against the arena edges (contact is inclusive)
pub fn wall_contact(pos: Vec2, radius: f32, arena: &Arena) -> WallContact {
    WallContact {
        horizontal: pos.x - radius <= 0.0 || pos.x + radius >= arena.width,
        vertical: pos.y - radius <= 0.0 || pos.y + radius >= arena.height,
    }
}
