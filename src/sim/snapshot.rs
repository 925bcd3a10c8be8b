//! Read-only view of the simulation for renderers

use serde::Serialize;

use super::state::{Ball, Color, PointerBody, SimState};

/// A drawable circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Color,
}

impl From<&Ball> for BodyView {
    fn from(ball: &Ball) -> Self {
        Self {
            x: ball.pos.x,
            y: ball.pos.y,
            radius: ball.radius,
            color: ball.color,
        }
    }
}

impl From<&PointerBody> for BodyView {
    fn from(pointer: &PointerBody) -> Self {
        Self {
            x: pointer.pos.x,
            y: pointer.pos.y,
            radius: pointer.radius,
            color: pointer.color,
        }
    }
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub width: f32,
    pub height: f32,
    pub time_ticks: u64,
    pub balls: Vec<BodyView>,
    pub pointer: BodyView,
}

impl SimState {
    /// Capture the drawable state after a scheduler run
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.arena.width,
            height: self.arena.height,
            time_ticks: self.time_ticks,
            balls: self.balls.iter().map(BodyView::from).collect(),
            pointer: BodyView::from(&self.pointer),
        }
    }
}
