//! Fixed-step scheduler
//!
//! Turns irregular frame timestamps into a whole number of fixed physics
//! steps, so the simulation advances at the same rate on a 30 Hz laptop
//! and a 144 Hz monitor.

use crate::sim::{SimState, tick};
use crate::tuning::Tuning;

/// Accumulates wall-clock time and drains it in fixed steps
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Fixed timestep (seconds)
    step: f32,
    /// Backlog above which pending time is dropped
    max_backlog: f32,
    /// Unsimulated time carried between frames
    accumulator: f32,
    /// Timestamp of the previous frame (ms)
    last_time_ms: Option<f64>,
    /// Ticks run since creation
    total_ticks: u64,
}

impl Scheduler {
    pub fn new(step: f32, max_backlog: f32) -> Self {
        Self {
            step,
            max_backlog,
            accumulator: 0.0,
            last_time_ms: None,
            total_ticks: 0,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.step, tuning.max_backlog)
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Forget pending time and the last timestamp.
    ///
    /// The front-end calls this on every arena resize, so a reinitialised
    /// population never inherits the old backlog.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }

    /// Handle a frame signal carrying a timestamp in milliseconds.
    ///
    /// The first frame only records the timestamp. Returns the number of
    /// ticks run.
    pub fn frame<F: FnMut(f32)>(&mut self, timestamp_ms: f64, on_tick: F) -> u32 {
        let elapsed = match self.last_time_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time_ms = Some(timestamp_ms);
        self.advance(elapsed, on_tick)
    }

    /// Add `elapsed` seconds and run every whole step now due
    pub fn advance<F: FnMut(f32)>(&mut self, elapsed: f32, mut on_tick: F) -> u32 {
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator > self.step {
            if self.accumulator > self.max_backlog {
                // Spiral of death: drop the backlog, keep one step
                log::warn!(
                    "Dropping {:.2}s of simulation backlog",
                    self.accumulator - self.step
                );
                self.accumulator = self.step;
            }
            on_tick(self.step);
            self.accumulator -= self.step;
            ticks += 1;
        }
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Drive `state` for one frame
    pub fn run(&mut self, state: &mut SimState, timestamp_ms: f64) -> u32 {
        self.frame(timestamp_ms, |dt| tick(state, dt))
    }
}
