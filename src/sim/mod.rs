//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by slot)
//! - No rendering or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Circle, Motion, WallContact, circles_overlap, is_receding, wall_contact};
pub use snapshot::{BodyView, Snapshot};
pub use state::{
    Arena, BACKGROUND_COLOR, Ball, Color, PALETTE, POINTER_COLOR, PointerBody, SimState,
    spawn_balls,
};
pub use tick::{tick, update_pointer};
