//! Deterministic simulation module
//!
//! All bubble gameplay lives here. This module must be pure and deterministic:
//! - Fixed timestep physics
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies (cues leave as `GameEvent`s)

pub mod camera;
pub mod collision;
pub mod field;
pub mod schedule;
pub mod state;

pub use camera::{Camera, ViewBounds};
pub use collision::{Bounce, bounce_into, separation_impulse};
pub use field::{BubbleField, FieldTask};
pub use schedule::{Scheduler, TaskId};
pub use state::{Bubble, BubbleId, BubbleState, GameEvent, GamePhase};
