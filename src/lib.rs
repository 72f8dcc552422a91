//! Bubble Pop - A casual 2D bubble popping game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, bouncing, collisions, popping)
//! - `score`: Score/combo collaborator
//! - `tracker`: Passive score, game-over and checkpoint flow
//! - `audio` / `effects`: Cue collaborators supplied by the host
//! - `text_fx`: Decorative HUD text
//! - `session`: Host-facing frame loop tying it all together
//! - `settings`: Data-driven tuning

pub mod audio;
pub mod effects;
pub mod score;
pub mod session;
pub mod settings;
pub mod sim;
pub mod text_fx;
pub mod tracker;

pub use score::{ScoreBoard, ScoreTracker};
pub use session::{FrameInput, Hud, Session, SessionSummary};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the session will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Camera defaults (orthographic half height in world units, 16:9)
    pub const CAMERA_HALF_HEIGHT: f32 = 5.0;
    pub const CAMERA_ASPECT: f32 = 16.0 / 9.0;

    /// Bubble defaults
    pub const MAX_BUBBLES: usize = 10;
    pub const BUBBLE_SPEED: f32 = 5.0;
    pub const BUBBLE_RADIUS: f32 = 0.5;
    pub const BUBBLE_SCALE: f32 = 0.5;
    /// Face sprite overshoots to this scale while popping in
    pub const FACE_POP_IN_SCALE: f32 = 1.5;
    pub const POP_IN_DURATION: f32 = 0.5;
    /// Clicks closer than this to a bubble center pop it
    pub const POP_RADIUS: f32 = 0.5;
    /// Popped bubbles stay visible this long for the pop animation
    pub const POP_LINGER: f32 = 0.25;
    pub const POP_SCORE: u32 = 10;

    /// Combo multiplier cap
    pub const MAX_COMBO_MULTIPLIER: f32 = 3.0;
}
