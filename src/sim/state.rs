//! Core simulation types
//!
//! Bubbles, their lifecycle and the events the field reports to the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen: bubbles float and can be popped, no passive score
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused, nothing advances
    Paused,
    /// Run ended, waiting for the automatic restart
    GameOver,
}

/// Stable bubble identity (never reused within a field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

/// Bubble lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Scaling up after spawn; not simulated or clickable yet
    Spawning { elapsed: f32 },
    /// Moving, bouncing, colliding and clickable
    Active,
    /// Removed from the live set, still visible while the pop animation plays
    Popping,
}

/// A bubble entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Sprite faces left when moving left (or standing still)
    pub flip_x: bool,
    pub state: BubbleState,
    /// Sprite variant
    pub kind: usize,
    /// Face sprite drawn on top, if any were configured
    pub face: Option<usize>,
}

impl Bubble {
    pub fn new(id: BubbleId, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            flip_x: !(vel.x > 0.0),
            state: BubbleState::Spawning { elapsed: 0.0 },
            kind: 0,
            face: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == BubbleState::Active
    }

    pub fn is_spawning(&self) -> bool {
        matches!(self.state, BubbleState::Spawning { .. })
    }

    /// Advance the pop-in timer. Returns true on the frame the bubble becomes active.
    pub fn advance_spawn(&mut self, dt: f32, duration: f32) -> bool {
        if let BubbleState::Spawning { elapsed } = &mut self.state {
            *elapsed += dt;
            if *elapsed >= duration {
                self.state = BubbleState::Active;
                return true;
            }
        }
        false
    }

    /// Pop-in progress in [0, 1] (1 once active)
    pub fn spawn_progress(&self, duration: f32) -> f32 {
        match self.state {
            BubbleState::Spawning { elapsed } if duration > 0.0 => (elapsed / duration).min(1.0),
            BubbleState::Spawning { .. } => 0.0,
            BubbleState::Active | BubbleState::Popping => 1.0,
        }
    }

    /// Body sprite scale, lerped from zero while popping in
    pub fn body_scale(&self, full_scale: f32, duration: f32) -> f32 {
        full_scale * self.spawn_progress(duration)
    }

    /// Face sprite scale: overshoots while popping in, settles at 1
    pub fn face_scale(&self, duration: f32) -> f32 {
        match self.state {
            BubbleState::Spawning { .. } => {
                crate::consts::FACE_POP_IN_SCALE * self.spawn_progress(duration)
            }
            _ => 1.0,
        }
    }

    pub fn update_flip(&mut self) {
        self.flip_x = !(self.vel.x > 0.0);
    }
}

/// Something the host should react to (cues, score, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Bubble created and starting its pop-in
    BubbleSpawned { id: BubbleId, pos: Vec2 },
    /// Pop-in finished, bubble is now moving
    BubbleReady { id: BubbleId, pos: Vec2 },
    /// Bubble popped by a click
    BubblePopped { id: BubbleId, pos: Vec2 },
    /// Click hit nothing
    ClickMissed { point: Vec2 },
}
