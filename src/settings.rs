//! Game settings and tuning
//!
//! Loaded from a JSON file on native; every section falls back to defaults
//! for missing keys so partial files work.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Bubble field tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Live bubble cap (spawning + active)
    pub max_bubbles: usize,
    /// Speed every bubble moves at after popping in (world units/s)
    pub bubble_speed: f32,
    /// Collision radius
    pub bubble_radius: f32,
    /// Click distance that pops a bubble
    pub pop_radius: f32,
    /// Pop-in animation length (seconds)
    pub pop_in_duration: f32,
    /// Final body sprite scale
    pub bubble_scale: f32,
    /// How long a popped bubble stays visible (seconds)
    pub pop_linger: f32,
    /// Schedule a replacement spawn for every pop
    pub respawn_on_pop: bool,
    /// Delay before the replacement spawn (seconds)
    pub respawn_delay: f32,
    /// Number of bubble sprite variants to pick from
    pub kind_count: usize,
    /// Number of face sprites to pick from (0 = no faces)
    pub face_count: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_bubbles: MAX_BUBBLES,
            bubble_speed: BUBBLE_SPEED,
            bubble_radius: BUBBLE_RADIUS,
            pop_radius: POP_RADIUS,
            pop_in_duration: POP_IN_DURATION,
            bubble_scale: BUBBLE_SCALE,
            pop_linger: POP_LINGER,
            respawn_on_pop: true,
            respawn_delay: 0.0,
            kind_count: 4,
            face_count: 6,
        }
    }
}

/// Passive score, game-over and checkpoint tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Passive score gained per second while bubbles remain
    pub points_per_second: f32,
    /// Seconds with no bubbles before the run ends
    pub game_over_delay: f32,
    /// Seconds on the game over screen before a new run starts
    pub restart_delay: f32,
    /// Pops between checkpoints (0 disables checkpoints)
    pub pops_per_checkpoint: u32,
    /// Bubble speed added at every checkpoint
    pub speed_step: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            points_per_second: 6.0,
            game_over_delay: 2.0,
            restart_delay: 3.0,
            pops_per_checkpoint: 25,
            speed_step: 0.5,
        }
    }
}

/// Wave/rainbow HUD text tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFxConfig {
    pub wave_frequency: f32,
    pub wave_amplitude: f32,
    pub rainbow_speed: f32,
    /// Font size the wave oscillates around
    pub base_size: f32,
}

impl Default for TextFxConfig {
    fn default() -> Self {
        Self {
            wave_frequency: 2.0,
            wave_amplitude: 5.0,
            rainbow_speed: 2.0,
            base_size: 50.0,
        }
    }
}

/// Cue volumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldConfig,
    pub tracker: TrackerConfig,
    pub text: TextFxConfig,
    pub audio: AudioSettings,
    /// Particle/visual effects enabled
    pub particles: bool,
    /// Base score for popping a bubble
    pub pop_score: u32,
    /// Seconds between auto-clicks in idle mode
    pub idle_click_interval: f32,
    /// Fixed run seed (None = host picks one)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            tracker: TrackerConfig::default(),
            text: TextFxConfig::default(),
            audio: AudioSettings::default(),
            particles: true,
            pop_score: POP_SCORE,
            idle_click_interval: 0.6,
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp values the simulation can't work with
    pub fn sanitized(mut self) -> Self {
        let field = &mut self.field;
        field.bubble_speed = field.bubble_speed.max(0.0);
        if field.bubble_radius <= 0.0 {
            field.bubble_radius = BUBBLE_RADIUS;
        }
        // A zero radius could never be hit, not even dead center
        if field.pop_radius <= 0.0 {
            field.pop_radius = POP_RADIUS;
        }
        field.pop_in_duration = field.pop_in_duration.max(0.0);
        field.bubble_scale = field.bubble_scale.max(0.0);
        field.pop_linger = field.pop_linger.max(0.0);
        field.respawn_delay = field.respawn_delay.max(0.0);

        let tracker = &mut self.tracker;
        tracker.points_per_second = tracker.points_per_second.max(0.0);
        tracker.game_over_delay = tracker.game_over_delay.max(0.0);
        tracker.restart_delay = tracker.restart_delay.max(0.0);

        self.audio.master_volume = self.audio.master_volume.clamp(0.0, 1.0);
        self.audio.sfx_volume = self.audio.sfx_volume.clamp(0.0, 1.0);
        self.idle_click_interval = self.idle_click_interval.max(SIM_DT);
        self
    }
}
