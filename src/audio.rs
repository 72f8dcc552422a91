//! Audio cues
//!
//! The game never mixes audio itself. It asks an `AudioSink` supplied by the
//! host to play one-shot clips; with no sink every cue is skipped.

use glam::Vec2;

use crate::settings::AudioSettings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Bubble popped by a click
    BubblePop,
    /// Bubble count dropped (any cause)
    BubbleLost,
    /// Bubble finished popping in
    BubbleSpawn,
    /// Bubble saved at a checkpoint
    Select,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::BubblePop => "bubble_pop",
            SoundEffect::BubbleLost => "bubble_lost",
            SoundEffect::BubbleSpawn => "bubble_spawn",
            SoundEffect::Select => "select",
            SoundEffect::GameOver => "game_over",
        }
    }
}

/// Host audio output
pub trait AudioSink {
    /// Fire-and-forget a clip at a world location
    fn play_one_shot(&mut self, clip: SoundEffect, location: Vec2, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudioSink {
    pub played: usize,
}

impl AudioSink for LogAudioSink {
    fn play_one_shot(&mut self, clip: SoundEffect, location: Vec2, volume: f32) {
        self.played += 1;
        log::debug!(
            "audio: {} at ({:.2}, {:.2}) vol {:.2}",
            clip.name(),
            location.x,
            location.y,
            volume
        );
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// A cue was dropped for want of a sink
    missing_sink_reported: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None, &AudioSettings::default())
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("has_sink", &self.sink.is_some())
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn AudioSink>>, settings: &AudioSettings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            missing_sink_reported: false,
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.sink = Some(sink);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect, location: Vec2) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        match self.sink.as_mut() {
            Some(sink) => sink.play_one_shot(effect, location, vol),
            None if !self.missing_sink_reported => {
                log::warn!("No audio sink - audio disabled");
                self.missing_sink_reported = true;
            }
            None => {}
        }
    }
}
