//! Visual effect cues (particles)
//!
//! Same deal as audio: the host owns the particle system, the game just says
//! where to play what.

use glam::Vec2;

/// Particle effects the game triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualEffect {
    /// Burst where a bubble popped
    PopBurst,
    /// Sparkle where a bubble finished popping in
    SpawnSparkle,
}

/// Host particle system
pub trait EffectPlayer {
    fn play_at(&mut self, effect: VisualEffect, position: Vec2);
}

/// Player that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogEffectPlayer {
    pub played: usize,
}

impl EffectPlayer for LogEffectPlayer {
    fn play_at(&mut self, effect: VisualEffect, position: Vec2) {
        self.played += 1;
        log::trace!("fx: {effect:?} at ({:.2}, {:.2})", position.x, position.y);
    }
}

/// Routes effect cues to the host player, if there is one
pub struct EffectManager {
    player: Option<Box<dyn EffectPlayer>>,
    enabled: bool,
}

impl Default for EffectManager {
    fn default() -> Self {
        Self::new(None, true)
    }
}

impl std::fmt::Debug for EffectManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectManager")
            .field("has_player", &self.player.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl EffectManager {
    pub fn new(player: Option<Box<dyn EffectPlayer>>, enabled: bool) -> Self {
        Self { player, enabled }
    }

    pub fn set_player(&mut self, player: Box<dyn EffectPlayer>) {
        self.player = Some(player);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn play_at(&mut self, effect: VisualEffect, position: Vec2) {
        if !self.enabled {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.play_at(effect, position);
        }
    }
}
