//! Host-facing game loop
//!
//! The host calls `Session::frame` once per rendered frame with the frame
//! time and the input collected since the last frame. The session runs the
//! per-frame pass, then as many fixed physics steps as the accumulated time
//! allows, and routes everything the simulation reports to the score, audio
//! and effect collaborators.

use glam::Vec2;
use serde::Serialize;

use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::consts::*;
use crate::effects::{EffectManager, EffectPlayer, VisualEffect};
use crate::score::{ScoreBoard, ScoreTracker};
use crate::settings::Settings;
use crate::sim::{BubbleField, Camera, GameEvent, GamePhase};
use crate::text_fx;
use crate::tracker::{GameplayTracker, TrackerSignal};

/// Input gathered by the host for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Click/tap position in world space
    pub click: Option<Vec2>,
    /// Leave the menu
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - auto-clicks bubbles
    pub idle_mode: bool,
}

/// Text the host draws over the game
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score_text: String,
    /// Wave/rainbow markup, empty with no bubbles
    pub bubble_text: String,
    pub combo_text: Option<String>,
    pub level_text: String,
    /// Only on the game over screen
    pub final_score_text: Option<String>,
}

/// End-of-run report
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub phase: GamePhase,
    pub time: f32,
    pub total_score: f32,
    pub pop_score: u64,
    pub passive_score: f32,
    pub combo: u32,
    pub level: u32,
    pub bubbles_saved: u32,
    pub live_bubbles: usize,
    pub restarts: u32,
}

/// One game, start to (repeated) game over
pub struct Session<S: ScoreTracker = ScoreBoard> {
    settings: Settings,
    phase: GamePhase,
    field: BubbleField,
    tracker: GameplayTracker,
    score: S,
    audio: AudioManager,
    effects: EffectManager,
    seed: u64,
    accumulator: f32,
    time: f32,
    idle_timer: f32,
    final_score: Option<f32>,
    restarts: u32,
}

impl Session<ScoreBoard> {
    pub fn new(settings: Settings, camera: Camera, seed: u64) -> Self {
        Self::with_score_tracker(settings, camera, seed, ScoreBoard::new())
    }
}

impl<S: ScoreTracker + Default> Session<S> {
    /// Session reporting to a host-supplied score tracker.
    ///
    /// Starts on the menu with a full field of bubbles.
    pub fn with_score_tracker(settings: Settings, camera: Camera, seed: u64, score: S) -> Self {
        let settings = settings.sanitized();
        let mut field = BubbleField::new(settings.field.clone(), camera, seed);
        field.populate();

        log::info!("Session created with seed {seed}");

        Self {
            tracker: GameplayTracker::new(settings.tracker.clone()),
            audio: AudioManager::new(None, &settings.audio),
            effects: EffectManager::new(None, settings.particles),
            settings,
            phase: GamePhase::Menu,
            field,
            score,
            seed,
            accumulator: 0.0,
            time: 0.0,
            idle_timer: 0.0,
            final_score: None,
            restarts: 0,
        }
    }

    pub fn with_audio_sink(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio.set_sink(sink);
        self
    }

    pub fn with_effect_player(mut self, player: Box<dyn EffectPlayer>) -> Self {
        self.effects.set_player(player);
        self
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn field(&self) -> &BubbleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut BubbleField {
        &mut self.field
    }

    pub fn tracker(&self) -> &GameplayTracker {
        &self.tracker
    }

    pub fn score(&self) -> &S {
        &self.score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Host resized or moved the view
    pub fn set_camera(&mut self, camera: Camera) {
        self.field.set_camera(camera);
    }

    /// Pop score plus passive score
    pub fn total_score(&self) -> f32 {
        self.score.score() as f32 + self.tracker.current_score()
    }

    /// Advance one rendered frame
    pub fn frame(&mut self, dt: f32, input: &FrameInput) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        if input.pause {
            self.toggle_pause();
        }
        if self.phase == GamePhase::Paused {
            return;
        }
        if self.phase == GamePhase::Menu && (input.start || input.idle_mode) {
            self.start();
        }

        self.time += dt;

        let running = self.phase != GamePhase::GameOver;
        if running {
            let click = match input.click {
                Some(point) => Some(point),
                None => self.idle_click(dt, input.idle_mode),
            };
            if let Some(point) = click {
                self.field.click(point);
            }
            self.field.update(dt);
        }
        self.route_events();

        let in_game = self.phase == GamePhase::Playing;
        let signals = self.tracker.update(dt, self.field.on_screen_count(), in_game);
        for signal in signals {
            self.handle_signal(signal);
        }

        if self.phase == GamePhase::GameOver {
            return;
        }

        // Fixed timestep physics
        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.field.fixed_update(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Leave the menu and start scoring
    pub fn start(&mut self) {
        if self.phase != GamePhase::Menu {
            return;
        }
        self.score = S::default();
        self.tracker.reset();
        self.phase = GamePhase::Playing;
        log::info!("Game started");
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                log::info!("Paused");
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            GamePhase::Menu | GamePhase::GameOver => {}
        }
    }

    /// Fresh field, score and tracker; straight back into play
    pub fn restart(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        let camera = *self.field.camera();
        self.field = BubbleField::new(self.settings.field.clone(), camera, self.seed);
        self.field.populate();
        self.tracker.reset();
        self.score = S::default();
        self.accumulator = 0.0;
        self.idle_timer = 0.0;
        self.final_score = None;
        self.restarts += 1;
        self.phase = GamePhase::Playing;
        log::info!("Game restarted with seed {}", self.seed);
    }

    /// Pick a bubble to click in idle mode, at most once per interval
    fn idle_click(&mut self, dt: f32, idle_mode: bool) -> Option<Vec2> {
        if !idle_mode {
            return None;
        }
        self.idle_timer += dt;
        if self.idle_timer < self.settings.idle_click_interval {
            return None;
        }
        self.idle_timer = 0.0;

        // Oldest active bubble; if none is ready yet, click empty space
        let target = self
            .field
            .bubbles()
            .iter()
            .find(|b| b.is_active())
            .map(|b| b.pos);
        Some(target.unwrap_or(self.field.camera().center))
    }

    fn route_events(&mut self) {
        let listener = self.field.camera().center;

        for event in self.field.drain_events() {
            match event {
                GameEvent::BubbleSpawned { .. } => {}
                GameEvent::BubbleReady { pos, .. } => {
                    self.effects.play_at(VisualEffect::SpawnSparkle, pos);
                    self.audio.play(SoundEffect::BubbleSpawn, listener);
                }
                GameEvent::BubblePopped { pos, .. } => {
                    self.score.add_score(self.settings.pop_score);
                    self.audio.play(SoundEffect::BubblePop, listener);
                    self.effects.play_at(VisualEffect::PopBurst, pos);

                    if self.phase == GamePhase::Playing && self.tracker.record_pop() {
                        self.checkpoint(listener);
                    }
                }
                GameEvent::ClickMissed { .. } => self.score.reset_combo(),
            }
        }
    }

    fn checkpoint(&mut self, listener: Vec2) {
        let live = self.field.live_count();
        let boost = self.tracker.checkpoint_reached(live);
        for _ in 0..live {
            self.audio.play(SoundEffect::Select, listener);
        }
        self.field.boost_speed(boost);
    }

    fn handle_signal(&mut self, signal: TrackerSignal) {
        let listener = self.field.camera().center;
        match signal {
            TrackerSignal::BubblesLost(count) => {
                log::debug!("{count} bubble(s) lost");
                self.audio.play(SoundEffect::BubbleLost, listener);
            }
            TrackerSignal::GameOver { final_score } => {
                let total = final_score + self.score.score() as f32;
                self.final_score = Some(total);
                self.phase = GamePhase::GameOver;
                self.audio.play(SoundEffect::GameOver, listener);
                log::info!("Final score {total:.2}");
            }
            TrackerSignal::Restart => self.restart(),
        }
    }

    /// HUD text for the current frame
    pub fn hud(&self) -> Hud {
        Hud {
            score_text: text_fx::score_text(self.total_score()),
            bubble_text: text_fx::bubble_text(
                self.field.live_count(),
                self.time,
                &self.settings.text,
            ),
            combo_text: text_fx::combo_text(self.score.combo(), self.score.multiplier()),
            level_text: format!("Level {}", self.tracker.level()),
            final_score_text: self.final_score.map(text_fx::final_score_text),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            phase: self.phase,
            time: self.time,
            total_score: self.total_score(),
            pop_score: self.score.score(),
            passive_score: self.tracker.current_score(),
            combo: self.score.combo(),
            level: self.tracker.level(),
            bubbles_saved: self.tracker.bubbles_saved(),
            live_bubbles: self.field.live_count(),
            restarts: self.restarts,
        }
    }
}
