//! Run progress: passive score, bubble watch, game over and checkpoints
//!
//! The tracker only sees the bubble count the session hands it each frame.
//! It never reaches into the field; what it decides comes back as
//! `TrackerSignal`s.

use serde::{Deserialize, Serialize};

use crate::settings::TrackerConfig;
use crate::sim::{Scheduler, TaskId};

/// What the session should react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackerSignal {
    /// Bubble count dropped by this many since last frame
    BubblesLost(usize),
    /// No bubbles left for the whole grace period
    GameOver { final_score: f32 },
    /// Game over screen done, start a new run
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerTask {
    GameOverCheck,
    Restart,
}

#[derive(Debug, Clone)]
pub struct GameplayTracker {
    config: TrackerConfig,
    current_score: f32,
    bubbles_saved: u32,
    checkpoints: u32,
    pops: u32,
    previous_count: Option<usize>,
    game_over_check: Option<TaskId>,
    game_over: bool,
    tasks: Scheduler<TrackerTask>,
}

impl GameplayTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            current_score: 0.0,
            bubbles_saved: 0,
            checkpoints: 0,
            pops: 0,
            previous_count: None,
            game_over_check: None,
            game_over: false,
            tasks: Scheduler::new(),
        }
    }

    /// Clear everything for a new run
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    pub fn current_score(&self) -> f32 {
        self.current_score
    }

    pub fn bubbles_saved(&self) -> u32 {
        self.bubbles_saved
    }

    pub fn checkpoints(&self) -> u32 {
        self.checkpoints
    }

    /// 1-based level, one per checkpoint passed
    pub fn level(&self) -> u32 {
        self.checkpoints + 1
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn game_over_pending(&self) -> bool {
        self.game_over_check.is_some()
    }

    /// Per-frame pass.
    ///
    /// `in_game` is false on the menu: no passive score and no game over there.
    pub fn update(&mut self, dt: f32, bubble_count: usize, in_game: bool) -> Vec<TrackerSignal> {
        let mut signals = Vec::new();

        for task in self.tasks.advance(dt) {
            match task {
                TrackerTask::GameOverCheck => {
                    self.game_over_check = None;
                    if bubble_count == 0 && !self.game_over {
                        self.game_over = true;
                        log::info!("Game over, final score {:.2}", self.current_score);
                        signals.push(TrackerSignal::GameOver {
                            final_score: self.current_score,
                        });
                        self.tasks
                            .schedule(self.config.restart_delay, TrackerTask::Restart);
                    }
                }
                TrackerTask::Restart => signals.push(TrackerSignal::Restart),
            }
        }

        self.watch_bubbles(bubble_count, in_game, &mut signals);

        if in_game && !self.game_over && bubble_count > 0 {
            self.current_score += self.config.points_per_second * dt;
        }

        signals
    }

    fn watch_bubbles(&mut self, count: usize, in_game: bool, signals: &mut Vec<TrackerSignal>) {
        if let Some(previous) = self.previous_count {
            if count < previous {
                signals.push(TrackerSignal::BubblesLost(previous - count));
            }
        }

        if count == 0 {
            if self.game_over_check.is_none() && in_game && !self.game_over {
                log::debug!("No bubbles left, game over in {:.1}s", self.config.game_over_delay);
                self.game_over_check = Some(
                    self.tasks
                        .schedule(self.config.game_over_delay, TrackerTask::GameOverCheck),
                );
            }
        } else if let Some(id) = self.game_over_check.take() {
            log::debug!("Bubbles are back, game over cancelled");
            self.tasks.cancel(id);
        }

        self.previous_count = Some(count);
    }

    /// Count a pop. Returns true when it completes a checkpoint.
    pub fn record_pop(&mut self) -> bool {
        self.pops += 1;
        self.config.pops_per_checkpoint > 0 && self.pops % self.config.pops_per_checkpoint == 0
    }

    /// Bank the bubbles still alive and move to the next level.
    ///
    /// Returns the speed boost to apply to the field.
    pub fn checkpoint_reached(&mut self, live_bubbles: usize) -> f32 {
        self.checkpoints += 1;
        self.bubbles_saved += live_bubbles as u32;
        log::info!(
            "Checkpoint {} reached, {} bubbles saved ({} total)",
            self.checkpoints,
            live_bubbles,
            self.bubbles_saved
        );
        self.config.speed_step
    }
}
