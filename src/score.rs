//! Score and combo tracking
//!
//! The field never touches the score directly; the session routes pops and
//! missed clicks to whatever implements `ScoreTracker`.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_COMBO_MULTIPLIER;

/// Score/combo collaborator
pub trait ScoreTracker {
    /// Award points for a pop (extends the combo)
    fn add_score(&mut self, amount: u32);
    /// A click missed: the streak is over
    fn reset_combo(&mut self);
    fn score(&self) -> u64;
    fn combo(&self) -> u32;

    /// Award multiplier for the current streak
    fn multiplier(&self) -> f32 {
        1.0
    }
}

/// Built-in tracker: each pop extends the combo and scales its award
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub score: u64,
    pub combo: u32,
    pub best_combo: u32,
    pub pops: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreTracker for ScoreBoard {
    fn add_score(&mut self, amount: u32) {
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);
        self.pops += 1;
        self.score += (amount as f32 * self.multiplier()) as u64;
    }

    fn reset_combo(&mut self) {
        if self.combo > 1 {
            log::debug!("Combo of {} lost", self.combo);
        }
        self.combo = 0;
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn combo(&self) -> u32 {
        self.combo
    }

    /// 1.1x at combo 2, capped at 3.0x
    fn multiplier(&self) -> f32 {
        if self.combo > 1 {
            (1.0 + (self.combo - 1) as f32 * 0.1).min(MAX_COMBO_MULTIPLIER)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_scales_award() {
        let mut board = ScoreBoard::new();
        board.add_score(10); // combo 1 -> x1.0
        board.add_score(10); // combo 2 -> x1.1
        board.add_score(10); // combo 3 -> x1.2
        assert_eq!(board.score, 10 + 11 + 12);
        assert_eq!(board.combo, 3);
    }

    #[test]
    fn test_reset_combo_keeps_score_and_best() {
        let mut board = ScoreBoard::new();
        board.add_score(10);
        board.add_score(10);
        board.reset_combo();
        assert_eq!(board.combo, 0);
        assert_eq!(board.best_combo, 2);
        assert_eq!(board.score, 21);

        board.add_score(10);
        assert_eq!(board.score, 31);
    }

    #[test]
    fn test_multiplier_caps() {
        let mut board = ScoreBoard::new();
        for _ in 0..50 {
            board.add_score(10);
        }
        assert_eq!(board.multiplier(), MAX_COMBO_MULTIPLIER);
        assert_eq!(board.pops, 50);
    }
}
