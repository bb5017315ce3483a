//! Difficulty mapping
//!
//! A single 0-100 slider value drives two engine parameters through a two-segment
//! curve:
//!
//! - below [`DIFFICULTY_THRESHOLD`]: think time stays at [`MIN_THINK_MS`] and the
//!   random-move chance falls linearly from 100% to 0%;
//! - from the threshold up: no random moves, think time grows exponentially from
//!   [`BASE_THINK_MS`] to `BASE_THINK_MS * THINK_GROWTH` at 100.

use crate::types::{
    BASE_THINK_MS, DIFFICULTY_MAX, DIFFICULTY_THRESHOLD, MIN_THINK_MS, THINK_GROWTH,
};

/// Engine parameters derived from the difficulty slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineParams {
    /// Chance (percent) that the engine's turn is replaced by a random legal column
    pub random_move_percent: u8,
    /// Think-time budget handed to the engine
    pub think_budget_ms: u32,
}

impl EngineParams {
    /// Parameters for a slider value; values above 100 are clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_connect4_core::EngineParams;
    ///
    /// let easiest = EngineParams::for_difficulty(0);
    /// assert_eq!(easiest.random_move_percent, 100);
    /// assert_eq!(easiest.think_budget_ms, 1);
    ///
    /// let hardest = EngineParams::for_difficulty(100);
    /// assert_eq!(hardest.random_move_percent, 0);
    /// assert_eq!(hardest.think_budget_ms, 10_000);
    /// ```
    pub fn for_difficulty(difficulty: u8) -> Self {
        let value = difficulty.min(DIFFICULTY_MAX);
        let threshold = DIFFICULTY_THRESHOLD as f64;

        if value < DIFFICULTY_THRESHOLD {
            let falloff = (value as f64 / threshold) * 100.0;
            Self {
                random_move_percent: (100.0 - falloff) as u8,
                think_budget_ms: MIN_THINK_MS,
            }
        } else {
            let span = (DIFFICULTY_MAX - DIFFICULTY_THRESHOLD) as f64;
            let t = (value as f64 - threshold) / span;
            Self {
                random_move_percent: 0,
                think_budget_ms: (BASE_THINK_MS as f64 * THINK_GROWTH.powf(t)) as u32,
            }
        }
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self::for_difficulty(0)
    }
}

/// Stage label shown under the difficulty slider.
pub fn stage_label(difficulty: u8) -> &'static str {
    const STAGES: [&str; 6] = ["Very Easy", "Easy", "Medium", "Hard", "Expert", "Maximum"];
    STAGES[(difficulty.min(DIFFICULTY_MAX) / 20) as usize]
}
