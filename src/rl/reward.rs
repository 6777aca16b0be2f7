//! Reward shaping
//!
//! The reward is read from the state the decision was made in, not from the
//! state the move produced, so every reward lands on the decision that earned
//! it without a second perception pass.

use serde::{Deserialize, Serialize};

use super::perception::State;
use crate::game::Direction;

pub const DEATH_REWARD: f64 = -1000.0;
pub const DANGER_REWARD: f64 = -1000.0;
pub const GREEN_APPLE_REWARD: f64 = 100.0;
pub const RED_APPLE_REWARD: f64 = -20.0;
pub const STEP_REWARD: f64 = -5.0;

/// Reward magnitudes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// The move ended the episode
    pub death: f64,
    /// The chosen direction was flagged as danger
    pub danger: f64,
    /// The chosen direction showed a green apple
    pub green_apple: f64,
    /// The chosen direction showed a red apple
    pub red_apple: f64,
    /// Nothing of note in the chosen direction
    pub step: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            death: DEATH_REWARD,
            danger: DANGER_REWARD,
            green_apple: GREEN_APPLE_REWARD,
            red_apple: RED_APPLE_REWARD,
            step: STEP_REWARD,
        }
    }
}

impl RewardConfig {
    /// Reward for taking `action` in `state`; `terminal` is the post-move flag
    pub fn reward(&self, state: &State, action: Direction, terminal: bool) -> f64 {
        if terminal {
            self.death
        } else if state.danger(action) {
            self.danger
        } else if state.green(action) {
            self.green_apple
        } else if state.red(action) {
            self.red_apple
        } else {
            self.step
        }
    }
}
