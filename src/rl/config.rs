//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the tabular Q-learning agent
///
/// Defaults suit a 10x10 board: fast
/// learning, moderately far-sighted, and an exploration rate that starts at
/// fully random and decays slowly towards a small floor.
///
/// # Example
///
/// ```rust
/// use snake_qlearning::rl::AgentConfig;
///
/// let config = AgentConfig {
///     exploration_decay: 0.9999,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Step size of the value update (alpha)
    ///
    /// Default: 0.1
    pub learning_rate: f64,

    /// Discount factor for future rewards (gamma)
    ///
    /// Values closer to 1.0 make the agent more far-sighted.
    ///
    /// Default: 0.9
    pub discount_factor: f64,

    /// Exploration rate (epsilon) the agent starts with
    ///
    /// Default: 1.0
    pub exploration_rate: f64,

    /// Multiplier applied to the exploration rate after every update
    ///
    /// Default: 0.999
    pub exploration_decay: f64,

    /// Floor the exploration rate never decays below
    ///
    /// Default: 0.01
    pub min_exploration_rate: f64,

    /// Whether `learn` updates the table at all
    ///
    /// Default: true
    pub learning: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration_rate: 1.0,
            exploration_decay: 0.999,
            min_exploration_rate: 0.01,
            learning: true,
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            ));
        }

        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(format!(
                "exploration_rate must be in [0, 1], got {}",
                self.exploration_rate
            ));
        }

        if !(self.exploration_decay > 0.0 && self.exploration_decay <= 1.0) {
            return Err(format!(
                "exploration_decay must be in (0, 1], got {}",
                self.exploration_decay
            ));
        }

        if !(0.0..=1.0).contains(&self.min_exploration_rate) {
            return Err(format!(
                "min_exploration_rate must be in [0, 1], got {}",
                self.min_exploration_rate
            ));
        }

        Ok(())
    }
}
