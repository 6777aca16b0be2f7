//! Run configuration shared by every mode

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::visualize::VisualizationSpeed;
use crate::game::{GameConfig, MIN_BOARD_SIZE};
use crate::rl::{AgentConfig, RewardConfig};

/// Everything a run needs: board, session count, persistence and display
///
/// # Example
///
/// ```rust
/// use snake_qlearning::modes::RunConfig;
///
/// let config = RunConfig {
///     sessions: 50,
///     visual: false,
///     print_terminal: false,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Side length of the square board
    pub board_size: usize,

    /// Number of sessions (episodes) to play
    pub sessions: usize,

    /// Whether the agent updates its table and explores
    pub learn: bool,

    /// Where to write the table when the run finishes
    pub save_path: Option<PathBuf>,

    /// Table to start from
    pub load_path: Option<PathBuf>,

    /// Run in the terminal UI instead of headless
    pub visual: bool,

    /// Tick rate of the terminal UI
    pub speed: VisualizationSpeed,

    /// Print every state/action pair and per-session summaries
    pub print_terminal: bool,

    /// Pause after every tick in the terminal UI
    pub step_by_step: bool,

    /// End a session after this many ticks
    pub max_steps: Option<usize>,

    /// Seed for the agent and for board placement
    pub seed: Option<u64>,

    /// Learning hyperparameters
    pub agent: AgentConfig,

    /// Reward magnitudes
    pub rewards: RewardConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            board_size: GameConfig::default().board_size,
            sessions: 1,
            learn: true,
            save_path: None,
            load_path: None,
            visual: true,
            speed: VisualizationSpeed::Normal,
            print_terminal: true,
            step_by_step: false,
            max_steps: None,
            seed: None,
            agent: AgentConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}

impl RunConfig {
    /// Reject configurations that cannot start a run
    pub fn validate(&self) -> Result<()> {
        if self.board_size < MIN_BOARD_SIZE {
            bail!(
                "Board size must be at least {}, got {}",
                MIN_BOARD_SIZE,
                self.board_size
            );
        }
        if self.max_steps == Some(0) {
            bail!("--max-steps must be positive");
        }
        self.agent
            .validate()
            .map_err(|msg| anyhow!("Invalid agent configuration: {}", msg))
    }

    /// Board configuration for the session with the given zero-based index
    ///
    /// A fixed seed is offset per session so sessions differ but stay
    /// reproducible.
    pub fn game_config(&self, session: usize) -> GameConfig {
        GameConfig {
            board_size: self.board_size,
            seed: self.seed.map(|seed| seed.wrapping_add(session as u64)),
        }
    }

    /// Agent configuration with the run's learning switch applied
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            learning: self.learn,
            ..self.agent.clone()
        }
    }
}
