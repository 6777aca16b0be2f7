//! Tabular reinforcement learning for the snake
//!
//! Provides:
//! - 12-bit perception states built from the snake's vision
//! - Reward shaping read from the pre-move state
//! - Q-learning agent with epsilon-greedy exploration
//! - Episode controller that ties board, agent and rewards together
//! - JSON persistence for the value table

pub mod agent;
pub mod config;
pub mod episode;
pub mod perception;
pub mod persistence;
pub mod q_table;
pub mod reward;

pub use agent::QAgent;
pub use config::AgentConfig;
pub use episode::{Episode, TickOutcome};
pub use perception::{STATE_LEN, State, encode};
pub use persistence::{LoadReport, ModelMetadata, load_q_table, save_q_table};
pub use q_table::{ActionValues, QTable};
pub use reward::{
    DANGER_REWARD, DEATH_REWARD, GREEN_APPLE_REWARD, RED_APPLE_REWARD, RewardConfig, STEP_REWARD,
};
