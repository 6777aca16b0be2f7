//! Snake Q-Learning - a snake that learns to eat with tabular Q-learning
//!
//! This library provides:
//! - Core game logic: board, snake, apples and vision (game module)
//! - Perception, rewards, the Q-learning agent and episodes (rl module)
//! - Run records and rolling statistics (metrics module)
//! - Headless, batch and terminal UI execution modes (modes module)
//! - TUI rendering and key handling (render and input modules)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
