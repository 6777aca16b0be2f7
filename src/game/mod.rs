//! World model for Snake
//!
//! Grid, snake and apples plus the mutation rules for one tick. Nothing in
//! here knows about learning, and nothing in here does I/O.

pub mod action;
pub mod board;
pub mod config;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use board::{Board, GREEN_APPLE_COUNT, INITIAL_SNAKE_LENGTH, RED_APPLE_COUNT};
pub use config::{GameConfig, MIN_BOARD_SIZE};
pub use error::GameError;
pub use state::{Apple, AppleColor, Cell, Grid, Position, Snake, Vision};
