use thiserror::Error;

use super::state::Position;

/// Failures raised by the world model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The snake tried to move its head off the board
    #[error("snake moved out of bounds to ({}, {}) on a {size}x{size} board", .position.x, .position.y)]
    OutOfBounds { position: Position, size: usize },

    /// Rejection sampling found no free cell within its attempt budget
    #[error("could not place {what} after {attempts} attempts")]
    PlacementInfeasible { what: &'static str, attempts: usize },
}

pub type Result<T> = std::result::Result<T, GameError>;
