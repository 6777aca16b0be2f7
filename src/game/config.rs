use serde::{Deserialize, Serialize};

/// Smallest board that still fits the three-segment starting snake
pub const MIN_BOARD_SIZE: usize = 3;

/// Configuration for the game world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square board
    pub board_size: usize,
    /// Seed for snake and apple placement; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(board_size: usize) -> Self {
        Self {
            board_size,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(5)
    }

    /// Same configuration with a fixed placement seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.board_size, 10);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15).with_seed(7);
        assert_eq!(config.board_size, 15);
        assert_eq!(config.seed, Some(7));
    }
}
