use rand::SeedableRng;
use rand::rngs::StdRng;

use super::agent::QAgent;
use super::perception::{State, encode};
use super::reward::RewardConfig;
use crate::game::{AppleColor, Board, Direction, GameConfig, GameError};

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// State the decision was made in
    pub state: State,
    /// Action the agent chose
    pub action: Direction,
    /// Reward handed to the agent
    pub reward: f64,
    /// Whether the episode ended on this tick
    pub terminal: bool,
    /// Apple eaten on this tick, if any
    pub apple_eaten: Option<AppleColor>,
    /// The move tried to leave the board
    pub out_of_bounds: bool,
}

/// One life of the snake
///
/// Each tick perceives, lets the agent decide, applies the move, computes
/// the reward from the pre-move state and makes exactly one `learn` call.
/// The agent is borrowed per tick so a single agent can play many episodes.
pub struct Episode {
    board: Board,
    is_over: bool,
    steps: usize,
    /// State perceived at the start of the last tick
    current_state: Option<State>,
    /// Last (state, action) pair handed to the agent
    previous: Option<(State, Direction)>,
    apple_eaten: Option<AppleColor>,
    last_reward: Option<f64>,
}

impl Episode {
    /// Spawn a snake and apples on a fresh board
    pub fn start(config: &GameConfig) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut board = Board::new(config.board_size, rng)?;
        board.place_apples()?;
        board.update_grid();
        Ok(Self::from_board(board))
    }

    /// Same as [`Episode::start`] with a fixed placement seed
    pub fn start_with_seed(config: &GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::start(&config.clone().with_seed(seed))
    }

    /// Run an episode on a prepared board
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            is_over: false,
            steps: 0,
            current_state: None,
            previous: None,
            apple_eaten: None,
            last_reward: None,
        }
    }

    /// Advance one tick
    ///
    /// Returns `Ok(None)` once the episode is over. Leaving the board ends
    /// the episode with the death reward; only a failed apple placement is
    /// reported as an error.
    pub fn tick(
        &mut self,
        agent: &mut QAgent,
        rewards: &RewardConfig,
    ) -> Result<Option<TickOutcome>, GameError> {
        if self.is_over {
            return Ok(None);
        }

        let state = self.perceive();
        self.current_state = Some(state);

        let valid_actions = Direction::valid_moves(self.board.snake().direction);
        let action = agent.choose_action(&state, &valid_actions);
        self.previous = Some((state, action));
        self.steps += 1;

        let outcome = match self.board.move_snake(action) {
            Err(GameError::OutOfBounds { .. }) => {
                self.is_over = true;
                self.apple_eaten = None;
                let reward = rewards.reward(&state, action, true);
                agent.learn(&state, action, reward, &state);

                TickOutcome {
                    state,
                    action,
                    reward,
                    terminal: true,
                    apple_eaten: None,
                    out_of_bounds: true,
                }
            }
            Err(other) => return Err(other),
            Ok(()) => {
                let eaten = self.board.resolve_collisions()?;
                let terminal = self.board.is_terminal();
                self.board.update_grid();
                self.is_over = terminal;
                self.apple_eaten = eaten;

                let reward = rewards.reward(&state, action, terminal);
                let next_state = self.perceive();
                agent.learn(&state, action, reward, &next_state);

                TickOutcome {
                    state,
                    action,
                    reward,
                    terminal,
                    apple_eaten: eaten,
                    out_of_bounds: false,
                }
            }
        };

        self.last_reward = Some(outcome.reward);
        Ok(Some(outcome))
    }

    /// Encode what the snake currently sees
    pub fn perceive(&self) -> State {
        encode(&self.board.vision())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Ticks played so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn snake_length(&self) -> usize {
        self.board.snake().len()
    }

    pub fn current_state(&self) -> Option<State> {
        self.current_state
    }

    pub fn previous_action(&self) -> Option<Direction> {
        self.previous.map(|(_, action)| action)
    }

    pub fn previous_state(&self) -> Option<State> {
        self.previous.map(|(state, _)| state)
    }

    pub fn apple_eaten(&self) -> Option<AppleColor> {
        self.apple_eaten
    }

    pub fn last_reward(&self) -> Option<f64> {
        self.last_reward
    }
}
