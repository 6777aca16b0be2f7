//! Tabular Q-learning agent
//!
//! The agent only ever sees states, actions and reward scalars; it knows
//! nothing about the board, perception or reward shaping.

use std::path::Path;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::config::AgentConfig;
use super::perception::State;
use super::persistence::{self, LoadReport};
use super::q_table::{ActionValues, QTable};
use crate::game::Direction;

/// Q-learning agent with an epsilon-greedy policy
///
/// Owns the value table for its whole lifetime; callers hand the agent to
/// each episode by `&mut` so learning accumulates across sessions.
///
/// # Example
///
/// ```rust
/// use snake_qlearning::game::Direction;
/// use snake_qlearning::rl::{AgentConfig, QAgent, State};
///
/// let mut agent = QAgent::with_seed(AgentConfig::default(), 7);
/// let state = State::default();
/// let action = agent.choose_action(&state, &Direction::valid_moves(Direction::Up));
/// agent.learn(&state, action, -5.0, &state);
/// assert_eq!(agent.q_table().len(), 1);
/// ```
pub struct QAgent {
    /// Learned values
    table: QTable,

    /// Hyperparameters
    config: AgentConfig,

    /// Current exploration rate (epsilon)
    exploration_rate: f64,

    /// Whether `learn` updates the table
    learning: bool,

    /// Number of updates applied
    updates: usize,

    rng: StdRng,
}

impl QAgent {
    /// Create an agent with an empty table, seeded from entropy
    pub fn new(config: AgentConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an agent with a deterministic random stream
    pub fn with_seed(config: AgentConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AgentConfig, rng: StdRng) -> Self {
        Self {
            table: QTable::new(),
            exploration_rate: config.exploration_rate,
            learning: config.learning,
            config,
            updates: 0,
            rng,
        }
    }

    /// Pick an action among `valid_actions`
    ///
    /// While learning, explores uniformly with probability equal to the
    /// current exploration rate. Otherwise takes the best known action,
    /// breaking ties uniformly at random. An empty slice means all four
    /// actions are allowed.
    pub fn choose_action(&mut self, state: &State, valid_actions: &[Direction]) -> Direction {
        let candidates = if valid_actions.is_empty() {
            &Direction::ALL[..]
        } else {
            valid_actions
        };

        if self.learning && self.rng.gen_range(0.0..1.0) < self.exploration_rate {
            return self.pick(candidates);
        }

        let best = self.table.row(*state).best_among(candidates);
        self.pick(&best)
    }

    /// One-step Q-learning update, followed by exploration decay
    pub fn learn(&mut self, state: &State, action: Direction, reward: f64, next_state: &State) {
        if !self.learning {
            return;
        }

        let next_best = self.table.row(*next_state).max_value();
        let row = self.table.row_mut(*state);
        let predicted = row[action];
        let target = reward + self.config.discount_factor * next_best;
        row[action] = predicted + self.config.learning_rate * (target - predicted);

        self.updates += 1;
        self.decay_exploration();
    }

    fn decay_exploration(&mut self) {
        let floor = self.config.min_exploration_rate;
        if self.exploration_rate > floor {
            self.exploration_rate = (self.exploration_rate * self.config.exploration_decay).max(floor);
        }
    }

    fn pick(&mut self, options: &[Direction]) -> Direction {
        options.choose(&mut self.rng).copied().unwrap_or(Direction::Up)
    }

    /// Write the value table to `path`
    pub fn save(&self, path: &Path, sessions_trained: usize) -> Result<()> {
        persistence::save_q_table(self, path, sessions_trained)
    }

    /// Replace the value table with the one stored at `path`
    ///
    /// Never fails; see [`persistence::load_q_table`].
    pub fn load(&mut self, path: &Path) -> LoadReport {
        let (table, report) = persistence::load_q_table(path);
        self.table = table;
        report
    }

    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.table
    }

    /// Values for `state`, if the state has been seen
    pub fn q_values(&self, state: &State) -> Option<&ActionValues> {
        self.table.get(state)
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    /// Override the current exploration rate
    pub fn set_exploration_rate(&mut self, rate: f64) {
        self.exploration_rate = rate;
    }

    pub fn is_learning(&self) -> bool {
        self.learning
    }

    pub fn set_learning(&mut self, learning: bool) {
        self.learning = learning;
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Number of updates applied so far
    pub fn updates(&self) -> usize {
        self.updates
    }
}
