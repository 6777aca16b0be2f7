//! Session loop shared by the headless and terminal UI modes
//!
//! A [`Trainer`] owns the agent for the whole run and plays one episode per
//! session. Callers drive it with [`Trainer::advance`], one tick at a time,
//! which lets the terminal UI decide when ticks happen while the headless
//! mode simply loops.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::config::RunConfig;
use crate::metrics::{GameMetrics, TrainingStats};
use crate::rl::{Episode, LoadReport, QAgent, TickOutcome};

/// Sessions kept in the rolling statistics window
const STATS_WINDOW: usize = 100;

/// A finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// One-based session number
    pub session: usize,
    /// Snake length when the session ended
    pub length: usize,
    /// Ticks played
    pub steps: usize,
    /// Sum of rewards handed out
    pub reward: f64,
    /// Ended by the step cap rather than by the snake dying
    pub capped: bool,
}

/// Result of one call to [`Trainer::advance`]
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Ticked(TickOutcome),
    SessionEnded(SessionSummary),
    Finished,
}

/// Records of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub sessions: usize,
    pub max_length: usize,
    pub max_duration: usize,
    /// Number of states in the final table
    pub states: usize,
    pub saved_to: Option<PathBuf>,
}

pub struct Trainer {
    config: RunConfig,
    agent: QAgent,
    episode: Option<Episode>,
    /// Sessions completed so far
    completed: usize,
    session_reward: f64,
    metrics: GameMetrics,
    stats: TrainingStats,
    load_report: Option<LoadReport>,
}

impl Trainer {
    /// Validate the configuration, build the agent and load a table if asked
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;

        let agent_config = config.agent_config();
        let mut agent = match config.seed {
            Some(seed) => QAgent::with_seed(agent_config, seed),
            None => QAgent::new(agent_config),
        };

        let load_report = config.load_path.as_ref().map(|path| {
            let report = agent.load(path);
            tracing::info!(
                path = %path.display(),
                loaded = report.loaded,
                discarded = report.discarded,
                "starting from saved table"
            );
            report
        });

        Ok(Self {
            config,
            agent,
            episode: None,
            completed: 0,
            session_reward: 0.0,
            metrics: GameMetrics::new(),
            stats: TrainingStats::new(STATS_WINDOW),
            load_report,
        })
    }

    /// Play one tick, or close the session whose episode just ended
    ///
    /// A session ends on the call after its final tick, so the final board
    /// stays observable for one step.
    pub fn advance(&mut self) -> Result<Progress> {
        if self.is_finished() {
            return Ok(Progress::Finished);
        }

        if self.episode.is_none() {
            self.episode = Some(self.start_episode()?);
        }
        let session_over = self
            .episode
            .as_ref()
            .is_some_and(|episode| episode.is_over() || self.reached_step_cap(episode));
        if session_over {
            return Ok(Progress::SessionEnded(self.end_session()));
        }

        let Some(episode) = self.episode.as_mut() else {
            return Ok(Progress::Finished);
        };
        let outcome = episode
            .tick(&mut self.agent, &self.config.rewards)
            .with_context(|| format!("Session {} failed", self.completed + 1))?;

        match outcome {
            Some(outcome) => {
                self.session_reward += outcome.reward;
                Ok(Progress::Ticked(outcome))
            }
            None => Ok(Progress::SessionEnded(self.end_session())),
        }
    }

    /// Write the table to the configured save path, if any
    pub fn save(&self) -> Result<Option<PathBuf>> {
        let Some(path) = &self.config.save_path else {
            return Ok(None);
        };
        self.agent
            .save(path, self.completed)
            .with_context(|| format!("Failed to save model to {:?}", path))?;
        Ok(Some(path.clone()))
    }

    pub fn summary(&self, saved_to: Option<PathBuf>) -> RunSummary {
        RunSummary {
            sessions: self.completed,
            max_length: self.metrics.max_length,
            max_duration: self.metrics.max_duration,
            states: self.agent.q_table().len(),
            saved_to,
        }
    }

    fn start_episode(&self) -> Result<Episode> {
        let game_config = self.config.game_config(self.completed);
        Episode::start(&game_config)
            .with_context(|| format!("Failed to start session {}", self.completed + 1))
    }

    fn reached_step_cap(&self, episode: &Episode) -> bool {
        self.config
            .max_steps
            .is_some_and(|cap| episode.steps() >= cap)
    }

    fn end_session(&mut self) -> SessionSummary {
        let (length, steps, capped) = match self.episode.take() {
            Some(episode) => (
                episode.snake_length(),
                episode.steps(),
                !episode.is_over(),
            ),
            None => (0, 0, false),
        };

        self.completed += 1;
        self.metrics.on_session_end(length, steps);
        self.metrics.update();
        self.stats.record_session(self.session_reward, steps, length);

        let summary = SessionSummary {
            session: self.completed,
            length,
            steps,
            reward: self.session_reward,
            capped,
        };
        self.session_reward = 0.0;

        tracing::debug!(
            session = summary.session,
            length,
            steps,
            reward = summary.reward,
            capped,
            exploration_rate = self.agent.exploration_rate(),
            "session finished"
        );
        summary
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= self.config.sessions
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn agent(&self) -> &QAgent {
        &self.agent
    }

    /// Episode in progress, if one has started
    pub fn episode(&self) -> Option<&Episode> {
        self.episode.as_ref()
    }

    /// One-based number of the session being played
    pub fn current_session(&self) -> usize {
        (self.completed + 1).min(self.config.sessions)
    }

    pub fn sessions_completed(&self) -> usize {
        self.completed
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn load_report(&self) -> Option<&LoadReport> {
        self.load_report.as_ref()
    }
}
