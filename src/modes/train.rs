//! Headless training mode
//!
//! Plays every session back to back without a terminal UI, printing the
//! state/action trace and per-session summaries when asked to.
//!
//! # Example
//!
//! ```rust,no_run
//! use snake_qlearning::modes::{RunConfig, TrainMode};
//! use std::path::PathBuf;
//!
//! let config = RunConfig {
//!     sessions: 1000,
//!     visual: false,
//!     print_terminal: false,
//!     save_path: Some(PathBuf::from("models/model_1000.json")),
//!     ..Default::default()
//! };
//!
//! let mut train_mode = TrainMode::new(config)?;
//! let summary = train_mode.run()?;
//! println!("Max Length: {}, Max Duration: {}", summary.max_length, summary.max_duration);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Result;

use super::config::RunConfig;
use super::trainer::{Progress, RunSummary, Trainer};

pub struct TrainMode {
    trainer: Trainer,
}

impl TrainMode {
    pub fn new(config: RunConfig) -> Result<Self> {
        Ok(Self {
            trainer: Trainer::new(config)?,
        })
    }

    /// Play all sessions, then save the table if a save path is set
    pub fn run(&mut self) -> Result<RunSummary> {
        let print = self.trainer.config().print_terminal;
        let sessions = self.trainer.config().sessions;

        if print {
            self.print_header();
        }

        loop {
            match self.trainer.advance()? {
                Progress::Ticked(outcome) => {
                    if print {
                        println!("State: {}", outcome.state);
                        println!("Action Taken: {}\n", outcome.action);
                    }
                }
                Progress::SessionEnded(session) => {
                    if print {
                        println!(
                            "Session {}/{} completed. Length: {}, Steps: {}",
                            session.session, sessions, session.length, session.steps
                        );
                    }
                }
                Progress::Finished => break,
            }
        }

        let metrics = self.trainer.metrics();
        if print {
            println!(
                "Training completed. Max length: {}, Max duration: {}",
                metrics.max_length, metrics.max_duration
            );
        }
        tracing::info!("{}", self.trainer.stats().format_summary());

        let saved_to = self.trainer.save()?;
        if let Some(path) = &saved_to {
            println!("Model saved to: {:?}", path);
        }

        Ok(self.trainer.summary(saved_to))
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    fn print_header(&self) {
        let config = self.trainer.config();
        println!("{}", "=".repeat(60));
        println!("Q-Learning Training - Snake");
        println!("{}", "=".repeat(60));
        println!("Sessions: {}", config.sessions);
        println!("Board: {0}x{0}", config.board_size);
        println!("Learning: {}", if config.learn { "on" } else { "off" });
        println!("  Learning rate: {}", config.agent.learning_rate);
        println!("  Discount: {}", config.agent.discount_factor);
        println!("  Exploration: {}", self.trainer.agent().exploration_rate());
        if let Some(report) = self.trainer.load_report() {
            println!("Loaded states: {}", report.loaded);
        }
        if let Some(path) = &config.save_path {
            println!("Save path: {:?}", path);
        }
        println!("{}", "=".repeat(60));
        println!();
    }
}
