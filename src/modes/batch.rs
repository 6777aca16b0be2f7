//! Train a series of models with increasing session counts
//!
//! Each count gets a fresh agent trained headless with learning on, and the
//! result is saved as `model_<count>.json` in the output directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::config::RunConfig;
use super::train::TrainMode;
use super::trainer::RunSummary;

/// Session counts trained when none are given
pub const DEFAULT_SESSION_COUNTS: [usize; 6] = [1, 10, 100, 1_000, 10_000, 100_000];

pub struct BatchMode {
    /// Template for every run; sessions and save path are overridden
    base: RunConfig,
    output_dir: PathBuf,
    counts: Vec<usize>,
}

impl BatchMode {
    pub fn new(base: RunConfig, output_dir: PathBuf, counts: Vec<usize>) -> Self {
        let counts = if counts.is_empty() {
            DEFAULT_SESSION_COUNTS.to_vec()
        } else {
            counts
        };
        Self {
            base,
            output_dir,
            counts,
        }
    }

    /// Path of the model trained for `count` sessions
    pub fn model_path(output_dir: &Path, count: usize) -> PathBuf {
        output_dir.join(format!("model_{}.json", count))
    }

    pub fn run(&self) -> Result<Vec<RunSummary>> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create directory: {:?}", self.output_dir))?;

        let mut summaries = Vec::with_capacity(self.counts.len());
        for &count in &self.counts {
            let config = RunConfig {
                sessions: count,
                learn: true,
                visual: false,
                print_terminal: false,
                load_path: None,
                save_path: Some(Self::model_path(&self.output_dir, count)),
                ..self.base.clone()
            };

            println!("Training model with {} sessions...", count);
            let summary = TrainMode::new(config)?
                .run()
                .with_context(|| format!("Failed to train model with {} sessions", count))?;
            println!(
                "  Max length: {}, Max duration: {}, States: {}",
                summary.max_length, summary.max_duration, summary.states
            );
            summaries.push(summary);
        }

        Ok(summaries)
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}
