use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use snake_qlearning::modes::{
    BatchMode, RunConfig, RunSummary, TrainMode, VisualizationSpeed, VisualizeMode,
};
use snake_qlearning::rl::AgentConfig;

#[derive(Parser)]
#[command(name = "snake_qlearning")]
#[command(version, about = "Snake that learns with tabular Q-learning")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Number of sessions (episodes) to play
    #[arg(long, default_value = "1")]
    sessions: usize,

    /// File to save the model to when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// File to load a model from before the run
    #[arg(long)]
    load: Option<PathBuf>,

    /// Watch the agent in the terminal UI
    #[arg(long, default_value = "on")]
    visual: OnOff,

    /// Update the table and explore
    #[arg(long, default_value = "on")]
    learn: OnOff,

    /// Side length of the square board
    #[arg(long, default_value = "10")]
    board_size: usize,

    /// Tick rate of the terminal UI
    #[arg(long, value_enum, default_value = "normal")]
    speed: VisualizationSpeed,

    /// Print states, actions and session summaries
    #[arg(long, default_value = "on")]
    print: OnOff,

    /// Pause after every tick in the terminal UI
    #[arg(long, default_value = "off")]
    step_by_step: OnOff,

    /// End a session after this many ticks
    #[arg(long)]
    max_steps: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Starting exploration rate
    #[arg(long)]
    epsilon: Option<f64>,

    /// Exploration decay applied after every update
    #[arg(long)]
    epsilon_decay: Option<f64>,

    /// Exploration floor
    #[arg(long)]
    epsilon_min: Option<f64>,

    /// Step size of the value update
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Discount factor for future rewards
    #[arg(long)]
    discount: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Train one model per session count and save each as model_<n>.json
    Batch {
        /// Output directory
        #[arg(long, default_value = "models")]
        dir: PathBuf,

        /// Comma-separated session counts
        #[arg(long, value_delimiter = ',')]
        counts: Vec<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OnOff {
    On,
    Off,
}

impl OnOff {
    fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        let defaults = AgentConfig::default();
        let agent = AgentConfig {
            learning_rate: self.learning_rate.unwrap_or(defaults.learning_rate),
            discount_factor: self.discount.unwrap_or(defaults.discount_factor),
            exploration_rate: self.epsilon.unwrap_or(defaults.exploration_rate),
            exploration_decay: self.epsilon_decay.unwrap_or(defaults.exploration_decay),
            min_exploration_rate: self.epsilon_min.unwrap_or(defaults.min_exploration_rate),
            learning: self.learn.is_on(),
        };

        RunConfig {
            board_size: self.board_size,
            sessions: self.sessions,
            learn: self.learn.is_on(),
            save_path: self.save.clone(),
            load_path: self.load.clone(),
            visual: self.visual.is_on(),
            speed: self.speed,
            print_terminal: self.print.is_on(),
            step_by_step: self.step_by_step.is_on(),
            max_steps: self.max_steps,
            seed: self.seed,
            agent,
            ..Default::default()
        }
    }
}

fn print_records(summary: &RunSummary) {
    println!(
        "Max Length: {}, Max Duration: {}",
        summary.max_length, summary.max_duration
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("snake_qlearning=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.run_config();
    config.validate()?;

    match &cli.command {
        Some(Command::Batch { dir, counts }) => {
            let batch = BatchMode::new(config, dir.clone(), counts.clone());
            for summary in batch.run()? {
                print_records(&summary);
            }
        }
        None if config.visual => {
            let mut visualize_mode = VisualizeMode::new(config)?;
            let summary = visualize_mode.run().await?;
            print_records(&summary);
        }
        None => {
            let mut train_mode = TrainMode::new(config)?;
            let summary = train_mode.run()?;
            print_records(&summary);
        }
    }

    Ok(())
}
