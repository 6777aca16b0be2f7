pub mod batch;
pub mod config;
pub mod train;
pub mod trainer;
pub mod visualize;

pub use batch::{BatchMode, DEFAULT_SESSION_COUNTS};
pub use config::RunConfig;
pub use train::TrainMode;
pub use trainer::{Progress, RunSummary, SessionSummary, Trainer};
pub use visualize::{VisualizationSpeed, VisualizeMode};
