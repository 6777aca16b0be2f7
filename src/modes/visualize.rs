//! Terminal UI for watching the agent play and learn
//!
//! Runs the same sessions as the headless mode, one tick per timer beat,
//! while drawing the board and the agent's view of it.
//!
//! # Controls
//!
//! - Space: Pause/unpause (single step in step-by-step mode)
//! - N: Single step while paused
//! - 1-4: Speed control (1=really slow, 2=slow, 3=normal, 4=fast)
//! - Q/Esc/Ctrl+C: Quit
//!
//! # Example
//!
//! ```rust,no_run
//! use snake_qlearning::modes::{RunConfig, VisualizeMode};
//! use std::path::PathBuf;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = RunConfig {
//!     sessions: 10,
//!     learn: false,
//!     load_path: Some(PathBuf::from("models/model_100.json")),
//!     ..Default::default()
//! };
//! let mut visualize_mode = VisualizeMode::new(config)?;
//! visualize_mode.run().await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::{Deserialize, Serialize};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, interval};

use super::config::RunConfig;
use super::trainer::{Progress, RunSummary, Trainer};
use crate::input::{InputHandler, KeyAction};
use crate::render::{PlaybackStatus, Renderer};

/// Tick rate settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum VisualizationSpeed {
    /// 5 Hz
    ReallySlow,
    /// 10 Hz
    Slow,
    /// 20 Hz
    Normal,
    /// 60 Hz
    Fast,
}

impl VisualizationSpeed {
    pub fn ticks_per_second(&self) -> u64 {
        match self {
            Self::ReallySlow => 5,
            Self::Slow => 10,
            Self::Normal => 20,
            Self::Fast => 60,
        }
    }

    /// Time between two ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / self.ticks_per_second())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReallySlow => "Really Slow",
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
        }
    }
}

pub struct VisualizeMode {
    trainer: Trainer,

    renderer: Renderer,

    input_handler: InputHandler,

    should_quit: bool,

    paused: bool,

    speed: VisualizationSpeed,

    /// Shown in the side panel
    model_name: String,
}

impl VisualizeMode {
    pub fn new(config: RunConfig) -> Result<Self> {
        let model_name = config
            .load_path
            .as_ref()
            .or(config.save_path.as_ref())
            .and_then(|path| path.file_name())
            .map_or_else(
                || "new model".to_string(),
                |name| name.to_string_lossy().into_owned(),
            );

        Ok(Self {
            paused: config.step_by_step,
            speed: config.speed,
            trainer: Trainer::new(config)?,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            model_name,
        })
    }

    /// Run the sessions in the terminal UI, then save if a save path is set
    ///
    /// Quitting early still saves what has been learned so far.
    pub async fn run(&mut self) -> Result<RunSummary> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_visualization_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;
        result?;

        let metrics = self.trainer.metrics();
        if self.trainer.config().print_terminal {
            println!(
                "Training completed. Max length: {}, Max duration: {}",
                metrics.max_length, metrics.max_duration
            );
        }

        let saved_to = self.trainer.save()?;
        if let Some(path) = &saved_to {
            println!("Model saved to: {:?}", path);
        }
        Ok(self.trainer.summary(saved_to))
    }

    async fn run_visualization_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.step()?;
                    }
                }

                _ = render_timer.tick() => {
                    let status = self.status();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.trainer, &status);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance the run by one tick
    fn step(&mut self) -> Result<()> {
        match self.trainer.advance()? {
            Progress::Ticked(_) => {
                if self.trainer.config().step_by_step {
                    self.paused = true;
                }
            }
            Progress::SessionEnded(_) => {}
            Progress::Finished => self.should_quit = true,
        }
        Ok(())
    }

    /// Play exactly one tick for a key press
    ///
    /// A session boundary is crossed without waiting for another press.
    fn single_step(&mut self) -> Result<()> {
        loop {
            match self.trainer.advance()? {
                Progress::Ticked(_) => {
                    if self.trainer.config().step_by_step {
                        self.paused = true;
                    }
                    return Ok(());
                }
                Progress::SessionEnded(_) => {}
                Progress::Finished => {
                    self.should_quit = true;
                    return Ok(());
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            let action = self.input_handler.handle_key_event(key);
            if let Some(speed) = self.apply_key(action)? {
                *tick_timer = interval(speed.tick_interval());
            }
        }

        Ok(())
    }

    /// Apply a key action; returns the new speed when it changed
    fn apply_key(&mut self, action: KeyAction) -> Result<Option<VisualizationSpeed>> {
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::TogglePause => {
                if self.trainer.config().step_by_step && self.paused {
                    self.single_step()?;
                } else {
                    self.paused = !self.paused;
                }
            }
            KeyAction::Step => {
                if self.paused {
                    self.single_step()?;
                }
            }
            KeyAction::SetSpeed(speed) => {
                if speed != self.speed {
                    self.speed = speed;
                    return Ok(Some(speed));
                }
            }
            KeyAction::None => {}
        }
        Ok(None)
    }

    fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            model_name: self.model_name.clone(),
            paused: self.paused,
            step_by_step: self.trainer.config().step_by_step,
            speed: self.speed,
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(step_by_step: bool) -> RunConfig {
        RunConfig {
            sessions: 2,
            step_by_step,
            seed: Some(8),
            max_steps: Some(500),
            ..Default::default()
        }
    }

    #[test]
    fn test_visualization_speed() {
        assert_eq!(VisualizationSpeed::ReallySlow.tick_interval(), Duration::from_millis(200));
        assert_eq!(VisualizationSpeed::Slow.tick_interval(), Duration::from_millis(100));
        assert_eq!(VisualizationSpeed::Normal.tick_interval(), Duration::from_millis(50));
        assert_eq!(VisualizationSpeed::Fast.tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_mode_creation() {
        let mode = VisualizeMode::new(config(false)).unwrap();
        assert!(!mode.paused);
        assert!(!mode.should_quit);
        assert_eq!(mode.speed, VisualizationSpeed::Normal);
        assert_eq!(mode.model_name, "new model");
    }

    #[test]
    fn test_model_name_from_path() {
        let config = RunConfig {
            load_path: Some(PathBuf::from("models/model_100.json")),
            ..config(false)
        };
        let mode = VisualizeMode::new(config).unwrap();
        assert_eq!(mode.model_name, "model_100.json");
    }

    #[test]
    fn test_step_by_step_starts_paused_and_steps_once() {
        let mut mode = VisualizeMode::new(config(true)).unwrap();
        assert!(mode.paused);

        mode.apply_key(KeyAction::TogglePause).unwrap();
        assert!(mode.paused);
        assert_eq!(mode.trainer.episode().map(|e| e.steps()), Some(1));

        // A second tick, in the next session if the first one ended it
        let was_over = mode.trainer.episode().is_some_and(|e| e.is_over());
        mode.apply_key(KeyAction::Step).unwrap();
        assert!(mode.paused);
        let expected = if was_over { 1 } else { 2 };
        assert_eq!(mode.trainer.episode().map(|e| e.steps()), Some(expected));
    }

    #[test]
    fn test_manual_step_crosses_session_boundary() {
        let mut mode = VisualizeMode::new(config(true)).unwrap();

        // Play until the session is due to end, by death or by the cap
        while !mode
            .trainer
            .episode()
            .is_some_and(|e| e.is_over() || e.steps() == 500)
        {
            mode.apply_key(KeyAction::Step).unwrap();
        }
        assert_eq!(mode.trainer.sessions_completed(), 0);

        mode.apply_key(KeyAction::Step).unwrap();
        assert_eq!(mode.trainer.sessions_completed(), 1);
        assert_eq!(mode.trainer.episode().map(|e| e.steps()), Some(1));
        assert!(mode.paused);
        assert!(!mode.should_quit);
    }

    #[test]
    fn test_pause_toggle_and_step() {
        let mut mode = VisualizeMode::new(config(false)).unwrap();

        // Stepping does nothing while running
        mode.apply_key(KeyAction::Step).unwrap();
        assert!(mode.trainer.episode().is_none());

        mode.apply_key(KeyAction::TogglePause).unwrap();
        assert!(mode.paused);
        mode.apply_key(KeyAction::Step).unwrap();
        assert_eq!(mode.trainer.episode().map(|e| e.steps()), Some(1));

        mode.apply_key(KeyAction::TogglePause).unwrap();
        assert!(!mode.paused);
    }

    #[test]
    fn test_speed_change() {
        let mut mode = VisualizeMode::new(config(false)).unwrap();
        assert_eq!(
            mode.apply_key(KeyAction::SetSpeed(VisualizationSpeed::Fast)).unwrap(),
            Some(VisualizationSpeed::Fast)
        );
        assert_eq!(mode.speed, VisualizationSpeed::Fast);
        assert_eq!(
            mode.apply_key(KeyAction::SetSpeed(VisualizationSpeed::Fast)).unwrap(),
            None
        );
    }

    #[test]
    fn test_quit_key() {
        let mut mode = VisualizeMode::new(config(false)).unwrap();
        mode.apply_key(KeyAction::Quit).unwrap();
        assert!(mode.should_quit);
    }

    #[test]
    fn test_finishing_all_sessions_quits() {
        let mut mode = VisualizeMode::new(config(false)).unwrap();
        while !mode.should_quit {
            mode.step().unwrap();
        }
        assert!(mode.trainer.is_finished());
    }
}
