use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::modes::VisualizationSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Pause or resume; in step-by-step mode releases one tick
    TogglePause,
    /// Play a single tick while paused
    Step,
    SetSpeed(VisualizationSpeed),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('n') | KeyCode::Char('N') => KeyAction::Step,

            // Speed
            KeyCode::Char('1') => KeyAction::SetSpeed(VisualizationSpeed::ReallySlow),
            KeyCode::Char('2') => KeyAction::SetSpeed(VisualizationSpeed::Slow),
            KeyCode::Char('3') => KeyAction::SetSpeed(VisualizationSpeed::Normal),
            KeyCode::Char('4') => KeyAction::SetSpeed(VisualizationSpeed::Fast),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
