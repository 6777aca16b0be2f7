use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{self, Board, Cell};
use crate::modes::{Trainer, VisualizationSpeed};
use crate::rl::State;

/// Playback controls shown alongside the board
#[derive(Debug, Clone)]
pub struct PlaybackStatus {
    /// Label for the table being trained or evaluated
    pub model_name: String,
    pub paused: bool,
    pub step_by_step: bool,
    pub speed: VisualizationSpeed,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, trainer: &Trainer, status: &PlaybackStatus) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Panel + board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(trainer, status), chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(chunks[1]);

        frame.render_widget(self.render_panel(trainer, status), body[0]);

        match trainer.episode() {
            Some(episode) => {
                frame.render_widget(self.render_grid(episode.board(), episode.is_over()), body[1])
            }
            None => frame.render_widget(self.render_waiting(trainer), body[1]),
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, board: &Board, is_over: bool) -> Paragraph<'_> {
        let lines: Vec<Line> = board
            .grid()
            .rows()
            .map(|row| Line::from(row.iter().map(|cell| cell_span(*cell)).collect::<Vec<_>>()))
            .collect();

        let (title, border) = if is_over {
            (" Game Over ", Color::Red)
        } else {
            (" Snake ", Color::White)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_waiting(&self, trainer: &Trainer) -> Paragraph<'_> {
        let text = if trainer.is_finished() {
            "All sessions completed"
        } else {
            "Starting next session..."
        };
        Paragraph::new(vec![Line::from(""), Line::from(text)])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_panel(&self, trainer: &Trainer, status: &PlaybackStatus) -> Paragraph<'_> {
        let mut lines = Vec::new();

        if let Some(episode) = trainer.episode() {
            lines.push(section("Raw Vision"));
            let vision = episode.board().vision();
            for direction in game::Direction::ALL {
                lines.push(Line::from(format!(
                    "{:<6}{}",
                    direction.name(),
                    vision.ray_codes(direction)
                )));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Action: ", label_style()),
                Span::raw(
                    episode
                        .previous_action()
                        .map_or("-", |action| action.name()),
                ),
            ]));

            if let Some(state) = episode.current_state() {
                lines.push(Line::from(""));
                lines.push(section("State"));
                lines.extend(state_lines(&state));

                lines.push(Line::from(""));
                lines.push(section("Q-values"));
                match trainer.agent().q_values(&state) {
                    Some(values) => {
                        for (direction, value) in values.iter() {
                            lines.push(Line::from(format!("{:<6}{:>10.2}", direction.name(), value)));
                        }
                    }
                    None => lines.push(Line::from("unseen state")),
                }
            }
            lines.push(Line::from(""));
        }

        let metrics = trainer.metrics();
        lines.push(section("Run"));
        lines.push(Line::from(format!("Model: {}", status.model_name)));
        lines.push(Line::from(format!(
            "Session: {}/{}",
            trainer.current_session(),
            trainer.config().sessions
        )));
        lines.push(Line::from(format!("Max length: {}", metrics.max_length)));
        lines.push(Line::from(format!("Max duration: {}", metrics.max_duration)));
        lines.push(Line::from(format!(
            "Table size: {}",
            trainer.agent().q_table().len()
        )));
        lines.push(Line::from(format!(
            "Exploration: {:.4}",
            trainer.agent().exploration_rate()
        )));
        lines.push(Line::from(format!(
            "Learning: {}",
            if trainer.agent().is_learning() { "on" } else { "off" }
        )));

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Agent "),
        )
    }

    fn render_stats(&self, trainer: &Trainer, status: &PlaybackStatus) -> Paragraph<'_> {
        let (length, steps) = trainer
            .episode()
            .map_or((0, 0), |episode| (episode.snake_length(), episode.steps()));

        let mut spans = vec![
            Span::styled("Length: ", label_style()),
            Span::styled(
                length.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", label_style()),
            Span::styled(steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", label_style()),
            Span::styled(trainer.metrics().format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", label_style()),
            Span::styled(status.speed.as_str(), Style::default().fg(Color::White)),
        ];
        if status.paused {
            let label = if status.step_by_step { "  [STEP]" } else { "  [PAUSED]" };
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause/step | "),
            Span::styled("N", Style::default().fg(Color::Cyan)),
            Span::raw(" single step | "),
            Span::styled("1-4", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn label_style() -> Style {
    Style::default().fg(Color::Yellow)
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::SnakeHead => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::SnakeBody => Span::styled("□ ", Style::default().fg(Color::Blue)),
        Cell::GreenApple => Span::styled(
            "● ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::RedApple => Span::styled(
            "● ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Cell::Wall => Span::styled("# ", Style::default().fg(Color::Gray)),
        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

/// Danger, green and red flags per direction, one row per group
fn state_lines(state: &State) -> Vec<Line<'static>> {
    let header = game::Direction::ALL
        .iter()
        .map(|d| format!("{:>6}", d.name()))
        .collect::<String>();

    let row = |label: &str, bits: [bool; 4]| {
        let flags = bits
            .iter()
            .map(|b| format!("{:>6}", if *b { "1" } else { "0" }))
            .collect::<String>();
        Line::from(format!("{:<7}{}", label, flags))
    };

    vec![
        Line::from(format!("{:<7}{}", "", header)),
        row("danger", state.danger_bits()),
        row("green", state.green_bits()),
        row("red", state.red_bits()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{Progress, RunConfig};
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(trainer: &Trainer, status: &PlaybackStatus) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 45)).unwrap();
        let renderer = Renderer::new();
        terminal
            .draw(|frame| renderer.render(frame, trainer, status))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn status() -> PlaybackStatus {
        PlaybackStatus {
            model_name: "model_10.json".to_string(),
            paused: true,
            step_by_step: false,
            speed: VisualizationSpeed::Slow,
        }
    }

    #[test]
    fn test_panel_shows_agent_view() {
        let config = RunConfig {
            seed: Some(3),
            ..Default::default()
        };
        let mut trainer = Trainer::new(config).unwrap();
        assert!(matches!(trainer.advance().unwrap(), Progress::Ticked(_)));

        let text = screen_text(&trainer, &status());
        assert!(text.contains("Raw Vision"));
        assert!(text.contains("Q-values"));
        assert!(text.contains("danger"));
        assert!(text.contains("model_10.json"));
        assert!(text.contains("Session: 1/1"));
        assert!(text.contains("[PAUSED]"));
        assert!(text.contains("Slow"));
    }

    #[test]
    fn test_renders_before_first_tick() {
        let trainer = Trainer::new(RunConfig::default()).unwrap();
        let text = screen_text(&trainer, &status());
        assert!(text.contains("Starting next session"));
        assert!(!text.contains("Raw Vision"));
    }

    #[test]
    fn test_state_lines_layout() {
        let state = State::from_parts([true, false, false, false], [false; 4], [false; 4]);
        let lines = state_lines(&state);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].to_string().contains("RIGHT"));
        assert!(lines[1].to_string().starts_with("danger"));
    }
}
