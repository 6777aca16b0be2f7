use std::time::{Duration, Instant};

/// Run-level records across all sessions
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Longest snake seen at the end of any session
    pub max_length: usize,
    /// Most steps any session lasted
    pub max_duration: usize,
    pub sessions_played: usize,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            max_length: 0,
            max_duration: 0,
            sessions_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Fold a finished session into the records
    pub fn on_session_end(&mut self, length: usize, steps: usize) {
        self.sessions_played += 1;
        self.max_length = self.max_length.max(length);
        self.max_duration = self.max_duration.max(steps);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
