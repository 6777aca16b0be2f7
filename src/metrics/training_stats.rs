//! Rolling per-session statistics for training runs

use std::collections::VecDeque;

/// Session statistics with rolling averages
///
/// Keeps the last `window_size` sessions' total reward, step count and
/// final snake length, plus running totals over the whole run.
///
/// # Example
///
/// ```rust
/// use snake_qlearning::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_session(-1045.0, 12, 4);
///
/// assert_eq!(stats.total_sessions(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Total reward per session (rolling window)
    session_rewards: VecDeque<f64>,

    /// Steps per session (rolling window)
    session_steps: VecDeque<usize>,

    /// Final snake length per session (rolling window)
    session_lengths: VecDeque<usize>,

    /// Total number of sessions completed
    total_sessions: usize,

    /// Total number of ticks played
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker keeping the last `window_size` sessions
    pub fn new(window_size: usize) -> Self {
        Self {
            session_rewards: VecDeque::with_capacity(window_size),
            session_steps: VecDeque::with_capacity(window_size),
            session_lengths: VecDeque::with_capacity(window_size),
            total_sessions: 0,
            total_steps: 0,
            window_size,
        }
    }

    /// Record a finished session
    pub fn record_session(&mut self, reward: f64, steps: usize, length: usize) {
        Self::push_deque(&mut self.session_rewards, reward, self.window_size);
        Self::push_deque(&mut self.session_steps, steps, self.window_size);
        Self::push_deque(&mut self.session_lengths, length, self.window_size);
        self.total_sessions += 1;
        self.total_steps += steps;
    }

    /// Mean session reward over the window, or 0.0 before any session
    pub fn mean_reward(&self) -> f64 {
        if self.session_rewards.is_empty() {
            0.0
        } else {
            self.session_rewards.iter().sum::<f64>() / self.session_rewards.len() as f64
        }
    }

    pub fn mean_steps(&self) -> f64 {
        Self::mean_count(&self.session_steps)
    }

    pub fn mean_length(&self) -> f64 {
        Self::mean_count(&self.session_lengths)
    }

    pub fn total_sessions(&self) -> usize {
        self.total_sessions
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary of the current window
    pub fn format_summary(&self) -> String {
        format!(
            "Sessions: {} | Steps: {} | Reward: {:.2} | Len: {:.2} | Duration: {:.1}",
            self.total_sessions,
            self.total_steps,
            self.mean_reward(),
            self.mean_length(),
            self.mean_steps(),
        )
    }

    fn mean_count(deque: &VecDeque<usize>) -> f64 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<usize>() as f64 / deque.len() as f64
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if window_size == 0 {
            return;
        }
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
