use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1200);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60);

/// Timing of the poll loop of each condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause before every poll.
    pub poll_interval: Duration,
    /// Wall-clock budget of one condition, measured from its submission.
    pub max_wait: Duration,
}

impl PollSettings {
    pub fn new(poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            poll_interval,
            max_wait,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_WAIT)
    }
}
