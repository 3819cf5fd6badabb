//! Fixed-interval polling budgets

use std::time::Duration;

/// How long to wait for a device group change to become visible
///
/// Polling is fixed-interval: no backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before each re-check
    pub interval: Duration,
    /// Re-checks after the first one
    pub max_attempts: u32,
    /// Attempt index after which every further attempt logs a warning
    pub escalate_after: Option<u32>,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            escalate_after: None,
        }
    }

    /// Zero-delay policy, for tests and callers that poll elsewhere
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(Duration::ZERO, max_attempts)
    }

    pub fn escalate_after(mut self, attempt: u32) -> Self {
        self.escalate_after = Some(attempt);
        self
    }

    /// Whether waiting at `attempt` (0-indexed) should raise a warning
    pub fn should_escalate(&self, attempt: u32) -> bool {
        matches!(self.escalate_after, Some(threshold) if attempt > threshold)
    }

    /// Time spent waiting once `attempt` has slept
    pub fn elapsed(&self, attempt: u32) -> Duration {
        self.interval * attempt.saturating_add(1)
    }

    /// Time left in the budget once `attempt` has slept
    pub fn remaining(&self, attempt: u32) -> Duration {
        self.interval * self.max_attempts.saturating_sub(attempt.saturating_add(1))
    }

    /// Total time the policy may wait
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}
