// ABOUTME: Time-bounded retry bookkeeping for the deploy loop.
// ABOUTME: One RetryState wraps a whole deploy cycle, never a single region.

use std::time::Duration;
use tokio::time::Instant;

use crate::config::DeploymentConfig;

use super::error::DeployError;

/// Budget and fixed backoff for absorbing credential propagation delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub budget: Duration,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &DeploymentConfig) -> Self {
        Self {
            budget: config.deploy_timeout,
            backoff: config.retry_backoff,
        }
    }
}

/// Attempt counter, start time and last transient failure of one cycle.
#[derive(Debug)]
pub(crate) struct RetryState {
    started: Instant,
    attempts: u32,
    last_error: Option<DeployError>,
}

impl RetryState {
    pub(crate) fn start() -> Self {
        Self {
            started: Instant::now(),
            attempts: 0,
            last_error: None,
        }
    }

    /// Checked only at the top of the loop; a hanging call is not interrupted.
    pub(crate) fn expired(&self, policy: &RetryPolicy) -> bool {
        self.started.elapsed() > policy.budget
    }

    pub(crate) fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub(crate) fn record(&mut self, error: DeployError) {
        self.last_error = Some(error);
    }

    pub(crate) fn into_error(self, policy: &RetryPolicy) -> DeployError {
        match self.last_error {
            Some(last) => DeployError::Exhausted {
                attempts: self.attempts,
                source: Box::new(last),
            },
            None => DeployError::TimedOut {
                budget: policy.budget,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::DeployErrorKind;

    fn policy(budget_ms: u64) -> RetryPolicy {
        RetryPolicy {
            budget: Duration::from_millis(budget_ms),
            backoff: Duration::from_millis(10),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expires_only_after_budget_elapsed() {
        let state = RetryState::start();
        let policy = policy(1000);

        assert!(!state.expired(&policy));
        tokio::time::advance(Duration::from_millis(1000)).await;
        assert!(!state.expired(&policy));
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(state.expired(&policy));
    }

    #[test]
    fn without_recorded_error_times_out() {
        let state = RetryState::start();
        let err = state.into_error(&policy(0));
        assert_eq!(err.kind(), DeployErrorKind::Timeout);
        assert!(err.last_error().is_none());
    }

    #[test]
    fn counts_attempts() {
        let mut state = RetryState::start();
        assert_eq!(state.begin_attempt(), 1);
        assert_eq!(state.begin_attempt(), 2);
    }
}
