use std::time::Duration;

use serde::{Deserialize, Serialize};

/// delay schedule for the ingestion retry loop: a short fixed delay for the
/// first `short_attempts` failures, a longer fixed delay for every failure
/// after that. `max_attempts` of `None` retries indefinitely; ingestion is
/// a startup gate. a configured ceiling instead marks the category as
/// degraded (empty) so startup can proceed; that trade-off is a policy knob,
/// never silent behavior.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub short_attempts: u32,
    pub short_delay_seconds: u64,
    pub long_delay_seconds: u64,
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            short_attempts: 3,
            short_delay_seconds: 10,
            long_delay_seconds: 30,
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// the delay to wait after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= self.short_attempts {
            Duration::from_secs(self.short_delay_seconds)
        } else {
            Duration::from_secs(self.long_delay_seconds)
        }
    }

    /// true when the policy permits no further attempt after this one.
    pub fn exhausted(&self, attempt: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempt >= max,
            None => false,
        }
    }

    /// bounded zero-delay policy for tests.
    pub fn immediate(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            short_attempts: 1,
            short_delay_seconds: 0,
            long_delay_seconds: 0,
            max_attempts: Some(max_attempts),
        }
    }
}
