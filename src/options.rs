use std::time::Duration;

/// Exponential backoff retry configuration.
///
/// Attempt `i` (zero-based) that fails with a retryable error is followed by
/// a sleep of `base_delay_ms * 2^i` before attempt `i + 1`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: usize,
    /// Delay before the first retry in milliseconds.
    pub base_delay_ms: u64,
    /// HTTP statuses that are retried like transport failures.
    ///
    /// Empty by default: error responses are surfaced on the first attempt.
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    /// Policy that issues a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff delay inserted after the failed attempt `attempt`.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exp = attempt.min(16) as u32;
        let multiplier = 1u64 << exp;
        Duration::from_millis(self.base_delay_ms.saturating_mul(multiplier))
    }

    /// Whether another attempt may follow the failed attempt `attempt`.
    pub fn allows_retry_after(&self, attempt: usize) -> bool {
        attempt + 1 < self.max_attempts
    }

    pub(crate) fn retries_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            retry_statuses: Vec::new(),
        }
    }
}

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt transport timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retry behavior for every request issued by the client.
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RetryPolicy;

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy {
            base_delay_ms: 100,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }

    #[test]
    fn delay_saturates_on_large_attempts() {
        let policy = RetryPolicy {
            base_delay_ms: u64::MAX,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(40), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn default_policy_allows_three_attempts() {
        let policy = RetryPolicy::default();
        assert!(policy.allows_retry_after(0));
        assert!(policy.allows_retry_after(1));
        assert!(!policy.allows_retry_after(2));
        assert!(!RetryPolicy::no_retry().allows_retry_after(0));
    }
}
