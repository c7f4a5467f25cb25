use std::time::Duration;

/// How long the supervisor waits before probing for a debugger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Used when the caller supplies no timeout
    pub default: Duration,
    /// Caller-supplied timeouts below this are raised to it
    pub floor: Duration,
}

impl TimeoutPolicy {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_FLOOR: Duration = Duration::from_secs(30);

    #[must_use]
    pub const fn new(default: Duration, floor: Duration) -> Self {
        Self { default, floor }
    }

    #[must_use]
    pub fn resolve(&self, requested: Option<Duration>) -> Duration {
        match requested {
            Some(timeout) => timeout.max(self.floor),
            None => self.default,
        }
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT, Self::DEFAULT_FLOOR)
    }
}
