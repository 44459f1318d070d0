use std::time::Duration;

/// Trait for deciding if and when a dropped session should be rebuilt
///
/// The manager calls this once per unexpected closure, after incrementing
/// its attempt counter. The counter resets to zero only on a successful
/// open, so a flapping connection walks the full ladder.
pub trait ReconnectPolicy: Send + Sync {
    /// Get the delay before the given reconnection attempt
    ///
    /// # Arguments
    /// * `attempt` - The attempt number, 1-indexed (first retry is 1)
    ///
    /// # Returns
    /// * `Some(duration)` - Wait this long before reconnecting
    /// * `None` - Give up; the session stays closed until the caller
    ///   reconnects explicitly
    fn next_delay(&self, attempt: u32) -> Option<Duration>;
}

/// Linear backoff with a hard attempt ceiling
///
/// Delays grow linearly with the attempt number: `base * attempt`.
/// With the defaults (3 s base, 5 attempts) that is 3 s, 6 s, 9 s, 12 s,
/// 15 s, then nothing.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    max_attempts: u32,
}

impl LinearBackoff {
    /// Create a new linear backoff policy
    ///
    /// # Arguments
    /// * `base` - The delay multiplier per attempt
    /// * `max_attempts` - Attempts beyond this return `None`
    pub fn new(base: Duration, max_attempts: u32) -> Self {
        Self { base, max_attempts }
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000), 5)
    }
}

impl ReconnectPolicy for LinearBackoff {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        Some(self.base * attempt)
    }
}

/// Never reconnect
///
/// Every unexpected closure is final until the caller reconnects.
#[derive(Debug, Clone)]
pub struct NeverReconnect;

impl ReconnectPolicy for NeverReconnect {
    fn next_delay(&self, _attempt: u32) -> Option<Duration> {
        None
    }
}
