use std::time::Duration;
use tracing::debug;

/// Trait for running a task after a delay
///
/// The reconnection policy is the only client: it schedules one deferred
/// connect attempt per unexpected closure. Implementations need no cancel
/// operation; scheduled tasks carry their own fire-time guard and turn into
/// no-ops when the session they belong to is gone.
pub trait Scheduler: Send + Sync {
    /// Run `task` once, roughly `delay` from now
    ///
    /// Must return without running the task: the caller may hold locks the
    /// task will take when it fires.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>);
}

/// Scheduler backed by the tokio timer
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        debug!("Scheduling deferred task in {:?}", delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
