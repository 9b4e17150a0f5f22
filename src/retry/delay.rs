use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Suspends the calling task between retry attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Resolves after at least `duration` has elapsed
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
///
/// Only the awaiting task is suspended; other tasks on the runtime keep running,
/// on both the multi-thread and the current-thread flavour.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Suspends the current task for `ms` milliseconds
pub async fn delay(ms: u64) {
    TokioSleeper.sleep(Duration::from_millis(ms)).await;
}

/// Sleeper that returns immediately and remembers every requested duration
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    requested: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Creates an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order
    pub fn durations(&self) -> Vec<Duration> {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of sleeps requested
    pub fn count(&self) -> usize {
        self.durations().len()
    }

    /// Sum of all requested durations
    pub fn total(&self) -> Duration {
        self.durations().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Instant;

    #[tokio::test]
    async fn test_delay_waits_at_least_requested() {
        let start = Instant::now();
        delay(30).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_delay_does_not_block_other_tasks() {
        let ticks = Arc::new(AtomicU32::new(0));
        let done = Arc::new(AtomicBool::new(false));
        let ticker = tokio::spawn({
            let ticks = Arc::clone(&ticks);
            let done = Arc::clone(&done);
            async move {
                while !done.load(Ordering::SeqCst) {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                }
            }
        });

        // The ticker can only run on this thread while the delay is pending
        delay(50).await;
        let seen = ticks.load(Ordering::SeqCst);
        done.store(true, Ordering::SeqCst);
        ticker.await.unwrap();

        assert!(seen > 0, "spawned task never ran while delay was pending");
    }

    #[tokio::test]
    async fn test_recording_sleeper() {
        let sleeper = RecordingSleeper::new();
        let shared = sleeper.clone();
        shared.sleep(Duration::from_millis(10)).await;
        shared.sleep(Duration::from_millis(20)).await;

        assert_eq!(
            sleeper.durations(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
        assert_eq!(sleeper.count(), 2);
        assert_eq!(sleeper.total(), Duration::from_millis(30));
    }
}
