//! Monotonic timing for the compound schedule.

use std::time::Duration;
use tokio::time::Instant;

/// Tracks the time since the last compound against a fixed interval.
#[derive(Debug, Clone)]
pub struct CompoundTimer {
    interval: Option<Duration>,
    last_reset: Instant,
}

impl CompoundTimer {
    /// Starts the timer now. A `None` interval never becomes due.
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last_reset: Instant::now(),
        }
    }

    /// Configured interval, `None` when compounding is disabled.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Whether an interval is configured.
    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    /// Time since the timer was created or last reset.
    pub fn elapsed(&self) -> Duration {
        self.last_reset.elapsed()
    }

    /// Whether strictly more than the interval has passed since the last reset.
    pub fn is_due(&self) -> bool {
        self.interval.is_some_and(|interval| self.elapsed() > interval)
    }

    /// Restarts the timer from now.
    pub fn reset(&mut self) {
        self.last_reset = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_due_only_after_interval() {
        let timer = CompoundTimer::new(Some(Duration::from_secs(60)));
        assert!(!timer.is_due());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!timer.is_due());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(timer.is_due());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restarts_interval() {
        let mut timer = CompoundTimer::new(Some(Duration::from_secs(10)));
        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(timer.is_due());

        timer.reset();
        assert!(!timer.is_due());
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_timer_is_never_due() {
        let timer = CompoundTimer::new(None);
        tokio::time::advance(Duration::from_secs(86_400)).await;
        assert!(!timer.is_enabled());
        assert!(!timer.is_due());
    }
}
