//! Clock abstraction for keystroke timing
//!
//! The terminal's double-Tab detection compares press times. Production
//! code uses the system clock; tests drive a logical clock so the 500 ms
//! boundary can be checked exactly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub trait TimeSource: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;

    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

pub type SharedTimeSource = Arc<dyn TimeSource>;

#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn shared() -> SharedTimeSource {
        Arc::new(Self)
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Logical clock: time only moves on `advance()`.
#[derive(Debug)]
pub struct TestTimeSource {
    logical_nanos: AtomicU64,
    base_instant: Instant,
}

impl Default for TestTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTimeSource {
    pub fn new() -> Self {
        Self {
            logical_nanos: AtomicU64::new(0),
            base_instant: Instant::now(),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn advance(&self, duration: Duration) {
        self.logical_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.logical_nanos.load(Ordering::SeqCst))
    }
}

impl TimeSource for TestTimeSource {
    fn now(&self) -> Instant {
        self.base_instant + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_time_only_moves_on_advance() {
        let time = TestTimeSource::new();
        let start = time.now();
        assert_eq!(time.elapsed_since(start), Duration::ZERO);

        time.advance(Duration::from_millis(499));
        assert_eq!(time.elapsed_since(start), Duration::from_millis(499));
        assert_eq!(time.now(), time.now());
    }

    #[test]
    fn test_elapsed_since_later_instant_saturates() {
        let time = TestTimeSource::new();
        let start = time.now();
        time.advance(Duration::from_secs(1));
        let later = time.now();
        assert_eq!(TimeSource::elapsed_since(&RealTimeSource, later + Duration::from_secs(3600)), Duration::ZERO);
        assert!(time.elapsed_since(start) >= Duration::from_secs(1));
    }
}
