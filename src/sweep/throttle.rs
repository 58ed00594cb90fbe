use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum gap between consecutive attempts.
///
/// Owned by a single sweep; the first `wait` returns immediately.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    jitter: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, jitter: Duration::ZERO, last: None }
    }

    /// Adds a random `0..=jitter` on top of the fixed interval.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn next_gap(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.interval;
        }
        let extra = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
        self.interval + Duration::from_millis(extra)
    }

    /// Sleep until the gap since the previous return has elapsed.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let gap = self.next_gap();
            let elapsed = last.elapsed();
            if elapsed < gap {
                tokio::time::sleep(gap - elapsed).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_wait_does_not_block() {
        let mut throttle = Throttle::new(Duration::from_secs(5));
        let start = std::time::Instant::now();
        throttle.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_consecutive_waits_are_spaced() {
        let interval = Duration::from_millis(40);
        let mut throttle = Throttle::new(interval);
        let mut starts = Vec::new();
        for _ in 0..4 {
            throttle.wait().await;
            starts.push(std::time::Instant::now());
        }
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= interval);
        }
    }

    #[tokio::test]
    async fn test_no_extra_sleep_when_interval_already_passed() {
        let mut throttle = Throttle::new(Duration::from_millis(20));
        throttle.wait().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        let start = std::time::Instant::now();
        throttle.wait().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_jitter_never_goes_below_interval() {
        let interval = Duration::from_millis(20);
        let mut throttle = Throttle::new(interval).with_jitter(Duration::from_millis(10));
        throttle.wait().await;
        let before = std::time::Instant::now();
        throttle.wait().await;
        assert!(before.elapsed() >= interval);
    }
}
