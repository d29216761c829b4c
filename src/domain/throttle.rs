use std::time::{Duration, Instant};

pub const DEFAULT_DETECTION_INTERVAL: Duration = Duration::from_millis(100);

/// Limits detection passes to one per `min_interval`. Requests inside the
/// window are dropped, not queued.
#[derive(Debug, Clone)]
pub struct DetectionThrottle {
    min_interval: Duration,
    last_run: Option<Instant>,
}

impl DetectionThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_run: None,
        }
    }

    /// Records `now` as the last pass when allowed.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let due = match self.last_run {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if due {
            self.last_run = Some(now);
        }
        due
    }

    pub fn last_run(&self) -> Option<Instant> {
        self.last_run
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

impl Default for DetectionThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTION_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_always_runs() {
        let mut throttle = DetectionThrottle::default();
        assert!(throttle.try_acquire(Instant::now()));
    }

    #[test]
    fn at_most_one_pass_per_window_at_frame_rate() {
        let mut throttle = DetectionThrottle::new(Duration::from_millis(100));
        let start = Instant::now();

        let ran: Vec<u64> = (0..63u64)
            .map(|i| i * 16)
            .filter(|&ms| throttle.try_acquire(start + Duration::from_millis(ms)))
            .collect();

        // 0, 112, 224, ... : every run is at least 100ms after the previous one
        assert_eq!(ran.first().copied(), Some(0));
        for pair in ran.windows(2) {
            assert!(pair[1] - pair[0] >= 100);
            assert!(pair[1] - pair[0] < 116);
        }
        assert_eq!(ran.len(), 9);
    }

    #[test]
    fn skipped_requests_do_not_move_the_window() {
        let mut throttle = DetectionThrottle::new(Duration::from_millis(100));
        let start = Instant::now();
        assert!(throttle.try_acquire(start));
        assert!(!throttle.try_acquire(start + Duration::from_millis(99)));
        assert_eq!(throttle.last_run(), Some(start));
        assert!(throttle.try_acquire(start + Duration::from_millis(100)));
    }
}
