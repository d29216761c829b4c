use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::{geometry::Point, throttle::DetectionThrottle, trail::Trail};

/// Result of one executed detection pass, as seen by the trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionOutcome {
    Tracked(Point),
    Lost,
}

struct SessionState {
    trail: Trail,
    throttle: DetectionThrottle,
}

/// Per-session trail state shared by the detection loop, the render loop and
/// the clear action. The lock is only held for in-memory updates, never
/// across an await.
pub struct TrailSession {
    state: Mutex<SessionState>,
}

impl TrailSession {
    pub fn new(capacity: usize, detection_interval: Duration) -> Self {
        Self {
            state: Mutex::new(SessionState {
                trail: Trail::with_capacity(capacity),
                throttle: DetectionThrottle::new(detection_interval),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // The state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True when a detection pass may run now; the pass time is recorded.
    pub fn try_begin_pass(&self, now: Instant) -> bool {
        self.lock().throttle.try_acquire(now)
    }

    pub fn apply(&self, outcome: DetectionOutcome) {
        let mut state = self.lock();
        match outcome {
            DetectionOutcome::Tracked(point) => state.trail.append(point),
            DetectionOutcome::Lost => {
                // A reappearing subject starts a new stroke instead of being
                // joined to the old one.
                if !state.trail.is_empty() {
                    debug!(points = state.trail.len(), "subject lost, dropping trail");
                    state.trail.reset();
                }
            }
        }
    }

    pub fn clear(&self) {
        self.lock().trail.reset();
        info!("Drawing cleared");
    }

    pub fn snapshot(&self) -> Vec<Point> {
        self.lock().trail.to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().trail.capacity()
    }
}
