use std::collections::VecDeque;

use super::geometry::Point;

pub const MAX_TRAIL_LENGTH: usize = 50;

/// Bounded path of recent fingertip positions, oldest first.
///
/// Appending past capacity evicts from the front, so the polyline drawn from
/// it always covers the most recent `capacity` detections.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Trail {
    /// A zero capacity is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, point: Point) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::with_capacity(MAX_TRAIL_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest() {
        let mut trail = Trail::default();
        for i in 0..(MAX_TRAIL_LENGTH + 25) {
            trail.append(Point::new(i as f32, 0.0));
            assert!(trail.len() <= MAX_TRAIL_LENGTH);
        }

        let xs: Vec<f32> = trail.points().map(|p| p.x).collect();
        assert_eq!(xs.len(), MAX_TRAIL_LENGTH);
        assert_eq!(xs.first().copied(), Some(25.0));
        assert_eq!(xs.last().copied(), Some((MAX_TRAIL_LENGTH + 24) as f32));
    }

    #[test]
    fn keeps_insertion_order() {
        let mut trail = Trail::with_capacity(3);
        trail.append(Point::new(1.0, 1.0));
        trail.append(Point::new(2.0, 2.0));
        trail.append(Point::new(3.0, 3.0));
        trail.append(Point::new(4.0, 4.0));

        assert_eq!(
            trail.to_vec(),
            vec![Point::new(2.0, 2.0), Point::new(3.0, 3.0), Point::new(4.0, 4.0)]
        );
    }

    #[test]
    fn reset_is_idempotent() {
        let mut trail = Trail::default();
        trail.reset();
        assert!(trail.is_empty());

        trail.append(Point::new(5.0, 5.0));
        trail.reset();
        trail.reset();
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn zero_capacity_holds_one_point() {
        let mut trail = Trail::with_capacity(0);
        trail.append(Point::new(1.0, 1.0));
        trail.append(Point::new(2.0, 2.0));
        assert_eq!(trail.capacity(), 1);
        assert_eq!(trail.to_vec(), vec![Point::new(2.0, 2.0)]);
    }
}
