//! Pairwise proximity detection over a playback frame.
//!
//! The reporter scans every unordered marker pair (i, j) with i < j, in that
//! order, and emits an event whenever the Euclidean distance is strictly
//! below the threshold. The check re-fires on every tick the condition
//! holds; callers wanting one event per contact opt in via
//! [`CollisionReporter::with_distinct_events`].

use crate::playback::Frame;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default proximity threshold, in scene units.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// A detected pairwise proximity at one tick.
///
/// Carries the first trajectory's position, matching the order the pair was
/// enumerated in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub first: String,
    pub second: String,
    pub position: [f64; 3],
    pub elapsed: f64,
}

/// Scans frames for marker pairs closer than a threshold.
#[derive(Debug, Clone)]
pub struct CollisionReporter {
    threshold: f64,
    distinct: bool,
    colliding: HashSet<(usize, usize)>,
}

impl Default for CollisionReporter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl CollisionReporter {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            distinct: false,
            colliding: HashSet::new(),
        }
    }

    /// Emit one event per contact instead of one per tick.
    ///
    /// This deviates from the replayed tool's behavior, which re-reports a
    /// pair on every tick it stays within the threshold; a pair re-arms once
    /// its distance leaves the threshold again.
    pub fn with_distinct_events(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Forgets any currently-colliding pair state (for session restarts).
    pub fn reset(&mut self) {
        self.colliding.clear();
    }

    /// Reports every marker pair closer than the threshold in this frame.
    ///
    /// Events are ordered by pair enumeration: i ascending, then j ascending.
    pub fn report(&mut self, frame: &Frame) -> Vec<CollisionEvent> {
        let mut events = Vec::new();

        for i in 0..frame.markers.len() {
            for j in (i + 1)..frame.markers.len() {
                let a = &frame.markers[i];
                let b = &frame.markers[j];
                let within = (a.position - b.position).norm() < self.threshold;

                if self.distinct {
                    if within {
                        if self.colliding.insert((i, j)) {
                            events.push(event_for(frame, i, j));
                        }
                    } else {
                        self.colliding.remove(&(i, j));
                    }
                } else if within {
                    events.push(event_for(frame, i, j));
                }
            }
        }

        events
    }
}

fn event_for(frame: &Frame, i: usize, j: usize) -> CollisionEvent {
    let a = &frame.markers[i];
    CollisionEvent {
        first: a.name.clone(),
        second: frame.markers[j].name.clone(),
        position: [a.position.x, a.position.y, a.position.z],
        elapsed: frame.elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::MarkerState;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn frame_at(elapsed: f64, positions: &[[f64; 3]]) -> Frame {
        Frame {
            elapsed,
            markers: positions
                .iter()
                .enumerate()
                .map(|(i, p)| MarkerState {
                    name: format!("t{i}"),
                    sample_index: 0,
                    position: Vector3::new(p[0], p[1], p[2]),
                    progress: 0.5,
                })
                .collect(),
            all_done: false,
        }
    }

    #[test]
    fn test_each_unordered_pair_reported_once() {
        let mut reporter = CollisionReporter::new(10.0);
        let frame = frame_at(1.0, &[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);

        let events = reporter.report(&frame);
        assert_eq!(events.len(), 3);

        // i ascending, then j ascending
        assert_eq!((events[0].first.as_str(), events[0].second.as_str()), ("t0", "t1"));
        assert_eq!((events[1].first.as_str(), events[1].second.as_str()), ("t0", "t2"));
        assert_eq!((events[2].first.as_str(), events[2].second.as_str()), ("t1", "t2"));
    }

    #[test]
    fn test_event_uses_first_marker_position() {
        let mut reporter = CollisionReporter::new(1.0);
        let frame = frame_at(2.5, &[[0.5, 0.0, 0.0], [0.6, 0.0, 0.0]]);

        let events = reporter.report(&frame);
        assert_eq!(events.len(), 1);
        assert_relative_eq!(events[0].position[0], 0.5);
        assert_relative_eq!(events[0].elapsed, 2.5);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut reporter = CollisionReporter::new(0.1);

        let touching = frame_at(0.0, &[[0.0; 3], [0.1, 0.0, 0.0]]);
        assert!(reporter.report(&touching).is_empty());

        let inside = frame_at(0.0, &[[0.0; 3], [0.0999, 0.0, 0.0]]);
        assert_eq!(reporter.report(&inside).len(), 1);
    }

    #[test]
    fn test_distant_pair_never_fires() {
        let mut reporter = CollisionReporter::default();
        let frame = frame_at(0.0, &[[0.0; 3], [5.0, 5.0, 5.0]]);

        for _ in 0..10 {
            assert!(reporter.report(&frame).is_empty());
        }
    }

    #[test]
    fn test_refires_every_tick_by_default() {
        let mut reporter = CollisionReporter::default();
        let frame = frame_at(0.0, &[[0.0; 3], [0.01, 0.0, 0.0]]);

        assert_eq!(reporter.report(&frame).len(), 1);
        assert_eq!(reporter.report(&frame).len(), 1);
        assert_eq!(reporter.report(&frame).len(), 1);
    }

    #[test]
    fn test_distinct_mode_fires_once_per_contact() {
        let mut reporter = CollisionReporter::default().with_distinct_events();
        let close = frame_at(0.0, &[[0.0; 3], [0.01, 0.0, 0.0]]);
        let apart = frame_at(1.0, &[[0.0; 3], [2.0, 0.0, 0.0]]);

        assert_eq!(reporter.report(&close).len(), 1);
        assert_eq!(reporter.report(&close).len(), 0);

        // leaving the threshold re-arms the pair
        assert_eq!(reporter.report(&apart).len(), 0);
        assert_eq!(reporter.report(&close).len(), 1);
    }

    #[test]
    fn test_coinciding_markers_emit_zero_distance_event() {
        let mut reporter = CollisionReporter::default();
        let frame = frame_at(2.0, &[[1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);

        let events = reporter.report(&frame);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].first, "t0");
        assert_eq!(events[0].second, "t1");
        assert_relative_eq!(events[0].position[0], 1.0);
        assert_relative_eq!(events[0].elapsed, 2.0);
    }

    #[test]
    fn test_reset_rearms_distinct_pairs() {
        let mut reporter = CollisionReporter::default().with_distinct_events();
        let close = frame_at(0.0, &[[0.0; 3], [0.01, 0.0, 0.0]]);

        assert_eq!(reporter.report(&close).len(), 1);
        reporter.reset();
        assert_eq!(reporter.report(&close).len(), 1);
    }
}
