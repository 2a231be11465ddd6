//! Headless replay of two hand-built trajectories.
//!
//! Drives the session clock by hand instead of sleeping in real time, and
//! prints every proximity event to stdout.

use flightview_core::{CollisionReporter, PlaybackSession, Trajectory, TrajectorySet};
use nalgebra::Vector3;
use std::time::{Duration, Instant};

fn main() {
    let set = TrajectorySet::new(vec![
        Trajectory::from_points(
            "chaser",
            vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)],
        )
        .expect("valid trajectory"),
        Trajectory::from_points(
            "target",
            vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)],
        )
        .expect("valid trajectory"),
    ]);

    let start = Instant::now();
    let mut session = PlaybackSession::start(set, &[2.0, 2.0], start).expect("valid durations");
    let mut reporter = CollisionReporter::default();

    for step in 0..=20u64 {
        let now = start + Duration::from_millis(step * 100);
        let frame = session.tick(now);

        for event in reporter.report(&frame) {
            println!(
                "{} & {} met at ({:.2}, {:.2}, {:.2}) after {:.2} s",
                event.first,
                event.second,
                event.position[0],
                event.position[1],
                event.position[2],
                event.elapsed
            );
        }

        if frame.all_done {
            println!("replay finished at {:.2} s", frame.elapsed);
            break;
        }
    }
}
