//! The player - advances every trajectory along one shared wall clock.
//!
//! Each trajectory is assigned its own duration, so markers reach the end of
//! their paths at different times even though all of them measure elapsed
//! time from the same start instant. A session is a state machine:
//! `Running` until either every trajectory completes (`Finished`) or the
//! driver cancels it (`Stopped`). Neither terminal state can be resumed;
//! restarting means building a fresh session from a fresh dataset.

use crate::trajectory::{Trajectory, TrajectorySet};
use crate::validation::{validate_durations, ValidationError};
use nalgebra::Vector3;
use std::time::Instant;
use uuid::Uuid;

/// Position of one trajectory's marker within a frame.
#[derive(Debug, Clone)]
pub struct MarkerState {
    /// Trajectory the marker belongs to
    pub name: String,

    /// Index of the sample selected for this tick
    pub sample_index: usize,

    /// Position at that sample
    pub position: Vector3<f64>,

    /// Fraction of this trajectory's duration elapsed, clamped to [0, 1]
    pub progress: f64,
}

/// Computed positions of every trajectory at one playback tick.
///
/// Frames are built fresh on every tick and owned by the caller; nothing in
/// the session aliases them.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Seconds since the session started
    pub elapsed: f64,

    /// One marker per trajectory, in load order
    pub markers: Vec<MarkerState>,

    /// True iff every trajectory's progress has reached 1.0
    pub all_done: bool,
}

/// Lifecycle of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Ticks advance the markers
    Running,

    /// Every trajectory ran to completion; ticks return the final frame
    Finished,

    /// Cancelled by the driver; ticks return the last frame delivered
    Stopped,
}

struct Track {
    trajectory: Trajectory,
    duration: f64,
}

/// One playback run: a trajectory set, per-trajectory durations and a shared
/// start instant.
pub struct PlaybackSession {
    id: Uuid,
    tracks: Vec<Track>,
    started_at: Instant,
    state: PlaybackState,
    last_frame: Frame,
}

impl PlaybackSession {
    /// Starts playback, recording `now` as the shared time origin.
    ///
    /// Durations are validated first; an invalid set refuses the start
    /// entirely.
    pub fn start(
        set: TrajectorySet,
        durations: &[f64],
        now: Instant,
    ) -> Result<Self, ValidationError> {
        validate_durations(&set, durations)?;

        let tracks: Vec<Track> = set
            .into_iter()
            .zip(durations)
            .map(|(trajectory, &duration)| Track {
                trajectory,
                duration,
            })
            .collect();

        let first_frame = compute_frame(&tracks, 0.0);
        Ok(Self {
            id: Uuid::new_v4(),
            tracks,
            started_at: now,
            state: PlaybackState::Running,
            last_frame: first_frame,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn trajectory_count(&self) -> usize {
        self.tracks.len()
    }

    /// The most recently computed frame.
    pub fn last_frame(&self) -> &Frame {
        &self.last_frame
    }

    /// Computes the frame for wall-clock time `now`.
    ///
    /// For each trajectory: `progress = min(elapsed / duration, 1.0)` and the
    /// marker sits at sample `floor(progress * (sample_count - 1))`. Once the
    /// session has left `Running`, ticking is a no-op that keeps returning
    /// the retained frame.
    pub fn tick(&mut self, now: Instant) -> Frame {
        if self.state != PlaybackState::Running {
            return self.last_frame.clone();
        }

        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f64();
        let frame = compute_frame(&self.tracks, elapsed);

        if frame.all_done {
            self.state = PlaybackState::Finished;
        }
        self.last_frame = frame.clone();
        frame
    }

    /// Cooperative cancel. A finished session stays `Finished`; stopping is
    /// only meaningful while running.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Stopped;
        }
    }
}

fn compute_frame(tracks: &[Track], elapsed: f64) -> Frame {
    let mut all_done = true;
    let markers = tracks
        .iter()
        .map(|track| {
            let progress = (elapsed / track.duration).min(1.0);
            if progress < 1.0 {
                all_done = false;
            }
            let (sample_index, position) = track.trajectory.sample(progress);
            MarkerState {
                name: track.trajectory.name().to_string(),
                sample_index,
                position,
                progress,
            }
        })
        .collect();

    Frame {
        elapsed,
        markers,
        all_done,
    }
}
