//! Rerun-backed rendering surface.
//!
//! Streams the loaded trajectory paths and the per-tick marker positions to
//! a Rerun viewer. Enable with the `visualization` feature flag.

use crate::playback::Frame;
use crate::render::{marker_color, RenderError, RenderSurface};
use crate::trajectory::TrajectorySet;
use rerun::{RecordingStream, RecordingStreamBuilder};

/// Rerun-based renderer for trajectory playback.
pub struct RerunVisualizer {
    rec: RecordingStream,
}

impl RerunVisualizer {
    /// Creates a visualizer that spawns the Rerun viewer.
    pub fn new(app_id: &str) -> Result<Self, RenderError> {
        let rec = RecordingStreamBuilder::new(app_id)
            .spawn()
            .map_err(backend)?;
        Self::with_stream(rec)
    }

    /// Creates a visualizer that saves to an .rrd file for later replay.
    pub fn new_to_file(app_id: &str, path: &str) -> Result<Self, RenderError> {
        let rec = RecordingStreamBuilder::new(app_id)
            .save(path)
            .map_err(backend)?;
        Self::with_stream(rec)
    }

    fn with_stream(rec: RecordingStream) -> Result<Self, RenderError> {
        rec.log_static("world", &rerun::ViewCoordinates::RIGHT_HAND_Z_UP())
            .map_err(backend)?;
        Ok(Self { rec })
    }
}

impl RenderSurface for RerunVisualizer {
    fn draw_paths(&mut self, trajectories: &TrajectorySet) -> Result<(), RenderError> {
        for (index, trajectory) in trajectories.iter().enumerate() {
            let strip: Vec<[f32; 3]> = trajectory
                .points()
                .iter()
                .map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect();

            self.rec
                .log_static(
                    format!("world/paths/{}", trajectory.name()),
                    &rerun::LineStrips3D::new([strip])
                        .with_colors([rgba(marker_color(index), 160)])
                        .with_labels([trajectory.name()]),
                )
                .map_err(backend)?;
        }
        Ok(())
    }

    fn draw_frame(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let positions: Vec<[f32; 3]> = frame
            .markers
            .iter()
            .map(|m| [m.position.x as f32, m.position.y as f32, m.position.z as f32])
            .collect();
        let colors: Vec<[u8; 4]> = (0..frame.markers.len())
            .map(|i| rgba(marker_color(i), 255))
            .collect();

        self.rec
            .log(
                "world/markers",
                &rerun::Points3D::new(positions)
                    .with_colors(colors)
                    .with_radii([0.05]),
            )
            .map_err(backend)?;

        Ok(())
    }
}

fn rgba(rgb: [u8; 3], alpha: u8) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}

fn backend(err: impl std::fmt::Display) -> RenderError {
    RenderError::Backend(err.to_string())
}
