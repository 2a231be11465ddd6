//! Rendering surface abstraction.
//!
//! The player never draws pixels itself; a collaborator hands it something
//! implementing [`RenderSurface`] and receives the full trajectory paths once
//! at session start plus the marker positions every tick. A surface error
//! means the target was torn down, and the tick loop is expected to exit
//! quietly rather than propagate it.

use crate::playback::Frame;
use crate::trajectory::TrajectorySet;
use thiserror::Error;

/// A rendering surface stopped accepting draws.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render surface closed")]
    SurfaceClosed,

    #[error("render backend error: {0}")]
    Backend(String),
}

/// Drawable target provided by the embedding UI.
pub trait RenderSurface {
    /// Draws the full path of every trajectory; called once per session.
    fn draw_paths(&mut self, trajectories: &TrajectorySet) -> Result<(), RenderError>;

    /// Draws the current marker positions; called every tick.
    fn draw_frame(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

/// Fixed marker palette (tab20). Trajectories past the palette size cycle.
pub const MARKER_PALETTE: [[u8; 3]; 20] = [
    [31, 119, 180],
    [174, 199, 232],
    [255, 127, 14],
    [255, 187, 120],
    [44, 160, 44],
    [152, 223, 138],
    [214, 39, 40],
    [255, 152, 150],
    [148, 103, 189],
    [197, 176, 213],
    [140, 86, 75],
    [196, 156, 148],
    [227, 119, 194],
    [247, 182, 210],
    [127, 127, 127],
    [199, 199, 199],
    [188, 189, 34],
    [219, 219, 141],
    [23, 190, 207],
    [158, 218, 229],
];

/// Color for the trajectory at `index`, cycling past the palette size.
pub fn marker_color(index: usize) -> [u8; 3] {
    MARKER_PALETTE[index % MARKER_PALETTE.len()]
}
