//! Flightview Core - Trajectory Playback & Proximity Reporting
//!
//! Replays recorded 3D trajectories on a shared wall clock and reports
//! pairwise proximity events. Three pieces:
//! 1. **Trajectory Store**: all-or-nothing loading of sampled `{x, y, z}` files
//! 2. **Player**: per-trajectory durations over one shared start time
//! 3. **Collision Reporter**: ordered pairwise distance checks per frame
//!
//! Rendering is delegated to a collaborator through the [`render::RenderSurface`]
//! trait; a Rerun-backed implementation ships behind the `visualization` feature.

pub mod collision;
pub mod playback;
pub mod render;
pub mod trajectory;
pub mod validation;

#[cfg(feature = "visualization")]
pub mod visualization;

// Re-export key types for convenience
pub use collision::{CollisionEvent, CollisionReporter, DEFAULT_THRESHOLD};
pub use playback::{Frame, MarkerState, PlaybackSession, PlaybackState};
pub use render::{RenderError, RenderSurface};
pub use trajectory::{LoadError, Trajectory, TrajectorySet};
pub use validation::{ValidationError, DEFAULT_DURATION_SECS, MIN_DURATION_SECS};
