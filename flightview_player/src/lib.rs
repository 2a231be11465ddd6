//! Flightview driver - the external half of the playback system.
//!
//! Owns everything the core deliberately leaves to a collaborator: the
//! cooperative 10 ms tick loop, the one-active-session control surface with
//! stop-then-replace semantics, live collision callbacks, and the retained
//! collision report with its terminal table and JSON export.

mod controller;
mod report;
mod runner;

pub use controller::{SessionController, StartError};
pub use report::PlaybackReport;
pub use runner::{run_playback, PlaybackConfig, DEFAULT_TICK_INTERVAL};
