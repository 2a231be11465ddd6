//! Session control surface - at most one playback session at a time.
//!
//! Starting a new session first signals the previous loop's cancel flag and
//! awaits the loop task, so no tick of the old session can interleave with
//! the new one and the old render surface is dropped (inside the finished
//! task) before the new session touches anything. The cancel flag lives in
//! the session handle, never in process-wide state.

use flightview_core::render::RenderError;
use flightview_core::{
    CollisionEvent, CollisionReporter, PlaybackSession, RenderSurface, TrajectorySet,
    ValidationError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::report::PlaybackReport;
use crate::runner::{run_playback, PlaybackConfig};

/// Why a session failed to start.
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to initialize render surface: {0}")]
    Render(#[from] RenderError),
}

struct ActiveSession {
    id: Uuid,
    cancel: Arc<AtomicBool>,
    task: JoinHandle<PlaybackReport>,
}

/// Owns the one active playback session.
#[derive(Default)]
pub struct SessionController {
    active: Option<ActiveSession>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Stops any running session, then starts playback of `set`.
    ///
    /// Durations are validated before anything is torn down or spawned; the
    /// trajectory paths are drawn once on the surface before the first tick.
    pub async fn start(
        &mut self,
        set: TrajectorySet,
        durations: &[f64],
        reporter: CollisionReporter,
        mut surface: Option<Box<dyn RenderSurface + Send>>,
        config: PlaybackConfig,
        on_collision: impl FnMut(&CollisionEvent) + Send + 'static,
    ) -> Result<Uuid, StartError> {
        flightview_core::validation::validate_durations(&set, durations)?;

        // Old session out before the new one exists.
        self.stop().await;

        if let Some(target) = surface.as_mut() {
            target.draw_paths(&set)?;
        }

        let session = PlaybackSession::start(set, durations, Instant::now())?;
        let id = session.id();
        let cancel = Arc::new(AtomicBool::new(false));

        info!(
            "starting session {id} with {} trajectories",
            session.trajectory_count()
        );

        let task = tokio::spawn(run_playback(
            session,
            reporter,
            surface,
            config,
            on_collision,
            cancel.clone(),
        ));

        self.active = Some(ActiveSession { id, cancel, task });
        Ok(id)
    }

    /// Signals the active session to stop and awaits its final report.
    ///
    /// Returns `None` when no session was active.
    pub async fn stop(&mut self) -> Option<PlaybackReport> {
        let active = self.active.take()?;
        active.cancel.store(true, Ordering::Release);
        Self::join_task(active).await
    }

    /// Awaits the active session running to its natural end.
    pub async fn join(&mut self) -> Option<PlaybackReport> {
        let active = self.active.take()?;
        Self::join_task(active).await
    }

    async fn join_task(active: ActiveSession) -> Option<PlaybackReport> {
        match active.task.await {
            Ok(report) => Some(report),
            Err(err) => {
                error!("playback task for session {} failed: {err}", active.id);
                None
            }
        }
    }
}
