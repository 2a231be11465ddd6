//! The tick loop - advances one session to completion or cancellation.
//!
//! One logical stream of ticks: check the cancel flag, tick the session,
//! draw, report collisions, then sleep. The loop never outlives its render
//! surface; a draw failure means the target was torn down and the loop exits
//! quietly instead of propagating the fault.

use flightview_core::{CollisionEvent, CollisionReporter, PlaybackSession, PlaybackState, RenderSurface};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::report::PlaybackReport;

/// Delay between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Tick loop configuration.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub tick_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Runs a session until every trajectory completes, the cancel flag is set,
/// or the render surface goes away.
///
/// Collision events are handed to `on_collision` as they fire and retained in
/// the returned report in emission order.
pub async fn run_playback(
    mut session: PlaybackSession,
    mut reporter: CollisionReporter,
    mut surface: Option<Box<dyn RenderSurface + Send>>,
    config: PlaybackConfig,
    mut on_collision: impl FnMut(&CollisionEvent),
    cancel: Arc<AtomicBool>,
) -> PlaybackReport {
    let mut report = PlaybackReport::new(session.id());

    loop {
        // Cooperative cancel, checked before the surface is touched.
        if cancel.load(Ordering::Acquire) {
            session.stop();
            debug!("session {} cancelled", session.id());
            break;
        }

        let frame = session.tick(Instant::now());

        if let Some(target) = surface.as_mut() {
            if let Err(err) = target.draw_frame(&frame) {
                warn!("render surface lost, stopping session {}: {err}", session.id());
                session.stop();
                break;
            }
        }

        for event in reporter.report(&frame) {
            on_collision(&event);
            report.record(event);
        }

        report.ticks += 1;
        report.final_elapsed = frame.elapsed;

        if frame.all_done {
            debug!(
                "session {} finished after {} ticks ({:.2} s)",
                session.id(),
                report.ticks,
                frame.elapsed
            );
            break;
        }

        tokio::time::sleep(config.tick_interval).await;
    }

    report.completed = session.state() == PlaybackState::Finished;
    report
}
