//! Flightview trajectory player CLI.
//!
//! Loads trajectory files, replays them on a shared wall clock and reports
//! pairwise proximity events.

use clap::Parser;
use flightview_core::validation::{self, DEFAULT_DURATION_SECS};
use flightview_core::{CollisionReporter, RenderError, RenderSurface, TrajectorySet, DEFAULT_THRESHOLD};
use flightview_player::{PlaybackConfig, SessionController};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Replay recorded 3D trajectories and report proximity events
#[derive(Parser, Debug)]
#[command(name = "flightview")]
#[command(about = "Replay recorded 3D trajectories and report proximity events", long_about = None)]
struct Args {
    /// Trajectory JSON files (arrays of {x, y, z} records)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Per-trajectory playback durations in seconds, comma-separated (default 10 each)
    #[arg(short, long, value_delimiter = ',')]
    durations: Vec<String>,

    /// Proximity threshold in scene units
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Report each colliding pair once per contact instead of every tick
    #[arg(long)]
    distinct: bool,

    /// Write the collision report to a JSON file after playback
    #[arg(long)]
    export: Option<PathBuf>,

    /// Stream playback into a spawned Rerun viewer
    #[cfg(feature = "visualization")]
    #[arg(long)]
    visualize: bool,

    /// Save the playback recording to an .rrd file instead of spawning a viewer
    #[cfg(feature = "visualization")]
    #[arg(long)]
    save_rrd: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "visualization")]
fn build_surface(args: &Args) -> Result<Option<Box<dyn RenderSurface + Send>>, RenderError> {
    use flightview_core::visualization::RerunVisualizer;

    if let Some(path) = &args.save_rrd {
        let visualizer = RerunVisualizer::new_to_file("flightview", &path.to_string_lossy())?;
        return Ok(Some(Box::new(visualizer)));
    }
    if args.visualize {
        return Ok(Some(Box::new(RerunVisualizer::new("flightview")?)));
    }
    Ok(None)
}

#[cfg(not(feature = "visualization"))]
fn build_surface(_args: &Args) -> Result<Option<Box<dyn RenderSurface + Send>>, RenderError> {
    Ok(None)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let set = match TrajectorySet::load(&args.files) {
        Ok(set) => set,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };
    info!("Loaded {} trajectories", set.len());

    let durations = if args.durations.is_empty() {
        vec![DEFAULT_DURATION_SECS; set.len()]
    } else {
        match validation::parse_durations(&set, &args.durations) {
            Ok(durations) => durations,
            Err(err) => {
                error!("{err}");
                std::process::exit(1);
            }
        }
    };

    let surface = match build_surface(&args) {
        Ok(surface) => surface,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    let reporter = if args.distinct {
        CollisionReporter::new(args.threshold).with_distinct_events()
    } else {
        CollisionReporter::new(args.threshold)
    };

    let mut controller = SessionController::new();
    let started = controller
        .start(
            set,
            &durations,
            reporter,
            surface,
            PlaybackConfig::default(),
            |event| {
                info!(
                    "proximity: {} & {} at ({:.2}, {:.2}, {:.2}) t={:.2}s",
                    event.first,
                    event.second,
                    event.position[0],
                    event.position[1],
                    event.position[2],
                    event.elapsed
                );
            },
        )
        .await;

    if let Err(err) = started {
        error!("{err}");
        std::process::exit(1);
    }

    let Some(report) = controller.join().await else {
        error!("playback did not produce a report");
        std::process::exit(1);
    };

    info!(
        "Playback {} after {} ticks ({:.2} s)",
        if report.completed { "completed" } else { "stopped" },
        report.ticks,
        report.final_elapsed
    );

    println!("{}", report.render_table());

    if let Some(path) = &args.export {
        if let Err(err) = report.write_to_file(path) {
            error!("Failed to write report to {}: {err}", path.display());
            std::process::exit(1);
        }
        info!("Exported {} events to {}", report.events.len(), path.display());
    }
}
