//! Trajectory store - loading and holding recorded flight paths.
//!
//! A trajectory file is a JSON array of `{ "x": f, "y": f, "z": f }` records.
//! The trajectory name is derived from the file stem, so
//! `paths/drone_alpha.json` becomes `drone_alpha`. Loading a set of files is
//! all-or-nothing: one bad file fails the whole load and no partial set is
//! ever handed to a session.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A single sampled point as stored in trajectory files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<TrajectoryPoint> for Vector3<f64> {
    fn from(p: TrajectoryPoint) -> Self {
        Vector3::new(p.x, p.y, p.z)
    }
}

/// Why a set of sample points does not form a usable trajectory.
#[derive(Debug, Clone, Error)]
pub enum InvalidTrajectory {
    #[error("contains no samples")]
    Empty,

    #[error("sample {0} has a non-finite coordinate")]
    NonFinite(usize),
}

/// Errors raised while loading trajectory files.
///
/// Every variant carries the offending path; any one of them aborts the
/// whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid trajectory file", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: InvalidTrajectory,
    },
}

/// An immutable, ordered sequence of 3D samples for one agent.
#[derive(Debug, Clone)]
pub struct Trajectory {
    name: String,
    points: Vec<Vector3<f64>>,
}

impl Trajectory {
    /// Builds a trajectory from raw samples.
    ///
    /// Rejects empty sequences and non-finite coordinates; the x/y/z
    /// equal-length invariant holds by construction.
    pub fn from_points(
        name: impl Into<String>,
        points: Vec<Vector3<f64>>,
    ) -> Result<Self, InvalidTrajectory> {
        if points.is_empty() {
            return Err(InvalidTrajectory::Empty);
        }
        for (index, point) in points.iter().enumerate() {
            if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
                return Err(InvalidTrajectory::NonFinite(index));
            }
        }
        Ok(Self {
            name: name.into(),
            points,
        })
    }

    /// Reads one trajectory file, naming it after the file stem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<TrajectoryPoint> =
            serde_json::from_str(&raw).map_err(|source| LoadError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        let points = records.into_iter().map(Vector3::from).collect();
        Self::from_points(name_from_path(path), points).map_err(|source| LoadError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of samples; always at least 1.
    pub fn sample_count(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    /// Nearest-lower-index sampling by playback progress.
    ///
    /// Progress is clamped to `[0, 1]` and mapped to
    /// `floor(progress * (sample_count - 1))`, so progress 0 is the first
    /// sample and progress 1 the last. No interpolation between samples.
    pub fn sample(&self, progress: f64) -> (usize, Vector3<f64>) {
        let clamped = progress.clamp(0.0, 1.0);
        let index = (clamped * (self.points.len() - 1) as f64) as usize;
        let index = index.min(self.points.len() - 1);
        (index, self.points[index])
    }
}

/// The set of trajectories loaded for one playback session.
#[derive(Debug, Clone)]
pub struct TrajectorySet {
    trajectories: Vec<Trajectory>,
}

impl TrajectorySet {
    pub fn new(trajectories: Vec<Trajectory>) -> Self {
        Self { trajectories }
    }

    /// Loads every path in order; the first failure aborts the whole load.
    pub fn load<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self, LoadError> {
        let trajectories = paths
            .into_iter()
            .map(Trajectory::from_file)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { trajectories })
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trajectory> {
        self.trajectories.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }
}

impl IntoIterator for TrajectorySet {
    type Item = Trajectory;
    type IntoIter = std::vec::IntoIter<Trajectory>;

    fn into_iter(self) -> Self::IntoIter {
        self.trajectories.into_iter()
    }
}

fn name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let unique = FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "flightview_{}_{}_{}.json",
            std::process::id(),
            unique,
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_single_file() {
        let path = write_temp(
            "alpha",
            r#"[{"x": 0.0, "y": 1.0, "z": 2.0}, {"x": 3.0, "y": 4.0, "z": 5.0}]"#,
        );
        let trajectory = Trajectory::from_file(&path).unwrap();

        assert_eq!(trajectory.sample_count(), 2);
        assert_relative_eq!(trajectory.points()[1].x, 3.0);
        assert_relative_eq!(trajectory.points()[1].z, 5.0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_name_is_file_stem() {
        let path = write_temp("named", r#"[{"x": 0, "y": 0, "z": 0}]"#);
        let trajectory = Trajectory::from_file(&path).unwrap();
        let expected = path.file_stem().unwrap().to_string_lossy();

        assert_eq!(trajectory.name(), expected);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let path = write_temp("missing", r#"[{"x": 0.0, "y": 0.0}]"#);
        let result = Trajectory::from_file(&path);

        assert!(matches!(result, Err(LoadError::Malformed { .. })));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_empty_file_rejected() {
        let path = write_temp("empty", "[]");
        let result = Trajectory::from_file(&path);

        assert!(matches!(
            result,
            Err(LoadError::Invalid {
                source: InvalidTrajectory::Empty,
                ..
            })
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Trajectory::from_file("/nonexistent/flightview/trajectory.json");
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let points = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(f64::NAN, 0.0, 0.0)];
        let result = Trajectory::from_points("bad", points);

        assert!(matches!(result, Err(InvalidTrajectory::NonFinite(1))));
    }

    #[test]
    fn test_set_load_is_all_or_nothing() {
        let good = write_temp("good", r#"[{"x": 1, "y": 2, "z": 3}]"#);
        let bad = write_temp("bad", "not json");

        let result = TrajectorySet::load([&good, &bad]);
        assert!(result.is_err());

        let result = TrajectorySet::load([&good]);
        assert_eq!(result.unwrap().len(), 1);

        std::fs::remove_file(good).ok();
        std::fs::remove_file(bad).ok();
    }

    #[test]
    fn test_sample_clamps_both_ends() {
        let points = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
        ];
        let trajectory = Trajectory::from_points("clamp", points).unwrap();

        assert_eq!(trajectory.sample(-0.5).0, 0);
        assert_eq!(trajectory.sample(0.0).0, 0);
        assert_eq!(trajectory.sample(0.49).0, 0);
        assert_eq!(trajectory.sample(0.5).0, 1);
        assert_eq!(trajectory.sample(1.0).0, 2);
        assert_eq!(trajectory.sample(7.0).0, 2);
    }

    #[test]
    fn test_sample_single_point() {
        let trajectory =
            Trajectory::from_points("still", vec![Vector3::new(9.0, 9.0, 9.0)]).unwrap();

        let (index, position) = trajectory.sample(0.7);
        assert_eq!(index, 0);
        assert_relative_eq!(position.x, 9.0);
    }
}
