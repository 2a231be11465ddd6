//! Duration validation for the session control surface.
//!
//! A session start is refused entirely when any duration is bad; nothing is
//! silently coerced. Every offending entry is collected so the operator sees
//! the full list at once rather than one rejection per attempt.

use crate::trajectory::TrajectorySet;
use std::fmt;
use thiserror::Error;

/// Shortest playback duration a trajectory may be assigned, in seconds.
pub const MIN_DURATION_SECS: f64 = 2.0;

/// Duration assigned when the operator does not supply one.
pub const DEFAULT_DURATION_SECS: f64 = 10.0;

/// One rejected duration entry.
#[derive(Debug, Clone)]
pub struct DurationIssue {
    /// Name of the trajectory the duration was meant for
    pub trajectory: String,

    /// What was wrong with the supplied value
    pub detail: String,
}

impl fmt::Display for DurationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.trajectory, self.detail)
    }
}

/// Why a set of durations was refused.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("expected {expected} durations, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("rejected durations: {}", format_issues(.0))]
    Rejected(Vec<DurationIssue>),
}

fn format_issues(issues: &[DurationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks one duration per trajectory, each finite and at least
/// [`MIN_DURATION_SECS`].
pub fn validate_durations(set: &TrajectorySet, durations: &[f64]) -> Result<(), ValidationError> {
    if durations.len() != set.len() {
        return Err(ValidationError::CountMismatch {
            expected: set.len(),
            actual: durations.len(),
        });
    }

    let issues: Vec<DurationIssue> = set
        .iter()
        .zip(durations)
        .filter_map(|(trajectory, &duration)| {
            issue_for(duration).map(|detail| DurationIssue {
                trajectory: trajectory.name().to_string(),
                detail,
            })
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Rejected(issues))
    }
}

/// Parses operator-supplied duration strings, then validates them.
///
/// This is the string-typed surface the CLI feeds; parse failures are
/// reported alongside range failures, per entry.
pub fn parse_durations(set: &TrajectorySet, raw: &[String]) -> Result<Vec<f64>, ValidationError> {
    if raw.len() != set.len() {
        return Err(ValidationError::CountMismatch {
            expected: set.len(),
            actual: raw.len(),
        });
    }

    let mut durations = Vec::with_capacity(raw.len());
    let mut issues = Vec::new();

    for (trajectory, entry) in set.iter().zip(raw) {
        let entry = entry.trim();
        match entry.parse::<f64>() {
            Ok(value) => {
                if let Some(detail) = issue_for(value) {
                    issues.push(DurationIssue {
                        trajectory: trajectory.name().to_string(),
                        detail,
                    });
                }
                durations.push(value);
            }
            Err(_) => issues.push(DurationIssue {
                trajectory: trajectory.name().to_string(),
                detail: format!("'{entry}' is not a number"),
            }),
        }
    }

    if issues.is_empty() {
        Ok(durations)
    } else {
        Err(ValidationError::Rejected(issues))
    }
}

fn issue_for(duration: f64) -> Option<String> {
    if !duration.is_finite() {
        Some(format!("{duration} is not a finite number"))
    } else if duration < MIN_DURATION_SECS {
        Some(format!(
            "{duration} s is below the {MIN_DURATION_SECS} s minimum"
        ))
    } else {
        None
    }
}
