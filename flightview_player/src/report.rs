//! Collision report - the driver-retained history of one session.
//!
//! The core emits events and forgets them; whatever should outlive the tick
//! belongs here. Renders as a terminal table and exports as JSON.

use flightview_core::CollisionEvent;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Outcome of one playback run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackReport {
    /// Session this report belongs to
    pub session_id: Uuid,

    /// Ticks executed
    pub ticks: u64,

    /// Elapsed seconds at the last delivered frame
    pub final_elapsed: f64,

    /// True when every trajectory ran to completion (not cancelled)
    pub completed: bool,

    /// Proximity events in emission order
    pub events: Vec<CollisionEvent>,
}

impl PlaybackReport {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            ticks: 0,
            final_elapsed: 0.0,
            completed: false,
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, event: CollisionEvent) {
        self.events.push(event);
    }

    /// Formats the report as a fixed-width terminal table.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<28} {:<26} {:>8}", "Pair", "Coordinates", "Time (s)");
        let _ = writeln!(out, "{}", "-".repeat(64));

        if self.events.is_empty() {
            let _ = writeln!(out, "(no proximity events)");
            return out;
        }

        for event in &self.events {
            let pair = format!("{} & {}", event.first, event.second);
            let coord = format!(
                "({:.2}, {:.2}, {:.2})",
                event.position[0], event.position[1], event.position[2]
            );
            let _ = writeln!(out, "{:<28} {:<26} {:>8.2}", pair, coord, event.elapsed);
        }
        out
    }

    /// Writes the report to a JSON file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(elapsed: f64) -> CollisionEvent {
        CollisionEvent {
            first: "alpha".to_string(),
            second: "beta".to_string(),
            position: [1.0, 2.0, 3.0],
            elapsed,
        }
    }

    #[test]
    fn test_records_in_order() {
        let mut report = PlaybackReport::new(Uuid::new_v4());
        report.record(sample_event(1.0));
        report.record(sample_event(2.0));

        assert_eq!(report.events.len(), 2);
        assert!(report.events[0].elapsed < report.events[1].elapsed);
    }

    #[test]
    fn test_table_contains_pair_and_time() {
        let mut report = PlaybackReport::new(Uuid::new_v4());
        report.record(sample_event(2.5));

        let table = report.render_table();
        assert!(table.contains("alpha & beta"));
        assert!(table.contains("(1.00, 2.00, 3.00)"));
        assert!(table.contains("2.50"));
    }

    #[test]
    fn test_empty_table_mentions_no_events() {
        let report = PlaybackReport::new(Uuid::new_v4());
        assert!(report.render_table().contains("no proximity events"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut report = PlaybackReport::new(Uuid::new_v4());
        report.record(sample_event(4.0));
        report.completed = true;

        let json = serde_json::to_string(&report).unwrap();
        let back: PlaybackReport = serde_json::from_str(&json).unwrap();

        assert_eq!(back.session_id, report.session_id);
        assert!(back.completed);
        assert_eq!(back.events.len(), 1);
    }
}
