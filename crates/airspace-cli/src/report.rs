//! Fixed-width table output for monitor snapshots and sweep events.

use std::io::Write;

use airspace_core::{Aircraft, ConflictEvent, SweepObserver, SweepReport};

/// Render aircraft as a fixed-width table.
pub fn format_table(aircraft: &[Aircraft]) -> String {
    let mut out = format!(
        "| {:>6} | {:>10} | {:>11} | {:>10} | {:>8} | {:>10} | {:>11} | {:>7} |\n",
        "ID", "Latitude", "Longitude", "Altitude", "Speed", "Dest Lat", "Dest Lon", "Urgency"
    );
    for a in aircraft {
        out.push_str(&format!(
            "| {:>6} | {:>10.4} | {:>11.4} | {:>10.1} | {:>8.1} | {:>10.4} | {:>11.4} | {:>7.2} |\n",
            a.id,
            a.position.lat,
            a.position.lon,
            a.altitude,
            a.speed,
            a.destination.lat,
            a.destination.lon,
            a.urgency
        ));
    }
    out
}

pub fn format_event(event: &ConflictEvent) -> String {
    format!(
        "[step {}] Conflict between aircraft {} and aircraft {} in {} ({:.1} apart). \
         Resolved: aircraft {} at {:.1}, aircraft {} at {:.1}",
        event.step,
        event.conflict.aircraft1_id,
        event.conflict.aircraft2_id,
        event.conflict.sector,
        event.conflict.distance,
        event.conflict.aircraft1_id,
        event.altitude1_after,
        event.conflict.aircraft2_id,
        event.altitude2_after
    )
}

/// Sweep observer that prints each resolution and the final table.
pub struct TableObserver<W: Write> {
    out: W,
    show_snapshots: bool,
}

impl<W: Write> TableObserver<W> {
    pub fn new(out: W, show_snapshots: bool) -> Self {
        Self {
            out,
            show_snapshots,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            tracing::error!("Failed to write report: {}", e);
        }
    }
}

impl<W: Write> SweepObserver for TableObserver<W> {
    fn on_resolution(&mut self, event: &ConflictEvent, snapshot: &[Aircraft]) {
        let line = format_event(event);
        self.emit(&format!("{line}\n"));
        if self.show_snapshots {
            self.emit(&format_table(snapshot));
        }
    }

    fn on_pass_complete(&mut self, report: &SweepReport, snapshot: &[Aircraft]) {
        let mut summary = format!(
            "\nSweep complete: {} aircraft, {} pair(s) compared, {} conflict(s), {} unsectored pair(s)\n",
            report.population,
            report.steps,
            report.conflicts.len(),
            report.unsectored_pairs
        );
        if let Some(id) = report.unpaired {
            summary.push_str(&format!("Aircraft {id} was left unpaired this pass\n"));
        }
        summary.push_str("Current Aircraft in the System:\n");
        self.emit(&summary);
        self.emit(&format_table(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airspace_core::AirspaceMonitor;

    #[test]
    fn table_has_one_row_per_aircraft() {
        let aircraft = vec![
            Aircraft::new(1, 35.0, -115.0, 30000.0, 450.0, 40.0, -105.0),
            Aircraft::new(2, 45.0, -115.0, 31000.0, 460.0, 35.0, -105.0),
        ];
        let table = format_table(&aircraft);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("30000.0"));
    }

    #[test]
    fn observer_prints_resolution_and_summary() {
        let mut monitor = AirspaceMonitor::default();
        monitor
            .admit(Aircraft::new(1, 35.0, -115.0, 30000.0, 450.0, 40.0, -105.0))
            .unwrap();
        monitor
            .admit(Aircraft::new(2, 35.0, -115.0, 30000.0, 450.0, 40.0, -105.0))
            .unwrap();

        let mut observer = TableObserver::new(Vec::new(), false);
        monitor.sweep_with(&mut observer).unwrap();
        let text = String::from_utf8(observer.into_inner()).unwrap();

        assert!(text.contains("Sector 0"));
        assert!(text.contains("1 conflict(s)"));
        assert!(text.contains("31000.0"));
    }
}
