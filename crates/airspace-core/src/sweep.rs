//! Monitor sweep: pairwise extraction, detection, resolution and
//! re-admission over the aircraft held in the priority heap.
//!
//! A pass moves every compared pair into a swept buffer so each aircraft is
//! examined at most once. When fewer than two unexamined aircraft remain the
//! pass is drained and the swept aircraft go back into the heap, leaving the
//! population unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::conflict::{Conflict, ConflictDetector};
use crate::error::MonitorError;
use crate::models::Aircraft;
use crate::queue::PriorityHeap;
use crate::resolution::ConflictResolver;
use crate::rules::MonitorConfig;

/// Sweep state over the heap's unexamined population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepState {
    /// At least two aircraft remain unexamined
    Scanning,
    /// Terminal; fewer than two remain
    Drained,
}

/// A conflict found and resolved during a sweep step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictEvent {
    /// 1-based step number within the pass
    pub step: usize,
    #[serde(flatten)]
    pub conflict: Conflict,
    pub altitude1_after: f64,
    pub altitude2_after: f64,
    pub timestamp: DateTime<Utc>,
}

/// Summary of one sweep pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Aircraft held when the pass started
    pub population: usize,
    /// Pairs compared
    pub steps: usize,
    /// Compared pairs with at least one unsectored aircraft
    pub unsectored_pairs: usize,
    pub conflicts: Vec<ConflictEvent>,
    /// Aircraft left without a partner when the population is odd
    pub unpaired: Option<u32>,
}

/// Hooks for external reporting during a sweep.
///
/// Snapshots list every aircraft held by the monitor at that moment.
pub trait SweepObserver {
    fn on_resolution(&mut self, _event: &ConflictEvent, _snapshot: &[Aircraft]) {}

    fn on_pass_complete(&mut self, _report: &SweepReport, _snapshot: &[Aircraft]) {}
}

impl SweepObserver for () {}

/// One in-progress sweep over a heap.
///
/// Dropping an unfinished pass still returns swept aircraft to the heap.
pub struct SweepPass<'a> {
    heap: &'a mut PriorityHeap,
    detector: &'a ConflictDetector,
    resolver: &'a ConflictResolver,
    swept: Vec<Aircraft>,
    report: SweepReport,
}

impl<'a> SweepPass<'a> {
    pub fn new(
        heap: &'a mut PriorityHeap,
        detector: &'a ConflictDetector,
        resolver: &'a ConflictResolver,
    ) -> Self {
        let population = heap.size();
        Self {
            swept: Vec::with_capacity(population),
            heap,
            detector,
            resolver,
            report: SweepReport {
                started_at: Utc::now(),
                population,
                ..SweepReport::default()
            },
        }
    }

    pub fn state(&self) -> SweepState {
        if self.heap.size() >= 2 {
            SweepState::Scanning
        } else {
            SweepState::Drained
        }
    }

    /// Compare the two highest-priority unexamined aircraft.
    ///
    /// Returns the resolved conflict, if any. Fails with `EmptyQueue` once the
    /// pass is drained.
    pub fn step(&mut self) -> Result<Option<ConflictEvent>, MonitorError> {
        if self.state() == SweepState::Drained {
            return Err(MonitorError::EmptyQueue);
        }

        let mut a1 = self.heap.extract_max()?;
        let mut a2 = self.heap.extract_max()?;
        self.report.steps += 1;
        let step = self.report.steps;

        let directory = self.detector.directory();
        let sector1 = directory.classify(&a1.position);
        let sector2 = directory.classify(&a2.position);
        if sector1.is_none() || sector2.is_none() {
            self.report.unsectored_pairs += 1;
        }
        debug!(
            step,
            "Comparing aircraft {} ({:?}) with aircraft {} ({:?})",
            a1.id,
            sector1,
            a2.id,
            sector2
        );

        let event = match self.detector.evaluate(&a1, &a2) {
            Some(conflict) => {
                info!(
                    "Conflict detected between aircraft {} and aircraft {} in {} ({:.1} apart). Taking evasive action",
                    a1.id, a2.id, conflict.sector, conflict.distance
                );
                (a1, a2) = self.resolver.resolve(a1, a2);
                info!(
                    "Conflict resolved. Aircraft {} now at altitude {}, aircraft {} now at altitude {}",
                    a1.id, a1.altitude, a2.id, a2.altitude
                );
                let event = ConflictEvent {
                    step,
                    conflict,
                    altitude1_after: a1.altitude,
                    altitude2_after: a2.altitude,
                    timestamp: Utc::now(),
                };
                self.report.conflicts.push(event.clone());
                Some(event)
            }
            None => None,
        };

        self.swept.push(a1);
        self.swept.push(a2);
        Ok(event)
    }

    /// Every aircraft held: unexamined ones first, then swept ones.
    pub fn snapshot(&self) -> Vec<Aircraft> {
        self.heap.iter().chain(self.swept.iter()).cloned().collect()
    }

    /// Re-admit swept aircraft and return the pass summary.
    pub fn finish(mut self) -> Result<SweepReport, MonitorError> {
        self.report.unpaired = self.heap.peek_max().ok().map(|a| a.id);
        self.restore()?;
        let mut report = std::mem::take(&mut self.report);
        report.finished_at = Some(Utc::now());
        Ok(report)
    }

    fn restore(&mut self) -> Result<(), MonitorError> {
        for aircraft in self.swept.drain(..) {
            self.heap.insert(aircraft)?;
        }
        Ok(())
    }
}

impl Drop for SweepPass<'_> {
    fn drop(&mut self) {
        if self.swept.is_empty() {
            return;
        }
        if let Err(e) = self.restore() {
            warn!("Failed to restore swept aircraft: {}", e);
        }
    }
}

/// Airspace monitor: owns the heap, detector and resolver for one snapshot of
/// traffic.
#[derive(Debug, Clone)]
pub struct AirspaceMonitor {
    heap: PriorityHeap,
    detector: ConflictDetector,
    resolver: ConflictResolver,
}

impl Default for AirspaceMonitor {
    fn default() -> Self {
        Self {
            heap: PriorityHeap::new(MonitorConfig::default().heap_capacity),
            detector: ConflictDetector::default(),
            resolver: ConflictResolver::default(),
        }
    }
}

impl AirspaceMonitor {
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        Ok(Self {
            heap: PriorityHeap::new(config.heap_capacity),
            detector: config.detector()?,
            resolver: config.resolver(),
        })
    }

    /// Validate and insert an aircraft.
    ///
    /// A full heap drops the admission with `CapacityExceeded`.
    pub fn admit(&mut self, aircraft: Aircraft) -> Result<(), MonitorError> {
        aircraft.validate()?;
        let id = aircraft.id;
        match self.heap.insert(aircraft) {
            Ok(()) => {
                debug!("Aircraft {} added to the system", id);
                Ok(())
            }
            Err(e) => {
                warn!("Dropping aircraft {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Admit every aircraft, returning the ids that were dropped and why.
    pub fn admit_all<I>(&mut self, aircraft: I) -> Vec<(u32, MonitorError)>
    where
        I: IntoIterator<Item = Aircraft>,
    {
        aircraft
            .into_iter()
            .filter_map(|a| {
                let id = a.id;
                self.admit(a).err().map(|e| (id, e))
            })
            .collect()
    }

    /// Run one full sweep without reporting hooks.
    pub fn sweep(&mut self) -> Result<SweepReport, MonitorError> {
        self.sweep_with(&mut ())
    }

    /// Run one full sweep, notifying `observer` after each resolution and at
    /// pass end.
    pub fn sweep_with<O>(&mut self, observer: &mut O) -> Result<SweepReport, MonitorError>
    where
        O: SweepObserver + ?Sized,
    {
        let mut pass = SweepPass::new(&mut self.heap, &self.detector, &self.resolver);
        while pass.state() == SweepState::Scanning {
            if let Some(event) = pass.step()? {
                observer.on_resolution(&event, &pass.snapshot());
            }
        }
        let report = pass.finish()?;

        info!(
            "Sweep complete: {} aircraft, {} step(s), {} conflict(s)",
            report.population,
            report.steps,
            report.conflicts.len()
        );
        observer.on_pass_complete(&report, &self.snapshot());
        Ok(report)
    }

    /// Read-only copy of every held aircraft.
    pub fn snapshot(&self) -> Vec<Aircraft> {
        self.heap.iter().cloned().collect()
    }

    pub fn peek_next(&self) -> Result<&Aircraft, MonitorError> {
        self.heap.peek_max()
    }

    pub fn len(&self) -> usize {
        self.heap.size()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    pub fn detector(&self) -> &ConflictDetector {
        &self.detector
    }

    pub fn resolver(&self) -> &ConflictResolver {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aircraft(id: u32, lat: f64, lon: f64, urgency: f64) -> Aircraft {
        Aircraft::new(id, lat, lon, 30000.0, 450.0, 45.0, -105.0).with_urgency(urgency)
    }

    #[test]
    fn state_follows_unexamined_population() {
        let mut heap = PriorityHeap::new(4);
        let detector = ConflictDetector::default();
        let resolver = ConflictResolver::default();
        heap.insert(aircraft(1, 35.0, -115.0, 1.0)).unwrap();
        heap.insert(aircraft(2, 35.0, -115.0, 2.0)).unwrap();
        heap.insert(aircraft(3, 35.0, -115.0, 3.0)).unwrap();

        let mut pass = SweepPass::new(&mut heap, &detector, &resolver);
        assert_eq!(pass.state(), SweepState::Scanning);
        let event = pass.step().unwrap().unwrap();
        assert_eq!(event.conflict.aircraft1_id, 3);
        assert_eq!(event.conflict.aircraft2_id, 2);
        assert_eq!(pass.state(), SweepState::Drained);
        assert_eq!(pass.step().unwrap_err(), MonitorError::EmptyQueue);
        assert_eq!(pass.snapshot().len(), 3);

        let report = pass.finish().unwrap();
        assert_eq!(report.steps, 1);
        assert_eq!(report.unpaired, Some(1));
        assert!(report.finished_at.is_some());
        assert_eq!(heap.size(), 3);
    }

    #[test]
    fn dropped_pass_restores_swept_aircraft() {
        let mut heap = PriorityHeap::new(4);
        let detector = ConflictDetector::default();
        let resolver = ConflictResolver::default();
        for id in 0..4 {
            heap.insert(aircraft(id, 35.0, -115.0, id as f64)).unwrap();
        }

        {
            let mut pass = SweepPass::new(&mut heap, &detector, &resolver);
            pass.step().unwrap();
        }
        assert_eq!(heap.size(), 4);
    }

    #[test]
    fn admit_rejects_malformed_record() {
        let mut monitor = AirspaceMonitor::default();
        let err = monitor.admit(aircraft(1, 120.0, -115.0, 0.0)).unwrap_err();
        assert!(matches!(err, MonitorError::MalformedRecord(_)));
        assert!(monitor.is_empty());
    }

    #[test]
    fn admit_all_reports_dropped_admissions() {
        let config = MonitorConfig {
            heap_capacity: 2,
            ..MonitorConfig::default()
        };
        let mut monitor = AirspaceMonitor::new(config).unwrap();
        let dropped = monitor.admit_all((1..=4).map(|id| aircraft(id, 35.0, -115.0, 0.0)));

        assert_eq!(monitor.len(), 2);
        assert_eq!(
            dropped,
            vec![
                (3, MonitorError::CapacityExceeded { capacity: 2 }),
                (4, MonitorError::CapacityExceeded { capacity: 2 }),
            ]
        );
    }

    #[derive(Default)]
    struct Recorder {
        resolutions: Vec<(u32, u32, usize)>,
        final_population: Option<usize>,
    }

    impl SweepObserver for Recorder {
        fn on_resolution(&mut self, event: &ConflictEvent, snapshot: &[Aircraft]) {
            self.resolutions.push((
                event.conflict.aircraft1_id,
                event.conflict.aircraft2_id,
                snapshot.len(),
            ));
        }

        fn on_pass_complete(&mut self, _report: &SweepReport, snapshot: &[Aircraft]) {
            self.final_population = Some(snapshot.len());
        }
    }

    #[test]
    fn observer_sees_full_population() {
        let mut monitor = AirspaceMonitor::default();
        monitor.admit(aircraft(1, 35.0, -115.0, 4.0)).unwrap();
        monitor.admit(aircraft(2, 35.0, -115.0, 3.0)).unwrap();
        monitor.admit(aircraft(3, 45.0, -115.0, 2.0)).unwrap();
        monitor.admit(aircraft(4, 45.0, -115.0, 1.0)).unwrap();

        let mut recorder = Recorder::default();
        let report = monitor.sweep_with(&mut recorder).unwrap();

        assert_eq!(report.conflicts.len(), 2);
        assert_eq!(recorder.resolutions, vec![(1, 2, 4), (3, 4, 4)]);
        assert_eq!(recorder.final_population, Some(4));
    }
}
