//! Airspace monitor core.
//!
//! Tracks aircraft in a bounded priority heap, partitions them into fixed
//! geographic sectors, detects same-sector proximity conflicts and resolves
//! them with a vertical separation offset.

pub mod conflict;
pub mod error;
pub mod models;
pub mod queue;
pub mod resolution;
pub mod rules;
pub mod sector;
pub mod spatial;
pub mod sweep;

pub use conflict::{Conflict, ConflictDetector, ProximityModel};
pub use error::MonitorError;
pub use models::{Aircraft, AircraftRecord, Position};
pub use queue::PriorityHeap;
pub use resolution::{ConflictResolver, SeparationPolicy};
pub use rules::{MonitorConfig, MAX_HEAP_CAPACITY};
pub use sector::{Sector, SectorDirectory, SectorId};
pub use spatial::{haversine_distance_km, planar_distance};
pub use sweep::{AirspaceMonitor, ConflictEvent, SweepObserver, SweepPass, SweepReport, SweepState};
