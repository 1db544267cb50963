//! Monitor configuration and reference values.

use serde::{Deserialize, Serialize};

use crate::conflict::{ConflictDetector, ProximityModel};
use crate::error::MonitorError;
use crate::resolution::{ConflictResolver, SeparationPolicy};
use crate::sector::{reference_sectors, Sector, SectorDirectory};

/// Largest heap the monitor will allocate up front.
pub const MAX_HEAP_CAPACITY: usize = 1_000_000;

/// Configuration for an airspace monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Maximum number of aircraft held by the priority heap
    pub heap_capacity: usize,
    /// Sector boxes in classification order
    pub sectors: Vec<Sector>,
    /// Proximity predicate for same-sector pairs
    pub proximity: ProximityModel,
    /// Altitude change applied on conflict
    pub separation_offset: f64,
    pub separation_policy: SeparationPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            heap_capacity: 100,
            sectors: reference_sectors(),
            proximity: ProximityModel::default(),
            separation_offset: 1000.0,
            separation_policy: SeparationPolicy::ClimbBoth,
        }
    }
}

impl MonitorConfig {
    /// Parse a JSON document; missing fields take reference values.
    pub fn from_json_str(json: &str) -> Result<Self, MonitorError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MonitorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.heap_capacity > MAX_HEAP_CAPACITY {
            return Err(MonitorError::InvalidConfig(format!(
                "heap capacity {} exceeds the limit of {}",
                self.heap_capacity, MAX_HEAP_CAPACITY
            )));
        }
        self.proximity.validate()?;
        if !self.separation_offset.is_finite() {
            return Err(MonitorError::InvalidConfig(
                "separation offset must be finite".to_string(),
            ));
        }
        SectorDirectory::new(self.sectors.clone())?;
        Ok(())
    }

    pub fn detector(&self) -> Result<ConflictDetector, MonitorError> {
        let directory = SectorDirectory::new(self.sectors.clone())?;
        Ok(ConflictDetector::new(directory, self.proximity))
    }

    pub fn resolver(&self) -> ConflictResolver {
        ConflictResolver::new(self.separation_offset, self.separation_policy)
    }
}
