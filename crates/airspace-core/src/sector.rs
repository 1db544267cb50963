//! Fixed sector partitioning of the monitored airspace.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MonitorError;
use crate::models::Position;

/// Index of a sector in its directory's configured order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorId(pub usize);

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sector {}", self.0)
    }
}

/// Axis-aligned lat/lon bounding box. All four edges are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    #[serde(default)]
    pub name: String,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Sector {
    pub fn new(name: impl Into<String>, lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            name: name.into(),
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.lat >= self.lat_min
            && position.lat <= self.lat_max
            && position.lon >= self.lon_min
            && position.lon <= self.lon_max
    }

    fn validate(&self) -> Result<(), MonitorError> {
        let bounds = [self.lat_min, self.lat_max, self.lon_min, self.lon_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(MonitorError::InvalidConfig(format!(
                "sector '{}' has non-finite bounds",
                self.name
            )));
        }
        if self.lat_min > self.lat_max || self.lon_min > self.lon_max {
            return Err(MonitorError::InvalidConfig(format!(
                "sector '{}' has inverted bounds",
                self.name
            )));
        }
        Ok(())
    }
}

/// Three boxes over a North American quadrant.
pub fn reference_sectors() -> Vec<Sector> {
    vec![
        Sector::new("Southwest", 30.0, 40.0, -120.0, -110.0),
        Sector::new("South Central", 30.0, 40.0, -110.0, -100.0),
        Sector::new("North", 40.0, 50.0, -120.0, -100.0),
    ]
}

/// Immutable, ordered collection of sectors.
#[derive(Debug, Clone)]
pub struct SectorDirectory {
    sectors: Vec<Sector>,
}

impl SectorDirectory {
    pub fn new(sectors: Vec<Sector>) -> Result<Self, MonitorError> {
        for sector in &sectors {
            sector.validate()?;
        }
        Ok(Self { sectors })
    }

    /// Find the sector containing `position`.
    ///
    /// Overlapping sectors resolve to the first one in configured order.
    /// `None` means the position is unsectored.
    pub fn classify(&self, position: &Position) -> Option<SectorId> {
        self.sectors
            .iter()
            .position(|sector| sector.contains(position))
            .map(SectorId)
    }

    pub fn get(&self, id: SectorId) -> Option<&Sector> {
        self.sectors.get(id.0)
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

impl Default for SectorDirectory {
    fn default() -> Self {
        Self {
            sectors: reference_sectors(),
        }
    }
}
