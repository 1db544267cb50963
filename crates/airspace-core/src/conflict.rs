//! Conflict detection for aircraft sharing a sector.
//!
//! A pair is in conflict when both aircraft classify into the same defined
//! sector and the configured proximity model reports a breach. Unsectored
//! aircraft never conflict with anything.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MonitorError;
use crate::models::Aircraft;
use crate::sector::{SectorDirectory, SectorId};
use crate::spatial::{planar_distance, position_distance_km};

/// Proximity predicate used once two aircraft share a sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ProximityModel {
    /// Great-circle surface distance, altitude ignored.
    GreatCircle {
        /// Breach when distance is strictly below this (kilometers)
        threshold_km: f64,
    },
    /// Flat Euclidean distance on raw coordinates plus vertical separation.
    Planar {
        /// Breach requires horizontal distance strictly below this
        distance_threshold: f64,
        /// ...and absolute altitude difference strictly below this
        vertical_threshold: f64,
    },
}

impl Default for ProximityModel {
    fn default() -> Self {
        ProximityModel::GreatCircle {
            threshold_km: 1000.0,
        }
    }
}

impl ProximityModel {
    /// Planar model with the reference 10.0 / 10.0 thresholds.
    pub fn planar() -> Self {
        ProximityModel::Planar {
            distance_threshold: 10.0,
            vertical_threshold: 10.0,
        }
    }

    /// Horizontal separation in the model's units.
    pub fn horizontal_separation(&self, a1: &Aircraft, a2: &Aircraft) -> f64 {
        match self {
            ProximityModel::GreatCircle { .. } => position_distance_km(&a1.position, &a2.position),
            ProximityModel::Planar { .. } => planar_distance(&a1.position, &a2.position),
        }
    }

    /// Whether the pair is too close under this model.
    pub fn breaches(&self, a1: &Aircraft, a2: &Aircraft) -> bool {
        let horizontal = self.horizontal_separation(a1, a2);
        match *self {
            ProximityModel::GreatCircle { threshold_km } => horizontal < threshold_km,
            ProximityModel::Planar {
                distance_threshold,
                vertical_threshold,
            } => {
                let vertical = (a1.altitude - a2.altitude).abs();
                horizontal < distance_threshold && vertical < vertical_threshold
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), MonitorError> {
        let thresholds = match *self {
            ProximityModel::GreatCircle { threshold_km } => vec![threshold_km],
            ProximityModel::Planar {
                distance_threshold,
                vertical_threshold,
            } => vec![distance_threshold, vertical_threshold],
        };
        if thresholds.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(MonitorError::InvalidConfig(format!(
                "proximity thresholds must be finite and non-negative: {self:?}"
            )));
        }
        Ok(())
    }
}

/// Detected conflict between two aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub aircraft1_id: u32,
    pub aircraft2_id: u32,
    pub sector: SectorId,
    /// Horizontal separation in the proximity model's units
    pub distance: f64,
    pub vertical_separation: f64,
}

/// Pairwise conflict detector.
///
/// Holds its own copy of the sector directory and proximity model; both are
/// fixed at construction.
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    directory: SectorDirectory,
    model: ProximityModel,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(SectorDirectory::default(), ProximityModel::default())
    }
}

impl ConflictDetector {
    pub fn new(directory: SectorDirectory, model: ProximityModel) -> Self {
        Self { directory, model }
    }

    pub fn directory(&self) -> &SectorDirectory {
        &self.directory
    }

    pub fn model(&self) -> &ProximityModel {
        &self.model
    }

    /// True iff the pair conflicts. Symmetric in its arguments.
    pub fn detect(&self, a1: &Aircraft, a2: &Aircraft) -> bool {
        self.evaluate(a1, a2).is_some()
    }

    /// Evaluate a pair and return conflict details on breach.
    pub fn evaluate(&self, a1: &Aircraft, a2: &Aircraft) -> Option<Conflict> {
        let sector1 = self.directory.classify(&a1.position);
        let sector2 = self.directory.classify(&a2.position);

        let sector = match (sector1, sector2) {
            (Some(s1), Some(s2)) if s1 == s2 => s1,
            (None, _) | (_, None) => {
                debug!(
                    "Aircraft {} / {} excluded from pairing (unsectored)",
                    a1.id, a2.id
                );
                return None;
            }
            _ => return None,
        };

        if !self.model.breaches(a1, a2) {
            return None;
        }

        Some(Conflict {
            aircraft1_id: a1.id,
            aircraft2_id: a2.id,
            sector,
            distance: self.model.horizontal_separation(a1, a2),
            vertical_separation: (a1.altitude - a2.altitude).abs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: u32, lat: f64, lon: f64, altitude: f64) -> Aircraft {
        Aircraft::new(id, lat, lon, altitude, 450.0, 0.0, 0.0)
    }

    #[test]
    fn test_conflict_when_colocated_in_sector() {
        let detector = ConflictDetector::default();
        let a = at(1, 35.0, -115.0, 30000.0);
        let b = at(2, 35.0, -115.0, 30000.0);

        let conflict = detector.evaluate(&a, &b).unwrap();
        assert_eq!(conflict.sector, SectorId(0));
        assert_eq!(conflict.distance, 0.0);
    }

    #[test]
    fn test_no_conflict_across_sectors() {
        let detector = ConflictDetector::default();
        let a = at(1, 35.0, -115.0, 30000.0);
        let b = at(2, 45.0, -115.0, 30000.0);
        assert!(!detector.detect(&a, &b));

        // ~91 km apart but on opposite sides of the -110 meridian
        let c = at(3, 35.0, -110.5, 30000.0);
        let d = at(4, 35.0, -109.5, 30000.0);
        assert!(!detector.detect(&c, &d));
    }

    #[test]
    fn test_unsectored_never_conflicts() {
        let detector = ConflictDetector::default();
        let a = at(1, 55.0, -115.0, 30000.0);
        let b = at(2, 55.0, -115.0, 30000.0);
        assert!(!detector.detect(&a, &b));

        let c = at(3, 35.0, -115.0, 30000.0);
        assert!(!detector.detect(&a, &c));
    }

    #[test]
    fn test_threshold_is_strict() {
        let a = at(1, 30.0, -120.0, 0.0);
        let b = at(2, 30.0, -110.0, 0.0);
        let distance = position_distance_km(&a.position, &b.position);

        let at_distance = ConflictDetector::new(
            SectorDirectory::default(),
            ProximityModel::GreatCircle { threshold_km: distance },
        );
        assert!(!at_distance.detect(&a, &b));

        let above = ConflictDetector::new(
            SectorDirectory::default(),
            ProximityModel::GreatCircle { threshold_km: distance + 1.0 },
        );
        assert!(above.detect(&a, &b));
    }

    #[test]
    fn test_detect_is_symmetric() {
        let detector = ConflictDetector::default();
        let pairs = [
            (at(1, 35.0, -115.0, 0.0), at(2, 36.0, -114.0, 0.0)),
            (at(3, 35.0, -115.0, 0.0), at(4, 45.0, -115.0, 0.0)),
            (at(5, 31.0, -119.0, 0.0), at(6, 39.5, -110.0, 0.0)),
            (at(7, 60.0, 10.0, 0.0), at(8, 35.0, -115.0, 0.0)),
        ];
        for (a, b) in &pairs {
            assert_eq!(detector.detect(a, b), detector.detect(b, a));
        }
    }

    #[test]
    fn test_planar_model_checks_vertical_separation() {
        let detector = ConflictDetector::new(
            SectorDirectory::default(),
            ProximityModel::Planar {
                distance_threshold: 10.0,
                vertical_threshold: 10.0,
            },
        );
        let a = at(1, 35.0, -115.0, 3000.0);
        let b = at(2, 35.0, -115.0, 3005.0);
        let c = at(3, 35.0, -115.0, 3500.0);

        let conflict = detector.evaluate(&a, &b).unwrap();
        assert_eq!(conflict.vertical_separation, 5.0);
        assert!(!detector.detect(&a, &c));
    }

    #[test]
    fn test_negative_threshold_is_invalid() {
        let model = ProximityModel::GreatCircle { threshold_km: -1.0 };
        assert!(model.validate().is_err());
    }
}
