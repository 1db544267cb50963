//! Vertical separation applied to a conflicting pair.

use serde::{Deserialize, Serialize};

use crate::models::Aircraft;

/// How the separation offset is distributed over the pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationPolicy {
    /// Both aircraft climb by the offset.
    #[default]
    ClimbBoth,
    /// First aircraft climbs, second descends.
    Split,
}

/// Deterministic altitude-offset resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictResolver {
    pub offset: f64,
    pub policy: SeparationPolicy,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new(1000.0, SeparationPolicy::ClimbBoth)
    }
}

impl ConflictResolver {
    pub fn new(offset: f64, policy: SeparationPolicy) -> Self {
        Self { offset, policy }
    }

    /// Apply the separation offset. Only `altitude` changes.
    pub fn resolve(&self, mut a1: Aircraft, mut a2: Aircraft) -> (Aircraft, Aircraft) {
        match self.policy {
            SeparationPolicy::ClimbBoth => {
                a1.altitude += self.offset;
                a2.altitude += self.offset;
            }
            SeparationPolicy::Split => {
                a1.altitude += self.offset;
                a2.altitude -= self.offset;
            }
        }
        (a1, a2)
    }
}
