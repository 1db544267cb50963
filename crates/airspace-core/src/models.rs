//! Core data models for the airspace monitor.

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn validate(&self, label: &str) -> Result<(), MonitorError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(MonitorError::MalformedRecord(format!(
                "{label} is not a finite coordinate ({}, {})",
                self.lat, self.lon
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(MonitorError::MalformedRecord(format!(
                "{label} latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(MonitorError::MalformedRecord(format!(
                "{label} longitude {} outside [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

/// An aircraft tracked by the monitor.
///
/// `speed` and `destination` are carried for reporting only; conflict logic
/// looks at `position` and `altitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Caller-assigned identifier. Uniqueness is not checked.
    pub id: u32,
    pub position: Position,
    pub altitude: f64,
    pub speed: f64,
    pub destination: Position,
    /// Higher urgency is served first.
    #[serde(default)]
    pub urgency: f64,
}

impl Aircraft {
    /// Create an aircraft from the source tuple with default urgency.
    pub fn new(
        id: u32,
        lat: f64,
        lon: f64,
        altitude: f64,
        speed: f64,
        dest_lat: f64,
        dest_lon: f64,
    ) -> Self {
        Self {
            id,
            position: Position::new(lat, lon),
            altitude,
            speed,
            destination: Position::new(dest_lat, dest_lon),
            urgency: 0.0,
        }
    }

    /// Set urgency.
    pub fn with_urgency(mut self, urgency: f64) -> Self {
        self.urgency = urgency;
        self
    }

    /// Check that every numeric field is usable by the monitor.
    pub fn validate(&self) -> Result<(), MonitorError> {
        self.position.validate("position")?;
        self.destination.validate("destination")?;
        for (label, value) in [
            ("altitude", self.altitude),
            ("speed", self.speed),
            ("urgency", self.urgency),
        ] {
            if !value.is_finite() {
                return Err(MonitorError::MalformedRecord(format!(
                    "aircraft {} has non-finite {label}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Flat aircraft record as delivered by an external source
/// (console input, JSON feed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftRecord {
    pub id: u32,
    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
    pub speed: f64,
    pub dest_lat: f64,
    pub dest_lon: f64,
    #[serde(default)]
    pub urgency: Option<f64>,
}

impl TryFrom<AircraftRecord> for Aircraft {
    type Error = MonitorError;

    fn try_from(record: AircraftRecord) -> Result<Self, Self::Error> {
        let aircraft = Aircraft::new(
            record.id,
            record.lat,
            record.lon,
            record.altitude,
            record.speed,
            record.dest_lat,
            record.dest_lon,
        )
        .with_urgency(record.urgency.unwrap_or(0.0));
        aircraft.validate()?;
        Ok(aircraft)
    }
}
