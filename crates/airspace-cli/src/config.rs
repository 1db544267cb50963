//! Monitor configuration layers: JSON file, then `AIRSPACE_*` variables,
//! then command-line overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use airspace_core::{MonitorConfig, ProximityModel, SeparationPolicy};
use anyhow::{Context, Result};

/// Values supplied on the command line. Each one set wins over file and env.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces `AIRSPACE_CONFIG` as the file layer
    pub config_path: Option<PathBuf>,
    pub heap_capacity: Option<usize>,
    pub proximity_km: Option<f64>,
    /// Switch to the planar model, keeping planar thresholds already configured
    pub planar: bool,
    pub separation_offset: Option<f64>,
    pub split: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub monitor: MonitorConfig,
}

impl Config {
    /// Build the configuration from `AIRSPACE_*` variables.
    pub fn from_env() -> Result<Self> {
        Self::load(|key| env::var(key).ok(), &Overrides::default())
    }

    /// Build the configuration from process env plus command-line overrides.
    pub fn from_env_with(overrides: &Overrides) -> Result<Self> {
        Self::load(|key| env::var(key).ok(), overrides)
    }

    /// Resolve every layer using `lookup` for variables.
    ///
    /// `AIRSPACE_CONFIG` (or `overrides.config_path`) names a JSON file with a
    /// full or partial monitor configuration. `AIRSPACE_HEAP_CAPACITY`,
    /// `AIRSPACE_PROXIMITY_KM` and `AIRSPACE_SEPARATION_OFFSET` override the
    /// file; unparsable values are ignored. `overrides` are applied last.
    pub fn load<F>(lookup: F, overrides: &Overrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = overrides
            .config_path
            .clone()
            .or_else(|| lookup("AIRSPACE_CONFIG").map(PathBuf::from));
        let mut monitor = match path {
            Some(path) => load_monitor_config(&path)?,
            None => MonitorConfig::default(),
        };

        if let Some(capacity) = parse_var(&lookup, "AIRSPACE_HEAP_CAPACITY") {
            monitor.heap_capacity = capacity;
        }
        if let Some(threshold_km) = parse_var(&lookup, "AIRSPACE_PROXIMITY_KM") {
            monitor.proximity = ProximityModel::GreatCircle { threshold_km };
        }
        if let Some(offset) = parse_var(&lookup, "AIRSPACE_SEPARATION_OFFSET") {
            monitor.separation_offset = offset;
        }

        overrides.apply(&mut monitor);
        Ok(Self { monitor })
    }
}

impl Overrides {
    fn apply(&self, monitor: &mut MonitorConfig) {
        if let Some(capacity) = self.heap_capacity {
            monitor.heap_capacity = capacity;
        }
        if let Some(threshold_km) = self.proximity_km {
            monitor.proximity = ProximityModel::GreatCircle { threshold_km };
        }
        if self.planar && !matches!(monitor.proximity, ProximityModel::Planar { .. }) {
            monitor.proximity = ProximityModel::planar();
        }
        if let Some(offset) = self.separation_offset {
            monitor.separation_offset = offset;
        }
        if self.split {
            monitor.separation_policy = SeparationPolicy::Split;
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}

/// Read a JSON monitor configuration file.
pub fn load_monitor_config(path: &Path) -> Result<MonitorConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading monitor config {}", path.display()))?;
    MonitorConfig::from_json_str(&json)
        .with_context(|| format!("parsing monitor config {}", path.display()))
}
