//! Run one monitor sweep over a traffic snapshot.
//!
//! Usage:
//!   cargo run -p airspace-cli --bin airspace-monitor -- --scenario converging
//!   cargo run -p airspace-cli --bin airspace-monitor -- --input traffic.json --json

use std::io::{self, Write};
use std::path::PathBuf;

use airspace_cli::config::{Config, Overrides};
use airspace_cli::input::{load_json_file, read_interactive};
use airspace_cli::report::format_table;
use airspace_cli::sim::{
    create_converging_scenario, create_random_scenario, create_split_sector_scenario,
};
use airspace_cli::TableObserver;
use airspace_core::{Aircraft, AirspaceMonitor, Sector, SweepReport};
use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenarioName {
    Converging,
    SplitSector,
    Random,
}

/// Sectorized airspace monitor: detect and resolve proximity conflicts
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["input", "interactive", "scenario"])
))]
struct Args {
    /// JSON file containing an array of aircraft records
    #[arg(long)]
    input: Option<PathBuf>,

    /// Enter aircraft field by field on the console
    #[arg(long)]
    interactive: bool,

    /// Number of aircraft to enter interactively
    #[arg(long, default_value_t = 2)]
    count: usize,

    /// Built-in traffic scenario
    #[arg(long, value_enum)]
    scenario: Option<ScenarioName>,

    /// Aircraft generated by the random scenario
    #[arg(long, default_value_t = 20)]
    random_count: usize,

    /// JSON monitor configuration (overrides AIRSPACE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Priority heap capacity
    #[arg(long)]
    capacity: Option<usize>,

    /// Great-circle proximity threshold in kilometers
    #[arg(long, conflicts_with = "planar")]
    proximity_km: Option<f64>,

    /// Use the planar distance + vertical separation model
    #[arg(long)]
    planar: bool,

    /// Altitude offset applied on conflict
    #[arg(long)]
    offset: Option<f64>,

    /// Climb the first aircraft and descend the second instead of climbing both
    #[arg(long)]
    split: bool,

    /// Print the sweep report and final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Print the full aircraft table after each resolution
    #[arg(long)]
    snapshots: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a SweepReport,
    aircraft: Vec<Aircraft>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("airspace_core=info".parse()?)
                .add_directive("airspace_monitor=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = Config::from_env_with(&args.overrides())?;
    tracing::debug!("Monitor configuration: {:?}", config.monitor);

    let sectors = config.monitor.sectors.clone();
    let mut monitor = AirspaceMonitor::new(config.monitor).context("building monitor")?;

    let aircraft = load_aircraft(&args, &sectors)?;
    let dropped = monitor.admit_all(aircraft);
    for (id, err) in &dropped {
        eprintln!("Aircraft {id} not admitted: {err}");
    }
    tracing::info!(
        "Admitted {} aircraft ({} dropped, capacity {})",
        monitor.len(),
        dropped.len(),
        monitor.capacity()
    );

    let stdout = io::stdout();
    if args.json {
        let report = monitor.sweep()?;
        let output = JsonOutput {
            report: &report,
            aircraft: monitor.snapshot(),
        };
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &output)?;
        writeln!(out)?;
        return Ok(());
    }

    {
        let mut out = stdout.lock();
        writeln!(out, "Current Aircraft in the System:")?;
        write!(out, "{}", format_table(&monitor.snapshot()))?;
        writeln!(out)?;
    }

    let mut observer = TableObserver::new(stdout.lock(), args.snapshots);
    monitor.sweep_with(&mut observer)?;
    observer.into_inner().flush()?;

    Ok(())
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            heap_capacity: self.capacity,
            proximity_km: self.proximity_km,
            planar: self.planar,
            separation_offset: self.offset,
            split: self.split,
        }
    }
}

fn load_aircraft(args: &Args, sectors: &[Sector]) -> Result<Vec<Aircraft>> {
    if let Some(path) = &args.input {
        return load_json_file(path);
    }

    match args.scenario {
        Some(ScenarioName::Converging) => Ok(create_converging_scenario().aircraft),
        Some(ScenarioName::SplitSector) => Ok(create_split_sector_scenario().aircraft),
        Some(ScenarioName::Random) => {
            let mut rng = rand::rng();
            Ok(create_random_scenario(args.random_count, sectors, &mut rng)?.aircraft)
        }
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            read_interactive(&mut input, &mut output, args.count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_traffic_source_is_required() {
        assert!(Args::try_parse_from(["airspace-monitor"]).is_err());
        assert!(Args::try_parse_from(["airspace-monitor", "--json"]).is_err());
        assert!(Args::try_parse_from(["airspace-monitor", "--interactive"]).is_ok());
    }

    #[test]
    fn traffic_sources_are_exclusive() {
        let result = Args::try_parse_from([
            "airspace-monitor",
            "--interactive",
            "--scenario",
            "converging",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_map_onto_config_overrides() {
        let args = Args::try_parse_from([
            "airspace-monitor",
            "--scenario",
            "random",
            "--capacity",
            "50",
            "--planar",
            "--split",
        ])
        .unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.heap_capacity, Some(50));
        assert!(overrides.planar);
        assert!(overrides.split);
        assert!(overrides.config_path.is_none());
    }
}
