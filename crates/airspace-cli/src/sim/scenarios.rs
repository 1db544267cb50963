//! Pre-defined traffic snapshots for exercising the monitor.

use airspace_core::{Aircraft, Sector};
use anyhow::{Context, Result};
use rand::Rng;

const CRUISE_ALTITUDE: f64 = 30_000.0;
const CRUISE_SPEED: f64 = 450.0;
const ALTITUDE_JITTER: f64 = 4_000.0;
const MAX_URGENCY: u32 = 10;

/// A named traffic snapshot.
pub struct Scenario {
    pub name: String,
    pub aircraft: Vec<Aircraft>,
}

/// Four aircraft stacked over the same point in the southwest sector,
/// plus one well north of it.
///
/// Every pair drawn from the stacked group conflicts.
pub fn create_converging_scenario() -> Scenario {
    let mut aircraft: Vec<Aircraft> = (1..=4)
        .map(|id| {
            Aircraft::new(id, 35.0, -115.0, CRUISE_ALTITUDE, CRUISE_SPEED, 40.0, -105.0)
                .with_urgency(f64::from(5 - id))
        })
        .collect();
    aircraft.push(Aircraft::new(5, 45.0, -115.0, CRUISE_ALTITUDE, CRUISE_SPEED, 35.0, -105.0));

    Scenario {
        name: "converging".to_string(),
        aircraft,
    }
}

/// Pairs that are close but straddle sector edges, so nothing conflicts.
pub fn create_split_sector_scenario() -> Scenario {
    let aircraft = vec![
        // ~91 km apart across the -110 meridian
        Aircraft::new(1, 35.0, -110.5, CRUISE_ALTITUDE, CRUISE_SPEED, 35.0, -100.0).with_urgency(2.0),
        Aircraft::new(2, 35.0, -109.5, CRUISE_ALTITUDE, CRUISE_SPEED, 35.0, -120.0).with_urgency(2.0),
        // ~111 km apart across the 40th parallel
        Aircraft::new(3, 39.5, -115.0, CRUISE_ALTITUDE, CRUISE_SPEED, 45.0, -115.0).with_urgency(1.0),
        Aircraft::new(4, 40.5, -115.0, CRUISE_ALTITUDE, CRUISE_SPEED, 35.0, -115.0).with_urgency(1.0),
    ];

    Scenario {
        name: "split-sector".to_string(),
        aircraft,
    }
}

/// Random traffic placed inside the given sectors.
///
/// Ids run from 1, so `count` must fit an aircraft id. Returns an empty
/// scenario when there are no sectors.
pub fn create_random_scenario<R: Rng + ?Sized>(
    count: usize,
    sectors: &[Sector],
    rng: &mut R,
) -> Result<Scenario> {
    let last_id = u32::try_from(count)
        .with_context(|| format!("random scenario size {count} exceeds the aircraft id range"))?;
    let aircraft = if sectors.is_empty() {
        Vec::new()
    } else {
        (1..=last_id)
            .map(|id| random_aircraft(id, sectors, rng))
            .collect()
    };

    Ok(Scenario {
        name: "random".to_string(),
        aircraft,
    })
}

fn random_aircraft<R: Rng + ?Sized>(id: u32, sectors: &[Sector], rng: &mut R) -> Aircraft {
    let origin = &sectors[rng.random_range(0..sectors.len())];
    let destination = &sectors[rng.random_range(0..sectors.len())];
    let (lat, lon) = random_point_in(origin, rng);
    let (dest_lat, dest_lon) = random_point_in(destination, rng);
    let altitude = CRUISE_ALTITUDE + rng.random_range(-ALTITUDE_JITTER..=ALTITUDE_JITTER);

    Aircraft::new(id, lat, lon, altitude, CRUISE_SPEED, dest_lat, dest_lon)
        .with_urgency(f64::from(rng.random_range(0..=MAX_URGENCY)))
}

fn random_point_in<R: Rng + ?Sized>(sector: &Sector, rng: &mut R) -> (f64, f64) {
    (
        rng.random_range(sector.lat_min..=sector.lat_max),
        rng.random_range(sector.lon_min..=sector.lon_max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use airspace_core::{AirspaceMonitor, SectorDirectory};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_converging_scenario_conflicts() {
        let scenario = create_converging_scenario();
        let mut monitor = AirspaceMonitor::default();
        assert!(monitor.admit_all(scenario.aircraft).is_empty());

        let report = monitor.sweep().unwrap();
        assert_eq!(report.conflicts.len(), 2);
        assert_eq!(report.unpaired, Some(5));
    }

    #[test]
    fn test_split_sector_scenario_has_no_conflicts() {
        let scenario = create_split_sector_scenario();
        let mut monitor = AirspaceMonitor::default();
        monitor.admit_all(scenario.aircraft);

        let report = monitor.sweep().unwrap();
        assert_eq!(report.steps, 2);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn test_random_aircraft_stay_inside_sectors() {
        let directory = SectorDirectory::default();
        let mut rng = StdRng::seed_from_u64(42);
        let scenario = create_random_scenario(50, directory.sectors(), &mut rng).unwrap();

        assert_eq!(scenario.aircraft.len(), 50);
        for aircraft in &scenario.aircraft {
            assert!(aircraft.validate().is_ok());
            assert!(directory.classify(&aircraft.position).is_some());
        }
    }

    #[test]
    fn test_random_without_sectors_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(create_random_scenario(5, &[], &mut rng).unwrap().aircraft.is_empty());
    }

    #[test]
    fn test_random_count_beyond_id_range_is_rejected() {
        let directory = SectorDirectory::default();
        let mut rng = StdRng::seed_from_u64(7);
        let count = u32::MAX as usize + 1;
        let err = create_random_scenario(count, directory.sectors(), &mut rng).err().unwrap();
        assert!(err.to_string().contains("aircraft id range"));
    }
}
