//! Aircraft sources: JSON feeds and field-by-field console entry.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use airspace_core::{Aircraft, AircraftRecord};
use anyhow::{anyhow, bail, Context, Result};

/// Load aircraft from a JSON array of records.
pub fn load_json_file(path: &Path) -> Result<Vec<Aircraft>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading aircraft feed {}", path.display()))?;
    parse_json_records(&json).with_context(|| format!("parsing aircraft feed {}", path.display()))
}

pub fn parse_json_records(json: &str) -> Result<Vec<Aircraft>> {
    let records: Vec<AircraftRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(|record| Aircraft::try_from(record).map_err(anyhow::Error::from))
        .collect()
}

/// Prompt for `count` aircraft on `output`, reading answers from `input`.
pub fn read_interactive<R, W>(input: &mut R, output: &mut W, count: usize) -> Result<Vec<Aircraft>>
where
    R: BufRead,
    W: Write,
{
    let mut aircraft = Vec::with_capacity(count);
    for n in 1..=count {
        writeln!(output, "Enter details for Aircraft {n}:")?;
        let id: u32 = prompt(input, output, "Aircraft ID")?;
        let lat: f64 = prompt(input, output, "Latitude")?;
        let lon: f64 = prompt(input, output, "Longitude")?;
        let altitude: f64 = prompt(input, output, "Altitude")?;
        let speed: f64 = prompt(input, output, "Speed")?;
        let dest_lat: f64 = prompt(input, output, "Destination Latitude")?;
        let dest_lon: f64 = prompt(input, output, "Destination Longitude")?;

        let record = AircraftRecord {
            id,
            lat,
            lon,
            altitude,
            speed,
            dest_lat,
            dest_lon,
            urgency: None,
        };
        aircraft.push(Aircraft::try_from(record)?);
    }
    Ok(aircraft)
}

fn prompt<T, R, W>(input: &mut R, output: &mut W, label: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input ended while reading {label}");
    }
    line.trim()
        .parse()
        .map_err(|e| anyhow!("malformed {label} '{}': {e}", line.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_aircraft_field_by_field() {
        let mut input = Cursor::new("7\n35.0\n-115.0\n30000\n450\n40.0\n-105.0\n");
        let mut output = Vec::new();

        let aircraft = read_interactive(&mut input, &mut output, 1).unwrap();

        assert_eq!(aircraft.len(), 1);
        assert_eq!(aircraft[0].id, 7);
        assert_eq!(aircraft[0].altitude, 30000.0);
        assert_eq!(aircraft[0].urgency, 0.0);
        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.contains("Destination Longitude: "));
    }

    #[test]
    fn rejects_non_numeric_field() {
        let mut input = Cursor::new("7\nnorth\n");
        let mut output = Vec::new();
        let err = read_interactive(&mut input, &mut output, 1).unwrap_err();
        assert!(err.to_string().contains("Latitude"));
    }

    #[test]
    fn rejects_truncated_input() {
        let mut input = Cursor::new("7\n35.0\n");
        let mut output = Vec::new();
        assert!(read_interactive(&mut input, &mut output, 1).is_err());
    }

    #[test]
    fn loads_demo_traffic_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/traffic.json");
        let aircraft = load_json_file(&path).unwrap();
        assert_eq!(aircraft.len(), 5);
        assert_eq!(aircraft[3].urgency, 0.0);
    }

    #[test]
    fn json_records_are_validated() {
        let json = r#"[{"id":1,"lat":95.0,"lon":-115.0,"altitude":1.0,"speed":1.0,"dest_lat":0.0,"dest_lon":0.0}]"#;
        assert!(parse_json_records(json).is_err());

        let json = r#"[{"id":1,"lat":35.0,"lon":-115.0,"altitude":1.0,"speed":1.0,"dest_lat":0.0,"dest_lon":0.0,"urgency":3.5}]"#;
        let aircraft = parse_json_records(json).unwrap();
        assert_eq!(aircraft[0].urgency, 3.5);
    }
}
