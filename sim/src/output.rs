//! Aircraft lists on disk: a JSON array of [`AircraftRecord`]s.

use crate::aircraft::AircraftRecord;
use crate::scenario::Scenario;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Run `scenario` to completion and write its aircraft as pretty JSON.
pub fn write_aircraft<W: Write>(scenario: &dyn Scenario, writer: W) -> anyhow::Result<usize> {
    let aircraft = scenario.collect_aircraft()?;
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &aircraft)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(aircraft.len())
}

/// Save an aircraft list to a JSON file.
pub fn save_aircraft(aircraft: &[AircraftRecord], path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, aircraft)?;
    Ok(())
}

/// Load an aircraft list from a JSON file.
pub fn load_aircraft(path: &Path) -> anyhow::Result<Vec<AircraftRecord>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let aircraft: Vec<AircraftRecord> = serde_json::from_reader(reader)?;
    Ok(aircraft)
}
