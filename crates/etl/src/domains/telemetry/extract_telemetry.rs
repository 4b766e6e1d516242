use mining_etl_core::{is_file, path_exists};
use std::{fs::File, io::Read};
use time::{macros::format_description, PrimitiveDateTime};

use crate::{cell_error, require_columns, EquipmentStatus, Error, SensorReading};

pub const TELEMETRY_COLUMNS: [&str; 4] =
    ["equipment_id", "timestamp", "status", "fuel_consumption"];

/// Reads the equipment sensor export at `path`.
pub fn load_telemetry(path: &str) -> Result<Vec<SensorReading>, Error> {
    if path.trim().is_empty() {
        return Err(Error::Config(String::from("telemetry path is not set")));
    }
    if !path_exists(path) {
        return Err(Error::FileNotFound(format!("the file at {} does not exist", path)));
    }
    if !is_file(path) {
        return Err(Error::FileNotFound(format!("{} is not a file", path)));
    }
    let file = File::open(path)?;
    read_telemetry(file)
}

/// Parses sensor CSV with a header row. Extra columns are ignored.
pub fn read_telemetry<R: Read>(reader: R) -> Result<Vec<SensorReading>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let found: Vec<&str> = headers.iter().collect();
    require_columns("telemetry", &found, &TELEMETRY_COLUMNS)?;
    let position = |column: &str| headers.iter().position(|h| h == column).unwrap_or_default();
    let (id_idx, ts_idx, status_idx, fuel_idx) = (
        position("equipment_id"),
        position("timestamp"),
        position("status"),
        position("fuel_consumption"),
    );

    let mut readings = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_number = row_idx + 2; // 1-based, after the header
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let fuel = field(fuel_idx);
        readings.push(SensorReading {
            equipment_id: field(id_idx).to_string(),
            timestamp: parse_timestamp(field(ts_idx))
                .map_err(|e| cell_error("timestamp", row_number, e))?,
            status: EquipmentStatus::from(field(status_idx)),
            fuel_consumption: if fuel.is_empty() {
                None
            } else {
                Some(
                    fuel.parse::<f64>()
                        .map_err(|e| cell_error("fuel_consumption", row_number, e))?,
                )
            },
        });
    }
    Ok(readings)
}

/// Accepts `YYYY-MM-DD HH:MM:SS` and ISO 8601 `YYYY-MM-DDTHH:MM:SS[.fff][Z]`.
pub fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    let normalized = value.trim().trim_end_matches('Z').replacen('T', " ", 1);
    let whole_seconds = normalized.split('.').next().unwrap_or_default();
    PrimitiveDateTime::parse(
        whole_seconds,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
}
