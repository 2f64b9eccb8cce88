use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use chrono::{DateTime, FixedOffset, Utc};

use crate::engine::TankState;
use crate::model::{Command, DispenseRequest, RefillRequest, TankConfig, TankId};
use crate::Amount;

/// Errors that can occur when parsing csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized transaction type '{tx_type}'")]
    UnrecognizedType { line: usize, tx_type: String },

    #[error("line {line}: {tx_type} missing {field}")]
    MissingField {
        line: usize,
        tx_type: String,
        field: &'static str,
    },

    #[error("line {line}: invalid timestamp: {source}")]
    InvalidTimestamp {
        line: usize,
        source: chrono::ParseError,
    },

    #[error("line {line}: invalid utc offset {minutes} minutes")]
    InvalidOffset { line: usize, minutes: i32 },
}

#[derive(Debug, Deserialize)]
struct CommandRow {
    r#type: String,
    tank: String,
    vehicle: Option<String>,
    liters: Option<f64>,
    total_cost: Option<f64>,
    occurred_at: Option<String>,
    odometer: Option<u32>,
    receipt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TankRow {
    tank: String,
    capacity: f64,
    initial_level: f64,
    low_fuel_threshold: f64,
    utc_offset_minutes: i32,
}

#[derive(Debug, Serialize)]
struct TankStateRow {
    tank: String,
    level: String,
    capacity: String,
    fill_percent: String,
    low_fuel: bool,
}

fn require<T>(
    value: Option<T>,
    line: usize,
    tx_type: &str,
    field: &'static str,
) -> Result<T, CsvError> {
    value.ok_or_else(|| CsvError::MissingField {
        line,
        tx_type: tx_type.to_string(),
        field,
    })
}

fn parse_occurred_at(raw: &str, line: usize) -> Result<DateTime<Utc>, CsvError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| CsvError::InvalidTimestamp { line, source })
}

/// Drop empty optional cells so `,,` reads as absent rather than "".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Read engine commands from a csv file
pub fn read_commands(path: impl AsRef<Path>) -> impl Iterator<Item = Result<Command, CsvError>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .expect("failed to open csv file");

    reader
        .into_deserialize::<CommandRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let occurred_at = parse_occurred_at(
                &require(row.occurred_at, line, &row.r#type, "occurred_at")?,
                line,
            )?;
            match row.r#type.as_str() {
                "dispense" => {
                    let vehicle = require(non_empty(row.vehicle), line, "dispense", "vehicle")?;
                    let liters = require(row.liters, line, "dispense", "liters")?;
                    let total_cost = require(row.total_cost, line, "dispense", "total_cost")?;
                    Ok(Command::Dispense(DispenseRequest {
                        tank: row.tank,
                        vehicle,
                        volume: Amount::from_float(liters),
                        total_cost: Amount::from_float(total_cost),
                        occurred_at,
                        odometer: row.odometer,
                        receipt: non_empty(row.receipt),
                    }))
                }
                "refill" => {
                    let liters = require(row.liters, line, "refill", "liters")?;
                    let total_cost = require(row.total_cost, line, "refill", "total_cost")?;
                    Ok(Command::Refill(RefillRequest {
                        tank: row.tank,
                        volume: Amount::from_float(liters),
                        total_cost: Amount::from_float(total_cost),
                        occurred_at,
                        receipt: non_empty(row.receipt),
                    }))
                }
                other => Err(CsvError::UnrecognizedType {
                    line,
                    tx_type: other.to_string(),
                }),
            }
        })
}

/// Read tank configurations from a csv file
pub fn read_tanks(
    path: impl AsRef<Path>,
) -> impl Iterator<Item = Result<(TankId, TankConfig), CsvError>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .expect("failed to open csv file");

    reader
        .into_deserialize::<TankRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2;
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let time_zone = FixedOffset::east_opt(row.utc_offset_minutes * 60).ok_or(
                CsvError::InvalidOffset {
                    line,
                    minutes: row.utc_offset_minutes,
                },
            )?;
            let config = TankConfig {
                capacity: Amount::from_float(row.capacity),
                initial_level: Amount::from_float(row.initial_level),
                low_fuel_threshold_percent: row.low_fuel_threshold,
                time_zone,
                unit_cost_range: None,
            };
            Ok((row.tank, config))
        })
}

/// write tank states to stdout in csv format
pub fn write_tank_states(states: impl IntoIterator<Item = (TankId, TankState)>) {
    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());

    for (tank, state) in states {
        let row = TankStateRow {
            tank,
            level: state.level.to_string(),
            capacity: state.capacity.to_string(),
            fill_percent: format!("{:.1}", state.fill_percentage()),
            low_fuel: state.is_low_fuel(),
        };
        writer.serialize(&row).expect("failed to write csv row");
    }

    writer.flush().expect("failed to flush csv writer");
}
