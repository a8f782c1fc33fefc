//! Record sources for the trip store
//!
//! This module defines the `TripSource` trait that every record source
//! implements, plus the CSV and in-memory sources.
//!
//! The CSV reader accepts the columns written by the fixture generator and by
//! full data exports. Required columns must be present. Precomputed money
//! columns and unknown extras are ignored; financials are always recomputed
//! from the cost model.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use trueprofit_core::error::{Result, TrueProfitError};
use trueprofit_core::types::RawTrip;

/// Columns every tabular source must carry
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "trip_id",
    "date",
    "platform",
    "trip_duration_minutes",
    "wait_time_minutes",
    "trip_distance_km",
    "gross_fare",
];

/// Trait for anything that can produce raw trips
///
/// Sources only parse and range-check rows. Deriving financials and checking
/// cross-row constraints such as unique ids is the store's job.
pub trait TripSource {
    /// Name used in error messages and logs
    fn name(&self) -> &str;

    /// Read every raw trip, in source order
    ///
    /// Either all rows load or an error is returned; there is no partial
    /// result.
    fn load_raw(&self) -> Result<Vec<RawTrip>>;
}

#[derive(Debug, Clone)]
enum CsvInput {
    Path(PathBuf),
    Buffer(Vec<u8>),
}

/// CSV file or in-memory CSV text
#[derive(Debug, Clone)]
pub struct CsvTripSource {
    name: String,
    input: CsvInput,
}

impl CsvTripSource {
    /// Read from a file; the file is opened when trips are loaded
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            input: CsvInput::Path(path),
        }
    }

    /// Buffer the contents of a reader
    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> Result<Self> {
        let name = name.into();
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|e| TrueProfitError::data_source(&name, e.to_string()))?;

        Ok(Self {
            name,
            input: CsvInput::Buffer(buffer),
        })
    }

    /// The file path, when reading from disk
    pub fn path(&self) -> Option<&Path> {
        match &self.input {
            CsvInput::Path(path) => Some(path),
            CsvInput::Buffer(_) => None,
        }
    }

    fn parse(&self, reader: impl Read) -> Result<Vec<RawTrip>> {
        let mut csv = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(false)
            .from_reader(reader);

        let headers = csv.headers().map_err(|e| self.error(e.to_string()))?.clone();
        self.check_columns(&headers)?;

        let mut trips = Vec::new();
        let mut record = StringRecord::new();
        while csv
            .read_record(&mut record)
            .map_err(|e| self.error(e.to_string()))?
        {
            let line = record.position().map_or(0, |p| p.line());
            let trip: RawTrip = record
                .deserialize(Some(&headers))
                .map_err(|e| self.error(format!("line {line}: {}", describe_row_error(&e))))?;
            trip.validate()
                .map_err(|e| self.error(format!("line {line}: {e}")))?;

            trace!("Parsed trip {} from line {}", trip.trip_id, line);
            trips.push(trip);
        }

        debug!("Read {} rows from {}", trips.len(), self.name);
        Ok(trips)
    }

    fn check_columns(&self, headers: &StringRecord) -> Result<()> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(self.error(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )))
        }
    }

    fn error(&self, detail: impl Into<String>) -> TrueProfitError {
        TrueProfitError::data_source(&self.name, detail)
    }
}

/// Strip the position prefix csv adds, since the line is reported separately
fn describe_row_error(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("field {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

impl TripSource for CsvTripSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_raw(&self) -> Result<Vec<RawTrip>> {
        match &self.input {
            CsvInput::Path(path) => {
                let file = std::fs::File::open(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => self.error("file not found"),
                    _ => self.error(e.to_string()),
                })?;
                self.parse(std::io::BufReader::new(file))
            }
            CsvInput::Buffer(bytes) => self.parse(bytes.as_slice()),
        }
    }
}

/// Trips already in memory
#[derive(Debug, Clone)]
pub struct MemoryTripSource {
    name: String,
    trips: Vec<RawTrip>,
}

impl MemoryTripSource {
    pub fn new(trips: Vec<RawTrip>) -> Self {
        Self::named("memory", trips)
    }

    pub fn named(name: impl Into<String>, trips: Vec<RawTrip>) -> Self {
        Self {
            name: name.into(),
            trips,
        }
    }
}

impl TripSource for MemoryTripSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_raw(&self) -> Result<Vec<RawTrip>> {
        for trip in &self.trips {
            trip.validate()
                .map_err(|e| TrueProfitError::data_source(&self.name, e))?;
        }
        Ok(self.trips.clone())
    }
}
