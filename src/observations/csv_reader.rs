//! # Delimited occurrence table reader
//!
//! Reads a header-led delimited file (comma by default) into [`Observation`]s.
//!
//! ## Columns
//! -----------------
//! Looked up **by name** in the header row; order and extra columns do not matter.
//!
//! | column         | parsed as            |
//! |----------------|----------------------|
//! | `occurrenceID` | integer (`i64`)      |
//! | `species`      | verbatim string      |
//! | `longitude`    | `f64` degrees        |
//! | `latitude`     | `f64` degrees        |
//! | `date`         | kept as raw string   |
//!
//! When a column name appears more than once, the last occurrence wins.
//!
//! ## Row policy
//! -----------------
//! * A row whose `longitude` or `latitude` cell is empty (or absent because the row is short)
//!   is **dropped silently**.
//! * Any other problem on a kept row (missing cell, non-integer id, non-numeric coordinate)
//!   aborts the whole read with [`MigratrackError::MalformedRecord`]. There is no per-row skip.
//! * A missing required column aborts before any row is read.
//! * A file without a header row yields no observations.
//!
//! ## Error Handling
//! -----------------
//! * [`MigratrackError::MissingSource`] – the input path does not exist.
//! * [`MigratrackError::MalformedRecord`] – header or row level failure, with the 1-based line.
//! * [`MigratrackError::IoError`] – any other I/O failure while opening the file.
use std::{
    fs::File,
    io::{ErrorKind, Read},
};

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::{migratrack_errors::MigratrackError, observations::Observation};

pub const OCCURRENCE_ID_COLUMN: &str = "occurrenceID";
pub const SPECIES_COLUMN: &str = "species";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const LATITUDE_COLUMN: &str = "latitude";
pub const DATE_COLUMN: &str = "date";

/// Default field delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';

fn malformed(line: u64, detail: impl Into<String>) -> MigratrackError {
    MigratrackError::MalformedRecord {
        line,
        detail: detail.into(),
    }
}

impl From<csv::Error> for MigratrackError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        malformed(line, err.to_string())
    }
}

/// Positions of the required columns in a record.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnIndex {
    occurrence_id: usize,
    species: usize,
    longitude: usize,
    latitude: usize,
    date: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, MigratrackError> {
        let find = |name: &str| {
            headers
                .as_byte_record()
                .iter()
                .rposition(|h| h == name.as_bytes())
                .ok_or_else(|| malformed(1, format!("missing column {name:?}")))
        };

        Ok(ColumnIndex {
            occurrence_id: find(OCCURRENCE_ID_COLUMN)?,
            species: find(SPECIES_COLUMN)?,
            longitude: find(LONGITUDE_COLUMN)?,
            latitude: find(LATITUDE_COLUMN)?,
            date: find(DATE_COLUMN)?,
        })
    }
}

fn required<'r>(
    record: &'r StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str, MigratrackError> {
    record
        .get(index)
        .ok_or_else(|| malformed(line, format!("row has no {name:?} cell")))
}

fn parse_coordinate(raw: &str, name: &str, line: u64) -> Result<f64, MigratrackError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| malformed(line, format!("{name} {raw:?} is not a number")))
}

/// Parse one data row, `Ok(None)` when the row has no usable position.
fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndex,
) -> Result<Option<Observation>, MigratrackError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    let longitude = record.get(columns.longitude).filter(|s| !s.is_empty());
    let latitude = record.get(columns.latitude).filter(|s| !s.is_empty());
    let (Some(longitude), Some(latitude)) = (longitude, latitude) else {
        return Ok(None);
    };

    let raw_id = required(record, columns.occurrence_id, OCCURRENCE_ID_COLUMN, line)?;
    let occurrence_id = raw_id.trim().parse::<i64>().map_err(|_| {
        malformed(
            line,
            format!("{OCCURRENCE_ID_COLUMN} {raw_id:?} is not an integer"),
        )
    })?;

    let species = required(record, columns.species, SPECIES_COLUMN, line)?;
    let date = required(record, columns.date, DATE_COLUMN, line)?;

    Ok(Some(Observation {
        occurrence_id,
        species: species.to_string(),
        longitude: parse_coordinate(longitude, LONGITUDE_COLUMN, line)?,
        latitude: parse_coordinate(latitude, LATITUDE_COLUMN, line)?,
        date: date.to_string(),
    }))
}

/// Read observations from any byte source.
///
/// Arguments
/// -----------------
/// * `source` - Delimited text with a header row.
/// * `delimiter` - Field separator (e.g. [`DEFAULT_DELIMITER`]).
///
/// Return
/// ----------
/// * The kept observations in file order, or the first fatal [`MigratrackError`].
pub fn observations_from_reader<R: Read>(
    source: R,
    delimiter: u8,
) -> Result<Vec<Observation>, MigratrackError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(b'"')
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        debug!("input has no header row");
        return Ok(Vec::new());
    }
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut observations = Vec::new();
    let mut dropped = 0usize;
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        match parse_record(&record, &columns)? {
            Some(obs) => observations.push(obs),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, "dropped rows without longitude/latitude");
    }
    Ok(observations)
}

/// Open `path` and read every observation it contains.
///
/// The file handle is closed before this function returns.
///
/// See also
/// ------------
/// * [`observations_from_reader`] – Same parser over an arbitrary reader.
pub fn read_observations(
    path: &Utf8Path,
    delimiter: u8,
) -> Result<Vec<Observation>, MigratrackError> {
    let file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => MigratrackError::MissingSource(path.to_string()),
        _ => MigratrackError::IoError(err),
    })?;

    let observations = observations_from_reader(file, delimiter)?;
    info!(path = %path, rows = observations.len(), "read observations");
    Ok(observations)
}
