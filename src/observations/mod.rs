//! # Occurrence observations
//!
//! An [`Observation`] is one geotagged sighting of a tagged animal as read from the input
//! table: the source identifier, the species label, the position and the raw date string.
//!
//! Observations are **immutable** once parsed. The raw date is kept as written and only
//! turned into a [`Timestamp`](crate::time::Timestamp) by the track builder, so that a bad
//! date is reported against the track-building step, not the ingestion step.
//!
//! Ingestion lives in [`csv_reader`]; see [`csv_reader::read_observations`].
pub mod csv_reader;

use crate::constants::{Latitude, Longitude, OccurrenceId};

/// A single geotagged sighting.
///
/// # Fields
///
/// * `occurrence_id` - Source-assigned identifier, used for adjacency (not required contiguous)
/// * `species` - Species label, compared verbatim
/// * `longitude` - Degrees east
/// * `latitude` - Degrees north
/// * `date` - Raw ISO-8601 date string
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub occurrence_id: OccurrenceId,
    pub species: String,
    pub longitude: Longitude,
    pub latitude: Latitude,
    pub date: String,
}

impl Observation {
    pub fn new(
        occurrence_id: OccurrenceId,
        species: impl Into<String>,
        longitude: Longitude,
        latitude: Latitude,
        date: impl Into<String>,
    ) -> Self {
        Observation {
            occurrence_id,
            species: species.into(),
            longitude,
            latitude,
            date: date.into(),
        }
    }
}
