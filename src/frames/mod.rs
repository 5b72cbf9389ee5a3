//! # Animation frames
//!
//! Once tracks are normalized onto the synthetic year, only three things matter for drawing:
//! where a point is, which species it belongs to and on which day it was seen. This module
//! flattens a [`TrackSet`](crate::tracks::TrackSet) into such [`NormalizedPoint`]s and computes
//! the animated [`DayRange`].
//!
//! Frame construction (which points are visible on a given day, and how faded) lives in
//! [`projector`].
use std::ops::RangeInclusive;

use camino::Utf8Path;
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;
use tracing::info;

use crate::{
    constants::{DayOfYear, Latitude, Longitude, TrackId},
    migratrack_errors::MigratrackError,
    tracks::Track,
};

pub mod projector;

#[cfg(feature = "progress")]
pub(crate) mod progress_bar;

/// A track point reduced to what a frame needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPoint {
    pub track_id: TrackId,
    pub species: String,
    pub longitude: Longitude,
    pub latitude: Latitude,
    pub day: DayOfYear,
}

/// Flatten every point of every track, in track order then point order.
pub fn flatten_tracks(tracks: &[Track]) -> Vec<NormalizedPoint> {
    tracks
        .iter()
        .flat_map(|track| {
            track.points.iter().map(move |p| NormalizedPoint {
                track_id: track.id,
                species: track.species.clone(),
                longitude: p.longitude,
                latitude: p.latitude,
                day: p.day_of_year(),
            })
        })
        .collect()
}

/// Write `points` to a CSV file with a header row, one row per point.
pub fn write_points_csv(
    points: &[NormalizedPoint],
    path: &Utf8Path,
) -> Result<(), MigratrackError> {
    let io_err = |err: csv::Error| MigratrackError::IoError(err.into());

    let mut writer = csv::Writer::from_path(path).map_err(io_err)?;
    for point in points {
        writer.serialize(point).map_err(io_err)?;
    }
    writer.flush()?;
    info!(path = %path, rows = points.len(), "points written");
    Ok(())
}

/// Inclusive range of animated days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub first: DayOfYear,
    pub last: DayOfYear,
}

impl DayRange {
    /// Smallest and largest day over `points`.
    ///
    /// Return
    /// ----------
    /// * The range, or [`MigratrackError::EmptyDataset`] when `points` is empty.
    pub fn from_points(points: &[NormalizedPoint]) -> Result<Self, MigratrackError> {
        match points.iter().map(|p| p.day).minmax() {
            MinMaxResult::NoElements => Err(MigratrackError::EmptyDataset(
                "no point to animate".into(),
            )),
            MinMaxResult::OneElement(day) => Ok(DayRange {
                first: day,
                last: day,
            }),
            MinMaxResult::MinMax(first, last) => Ok(DayRange { first, last }),
        }
    }

    pub fn days(&self) -> RangeInclusive<DayOfYear> {
        self.first..=self.last
    }

    /// Number of frames, one per day.
    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    /// Always false: a range holds at least one day.
    pub fn is_empty(&self) -> bool {
        false
    }
}
