//! # Tracks: reconstruction, normalization and statistics
//!
//! A [`Track`] is the reconstructed movement path of one inferred individual. Tracks are
//! produced from an unordered observation stream by [`track_builder`], folded onto a single
//! calendar year by [`normalizer`], and summarized by [`display`] and [`TrackSetExt`].
//!
//! Modules
//! -----------------
//! * [`track_builder`] – Continuation rule and the fold that seals/opens tracks.
//! * [`normalizer`] – Rewrites every timestamp onto a synthetic year.
//! * [`display`] – Tabular rendering of a [`TrackSet`] (`comfy-table`).
//!
//! Data Model
//! -----------------
//! * **Track id:** sequential [`TrackId`], assigned at creation, starting at 0.
//! * **Points:** [`TrackPoints`] = `SmallVec<TrackPoint>`, strictly increasing in time.
//! * **Set:** [`TrackSet`] = `Vec<Track>` in creation order.
//!
//! Invariants
//! -----------------
//! * All points of a track share the track's species.
//! * Before normalization, all points of a track share the calendar year of the first point.
//! * Tracks are never merged or split once sealed.
use std::{collections::BTreeSet, fmt};

use crate::{
    constants::{DayOfYear, Latitude, Longitude, TrackId, TrackPoints},
    time::Timestamp,
};

pub mod display;
pub mod normalizer;
pub mod track_builder;

/// One dated position of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub timestamp: Timestamp,
    pub longitude: Longitude,
    pub latitude: Latitude,
}

impl TrackPoint {
    pub fn new(timestamp: Timestamp, longitude: Longitude, latitude: Latitude) -> Self {
        TrackPoint {
            timestamp,
            longitude,
            latitude,
        }
    }

    pub fn day_of_year(&self) -> DayOfYear {
        self.timestamp.day_of_year()
    }
}

/// Reconstructed path of one individual.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub species: String,
    pub points: TrackPoints,
}

impl Track {
    pub(crate) fn open(id: TrackId, species: String, first: TrackPoint) -> Self {
        let mut points = TrackPoints::new();
        points.push(first);
        Track {
            id,
            species,
            points,
        }
    }

    pub fn first(&self) -> &TrackPoint {
        &self.points[0]
    }

    pub fn last(&self) -> &TrackPoint {
        &self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// All reconstructed tracks, in creation order.
pub type TrackSet = Vec<Track>;

/// Distribution of the number of points per track.
///
/// Percentiles use the *nearest-rank* method: index `round(q × (N-1))`, clamped.
///
/// Display
/// -----------------
/// * `format!("{}", stats)` – compact single line,
/// * `format!("{:#}", stats)` – aligned multi-line block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCountStats {
    pub min: usize,
    pub p25: usize,
    pub median: usize,
    pub p95: usize,
    pub max: usize,
}

impl fmt::Display for PointCountStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Points per track - summary")?;
            writeln!(f, "--------------------------")?;
            writeln!(f, "min    : {}", self.min)?;
            writeln!(f, "p25    : {}", self.p25)?;
            writeln!(f, "median : {}", self.median)?;
            writeln!(f, "p95    : {}", self.p95)?;
            write!(f, "max    : {}", self.max)
        } else {
            write!(
                f,
                "min={}, p25={}, median={}, p95={}, max={}",
                self.min, self.p25, self.median, self.p95, self.max
            )
        }
    }
}

/// Aggregate queries over a [`TrackSet`].
pub trait TrackSetExt {
    /// Number of points across all tracks.
    fn total_points(&self) -> usize;

    /// Distinct species labels, sorted.
    fn species(&self) -> BTreeSet<&str>;

    /// Points-per-track distribution, `None` for an empty set.
    fn point_count_stats(&self) -> Option<PointCountStats>;
}

impl TrackSetExt for TrackSet {
    #[inline]
    fn total_points(&self) -> usize {
        self.iter().map(Track::len).sum()
    }

    fn species(&self) -> BTreeSet<&str> {
        self.iter().map(|t| t.species.as_str()).collect()
    }

    fn point_count_stats(&self) -> Option<PointCountStats> {
        let mut counts: Vec<usize> = self.iter().map(Track::len).collect();
        if counts.is_empty() {
            return None;
        }
        counts.sort_unstable();

        #[inline]
        fn q_index(n: usize, q: f64) -> usize {
            let pos = q * (n as f64 - 1.0);
            let idx = pos.round() as isize;
            idx.clamp(0, (n as isize) - 1) as usize
        }

        let n = counts.len();
        Some(PointCountStats {
            min: counts[0],
            p25: counts[q_index(n, 0.25)],
            median: counts[q_index(n, 0.50)],
            p95: counts[q_index(n, 0.95)],
            max: counts[n - 1],
        })
    }
}
