//! # Frame projection
//!
//! For a simulated day `d` and a fade window `W`, a point seen on day `p` is **visible** when
//! `d - W <= p <= d`, with opacity
//!
//! ```text
//! alpha = max(0, 1 - (d - p) / W)
//! ```
//!
//! so a point is fully opaque on its own day, fades linearly, and is still part of the frame
//! (fully transparent) exactly `W` days later. It is gone from day `p + W + 1` on.
//!
//! Points are bucketed by day once in [`FrameProjector::new`]; a frame only visits the
//! `W + 1` buckets of its window instead of the whole point set. [`project_unindexed`] is the
//! direct filter over all points and yields identical frames.
//!
//! Frame layout
//! -----------------
//! A [`FrameState`] holds one [`SpeciesBatch`] per species present in the window, in sorted
//! species order. Inside a batch, points are ordered by day (oldest first) then by input order,
//! so the most recent sightings are drawn last.
use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{
    constants::{DayOfYear, Latitude, Longitude, CATEGORICAL_PALETTE, MAX_DAY_OF_YEAR},
    frames::{DayRange, NormalizedPoint},
    migratrack_errors::MigratrackError,
    palette::{Rgb, SpeciesPalette},
    time::day_label,
};

/// Opacity of a point `age_days` after its own day, for a window of `window_days`.
///
/// Returns 1.0 at age 0, 0.0 from age `window_days` on.
#[inline]
pub fn fade_alpha(age_days: u32, window_days: u32) -> f64 {
    (1.0 - f64::from(age_days) / f64::from(window_days)).max(0.0)
}

/// A visible point with its opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadedPoint {
    pub longitude: Longitude,
    pub latitude: Latitude,
    pub alpha: f64,
}

/// All visible points of one species, sharing one base color.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesBatch {
    pub species: String,
    pub color: Rgb,
    pub points: Vec<FadedPoint>,
}

/// Everything a renderer needs to draw one day.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub day: DayOfYear,
    pub date_label: String,
    pub batches: Vec<SpeciesBatch>,
}

impl FrameState {
    pub fn point_count(&self) -> usize {
        self.batches.iter().map(|b| b.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

fn color_of(palette: &SpeciesPalette, species: &str) -> Rgb {
    // Species unknown to the palette fall back to the first entry.
    palette
        .color(species)
        .unwrap_or_else(|| CATEGORICAL_PALETTE[0].into())
}

/// Group `(point, alpha)` pairs into per-species batches, preserving the pair order.
fn assemble<'p>(
    day: DayOfYear,
    synthetic_year: i32,
    palette: &SpeciesPalette,
    visible: impl Iterator<Item = (&'p NormalizedPoint, f64)>,
) -> FrameState {
    let mut by_species: BTreeMap<&str, Vec<FadedPoint>> = BTreeMap::new();
    for (point, alpha) in visible {
        by_species
            .entry(point.species.as_str())
            .or_default()
            .push(FadedPoint {
                longitude: point.longitude,
                latitude: point.latitude,
                alpha,
            });
    }

    FrameState {
        day,
        date_label: day_label(synthetic_year, day),
        batches: by_species
            .into_iter()
            .map(|(species, points)| SpeciesBatch {
                species: species.to_string(),
                color: color_of(palette, species),
                points,
            })
            .collect(),
    }
}

/// Day-bucketed frame builder over a borrowed point set.
pub struct FrameProjector<'a> {
    points: &'a [NormalizedPoint],
    buckets: Vec<Vec<usize>>,
    palette: &'a SpeciesPalette,
    fade_window_days: u32,
    synthetic_year: i32,
    range: DayRange,
}

impl<'a> FrameProjector<'a> {
    /// Index `points` by day.
    ///
    /// Arguments
    /// -----------------
    /// * `points` - Normalized points (see [`flatten_tracks`](crate::frames::flatten_tracks)).
    /// * `palette` - Species colors, computed once for the whole animation.
    /// * `fade_window_days` - Window `W`, at least 1.
    /// * `synthetic_year` - Year used for the date labels.
    ///
    /// Return
    /// ----------
    /// * The projector, [`MigratrackError::EmptyDataset`] for an empty point set, or
    ///   [`MigratrackError::InvalidParams`] for a zero window or a day outside `1..=366`.
    pub fn new(
        points: &'a [NormalizedPoint],
        palette: &'a SpeciesPalette,
        fade_window_days: u32,
        synthetic_year: i32,
    ) -> Result<Self, MigratrackError> {
        if fade_window_days == 0 {
            return Err(MigratrackError::InvalidParams(
                "fade_window_days must be >= 1".into(),
            ));
        }
        let range = DayRange::from_points(points)?;

        let mut buckets = vec![Vec::new(); MAX_DAY_OF_YEAR as usize + 1];
        for (idx, point) in points.iter().enumerate() {
            let bucket = buckets
                .get_mut(point.day as usize)
                .filter(|_| point.day >= 1)
                .ok_or_else(|| {
                    MigratrackError::InvalidParams(format!(
                        "day {} of track {} is outside 1..={MAX_DAY_OF_YEAR}",
                        point.day, point.track_id
                    ))
                })?;
            bucket.push(idx);
        }

        Ok(FrameProjector {
            points,
            buckets,
            palette,
            fade_window_days,
            synthetic_year,
            range,
        })
    }

    pub fn day_range(&self) -> DayRange {
        self.range
    }

    /// Frame for `day`. Any day is accepted; days outside the data range may be empty.
    pub fn project(&self, day: DayOfYear) -> FrameState {
        let lower = day.saturating_sub(self.fade_window_days);
        let upper = day.min(MAX_DAY_OF_YEAR);
        let visible = (lower..=upper).flat_map(|bucket_day| {
            self.buckets[bucket_day as usize].iter().map(move |&idx| {
                let point = &self.points[idx];
                (point, fade_alpha(day - point.day, self.fade_window_days))
            })
        });
        assemble(day, self.synthetic_year, self.palette, visible)
    }

    /// One frame per day of [`Self::day_range`], in day order.
    pub fn frames(&self) -> impl Iterator<Item = FrameState> + '_ {
        self.range.days().map(move |day| self.project(day))
    }
}

/// Frame for `day` by filtering the whole point set, without a day index.
pub fn project_unindexed(
    points: &[NormalizedPoint],
    palette: &SpeciesPalette,
    fade_window_days: u32,
    synthetic_year: i32,
    day: DayOfYear,
) -> FrameState {
    let visible = points
        .iter()
        .filter(|p| p.day <= day && day - p.day <= fade_window_days)
        .sorted_by_key(|p| p.day)
        .map(|p| (p, fade_alpha(day - p.day, fade_window_days)));
    assemble(day, synthetic_year, palette, visible)
}
