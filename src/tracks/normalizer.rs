//! # Temporal normalization
//!
//! Folds every track onto one **synthetic calendar year** so that day-of-year becomes a
//! shared animation axis across individuals and source years.
//!
//! Month, day, time of day (down to the nanosecond) and UTC offset are preserved; only the
//! year changes. Because every point of a track already shares one source year, rewriting
//! the year never inverts the order of a track's points.
//!
//! The operation is pure and idempotent for a given synthetic year.
use chrono::Datelike;
use tracing::debug;

use crate::{
    migratrack_errors::MigratrackError,
    tracks::{Track, TrackSet},
};

fn normalize_track(track: &Track, synthetic_year: i32) -> Result<Track, MigratrackError> {
    let mut normalized = track.clone();
    for point in normalized.points.iter_mut() {
        let local = point.timestamp.local();
        point.timestamp = point.timestamp.with_year(synthetic_year).ok_or(
            MigratrackError::InvalidSyntheticDate {
                year: synthetic_year,
                month: local.month(),
                day: local.day(),
            },
        )?;
    }
    Ok(normalized)
}

/// Rewrite every timestamp of `tracks` onto `synthetic_year`.
///
/// Arguments
/// -----------------
/// * `tracks` - Tracks as produced by [`build_tracks`](crate::tracks::track_builder::build_tracks).
/// * `synthetic_year` - Target calendar year.
///
/// Return
/// ----------
/// * New tracks with the same ids, species and point order, or
/// * [`MigratrackError::InvalidSyntheticDate`] when a Feb 29 point meets a common year.
pub fn normalize_to_year(
    tracks: &[Track],
    synthetic_year: i32,
) -> Result<TrackSet, MigratrackError> {
    let normalized = tracks
        .iter()
        .map(|track| normalize_track(track, synthetic_year))
        .collect::<Result<TrackSet, _>>()?;
    debug!(synthetic_year, tracks = normalized.len(), "normalized tracks");
    Ok(normalized)
}

#[cfg(test)]
mod normalizer_test {
    use std::cmp::Ordering;

    use chrono::Timelike;

    use super::*;
    use crate::{observations::Observation, tracks::track_builder::build_tracks};

    fn sample_tracks() -> TrackSet {
        build_tracks(vec![
            Observation::new(1, "Grus grus", 10.0, 50.0, "2017-03-01T06:15:30.125+01:00"),
            Observation::new(2, "Grus grus", 11.0, 51.0, "2017-03-02T06:15:30+01:00"),
            Observation::new(3, "Grus grus", 12.0, 52.0, "2017-12-31T23:59:59+01:00"),
            Observation::new(10, "Anser anser", 4.0, 52.0, "2015-07-04"),
            Observation::new(11, "Anser anser", 4.5, 52.5, "2015-07-05"),
        ])
        .unwrap()
    }

    #[test]
    fn test_year_rewritten_fields_kept() {
        let tracks = sample_tracks();
        let normalized = normalize_to_year(&tracks, 2020).unwrap();

        assert_eq!(normalized.len(), tracks.len());
        for (before, after) in tracks.iter().zip(&normalized) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.species, after.species);
            assert_eq!(before.len(), after.len());
            for (p, q) in before.points.iter().zip(&after.points) {
                let (a, b) = (p.timestamp.local(), q.timestamp.local());
                assert_eq!(b.year(), 2020);
                assert_eq!((a.month(), a.day()), (b.month(), b.day()));
                assert_eq!(a.time(), b.time());
                assert_eq!(a.nanosecond(), b.nanosecond());
                assert_eq!(p.timestamp.offset(), q.timestamp.offset());
                assert_eq!((p.longitude, p.latitude), (q.longitude, q.latitude));
            }
        }

        // Order inside a track is untouched.
        for track in &normalized {
            for pair in track.points.windows(2) {
                assert_eq!(
                    pair[1].timestamp.compare(&pair[0].timestamp),
                    Some(Ordering::Greater)
                );
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let tracks = sample_tracks();
        let once = normalize_to_year(&tracks, 2020).unwrap();
        let twice = normalize_to_year(&once, 2020).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_leap_day_into_common_year() {
        let tracks = build_tracks(vec![Observation::new(
            1,
            "Grus grus",
            0.0,
            0.0,
            "2016-02-29T12:00:00",
        )])
        .unwrap();

        assert_eq!(
            normalize_to_year(&tracks, 2021).unwrap_err(),
            MigratrackError::InvalidSyntheticDate {
                year: 2021,
                month: 2,
                day: 29
            }
        );
        let ok = normalize_to_year(&tracks, 2020).unwrap();
        assert_eq!(ok[0].first().day_of_year(), 60);
    }

    #[test]
    fn test_empty() {
        assert!(normalize_to_year(&[], 2020).unwrap().is_empty());
    }
}
