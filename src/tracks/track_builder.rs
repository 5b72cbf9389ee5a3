//! # Track reconstruction
//!
//! Turns an unordered stream of [`Observation`]s into discrete per-individual [`Track`]s.
//!
//! ## Algorithm
//! -----------------
//! 1. Stable sort by `occurrence_id` (ties keep their input order).
//! 2. Parse every date eagerly; the first bad date aborts with
//!    [`MigratrackError::TimestampParse`].
//! 3. Fold the sorted sequence through [`TrackFold::step`]. The fold state is the open track
//!    and the identifier of the previous observation. An observation either extends the open
//!    track (see [`continues`]) or seals it and opens a new one with the next sequential id.
//! 4. [`TrackFold::finish`] seals the last open track.
//!
//! ## Continuation rule
//! -----------------
//! An observation extends the open track iff **all** hold:
//! * its id is exactly the previous observation's id + 1,
//! * its species equals the track's species,
//! * its timestamp is strictly later than the track's last timestamp,
//! * its timestamp's year equals the year of the track's first timestamp.
//!
//! The checks run in that order. The chronological check is only reached for adjacent,
//! same-species observations; comparing a naive date with an offset-aware one at that point
//! fails with [`MigratrackError::IncomparableTimestamps`].
use std::cmp::Ordering;

use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    constants::{OccurrenceId, TrackId},
    migratrack_errors::MigratrackError,
    observations::Observation,
    time::Timestamp,
    tracks::{Track, TrackPoint, TrackSet},
};

/// An observation whose date has been parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedObservation {
    pub occurrence_id: OccurrenceId,
    pub species: String,
    pub point: TrackPoint,
}

impl TryFrom<Observation> for DatedObservation {
    type Error = MigratrackError;

    fn try_from(obs: Observation) -> Result<Self, Self::Error> {
        let timestamp: Timestamp =
            obs.date
                .parse()
                .map_err(|_| MigratrackError::TimestampParse {
                    occurrence_id: obs.occurrence_id,
                    value: obs.date.clone(),
                })?;

        Ok(DatedObservation {
            occurrence_id: obs.occurrence_id,
            species: obs.species,
            point: TrackPoint::new(timestamp, obs.longitude, obs.latitude),
        })
    }
}

/// Whether `obs` extends `track`, given the id of the observation seen just before it.
pub fn continues(
    track: &Track,
    previous_id: Option<OccurrenceId>,
    obs: &DatedObservation,
) -> Result<bool, MigratrackError> {
    let adjacent = previous_id.and_then(|id| id.checked_add(1)) == Some(obs.occurrence_id);
    if !adjacent || obs.species != track.species {
        return Ok(false);
    }

    let ordering = obs
        .point
        .timestamp
        .compare(&track.last().timestamp)
        .ok_or(MigratrackError::IncomparableTimestamps {
            occurrence_id: obs.occurrence_id,
        })?;
    if ordering != Ordering::Greater {
        return Ok(false);
    }

    Ok(obs.point.timestamp.year() == track.first().timestamp.year())
}

/// State of the reconstruction fold.
///
/// `previous_id` starts as `None`, which no identifier can be adjacent to, so the first
/// observation always opens a track.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrackFold {
    sealed: TrackSet,
    open: Option<Track>,
    previous_id: Option<OccurrenceId>,
    next_id: TrackId,
}

impl TrackFold {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sealed tracks so far (the open track excluded).
    pub fn sealed(&self) -> &[Track] {
        &self.sealed
    }

    pub fn open_track(&self) -> Option<&Track> {
        self.open.as_ref()
    }

    pub fn previous_id(&self) -> Option<OccurrenceId> {
        self.previous_id
    }

    /// Consume one observation.
    pub fn step(mut self, obs: DatedObservation) -> Result<Self, MigratrackError> {
        let extends = match &self.open {
            Some(track) => continues(track, self.previous_id, &obs)?,
            None => false,
        };
        self.previous_id = Some(obs.occurrence_id);

        if extends {
            if let Some(track) = self.open.as_mut() {
                track.points.push(obs.point);
            }
            return Ok(self);
        }

        if let Some(done) = self.open.take() {
            debug!(track = done.id, points = done.len(), species = %done.species, "sealed track");
            self.sealed.push(done);
        }
        self.open = Some(Track::open(self.next_id, obs.species, obs.point));
        self.next_id += 1;
        Ok(self)
    }

    /// Seal the open track and return every track in creation order.
    pub fn finish(mut self) -> TrackSet {
        if let Some(done) = self.open.take() {
            self.sealed.push(done);
        }
        self.sealed
    }
}

/// Reconstruct tracks from an unordered observation set.
///
/// Return
/// ----------
/// * The tracks in creation order (empty input gives an empty set), or
/// * the first [`MigratrackError::TimestampParse`] / [`MigratrackError::IncomparableTimestamps`].
pub fn build_tracks(observations: Vec<Observation>) -> Result<TrackSet, MigratrackError> {
    let dated: Vec<DatedObservation> = observations
        .into_iter()
        .sorted_by_key(|obs| obs.occurrence_id)
        .map(DatedObservation::try_from)
        .collect::<Result<_, _>>()?;

    let tracks = dated
        .into_iter()
        .try_fold(TrackFold::new(), TrackFold::step)?
        .finish();

    info!(tracks = tracks.len(), "reconstructed tracks");
    Ok(tracks)
}
