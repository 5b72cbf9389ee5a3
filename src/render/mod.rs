//! # Rendering and export
//!
//! The projector hands out renderer-agnostic [`FrameState`]s; this module turns them into
//! pixels and pushes the pixels somewhere.
//!
//! Components
//! -----------------
//! * [`FrameSink`] – consumer of frames, one call per day, then [`FrameSink::finish`].
//! * [`MapExtent`] – padded lon/lat bounding box shared by every frame.
//! * [`map_canvas::MapCanvas`] – draws a frame with `plotters` on any drawing backend.
//! * [`ffmpeg_sink::FfmpegSink`] – streams raw RGB frames to `ffmpeg` (export) or `ffplay`
//!   (preview).
//! * [`png_sink::PngSequence`] – writes `frame_NNNN.png` files.
use plotters::drawing::DrawingAreaErrorKind;

use crate::{
    constants::{Latitude, Longitude, MIN_EXTENT_SPAN_DEG},
    frames::{projector::FrameState, NormalizedPoint},
    migratrack_errors::MigratrackError,
};

pub mod ffmpeg_sink;
mod glyphs;
pub mod map_canvas;
pub mod png_sink;

/// Destination of rendered frames.
pub trait FrameSink {
    /// Render and emit one frame.
    fn consume(&mut self, frame: &FrameState) -> Result<(), MigratrackError>;

    /// Flush and release the output. Called once, after the last frame.
    fn finish(&mut self) -> Result<(), MigratrackError>;
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for MigratrackError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        MigratrackError::Render(err.to_string())
    }
}

/// Geographic window drawn on every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExtent {
    pub lon_min: Longitude,
    pub lon_max: Longitude,
    pub lat_min: Latitude,
    pub lat_max: Latitude,
}

/// `[lo, hi]` padded by `margin × span` on each side, span widened to the minimum first.
fn pad_axis(lo: f64, hi: f64, margin: f64) -> (f64, f64) {
    let span = (hi - lo).max(MIN_EXTENT_SPAN_DEG);
    let center = (lo + hi) / 2.0;
    let half = span / 2.0 + margin * span;
    (center - half, center + half)
}

impl MapExtent {
    /// Bounding box of `points`, padded by `margin` (fraction of the range) on each side.
    ///
    /// An axis whose points all share one value is widened to [`MIN_EXTENT_SPAN_DEG`]
    /// around that value before padding.
    pub fn from_points(points: &[NormalizedPoint], margin: f64) -> Result<Self, MigratrackError> {
        let Some(first) = points.first() else {
            return Err(MigratrackError::EmptyDataset(
                "no point to frame on the map".into(),
            ));
        };

        let init = (
            first.longitude,
            first.longitude,
            first.latitude,
            first.latitude,
        );
        let (lon_lo, lon_hi, lat_lo, lat_hi) =
            points.iter().fold(init, |(x0, x1, y0, y1), p| {
                (
                    x0.min(p.longitude),
                    x1.max(p.longitude),
                    y0.min(p.latitude),
                    y1.max(p.latitude),
                )
            });

        let (lon_min, lon_max) = pad_axis(lon_lo, lon_hi, margin);
        let (lat_min, lat_max) = pad_axis(lat_lo, lat_hi, margin);
        Ok(MapExtent {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        })
    }

    pub fn contains(&self, longitude: Longitude, latitude: Latitude) -> bool {
        (self.lon_min..=self.lon_max).contains(&longitude)
            && (self.lat_min..=self.lat_max).contains(&latitude)
    }
}

#[cfg(test)]
mod render_test {
    use approx::assert_relative_eq;

    use super::*;

    fn at(longitude: f64, latitude: f64) -> NormalizedPoint {
        NormalizedPoint {
            track_id: 0,
            species: "a".into(),
            longitude,
            latitude,
            day: 1,
        }
    }

    #[test]
    fn test_extent_margin() {
        let extent = MapExtent::from_points(&[at(0.0, 40.0), at(10.0, 60.0)], 0.2).unwrap();
        assert_relative_eq!(extent.lon_min, -2.0);
        assert_relative_eq!(extent.lon_max, 12.0);
        assert_relative_eq!(extent.lat_min, 36.0);
        assert_relative_eq!(extent.lat_max, 64.0);
        assert!(extent.contains(5.0, 50.0));
        assert!(!extent.contains(13.0, 50.0));
    }

    #[test]
    fn test_degenerate_extent() {
        let extent = MapExtent::from_points(&[at(5.0, 50.0)], 0.0).unwrap();
        assert_relative_eq!(extent.lon_min, 4.5);
        assert_relative_eq!(extent.lon_max, 5.5);
        assert_relative_eq!(extent.lat_max - extent.lat_min, MIN_EXTENT_SPAN_DEG);

        assert!(matches!(
            MapExtent::from_points(&[], 0.2),
            Err(MigratrackError::EmptyDataset(_))
        ));
    }
}
