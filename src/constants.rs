//! # Constants and type definitions for migratrack
//!
//! This module centralizes the **default animation settings**, the **categorical color
//! table** used to tell species apart, and the **common type aliases** shared by the
//! ingestion, track-building and frame-projection stages.
//!
//! ## Overview
//!
//! - Default synthetic year, fade window, frame rate and resolution
//! - Figure geometry (inches) and marker size (points²)
//! - Core type aliases used across the crate
//! - Container type for the points of a single track

use smallvec::SmallVec;

use crate::tracks::TrackPoint;

// -------------------------------------------------------------------------------------------------
// Animation defaults
// -------------------------------------------------------------------------------------------------

/// Calendar year every track is folded onto (a leap year, so Feb 29 always survives)
pub const DEFAULT_SYNTHETIC_YEAR: i32 = 2020;

/// Number of trailing days over which a point fades out
pub const DEFAULT_FADE_WINDOW_DAYS: u32 = 30;

/// Frame rate of the exported video
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 12;

/// Raster resolution (dots per inch)
pub const DEFAULT_RESOLUTION_DPI: u32 = 300;

/// Figure size in inches (width, height)
pub const DEFAULT_FIGURE_SIZE_IN: (f64, f64) = (8.0, 10.0);

/// Marker area in typographic points²
pub const DEFAULT_MARKER_AREA_PT2: f64 = 10.0;

/// Fraction of the data range added on each side of the map extent
pub const DEFAULT_EXTENT_MARGIN: f64 = 0.2;

/// Smallest span (degrees) of a map axis, used when all points share a coordinate
pub const MIN_EXTENT_SPAN_DEG: f64 = 1.0;

/// Typographic points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Last possible day-of-year (leap years)
pub const MAX_DAY_OF_YEAR: u32 = 366;

// -------------------------------------------------------------------------------------------------
// Colors
// -------------------------------------------------------------------------------------------------

/// Ten-color categorical table ("tab10"), in assignment order.
pub const CATEGORICAL_PALETTE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

/// Figure background
pub const FIGURE_BACKGROUND: (u8, u8, u8) = (0x1f, 0x1f, 0x1f);

/// Map area background
pub const MAP_BACKGROUND: (u8, u8, u8) = (0x00, 0x00, 0x00);

/// Graticule lines
pub const GRATICULE_COLOR: (u8, u8, u8) = (0x29, 0x29, 0x29);

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Source-assigned record identifier (`occurrenceID`)
pub type OccurrenceId = i64;
/// Sequential identifier of a reconstructed track
pub type TrackId = u32;
/// Longitude in degrees
pub type Longitude = f64;
/// Latitude in degrees
pub type Latitude = f64;
/// Day of the (synthetic) year, 1..=366
pub type DayOfYear = u32;

/// A small, inline-optimized container for the points of a single track.
pub type TrackPoints = SmallVec<[TrackPoint; 6]>;
