//! # Tabular display for reconstructed tracks
//!
//! [`TrackSetDisplay`] borrows a [`TrackSet`] and renders one row per track with
//! [`comfy-table`] when used with `{}`:
//!
//! `Track | Species | Points | First | Last | Days`
//!
//! * `First` / `Last` are the timestamps of the first and last points, as written in the source
//!   (or as rewritten by the normalizer).
//! * `Days` is the inclusive day-of-year range `first..last`.
//!
//! The `{:#}` form appends the [`PointCountStats`](crate::tracks::PointCountStats) summary.
//!
//! ```rust,ignore
//! use migratrack::tracks::display::TrackSetDisplayExt;
//!
//! println!("{}", tracks.table().limit(20));
//! ```
//!
//! [`comfy-table`]: https://crates.io/crates/comfy-table
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

use crate::tracks::{Track, TrackSet, TrackSetExt};

/// Display adaptor rendering a [`TrackSet`] as a table.
pub struct TrackSetDisplay<'a> {
    tracks: &'a TrackSet,
    limit: Option<usize>,
}

impl<'a> TrackSetDisplay<'a> {
    /// Print at most `n` rows; the remaining count is reported under the table.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    fn row(track: &Track) -> Vec<Cell> {
        let first = track.first();
        let last = track.last();
        vec![
            Cell::new(track.id).set_alignment(CellAlignment::Right),
            Cell::new(&track.species),
            Cell::new(track.len()).set_alignment(CellAlignment::Right),
            Cell::new(first.timestamp),
            Cell::new(last.timestamp),
            Cell::new(format!("{}..{}", first.day_of_year(), last.day_of_year()))
                .set_alignment(CellAlignment::Right),
        ]
    }

    fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Track"),
            Cell::new("Species"),
            Cell::new("Points"),
            Cell::new("First"),
            Cell::new("Last"),
            Cell::new("Days"),
        ]);

        let shown = self.limit.unwrap_or(self.tracks.len()).min(self.tracks.len());
        for track in self.tracks.iter().take(shown) {
            table.add_row(Self::row(track));
        }

        let mut out = table.to_string();
        if shown < self.tracks.len() {
            out.push_str(&format!("\n... {} more tracks", self.tracks.len() - shown));
        }
        out
    }
}

impl fmt::Display for TrackSetDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())?;
        if f.alternate() {
            writeln!(f)?;
            writeln!(
                f,
                "{} tracks, {} points, {} species",
                self.tracks.len(),
                self.tracks.total_points(),
                self.tracks.species().len()
            )?;
            if let Some(stats) = self.tracks.point_count_stats() {
                write!(f, "{stats:#}")?;
            }
        }
        Ok(())
    }
}

/// Ergonomic constructor for [`TrackSetDisplay`].
pub trait TrackSetDisplayExt {
    fn table(&self) -> TrackSetDisplay<'_>;
}

impl TrackSetDisplayExt for TrackSet {
    fn table(&self) -> TrackSetDisplay<'_> {
        TrackSetDisplay {
            tracks: self,
            limit: None,
        }
    }
}

#[cfg(test)]
mod display_test {
    use super::*;
    use crate::{observations::Observation, tracks::track_builder::build_tracks};

    fn tracks() -> TrackSet {
        build_tracks(vec![
            Observation::new(1, "Ciconia ciconia", 13.0, 52.0, "2019-04-01T06:00:00"),
            Observation::new(2, "Ciconia ciconia", 14.0, 51.0, "2019-04-03T06:00:00"),
            Observation::new(7, "Grus grus", 10.0, 50.0, "2018-10-10"),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_contents() {
        let set = tracks();
        let out = set.table().to_string();
        assert!(out.contains("Species"));
        assert!(out.contains("Ciconia ciconia"));
        assert!(out.contains("Grus grus"));
        assert!(out.contains("2019-04-01T06:00:00"));
        assert!(out.contains("91..93"));
        assert!(!out.contains("more tracks"));
    }

    #[test]
    fn test_limit_and_summary() {
        let set = tracks();
        let out = format!("{:#}", set.table().limit(1));
        assert!(out.contains("... 1 more tracks"));
        assert!(!out.contains("Grus grus"));
        assert!(out.contains("2 tracks, 3 points, 2 species"));
        assert!(out.contains("Points per track - summary"));
    }
}
