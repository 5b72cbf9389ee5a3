//! # Migratrack: pipeline façade
//!
//! [`Migratrack`] wires the stages of the animation together:
//!
//! 1. **Ingestion** – [`read_observations`] reads the occurrence table (rows without a
//!    position are dropped),
//! 2. **Track building** – [`build_tracks`] groups observations into per-individual tracks,
//! 3. **Normalization** – [`normalize_to_year`] folds every track onto the synthetic year,
//! 4. **Palette** – [`SpeciesPalette::assign`] colors species once for the whole animation,
//! 5. **Projection** – [`FrameProjector`] builds one [`FrameState`](crate::frames::projector::FrameState)
//!    per day of the [`DayRange`],
//! 6. **Output** – any [`FrameSink`] (video export, preview window, PNG sequence).
//!
//! Steps 1 to 4 run in [`Migratrack::prepare`] and yield an [`Animation`]; steps 5 and 6 run
//! in [`Animation::render_to`].
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use migratrack::migratrack::Migratrack;
//! use migratrack::params::AnimationParams;
//! use migratrack::render::png_sink::PngSequence;
//!
//! let app = Migratrack::new(AnimationParams::default());
//! let animation = app.prepare(Utf8Path::new("birds.csv")).unwrap();
//! let mut sink = PngSequence::create(Utf8Path::new("frames"), animation.canvas()).unwrap();
//! animation.render_to(&mut sink).unwrap();
//! ```
//!
//! Errors
//! -----------------
//! Every failure is fatal and surfaces as a [`MigratrackError`]: missing input, malformed row,
//! unparsable or incomparable date, empty dataset, invalid parameters, drawing or encoder
//! failure.
use camino::Utf8Path;
use tracing::{debug, info};

use crate::{
    frames::{
        flatten_tracks, projector::FrameProjector, write_points_csv, DayRange, NormalizedPoint,
    },
    migratrack_errors::MigratrackError,
    observations::csv_reader::{read_observations, DEFAULT_DELIMITER},
    palette::SpeciesPalette,
    params::AnimationParams,
    render::{map_canvas::MapCanvas, FrameSink, MapExtent},
    tracks::{normalizer::normalize_to_year, track_builder::build_tracks, TrackSet, TrackSetExt},
};

/// Pipeline entry point, holding the run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Migratrack {
    params: AnimationParams,
    delimiter: u8,
}

impl Migratrack {
    pub fn new(params: AnimationParams) -> Self {
        Migratrack {
            params,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Use another field separator for the input table.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn params(&self) -> &AnimationParams {
        &self.params
    }

    /// Read `input` and rebuild its tracks, without normalization.
    ///
    /// Return
    /// ----------
    /// * The tracks in creation order, or [`MigratrackError::EmptyDataset`] when no row of
    ///   `input` carries a position.
    pub fn load_tracks(&self, input: &Utf8Path) -> Result<TrackSet, MigratrackError> {
        let observations = read_observations(input, self.delimiter)?;
        if observations.is_empty() {
            return Err(MigratrackError::EmptyDataset(format!(
                "no observation with a position in {input}"
            )));
        }

        let tracks = build_tracks(observations)?;
        if let Some(stats) = tracks.point_count_stats() {
            debug!(%stats, "points per track");
        }
        Ok(tracks)
    }

    /// Run ingestion, track building, normalization and palette assignment.
    pub fn prepare(&self, input: &Utf8Path) -> Result<Animation, MigratrackError> {
        let tracks = self.load_tracks(input)?;
        let tracks = normalize_to_year(&tracks, self.params.synthetic_year)?;

        let points = flatten_tracks(&tracks);
        let palette = SpeciesPalette::assign(tracks.species());
        let day_range = DayRange::from_points(&points)?;
        let extent = MapExtent::from_points(&points, self.params.extent_margin)?;

        info!(
            tracks = tracks.len(),
            points = points.len(),
            species = palette.len(),
            first_day = day_range.first,
            last_day = day_range.last,
            "animation prepared"
        );

        Ok(Animation {
            params: self.params.clone(),
            tracks,
            points,
            palette,
            day_range,
            extent,
        })
    }
}

/// Normalized tracks and everything derived from them, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    params: AnimationParams,
    tracks: TrackSet,
    points: Vec<NormalizedPoint>,
    palette: SpeciesPalette,
    day_range: DayRange,
    extent: MapExtent,
}

impl Animation {
    /// Tracks after normalization onto the synthetic year.
    pub fn tracks(&self) -> &TrackSet {
        &self.tracks
    }

    pub fn points(&self) -> &[NormalizedPoint] {
        &self.points
    }

    pub fn palette(&self) -> &SpeciesPalette {
        &self.palette
    }

    pub fn day_range(&self) -> DayRange {
        self.day_range
    }

    pub fn extent(&self) -> &MapExtent {
        &self.extent
    }

    pub fn projector(&self) -> Result<FrameProjector<'_>, MigratrackError> {
        FrameProjector::new(
            &self.points,
            &self.palette,
            self.params.fade_window_days,
            self.params.synthetic_year,
        )
    }

    /// Canvas sized from the parameters, framed on [`Self::extent`].
    pub fn canvas(&self) -> MapCanvas {
        MapCanvas::new(&self.params, self.extent)
    }

    /// Push one frame per day of the range into `sink`, then finish it.
    ///
    /// Return
    /// ----------
    /// * The number of frames produced.
    pub fn render_to(&self, sink: &mut dyn FrameSink) -> Result<usize, MigratrackError> {
        let projector = self.projector()?;
        let frames = self.feed(&projector, sink)?;
        sink.finish()?;
        info!(frames, "animation rendered");
        Ok(frames)
    }

    #[cfg(feature = "progress")]
    fn feed(
        &self,
        projector: &FrameProjector<'_>,
        sink: &mut dyn FrameSink,
    ) -> Result<usize, MigratrackError> {
        use crate::frames::progress_bar::{fmt_dur, frame_progress, FrameTimer};

        let pb = frame_progress(self.day_range.len() as u64);
        let mut timer = FrameTimer::new(0.2);
        let mut frames = 0;
        for frame in projector.frames() {
            let last = timer.tick();
            pb.set_message(format!(
                "{} | last: {}, avg: {}",
                frame.date_label,
                fmt_dur(last),
                fmt_dur(timer.avg())
            ));
            sink.consume(&frame)?;
            frames += 1;
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(frames)
    }

    #[cfg(not(feature = "progress"))]
    fn feed(
        &self,
        projector: &FrameProjector<'_>,
        sink: &mut dyn FrameSink,
    ) -> Result<usize, MigratrackError> {
        let mut frames = 0;
        for frame in projector.frames() {
            debug!(
                day = frame.day,
                points = frame.point_count(),
                "frame projected"
            );
            sink.consume(&frame)?;
            frames += 1;
        }
        Ok(frames)
    }

    /// Write every normalized point to a CSV file, one row per point.
    pub fn write_points_csv(&self, path: &Utf8Path) -> Result<(), MigratrackError> {
        write_points_csv(&self.points, path)
    }
}

#[cfg(test)]
mod migratrack_test {
    use std::io::Write;

    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    use super::*;
    use crate::frames::projector::FrameState;

    struct Collect(Vec<FrameState>, bool);

    impl FrameSink for Collect {
        fn consume(&mut self, frame: &FrameState) -> Result<(), MigratrackError> {
            self.0.push(frame.clone());
            Ok(())
        }

        fn finish(&mut self) -> Result<(), MigratrackError> {
            self.1 = true;
            Ok(())
        }
    }

    fn write_input(dir: &TempDir, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("input.csv")).unwrap();
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_pipeline() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "occurrenceID,species,longitude,latitude,date\n\
             1,Grus grus,10.0,50.0,2017-03-01T06:00:00\n\
             2,Grus grus,11.0,51.0,2017-03-03T06:00:00\n\
             3,Anser anser,4.0,,2016-03-02\n\
             8,Anser anser,4.0,52.0,2016-03-02\n",
        );

        let params = AnimationParams::builder()
            .fade_window_days(2)
            .build()
            .unwrap();
        let animation = Migratrack::new(params).prepare(&input).unwrap();

        assert_eq!(animation.tracks().len(), 2);
        assert!(animation
            .tracks()
            .iter()
            .flat_map(|t| t.points.iter())
            .all(|p| p.timestamp.year() == 2020));
        // 2020 is a leap year: March 1 is day 61.
        assert_eq!(animation.day_range(), DayRange { first: 61, last: 63 });
        assert_eq!(animation.palette().len(), 2);

        let mut sink = Collect(Vec::new(), false);
        assert_eq!(animation.render_to(&mut sink).unwrap(), 3);
        assert!(sink.1);
        assert_eq!(sink.0[0].date_label, "March 01");
        assert_eq!(sink.0[1].point_count(), 2);
        assert_eq!(sink.0[2].point_count(), 3);
    }

    #[test]
    fn test_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "occurrenceID,species,longitude,latitude,date\n1,Grus grus,,,2017-03-01\n",
        );
        let err = Migratrack::new(AnimationParams::default())
            .prepare(&input)
            .unwrap_err();
        assert!(matches!(err, MigratrackError::EmptyDataset(_)));
    }

    #[test]
    fn test_write_points_csv() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "occurrenceID;species;longitude;latitude;date\n5;Grus grus;1.5;2.5;2019-01-02\n",
        );
        let animation = Migratrack::new(AnimationParams::default())
            .with_delimiter(b';')
            .prepare(&input)
            .unwrap();

        let out = Utf8PathBuf::from_path_buf(dir.path().join("points.csv")).unwrap();
        animation.write_points_csv(&out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            text,
            "track_id,species,longitude,latitude,day\n0,Grus grus,1.5,2.5,2\n"
        );
    }
}
