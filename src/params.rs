//! # Animation parameters
//!
//! [`AnimationParams`] gathers every tunable of the pipeline: the synthetic year, the fade
//! window, the frame rate and the raster geometry. Values are set through the fluent
//! [`AnimationParamsBuilder`], which validates them once in [`AnimationParamsBuilder::build`].
//!
//! ```rust
//! use migratrack::params::AnimationParams;
//!
//! let params = AnimationParams::builder()
//!     .fade_window_days(14)
//!     .frames_per_second(24)
//!     .resolution_dpi(100)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.fade_window_days, 14);
//! ```
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use crate::{
    constants::{
        DEFAULT_EXTENT_MARGIN, DEFAULT_FADE_WINDOW_DAYS, DEFAULT_FIGURE_SIZE_IN,
        DEFAULT_FRAMES_PER_SECOND, DEFAULT_MARKER_AREA_PT2, DEFAULT_RESOLUTION_DPI,
        DEFAULT_SYNTHETIC_YEAR, POINTS_PER_INCH,
    },
    migratrack_errors::MigratrackError,
};

/// Configuration of one animation run.
///
/// Fields
/// -----------------
/// * `synthetic_year` – Calendar year every track is folded onto (default 2020).
/// * `fade_window_days` – A point stays visible this many days after its own day, fading
///   linearly to transparent (default 30).
/// * `frames_per_second` – Playback rate, one frame per simulated day (default 12).
/// * `resolution_dpi` – Raster resolution (default 300).
/// * `figure_size_in` – Figure width and height in inches (default 8 × 10).
/// * `marker_area_pt2` – Marker area in points² (default 10).
/// * `extent_margin` – Padding of the map extent, as a fraction of the data range (default 0.2).
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationParams {
    pub synthetic_year: i32,
    pub fade_window_days: u32,
    pub frames_per_second: u32,
    pub resolution_dpi: u32,
    pub figure_size_in: (f64, f64),
    pub marker_area_pt2: f64,
    pub extent_margin: f64,
}

impl AnimationParams {
    pub fn builder() -> AnimationParamsBuilder {
        AnimationParamsBuilder::new()
    }

    /// Raster size in pixels, `figure_size_in × dpi`, rounded and at least 1 × 1.
    pub fn frame_size_px(&self) -> (u32, u32) {
        let dpi = f64::from(self.resolution_dpi);
        let px = |inches: f64| ((inches * dpi).round() as u32).max(1);
        (px(self.figure_size_in.0), px(self.figure_size_in.1))
    }

    /// Marker radius in pixels for a disc of `marker_area_pt2` points², at least 1.
    pub fn marker_radius_px(&self) -> u32 {
        let diameter_pt = self.marker_area_pt2.sqrt();
        let radius_px = diameter_pt / 2.0 * f64::from(self.resolution_dpi) / POINTS_PER_INCH;
        (radius_px.round() as u32).max(1)
    }
}

impl Default for AnimationParams {
    fn default() -> Self {
        AnimationParams {
            synthetic_year: DEFAULT_SYNTHETIC_YEAR,
            fade_window_days: DEFAULT_FADE_WINDOW_DAYS,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            resolution_dpi: DEFAULT_RESOLUTION_DPI,
            figure_size_in: DEFAULT_FIGURE_SIZE_IN,
            marker_area_pt2: DEFAULT_MARKER_AREA_PT2,
            extent_margin: DEFAULT_EXTENT_MARGIN,
        }
    }
}

/// Builder for [`AnimationParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct AnimationParamsBuilder {
    params: AnimationParams,
}

impl AnimationParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn synthetic_year(mut self, v: i32) -> Self {
        self.params.synthetic_year = v;
        self
    }
    pub fn fade_window_days(mut self, v: u32) -> Self {
        self.params.fade_window_days = v;
        self
    }
    pub fn frames_per_second(mut self, v: u32) -> Self {
        self.params.frames_per_second = v;
        self
    }
    pub fn resolution_dpi(mut self, v: u32) -> Self {
        self.params.resolution_dpi = v;
        self
    }
    pub fn figure_size_in(mut self, width: f64, height: f64) -> Self {
        self.params.figure_size_in = (width, height);
        self
    }
    pub fn marker_area_pt2(mut self, v: f64) -> Self {
        self.params.marker_area_pt2 = v;
        self
    }
    pub fn extent_margin(mut self, v: f64) -> Self {
        self.params.extent_margin = v;
        self
    }

    /// True iff x > 0.0 and not NaN.
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// True iff x >= 0.0 and not NaN.
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `fade_window_days >= 1` (the fade divides by the window length),
    /// * `frames_per_second >= 1`, `resolution_dpi >= 1`,
    /// * `synthetic_year` in `1..=9999`,
    /// * both figure dimensions and `marker_area_pt2` finite and `> 0`,
    /// * `extent_margin` finite and `>= 0`.
    ///
    /// Return
    /// ----------
    /// * `Ok(AnimationParams)` or [`MigratrackError::InvalidParams`] naming the first failed rule.
    pub fn build(self) -> Result<AnimationParams, MigratrackError> {
        let p = &self.params;
        let invalid = |msg: &str| Err(MigratrackError::InvalidParams(msg.into()));

        if p.fade_window_days == 0 {
            return invalid("fade_window_days must be >= 1");
        }
        if p.frames_per_second == 0 {
            return invalid("frames_per_second must be >= 1");
        }
        if p.resolution_dpi == 0 {
            return invalid("resolution_dpi must be >= 1");
        }
        if !(1..=9999).contains(&p.synthetic_year) {
            return invalid("synthetic_year must be in 1..=9999");
        }
        let (w, h) = p.figure_size_in;
        if !(Self::gt0(w) && Self::gt0(h) && w.is_finite() && h.is_finite()) {
            return invalid("figure_size_in dimensions must be > 0");
        }
        if !(Self::gt0(p.marker_area_pt2) && p.marker_area_pt2.is_finite()) {
            return invalid("marker_area_pt2 must be > 0");
        }
        if !(Self::ge0(p.extent_margin) && p.extent_margin.is_finite()) {
            return invalid("extent_margin must be >= 0");
        }

        Ok(self.params)
    }
}

impl fmt::Display for AnimationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            let (w, h) = self.frame_size_px();
            writeln!(f, "Animation Parameters")?;
            writeln!(f, "--------------------")?;
            writeln!(f, "  synthetic_year    = {}", self.synthetic_year)?;
            writeln!(f, "  fade_window_days  = {}", self.fade_window_days)?;
            writeln!(f, "  frames_per_second = {}", self.frames_per_second)?;
            writeln!(f, "  resolution_dpi    = {}", self.resolution_dpi)?;
            writeln!(
                f,
                "  figure_size_in    = {} x {}   # {w} x {h} px",
                self.figure_size_in.0, self.figure_size_in.1
            )?;
            writeln!(f, "  marker_area_pt2   = {}", self.marker_area_pt2)?;
            write!(f, "  extent_margin     = {}", self.extent_margin)
        } else {
            write!(
                f,
                "AnimationParams(year={}, fade={}d, fps={}, dpi={}, fig={}x{}in)",
                self.synthetic_year,
                self.fade_window_days,
                self.frames_per_second,
                self.resolution_dpi,
                self.figure_size_in.0,
                self.figure_size_in.1
            )
        }
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = AnimationParams::builder().build().unwrap();
        assert_eq!(p, AnimationParams::default());
        assert_eq!(p.synthetic_year, 2020);
        assert_eq!(p.fade_window_days, 30);
        assert_eq!(p.frames_per_second, 12);
        assert_eq!(p.resolution_dpi, 300);
        assert_eq!(p.frame_size_px(), (2400, 3000));
        // sqrt(10) / 2 * 300 / 72 = 6.59
        assert_eq!(p.marker_radius_px(), 7);
    }

    #[test]
    fn test_small_raster() {
        let p = AnimationParams::builder()
            .resolution_dpi(10)
            .figure_size_in(4.0, 3.14)
            .build()
            .unwrap();
        assert_eq!(p.frame_size_px(), (40, 31));
        assert_eq!(p.marker_radius_px(), 1);
    }

    #[test]
    fn test_validation() {
        let err = |b: AnimationParamsBuilder| b.build().unwrap_err();

        assert_eq!(
            err(AnimationParams::builder().fade_window_days(0)),
            MigratrackError::InvalidParams("fade_window_days must be >= 1".into())
        );
        assert!(matches!(
            err(AnimationParams::builder().frames_per_second(0)),
            MigratrackError::InvalidParams(_)
        ));
        assert!(AnimationParams::builder().resolution_dpi(0).build().is_err());
        assert!(AnimationParams::builder().synthetic_year(0).build().is_err());
        assert!(AnimationParams::builder().synthetic_year(10_000).build().is_err());
        assert!(AnimationParams::builder().figure_size_in(0.0, 1.0).build().is_err());
        assert!(AnimationParams::builder().figure_size_in(1.0, f64::NAN).build().is_err());
        assert!(AnimationParams::builder().marker_area_pt2(-1.0).build().is_err());
        assert!(AnimationParams::builder().extent_margin(-0.1).build().is_err());

        assert!(AnimationParams::builder().extent_margin(0.0).build().is_ok());
        assert!(AnimationParams::builder().fade_window_days(1).build().is_ok());
    }

    #[test]
    fn test_display() {
        let p = AnimationParams::default();
        assert_eq!(
            p.to_string(),
            "AnimationParams(year=2020, fade=30d, fps=12, dpi=300, fig=8x10in)"
        );
        let pretty = format!("{p:#}");
        assert!(pretty.contains("fade_window_days  = 30"));
        assert!(pretty.contains("2400 x 3000 px"));
    }
}
