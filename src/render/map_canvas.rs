//! # Map canvas
//!
//! Draws one [`FrameState`] with `plotters`:
//!
//! * the figure background (`#1F1F1F`) with the date label centered in a title band,
//! * the map area (black) over the fixed [`MapExtent`], with a graticule in `#292929`,
//! * one filled disc per visible point, in its species color blended with the point's alpha.
//!
//! Points with zero alpha belong to the frame but leave no mark.
//!
//! The drawing code is generic over the plotters [`DrawingBackend`], so the same frame can go
//! to an in-memory RGB buffer ([`MapCanvas::rasterize`]) or straight to an image file.
use plotters::{coord::Shift, prelude::*};

use crate::{
    constants::{FIGURE_BACKGROUND, GRATICULE_COLOR, MAP_BACKGROUND},
    frames::projector::FrameState,
    migratrack_errors::MigratrackError,
    params::AnimationParams,
    render::{
        glyphs::{lit_cells, text_width, GLYPH_HEIGHT},
        MapExtent,
    },
};

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

/// Spacing of graticule lines (degrees) for an axis spanning `span` degrees.
fn graticule_step(span: f64) -> f64 {
    match span {
        s if s >= 60.0 => 20.0,
        s if s >= 20.0 => 10.0,
        s if s >= 8.0 => 5.0,
        _ => 1.0,
    }
}

/// Graticule values inside `[lo, hi]`.
fn graticule_lines(lo: f64, hi: f64) -> Vec<f64> {
    let step = graticule_step(hi - lo);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Frame painter with a fixed raster size and map extent.
#[derive(Debug, Clone, PartialEq)]
pub struct MapCanvas {
    size: (u32, u32),
    marker_radius: u32,
    extent: MapExtent,
}

impl MapCanvas {
    pub fn new(params: &AnimationParams, extent: MapExtent) -> Self {
        MapCanvas {
            size: params.frame_size_px(),
            marker_radius: params.marker_radius_px(),
            extent,
        }
    }

    /// Raster size in pixels (width, height).
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn extent(&self) -> &MapExtent {
        &self.extent
    }

    fn draw_title<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        label: &str,
    ) -> Result<(), MigratrackError> {
        let (width, height) = area.dim_in_pixel();
        let scale = ((height * 6 / 10) / GLYPH_HEIGHT).max(1);
        let text_px = text_width(label) * scale;
        let x0 = width.saturating_sub(text_px) / 2;
        let y0 = height.saturating_sub(GLYPH_HEIGHT * scale) / 2;

        // Each glyph cell is a scale × scale block of pixels.
        for (col, row) in lit_cells(label) {
            let x = (x0 + col * scale) as i32;
            let y = (y0 + row * scale) as i32;
            for dy in 0..scale as i32 {
                for dx in 0..scale as i32 {
                    area.draw_pixel((x + dx, y + dy), &WHITE)?;
                }
            }
        }
        Ok(())
    }

    /// Paint `frame` on `root`, which must be [`Self::size`] pixels large.
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &FrameState,
    ) -> Result<(), MigratrackError> {
        let (width, height) = self.size;
        root.fill(&rgb(FIGURE_BACKGROUND))?;

        let title_height = (height / 12).max(GLYPH_HEIGHT + 2);
        let side = (width / 40).max(1);
        let (title_area, body) = root.split_vertically(title_height);
        Self::draw_title(&title_area, &frame.date_label)?;

        let map_area = body.margin(0, side, side, side);
        map_area.fill(&rgb(MAP_BACKGROUND))?;

        let e = &self.extent;
        let mut chart = ChartBuilder::on(&map_area)
            .build_cartesian_2d(e.lon_min..e.lon_max, e.lat_min..e.lat_max)?;

        let grid = rgb(GRATICULE_COLOR);
        let meridians = graticule_lines(e.lon_min, e.lon_max)
            .into_iter()
            .map(|lon| PathElement::new(vec![(lon, e.lat_min), (lon, e.lat_max)], grid));
        let parallels = graticule_lines(e.lat_min, e.lat_max)
            .into_iter()
            .map(|lat| PathElement::new(vec![(e.lon_min, lat), (e.lon_max, lat)], grid));
        chart.draw_series(meridians.chain(parallels))?;

        for batch in &frame.batches {
            let base = RGBColor(batch.color.0, batch.color.1, batch.color.2);
            chart.draw_series(batch.points.iter().filter(|p| p.alpha > 0.0).map(|p| {
                Circle::new(
                    (p.longitude, p.latitude),
                    self.marker_radius,
                    base.mix(p.alpha).filled(),
                )
            }))?;
        }

        root.present()?;
        Ok(())
    }

    /// Paint `frame` into a packed RGB24 buffer of `width × height × 3` bytes.
    pub fn rasterize(&self, frame: &FrameState) -> Result<Vec<u8>, MigratrackError> {
        let (width, height) = self.size;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, self.size).into_drawing_area();
            self.draw(&root, frame)?;
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod map_canvas_test {
    use super::*;
    use crate::{
        frames::projector::{FadedPoint, SpeciesBatch},
        palette::Rgb,
    };

    fn canvas() -> MapCanvas {
        let params = AnimationParams::builder()
            .resolution_dpi(10)
            .build()
            .unwrap();
        let extent = MapExtent {
            lon_min: 0.0,
            lon_max: 10.0,
            lat_min: 40.0,
            lat_max: 60.0,
        };
        MapCanvas::new(&params, extent)
    }

    fn frame(alpha: f64, label: &str) -> FrameState {
        FrameState {
            day: 1,
            date_label: label.into(),
            batches: vec![SpeciesBatch {
                species: "Grus grus".into(),
                color: Rgb(0xd6, 0x27, 0x28),
                points: vec![FadedPoint {
                    longitude: 5.0,
                    latitude: 50.0,
                    alpha,
                }],
            }],
        }
    }

    fn count(buffer: &[u8], color: (u8, u8, u8)) -> usize {
        buffer
            .chunks_exact(3)
            .filter(|px| (px[0], px[1], px[2]) == color)
            .count()
    }

    #[test]
    fn test_graticule_lines() {
        assert_eq!(graticule_lines(-2.0, 12.0), [0.0, 5.0, 10.0]);
        assert_eq!(graticule_lines(36.0, 64.0), [40.0, 50.0, 60.0]);
        assert_eq!(graticule_lines(4.5, 5.5), [5.0]);
    }

    #[test]
    fn test_rasterize() {
        let canvas = canvas();
        assert_eq!(canvas.size(), (80, 100));

        let buffer = canvas.rasterize(&frame(1.0, "January 01")).unwrap();
        assert_eq!(buffer.len(), 80 * 100 * 3);
        assert_eq!(&buffer[..3], &[0x1f, 0x1f, 0x1f]);
        assert!(count(&buffer, (0xd6, 0x27, 0x28)) > 0);
        assert!(count(&buffer, (0, 0, 0)) > 0);
        assert!(count(&buffer, (255, 255, 255)) > 0);
    }

    #[test]
    fn test_transparent_point_leaves_no_mark() {
        let canvas = canvas();
        let buffer = canvas.rasterize(&frame(0.0, "")).unwrap();
        assert_eq!(count(&buffer, (0xd6, 0x27, 0x28)), 0);
        assert_eq!(count(&buffer, (255, 255, 255)), 0);
    }
}
