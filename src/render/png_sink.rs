//! PNG frame sequence: one `frame_NNNN.png` per frame in a target directory.
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::{
    frames::projector::FrameState,
    migratrack_errors::MigratrackError,
    render::{map_canvas::MapCanvas, FrameSink},
};

/// File name of the `index`-th frame (0-based).
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:04}.png")
}

pub struct PngSequence {
    dir: Utf8PathBuf,
    canvas: MapCanvas,
    written: usize,
}

impl PngSequence {
    /// Create `dir` (and parents) if needed.
    pub fn create(dir: &Utf8Path, canvas: MapCanvas) -> Result<Self, MigratrackError> {
        fs::create_dir_all(dir)?;
        Ok(PngSequence {
            dir: dir.to_path_buf(),
            canvas,
            written: 0,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.written
    }
}

impl FrameSink for PngSequence {
    fn consume(&mut self, frame: &FrameState) -> Result<(), MigratrackError> {
        let path = self.dir.join(frame_file_name(self.written));
        {
            let root = BitMapBackend::new(path.as_std_path(), self.canvas.size()).into_drawing_area();
            self.canvas.draw(&root, frame)?;
        }
        debug!(path = %path, day = frame.day, "frame written");
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), MigratrackError> {
        info!(dir = %self.dir, frames = self.written, "png frames written");
        Ok(())
    }
}
