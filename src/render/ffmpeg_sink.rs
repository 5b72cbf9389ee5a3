//! # ffmpeg / ffplay frame sink
//!
//! Frames are rasterized to packed RGB24 and written to the standard input of a child process:
//!
//! * **export**: `ffmpeg` encodes the stream to a video file (H.264 in `yuv420p`),
//! * **preview**: `ffplay` shows the stream in a window at the animation frame rate.
//!
//! Both programs read `-f rawvideo -pixel_format rgb24 -video_size WxH -framerate FPS -i -`.
//!
//! Closing the preview window stops the animation early; remaining frames are dropped.
//!
//! A sink dropped before [`FrameSink::finish`] still reaps its child: an export gets its
//! input closed and is waited for (the file holds the frames sent so far), a preview is
//! killed.
use std::{
    io::{ErrorKind, Write},
    process::{Child, ChildStdin, Command, Stdio},
};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use crate::{
    frames::projector::FrameState,
    migratrack_errors::MigratrackError,
    render::{map_canvas::MapCanvas, FrameSink},
};

/// Default encoder program.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";
/// Default preview program.
pub const DEFAULT_FFPLAY: &str = "ffplay";

fn raw_input_args(size: (u32, u32), fps: u32) -> Vec<String> {
    vec![
        "-f".into(),
        "rawvideo".into(),
        "-pixel_format".into(),
        "rgb24".into(),
        "-video_size".into(),
        format!("{}x{}", size.0, size.1),
        "-framerate".into(),
        fps.to_string(),
        "-i".into(),
        "-".into(),
    ]
}

/// Arguments of the `ffmpeg` export command.
pub fn export_args(size: (u32, u32), fps: u32, output: &Utf8Path) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-y"]
        .into_iter()
        .map(String::from)
        .collect();
    args.extend(raw_input_args(size, fps));
    args.extend(
        [
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
        ]
        .into_iter()
        .map(String::from),
    );
    args.push(output.to_string());
    args
}

/// Arguments of the `ffplay` preview command.
pub fn preview_args(size: (u32, u32), fps: u32) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-autoexit"]
        .into_iter()
        .map(String::from)
        .collect();
    args.extend(["-window_title".to_string(), "migratrack".to_string()]);
    args.extend(raw_input_args(size, fps));
    args
}

/// What the child process does with the frames.
#[derive(Debug, Clone, PartialEq)]
pub enum EncoderMode {
    Export(Utf8PathBuf),
    Preview,
}

/// Frame sink piping raw frames into `ffmpeg` or `ffplay`.
pub struct FfmpegSink {
    canvas: MapCanvas,
    mode: EncoderMode,
    program: String,
    child: Child,
    stdin: Option<ChildStdin>,
    written: usize,
    finished: bool,
}

impl FfmpegSink {
    fn spawn(
        program: &str,
        args: &[String],
        canvas: MapCanvas,
        mode: EncoderMode,
    ) -> Result<Self, MigratrackError> {
        debug!(program, ?args, "spawning encoder");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|err| {
                MigratrackError::Encoder(format!("unable to start {program:?}: {err}"))
            })?;
        let stdin = child.stdin.take();

        Ok(FfmpegSink {
            canvas,
            mode,
            program: program.to_string(),
            child,
            stdin,
            written: 0,
            finished: false,
        })
    }

    /// Encode every frame to `output` with `program` (usually [`DEFAULT_FFMPEG`]).
    pub fn export(
        program: &str,
        output: &Utf8Path,
        canvas: MapCanvas,
        fps: u32,
    ) -> Result<Self, MigratrackError> {
        let args = export_args(canvas.size(), fps, output);
        Self::spawn(
            program,
            &args,
            canvas,
            EncoderMode::Export(output.to_path_buf()),
        )
    }

    /// Show every frame in a window with `program` (usually [`DEFAULT_FFPLAY`]).
    pub fn preview(program: &str, canvas: MapCanvas, fps: u32) -> Result<Self, MigratrackError> {
        let args = preview_args(canvas.size(), fps);
        Self::spawn(program, &args, canvas, EncoderMode::Preview)
    }

    pub fn mode(&self) -> &EncoderMode {
        &self.mode
    }

    pub fn frames_written(&self) -> usize {
        self.written
    }
}

impl FrameSink for FfmpegSink {
    fn consume(&mut self, frame: &FrameState) -> Result<(), MigratrackError> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(());
        };
        let buffer = self.canvas.rasterize(frame)?;

        match stdin.write_all(&buffer) {
            Ok(()) => {
                self.written += 1;
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::BrokenPipe && self.mode == EncoderMode::Preview => {
                info!(day = frame.day, "preview closed");
                self.stdin = None;
                Ok(())
            }
            Err(err) => Err(MigratrackError::Encoder(format!(
                "{} stopped accepting frames at day {}: {err}",
                self.program, frame.day
            ))),
        }
    }

    fn finish(&mut self) -> Result<(), MigratrackError> {
        // Closing stdin signals end of stream.
        drop(self.stdin.take());
        let status = self.child.wait()?;
        self.finished = true;

        match (&self.mode, status.success()) {
            (EncoderMode::Export(path), true) => {
                info!(path = %path, frames = self.written, "video written");
                Ok(())
            }
            (EncoderMode::Preview, _) => {
                if !status.success() {
                    warn!(%status, "preview exited with an error");
                }
                Ok(())
            }
            (EncoderMode::Export(_), false) => Err(MigratrackError::Encoder(format!(
                "{} exited with {status}",
                self.program
            ))),
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        drop(self.stdin.take());
        if self.mode == EncoderMode::Preview {
            let _ = self.child.kill();
        }
        match self.child.wait() {
            Ok(status) => warn!(
                program = %self.program,
                frames = self.written,
                %status,
                "encoder stopped before the end of the animation"
            ),
            Err(err) => warn!(program = %self.program, %err, "unable to reap encoder"),
        }
    }
}
