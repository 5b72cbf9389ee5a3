//! Frame timing for the `progress` feature.
//!
//! * [`FrameTimer`] – per-frame duration with an exponential moving average
//!   (`ema ← α·dt + (1–α)·ema`, first sample seeds the average).
//! * [`fmt_dur`] – `"253µs"`, `"42ms"` or `"3.14s"` depending on the scale.
//! * [`frame_progress`] – the `indicatif` bar used while frames are drawn.
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Wall-clock time between consecutive frames, smoothed.
pub struct FrameTimer {
    previous: Instant,
    smoothing: f64,
    smoothed_secs: Option<f64>,
}

impl FrameTimer {
    /// `smoothing` is the weight of the newest sample, in `(0, 1]`.
    pub fn new(smoothing: f64) -> Self {
        FrameTimer {
            previous: Instant::now(),
            smoothing,
            smoothed_secs: None,
        }
    }

    /// Close the current frame and return its duration.
    pub fn tick(&mut self) -> Duration {
        let elapsed = self.previous.elapsed();
        self.previous += elapsed;

        let sample = elapsed.as_secs_f64();
        self.smoothed_secs = Some(match self.smoothed_secs {
            None => sample,
            Some(prev) => prev + self.smoothing * (sample - prev),
        });
        elapsed
    }

    pub fn avg(&self) -> Duration {
        self.smoothed_secs
            .map_or(Duration::ZERO, Duration::from_secs_f64)
    }
}

pub fn fmt_dur(d: Duration) -> String {
    match (d.as_micros(), d.as_millis()) {
        (us, _) if us < 1_000 => format!("{us}µs"),
        (_, ms) if ms < 1_000 => format!("{ms}ms"),
        _ => format!("{:.2}s", d.as_secs_f64()),
    }
}

/// Progress bar over `total` frames.
pub fn frame_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total.max(1));
    if let Ok(style) = ProgressStyle::with_template(
        "{bar:40.cyan/blue} frame {pos}/{len} ({percent:>3}%) | ETA {eta_precise} | {msg}",
    ) {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(200));
    pb
}

#[cfg(test)]
mod progress_bar_test {
    use super::*;

    #[test]
    fn test_fmt_dur() {
        assert_eq!(fmt_dur(Duration::from_micros(253)), "253µs");
        assert_eq!(fmt_dur(Duration::from_millis(42)), "42ms");
        assert_eq!(fmt_dur(Duration::from_millis(3140)), "3.14s");
    }

    #[test]
    fn test_timer_avg() {
        let mut timer = FrameTimer::new(0.5);
        assert_eq!(timer.avg(), Duration::ZERO);
        let first = timer.tick();
        let diff = timer.avg().as_secs_f64() - first.as_secs_f64();
        assert!(diff.abs() < 1e-6);

        std::thread::sleep(Duration::from_millis(2));
        let second = timer.tick();
        let expected = 0.5 * (first.as_secs_f64() + second.as_secs_f64());
        assert!((timer.avg().as_secs_f64() - expected).abs() < 1e-6);
    }
}
