//! Frame timing.
//!
//! The host hands each frame an [`Instant`]; [`FrameClock`] turns that into
//! elapsed and delta seconds, counts frames and keeps a periodically updated
//! FPS figure. Taking the instant as an argument keeps the clock
//! deterministic under test.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Instant;
//! use bauble::time::FrameClock;
//!
//! let mut clock = FrameClock::new(Instant::now());
//!
//! // Once per frame:
//! let (elapsed, delta) = clock.tick(Instant::now());
//! println!("frame {} at {:.2}s (+{:.4}s), {:.1} fps", clock.frame(), elapsed, delta, clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Wall-clock bookkeeping for a frame loop.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// When the clock started.
    start: Instant,
    /// Previous tick, `None` before the first one.
    last_frame: Option<Instant>,
    /// Seconds since start.
    elapsed_secs: f32,
    /// Seconds since the previous tick.
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock starting at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: None,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Record a frame at `now`.
    ///
    /// Returns `(elapsed, delta)` in seconds. The first tick has a delta of
    /// the time since the clock was created. Instants earlier than the
    /// previous tick give a zero delta.
    pub fn tick(&mut self, now: Instant) -> (f32, f32) {
        let previous = self.last_frame.unwrap_or(self.start);
        let raw_delta = now.saturating_duration_since(previous);
        self.last_frame = Some(now.max(previous));

        self.delta_secs = raw_delta.as_secs_f32();
        self.elapsed_secs = now.saturating_duration_since(self.start).as_secs_f32();

        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
