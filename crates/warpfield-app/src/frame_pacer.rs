//! Render-rate pacing against absolute frame deadlines.
//!
//! The starfield moves one step per rendered frame, so the render rate sets
//! the apparent star speed. The pacer sleeps away whatever is left of each
//! frame's slot and resynchronises instead of sprinting when it falls badly
//! behind.

use std::time::{Duration, Instant};

use tracing::warn;

/// Falling further behind than this drops the backlog.
pub const MAX_LAG: Duration = Duration::from_millis(250);

pub struct FramePacer {
    frame_duration: Duration,
    next_frame: Instant,
    frame_count: u64,
    resync_count: u64,
}

impl FramePacer {
    /// A pacer whose first slot starts now. A `target_fps` of zero is treated
    /// as one.
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(target_fps, Instant::now())
    }

    pub fn starting_at(target_fps: u32, start: Instant) -> Self {
        let frame_duration = Duration::from_nanos(1_000_000_000 / u64::from(target_fps.max(1)));
        Self {
            frame_duration,
            next_frame: start + frame_duration,
            frame_count: 0,
            resync_count: 0,
        }
    }

    /// Call once after each frame is produced; blocks until the next slot.
    pub fn wait(&mut self) {
        let sleep = self.advance(Instant::now());
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
    }

    /// Closes the current slot as of `now` and returns how long to sleep.
    pub fn advance(&mut self, now: Instant) -> Duration {
        self.frame_count += 1;
        let deadline = self.next_frame;
        self.next_frame += self.frame_duration;

        if now < deadline {
            return deadline - now;
        }
        let lag = now - deadline;
        if lag > MAX_LAG {
            warn!(
                "Frame pacing {:.1}ms behind, resynchronising",
                lag.as_secs_f64() * 1000.0
            );
            self.next_frame = now + self.frame_duration;
            self.resync_count += 1;
        }
        Duration::ZERO
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Times the pacer gave up on a backlog.
    pub fn resync_count(&self) -> u64 {
        self.resync_count
    }
}
