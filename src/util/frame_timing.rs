//! Wall-clock frame timing with a smoothed FPS readout.

use web_time::{Duration, Instant};

/// Frame clock: measures per-frame elapsed time and keeps a smoothed FPS
/// readout. The viewer renders every frame, so there is no frame limiter;
/// the clock only reports how long the previous iteration took.
pub struct FrameTiming {
    /// Last tick timestamp.
    last_frame: Instant,
    /// Display FPS, exponentially smoothed.
    smoothed_fps: f32,
    /// Per-tick blend weight for the FPS average.
    smoothing: f32,
}

impl FrameTiming {
    /// Create a frame clock starting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            // Each sample moves the readout 5% toward the instant value.
            smoothing: 0.05,
        }
    }

    /// Advance the clock and return the time elapsed since the previous
    /// tick (or since construction for the first call).
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps += (instant_fps - self.smoothed_fps) * self.smoothing;
        }

        elapsed
    }

    /// The smoothed frames-per-second readout.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_reports_elapsed_time() {
        let mut timing = FrameTiming::new();
        std::thread::sleep(Duration::from_millis(2));
        let dt = timing.tick();
        assert!(dt >= Duration::from_millis(2));
        assert!(timing.fps().is_finite());
    }

    #[test]
    fn fps_stays_positive_across_ticks() {
        let mut timing = FrameTiming::new();
        for _ in 0..5 {
            let _ = timing.tick();
        }
        assert!(timing.fps() > 0.0);
    }
}
