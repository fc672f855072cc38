//! Clip playback clock.

/// Local clock for one looping clip.
///
/// The player only tracks time; pause state lives with the caller, which
/// simply stops calling [`ClipPlayer::advance`] while paused. The clock is
/// folded into `[0, duration)` on every advance so it never grows without
/// bound during long sessions.
#[derive(Debug, Clone)]
pub struct ClipPlayer {
    time: f32,
    duration: f32,
    time_scale: f32,
}

impl ClipPlayer {
    /// Player at time zero for a clip of `duration` seconds.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            time: 0.0,
            duration,
            time_scale: 1.0,
        }
    }

    /// Advance the clock by `dt` seconds of wall time, scaled by the current
    /// playback speed and wrapped into the clip range.
    pub fn advance(&mut self, dt: f32) {
        if self.duration > 0.0 {
            self.time = (self.time + dt * self.time_scale).rem_euclid(self.duration);
        }
    }

    /// Rewind to the start of the clip.
    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// Set the playback speed multiplier. Negative values are clamped to
    /// zero; the viewer never plays clips backwards.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Current clock value in seconds, within `[0, duration)`.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Clip length in seconds.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Current playback speed multiplier.
    #[inline]
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_wraps_at_clip_end() {
        let mut player = ClipPlayer::new(2.0);
        player.advance(1.5);
        assert!((player.time() - 1.5).abs() < 1e-6);
        player.advance(1.0);
        assert!((player.time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn advancing_exactly_one_loop_returns_to_zero() {
        let mut player = ClipPlayer::new(2.0);
        player.advance(2.0);
        assert!(player.time().abs() < 1e-6);
    }

    #[test]
    fn time_scale_multiplies_progress() {
        let mut player = ClipPlayer::new(10.0);
        player.set_time_scale(2.0);
        player.advance(1.0);
        assert!((player.time() - 2.0).abs() < 1e-6);

        player.set_time_scale(0.0);
        player.advance(5.0);
        assert!((player.time() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn negative_time_scale_clamps_to_zero() {
        let mut player = ClipPlayer::new(10.0);
        player.set_time_scale(-1.0);
        assert!(player.time_scale().abs() < f32::EPSILON);
    }

    #[test]
    fn reset_rewinds_to_zero() {
        let mut player = ClipPlayer::new(4.0);
        player.advance(3.0);
        player.reset();
        assert!(player.time().abs() < f32::EPSILON);
    }

    #[test]
    fn zero_duration_clip_stays_at_zero() {
        let mut player = ClipPlayer::new(0.0);
        player.advance(1.0);
        assert!(player.time().abs() < f32::EPSILON);
    }
}
