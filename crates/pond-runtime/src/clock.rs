//! Frame clock with a capped variable timestep

use std::time::Instant;

/// Longest step the simulation will take in one frame, in seconds.
pub const MAX_DELTA: f64 = 0.1;

/// Clamp a raw frame time to the step the simulation uses.
///
/// NaN becomes 0, negative values become 0, and anything above
/// [`MAX_DELTA`] becomes [`MAX_DELTA`].
pub fn clamp_delta(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_DELTA)
}

/// Tracks wall-clock time between frames
pub struct FrameClock {
    /// Total simulated time in seconds
    pub total_time: f64,
    /// Clamped time since last frame in seconds
    pub delta_time: f64,
    /// Frames ticked so far
    pub frame: u64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame: 0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock from the wall clock. Call once per frame.
    ///
    /// The first tick yields a zero delta.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            return self.tick_with(0.0);
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.tick_with(elapsed)
    }

    /// Advance the clock by an externally measured elapsed time
    pub fn tick_with(&mut self, raw_elapsed: f64) -> f64 {
        self.delta_time = clamp_delta(raw_elapsed);
        self.total_time += self.delta_time;
        self.frame += 1;
        self.delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_caps_long_frames() {
        for raw in [0.1, 0.1000001, 0.25, 1.0, 60.0, f64::INFINITY] {
            assert_eq!(clamp_delta(raw), 0.1);
        }
    }

    #[test]
    fn test_clamp_nan_and_negative() {
        assert_eq!(clamp_delta(f64::NAN), 0.0);
        assert_eq!(clamp_delta(-0.5), 0.0);
        assert_eq!(clamp_delta(0.016), 0.016);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.frame, 1);
    }

    #[test]
    fn test_tick_with_accumulates() {
        let mut clock = FrameClock::new();
        clock.tick_with(0.05);
        clock.tick_with(5.0);
        assert!((clock.total_time - 0.15).abs() < 1e-12);
        assert_eq!(clock.delta_time, 0.1);
    }
}
