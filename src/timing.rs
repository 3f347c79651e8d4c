//! Frame timing. Elapsed wall time is converted to an instantaneous frame rate,
//! clamped between `MIN_FPS` and `MAX_FPS`, and returned as the simulation step.

use std::time::{Duration, Instant};

pub const MIN_FPS: f32 = 12.0;
pub const MAX_FPS: f32 = 60.0;

/// Step for a frame that took `elapsed`.
pub fn clamped_delta(elapsed: Duration) -> f32 {
    let secs = elapsed.as_secs_f32();
    let fps = if secs > 0.0 { 1.0 / secs } else { MAX_FPS };
    1.0 / fps.clamp(MIN_FPS, MAX_FPS)
}

#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step since the previous call. The first call has no reference point and
    /// returns the longest step, `1 / MIN_FPS`.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(last) => clamped_delta(now.saturating_duration_since(last)),
            None => 1.0 / MIN_FPS,
        };
        self.last = Some(now);
        dt
    }

    /// Forget the reference point, e.g. after a pause.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
