use std::time::{Duration, Instant};

/// Slide-in of a freshly shown surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    started: Instant,
    duration: Duration,
    distance: f32,
}

/// One sampled frame of a [`Reveal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealFrame {
    pub opacity: f32,
    /// Vertical offset from the placed position, negative while sliding in.
    pub offset_y: f32,
}

impl Reveal {
    pub fn new(started: Instant, duration: Duration, distance: f32) -> Self {
        Self {
            started,
            duration,
            distance,
        }
    }

    pub fn progress_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).min(1.0);
        ease_out_cubic(t)
    }

    pub fn frame_at(&self, now: Instant) -> RevealFrame {
        let progress = self.progress_at(now);
        RevealFrame {
            opacity: progress,
            offset_y: -self.distance * (1.0 - progress),
        }
    }

    pub fn is_done_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
