use embassy_time::{Duration, Instant};

use crate::math8::{blend8, progress8};

/// Crossfade from a captured frame toward freshly rendered frames
///
/// The source frame is frozen when the transition starts; every rendered
/// target frame is blended over it until the duration elapses.
#[derive(Debug, Clone)]
pub struct FrameTransition {
    /// Frame at the start of transition
    source: Vec<u8>,
    /// Total transition duration
    duration: Duration,
    /// Time at which the transition started
    start_time: Instant,
    active: bool,
}

impl FrameTransition {
    pub const fn new() -> Self {
        Self {
            source: Vec::new(),
            duration: Duration::from_millis(0),
            start_time: Instant::from_millis(0),
            active: false,
        }
    }

    /// Check if a transition is in progress
    pub const fn is_transitioning(&self) -> bool {
        self.active
    }

    /// Start fading out of `source`
    pub fn start(&mut self, source: &[u8], duration: Duration, start_time: Instant) {
        if duration.as_millis() == 0 {
            self.cancel();
            return;
        }
        self.source.clear();
        self.source.extend_from_slice(source);
        self.duration = duration;
        self.start_time = start_time;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.source.clear();
    }

    /// Blend the captured frame into `target` at `now`.
    ///
    /// A target of a different size than the source ends the transition.
    pub fn apply(&mut self, now: Instant, target: &mut [u8]) {
        if !self.active {
            return;
        }
        if self.source.len() != target.len() {
            self.cancel();
            return;
        }

        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            self.cancel();
            return;
        }

        let progress = progress8(elapsed, self.duration);
        for (out, from) in target.iter_mut().zip(&self.source) {
            *out = blend8(*from, *out, progress);
        }
    }
}

impl Default for FrameTransition {
    fn default() -> Self {
        Self::new()
    }
}
