//! Engine backends
//!
//! An engine renders one virtual strip at a time from a single-segment
//! JSON payload. The software engine is always available; a native backend
//! can be plugged in through [`EngineSlot::select`] and must behave the same
//! for the compositor.

mod software;

use embassy_time::Instant;
use log::info;
pub use software::{MAX_LEDS, SoftwareEngine};

/// Interface shared by every engine backend.
pub trait EngineBackend {
    /// Resize the frame buffer to `led_count` pixels and clear the last error
    fn init(&mut self, led_count: usize);

    /// Apply a JSON command. Failures are reported through [`Self::last_error`]
    fn json_command(&mut self, payload: &str);

    /// Render the frame at simulated time `now` as packed RGB bytes
    fn render_frame(&mut self, now: Instant) -> &[u8];

    /// Frame buffer size in bytes
    fn buffer_size(&self) -> usize;

    /// Last error message, empty when the last command succeeded
    fn last_error(&self) -> &str;
}

/// Backend chosen once at startup.
pub enum EngineSlot {
    Software(SoftwareEngine),
    Native(Box<dyn EngineBackend>),
}

impl EngineSlot {
    /// Use the native backend when one is available, the software engine
    /// otherwise.
    pub fn select(native: Option<Box<dyn EngineBackend>>) -> Self {
        match native {
            Some(backend) => {
                info!("using native engine backend");
                Self::Native(backend)
            }
            None => {
                info!("native engine unavailable, using software engine");
                Self::Software(SoftwareEngine::new())
            }
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Software(_) => "software",
            Self::Native(_) => "native",
        }
    }
}

impl Default for EngineSlot {
    fn default() -> Self {
        Self::Software(SoftwareEngine::new())
    }
}

impl core::fmt::Debug for EngineSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("EngineSlot").field(&self.kind()).finish()
    }
}

impl EngineBackend for EngineSlot {
    fn init(&mut self, led_count: usize) {
        match self {
            Self::Software(engine) => engine.init(led_count),
            Self::Native(engine) => engine.init(led_count),
        }
    }

    fn json_command(&mut self, payload: &str) {
        match self {
            Self::Software(engine) => engine.json_command(payload),
            Self::Native(engine) => engine.json_command(payload),
        }
    }

    fn render_frame(&mut self, now: Instant) -> &[u8] {
        match self {
            Self::Software(engine) => engine.render_frame(now),
            Self::Native(engine) => engine.render_frame(now),
        }
    }

    fn buffer_size(&self) -> usize {
        match self {
            Self::Software(engine) => engine.buffer_size(),
            Self::Native(engine) => engine.buffer_size(),
        }
    }

    fn last_error(&self) -> &str {
        match self {
            Self::Software(engine) => engine.last_error(),
            Self::Native(engine) => engine.last_error(),
        }
    }
}
