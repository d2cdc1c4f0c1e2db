//! Solid color fill effect
//!
//! Fills all LEDs with the primary color. A non-zero `custom1` blends the
//! strip linearly toward the secondary color, reaching `custom1/255` of the
//! way at the last pixel.

use embassy_time::Instant;

use super::Effect;
use crate::{
    color::{Rgb, blend_unit},
    command::EffectPayload,
};

/// Solid color effect
#[derive(Debug, Clone)]
pub struct SolidEffect {
    primary: Rgb,
    secondary: Rgb,
    /// Blend reached at the far end (0-255)
    blend: u8,
}

impl SolidEffect {
    /// Create a plain fill with no blend
    pub const fn new(color: Rgb) -> Self {
        Self {
            primary: color,
            secondary: color,
            blend: 0,
        }
    }

    pub const fn from_params(params: &EffectPayload) -> Self {
        Self {
            primary: params.colors[0],
            secondary: params.colors[1],
            blend: params.c1,
        }
    }
}

impl Effect for SolidEffect {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, _now: Instant, leds: &mut [Rgb]) {
        if self.blend == 0 {
            leds.fill(self.primary);
            return;
        }

        let span = leds.len().saturating_sub(1);
        let reach = f64::from(self.blend) / 255.0;
        for (i, led) in leds.iter_mut().enumerate() {
            let position = if span == 0 {
                0.0
            } else {
                i as f64 / span as f64
            };
            *led = blend_unit(self.primary, self.secondary, position * reach);
        }
    }
}
