//! Rainbow effects
//!
//! Provides two rainbow effect variants:
//! - `Plain`: one full hue turn across the strip
//! - `Cycle`: hue spread widened by `custom1`, repeating the rainbow
//!
//! With palette 0 hues are converted directly; any other palette id samples
//! the scheme-derived palette at the hue position instead.

use embassy_time::Instant;

use super::Effect;
use crate::{
    color::{Hsv, Rgb, hsv_to_rgb, palette_color},
    command::EffectPayload,
    math8::clamp_byte,
};

const BASE_SATURATION: u8 = 180;
const FULL_SPREAD: u64 = 255;
const CYCLE_SPREAD_STEP: u64 = 3;
const SPEED_DIVISOR: u64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainbowVariant {
    Plain,
    Cycle,
}

#[derive(Debug, Clone)]
pub struct RainbowEffect {
    variant: RainbowVariant,
    speed: u8,
    saturation: u8,
    /// Hue steps covered by the whole strip
    spread: u64,
    palette: u8,
    colors: [Rgb; 3],
}

impl RainbowEffect {
    pub fn from_params(variant: RainbowVariant, params: &EffectPayload) -> Self {
        let spread = match variant {
            RainbowVariant::Plain => FULL_SPREAD,
            RainbowVariant::Cycle => FULL_SPREAD + u64::from(params.c1) * CYCLE_SPREAD_STEP,
        };
        Self {
            variant,
            speed: params.sx,
            saturation: BASE_SATURATION
                .saturating_add(clamp_byte(f64::from(params.ix) / 4.0, 0)),
            spread,
            palette: params.pal,
            colors: params.colors,
        }
    }

    pub const fn variant(&self) -> RainbowVariant {
        self.variant
    }

    /// Hue offset of pixel 0 at `now`
    #[allow(clippy::cast_possible_truncation)]
    pub fn base_hue(&self, now: Instant) -> u8 {
        ((now.as_millis().wrapping_mul(u64::from(self.speed) + 1) / SPEED_DIVISOR) & 0xFF) as u8
    }
}

impl Effect for RainbowEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        if leds.is_empty() {
            return;
        }

        let base = u64::from(self.base_hue(now));
        let count = leds.len() as u64;

        for (i, led) in leds.iter_mut().enumerate() {
            let hue = ((base + (i as u64 * self.spread) / count) & 0xFF) as u8;
            *led = if self.palette == 0 {
                hsv_to_rgb(Hsv {
                    hue,
                    sat: self.saturation,
                    val: 255,
                })
            } else {
                palette_color(hue, self.palette, &self.colors)
            };
        }
    }
}
