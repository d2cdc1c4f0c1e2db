//! Sparkle effect
//!
//! Draws the primary color, then overwrites a hashed subset of pixels. The
//! subset is a pure function of pixel slot and simulated time, so the same
//! timestamp always sparkles the same pixels.

use embassy_time::Instant;

use super::Effect;
use crate::{
    color::{Rgb, WHITE, blend_unit, is_black, palette_color},
    command::EffectPayload,
    math8::{noise_seed, xorshift32},
};

const DENSITY_BIAS: u64 = 16;
const DENSITY_DIVISOR: u64 = 2048;

#[derive(Debug, Clone)]
pub struct SparkleEffect {
    base: Rgb,
    /// Sparkle color when `mix` is 0
    scheme: Rgb,
    density: u8,
    /// Weight of the palette color over the scheme color (0-255)
    mix: u8,
    palette: u8,
    colors: [Rgb; 3],
}

impl SparkleEffect {
    pub fn from_params(params: &EffectPayload) -> Self {
        let [primary, secondary, _] = params.colors;
        Self {
            base: primary,
            scheme: if is_black(secondary) { WHITE } else { secondary },
            density: params.ix,
            mix: params.c1,
            palette: params.pal,
            colors: params.colors,
        }
    }

    /// Number of sparkles drawn on a strip of `count` pixels
    #[allow(clippy::cast_possible_truncation)]
    pub fn sparkle_count(&self, count: usize) -> usize {
        let scaled = count as u64 * (u64::from(self.density) + DENSITY_BIAS) / DENSITY_DIVISOR;
        (scaled as usize).max(1)
    }
}

impl Effect for SparkleEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        leds.fill(self.base);
        if leds.is_empty() {
            return;
        }

        let count = leds.len();
        let mix = f64::from(self.mix) / 255.0;
        for slot in 0..self.sparkle_count(count) {
            let noise = xorshift32(noise_seed(slot as u64, now.as_millis()));
            let index = noise as usize % count;
            let position = ((noise >> 8) & 0xFF) as u8;
            let tint = palette_color(position, self.palette, &self.colors);
            leds[index] = blend_unit(self.scheme, tint, mix);
        }
    }
}
