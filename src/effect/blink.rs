//! Blink effect
//!
//! Alternates between the primary color and an "off" phase. The off phase is
//! not black unless `custom1` is zero: it glows with the secondary color (or
//! the primary when the secondary is black) scaled by `custom1/255`.

use embassy_time::Instant;

use super::Effect;
use crate::{
    color::{Rgb, is_black, scale_color},
    command::EffectPayload,
};

const BASE_INTERVAL_MS: u64 = 120;
const INTERVAL_STEP_MS: u64 = 6;

#[derive(Debug, Clone)]
pub struct BlinkEffect {
    on_color: Rgb,
    off_color: Rgb,
    interval_ms: u64,
}

impl BlinkEffect {
    pub fn from_params(params: &EffectPayload) -> Self {
        let [primary, secondary, _] = params.colors;
        let glow_base = if is_black(secondary) { primary } else { secondary };
        Self {
            on_color: primary,
            off_color: scale_color(glow_base, f64::from(params.c1) / 255.0),
            interval_ms: Self::interval_for_speed(params.sx),
        }
    }

    /// Half-period for a speed value: faster speed, shorter interval
    pub fn interval_for_speed(speed: u8) -> u64 {
        BASE_INTERVAL_MS + u64::from(255 - speed) * INTERVAL_STEP_MS
    }

    /// Whether the on-phase is showing at `now`
    pub fn is_on(&self, now: Instant) -> bool {
        (now.as_millis() / self.interval_ms) % 2 == 0
    }
}

impl Effect for BlinkEffect {
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        let color = if self.is_on(now) {
            self.on_color
        } else {
            self.off_color
        };
        leds.fill(color);
    }
}
