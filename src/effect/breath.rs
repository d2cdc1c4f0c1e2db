//! Breathing effect
//!
//! A plain primary fill whose brightness follows a sinusoid. `custom1` makes
//! the breath shallower: at 0 the brightness swings all the way down, at 255
//! it only dips to 90% of the commanded value.

use core::f64::consts::TAU;

use embassy_time::Instant;

use super::{Effect, SolidEffect};
use crate::{color::Rgb, command::EffectPayload, math8::clamp_byte};

const BASE_PERIOD_MS: u64 = 1024;
const PERIOD_STEP_MS: u64 = 12;
const MAX_DEPTH_REDUCTION: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct BreathEffect {
    fill: SolidEffect,
    period_ms: u64,
    /// Fraction of the brightness the wave removes at its trough
    depth: f64,
}

impl BreathEffect {
    pub fn from_params(params: &EffectPayload) -> Self {
        Self {
            fill: SolidEffect::new(params.colors[0]),
            period_ms: BASE_PERIOD_MS + u64::from(255 - params.sx) * PERIOD_STEP_MS,
            depth: 1.0 - MAX_DEPTH_REDUCTION * f64::from(params.c1) / 255.0,
        }
    }

    /// Breathing wave in `0.0..=1.0` at `now`
    #[allow(clippy::cast_precision_loss)]
    pub fn wave(&self, now: Instant) -> f64 {
        let phase = (now.as_millis() % self.period_ms) as f64 / self.period_ms as f64;
        0.5 + 0.5 * libm::sin(phase * TAU)
    }
}

impl Effect for BreathEffect {
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        self.fill.render(now, leds);
    }

    fn brightness(&self, now: Instant, base: u8) -> u8 {
        let factor = 1.0 - self.depth * (1.0 - self.wave(now));
        clamp_byte(f64::from(base) * factor, base)
    }
}
