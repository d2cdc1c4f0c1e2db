//! Chase effect
//!
//! Every `stride`-th pixel is lit with the primary color and the pattern
//! moves one pixel every 40 ms. `custom2` adds a tail of up to four pixels
//! fading into a dim version of the secondary color.

use embassy_time::Instant;

use super::Effect;
use crate::{
    color::{Rgb, blend_unit, scale_color},
    command::EffectPayload,
};

const STEP_MS: u64 = 40;
const MIN_STRIDE: usize = 2;
const TAIL_STEP: u8 = 52;
const BACKGROUND_LEVEL: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct ChaseEffect {
    lit: Rgb,
    background: Rgb,
    stride: usize,
    tail: usize,
}

impl ChaseEffect {
    pub fn from_params(params: &EffectPayload) -> Self {
        let [primary, secondary, _] = params.colors;
        Self {
            lit: primary,
            background: scale_color(secondary, BACKGROUND_LEVEL),
            stride: Self::stride_for(params.c1, params.sx),
            tail: usize::from(params.c2 / TAIL_STEP),
        }
    }

    /// Stride from `custom1`, or from speed when `custom1` is 0
    pub fn stride_for(custom1: u8, speed: u8) -> usize {
        let stride = if custom1 > 0 {
            usize::from(custom1 / 8)
        } else {
            14usize.saturating_sub(usize::from(speed / 20))
        };
        stride.max(MIN_STRIDE)
    }

    pub const fn stride(&self) -> usize {
        self.stride
    }

    pub const fn tail(&self) -> usize {
        self.tail
    }
}

impl Effect for ChaseEffect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        if leds.is_empty() {
            return;
        }

        let head = ((now.as_millis() / STEP_MS) % leds.len() as u64) as usize;
        for (i, led) in leds.iter_mut().enumerate() {
            let k = (i + head) % self.stride;
            *led = if k == 0 {
                self.lit
            } else if k <= self.tail {
                let weight = 1.0 - k as f64 / (self.tail + 1) as f64;
                blend_unit(self.background, self.lit, weight)
            } else {
                self.background
            };
        }
    }
}
