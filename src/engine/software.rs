//! Software engine
//!
//! Keeps the state of one virtual strip (power, brightness, effect
//! parameters) and renders it with the built-in effects. Fields missing from
//! a command keep their previous value.

use embassy_time::Instant;
use log::debug;

use super::EngineBackend;
use crate::{
    color::{Rgb, apply_brightness},
    command::{CommandEnvelope, EffectPayload},
    effect::EffectSlot,
    segment::DEFAULT_PAYLOAD,
};

/// Upper bound for the virtual pixel count
pub const MAX_LEDS: usize = 100_000;

const DEFAULT_BRIGHTNESS: u8 = 128;

#[derive(Debug, Clone)]
pub struct SoftwareEngine {
    on: bool,
    brightness: u8,
    params: EffectPayload,
    effect: EffectSlot,
    leds: Vec<Rgb>,
    frame: Vec<u8>,
    last_error: String,
}

impl SoftwareEngine {
    pub fn new() -> Self {
        Self {
            on: true,
            brightness: DEFAULT_BRIGHTNESS,
            params: DEFAULT_PAYLOAD,
            effect: EffectSlot::from_payload(&DEFAULT_PAYLOAD),
            leds: vec![Rgb::default(); 1],
            frame: vec![0; 3],
            last_error: String::new(),
        }
    }

    pub const fn params(&self) -> &EffectPayload {
        &self.params
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn is_on(&self) -> bool {
        self.on
    }

    pub const fn effect(&self) -> &EffectSlot {
        &self.effect
    }

    pub fn led_count(&self) -> usize {
        self.leds.len()
    }

    fn apply(&mut self, command: &CommandEnvelope) {
        if let Some(on) = command.on {
            self.on = on;
        }
        if let Some(bri) = command.bri {
            self.brightness = bri;
        }

        let Some(seg) = command.segments().first() else {
            return;
        };
        let params = &mut self.params;
        for (field, value) in [
            (&mut params.fx, seg.fx),
            (&mut params.sx, seg.sx),
            (&mut params.ix, seg.ix),
            (&mut params.pal, seg.pal),
            (&mut params.c1, seg.c1),
            (&mut params.c2, seg.c2),
        ] {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(col) = &seg.col {
            for (slot, channels) in params.colors.iter_mut().zip(col) {
                if let [r, g, b, ..] = channels.as_slice() {
                    *slot = Rgb {
                        r: *r,
                        g: *g,
                        b: *b,
                    };
                }
            }
        }

        self.effect = EffectSlot::from_payload(&self.params);
    }
}

impl Default for SoftwareEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBackend for SoftwareEngine {
    fn init(&mut self, led_count: usize) {
        let led_count = led_count.clamp(1, MAX_LEDS);
        self.leds.clear();
        self.leds.resize(led_count, Rgb::default());
        self.frame.clear();
        self.frame.resize(led_count * 3, 0);
        self.last_error.clear();
    }

    fn json_command(&mut self, payload: &str) {
        match CommandEnvelope::from_json(payload) {
            Ok(command) => {
                self.last_error.clear();
                self.apply(&command);
            }
            Err(err) => {
                debug!("software engine rejected command: {err}");
                self.last_error = err.to_string();
            }
        }
    }

    fn render_frame(&mut self, now: Instant) -> &[u8] {
        if !self.on {
            self.frame.fill(0);
            return &self.frame;
        }

        self.effect.render(now, &mut self.leds);
        let brightness = self.effect.brightness(now, self.brightness);
        for (pixel, led) in self.frame.chunks_exact_mut(3).zip(&self.leds) {
            let color = apply_brightness(*led, brightness);
            pixel.copy_from_slice(&[color.r, color.g, color.b]);
        }
        &self.frame
    }

    fn buffer_size(&self) -> usize {
        self.frame.len()
    }

    fn last_error(&self) -> &str {
        &self.last_error
    }
}
