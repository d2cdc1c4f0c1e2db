//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum so switching effects never allocates.
//! Each effect implements the `Effect` trait and renders unscaled colors;
//! brightness is applied afterwards by the engine.

mod blink;
mod breath;
mod chase;
mod rainbow;
mod solid;
mod sparkle;

use embassy_time::Instant;
pub use blink::BlinkEffect;
pub use breath::BreathEffect;
pub use chase::ChaseEffect;
pub use rainbow::{RainbowEffect, RainbowVariant};
pub use solid::SolidEffect;
pub use sparkle::SparkleEffect;

use crate::{color::Rgb, command::EffectPayload};

const EFFECT_NAME_SOLID: &str = "solid";
const EFFECT_NAME_BLINK: &str = "blink";
const EFFECT_NAME_BREATH: &str = "breath";
const EFFECT_NAME_RAINBOW: &str = "rainbow";
const EFFECT_NAME_RAINBOW_CYCLE: &str = "rainbow_cycle";
const EFFECT_NAME_SPARKLE: &str = "sparkle";
const EFFECT_NAME_CHASE: &str = "chase";

const EFFECT_ID_SOLID: u8 = 0;
const EFFECT_ID_BLINK: u8 = 1;
const EFFECT_ID_BREATH: u8 = 2;
const EFFECT_ID_RAINBOW: u8 = 8;
const EFFECT_ID_RAINBOW_CYCLE: u8 = 9;
const EFFECT_ID_SPARKLE: u8 = 20;
const EFFECT_ID_CHASE: u8 = 28;

pub trait Effect {
    /// Render a single frame
    fn render(&mut self, now: Instant, leds: &mut [Rgb]);

    /// Brightness the frame is scaled by, given the commanded brightness
    fn brightness(&self, _now: Instant, base: u8) -> u8 {
        base
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Single color, optionally blended toward the secondary color
    Solid(SolidEffect),
    /// Periodic on/off with a dimmed off-phase glow
    Blink(BlinkEffect),
    /// Sinusoidal brightness over a solid fill
    Breath(BreathEffect),
    /// Hue sweep (plain or cycling)
    Rainbow(RainbowEffect),
    /// Solid base with hashed sparkles
    Sparkle(SparkleEffect),
    /// Moving lit pixels with an optional fading tail
    Chase(ChaseEffect),
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EffectId {
    Solid = EFFECT_ID_SOLID,
    Blink = EFFECT_ID_BLINK,
    Breath = EFFECT_ID_BREATH,
    #[default]
    Rainbow = EFFECT_ID_RAINBOW,
    RainbowCycle = EFFECT_ID_RAINBOW_CYCLE,
    Sparkle = EFFECT_ID_SPARKLE,
    Chase = EFFECT_ID_CHASE,
}

impl EffectId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_SOLID => Self::Solid,
            EFFECT_ID_BLINK => Self::Blink,
            EFFECT_ID_BREATH => Self::Breath,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            EFFECT_ID_RAINBOW_CYCLE => Self::RainbowCycle,
            EFFECT_ID_SPARKLE => Self::Sparkle,
            EFFECT_ID_CHASE => Self::Chase,
            _ => return None,
        })
    }

    /// Map any raw id to an effect; unknown ids render the rainbow.
    pub fn from_raw_or_default(value: u8) -> Self {
        Self::from_raw(value).unwrap_or_default()
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub fn to_slot(self, params: &EffectPayload) -> EffectSlot {
        match self {
            Self::Solid => EffectSlot::Solid(SolidEffect::from_params(params)),
            Self::Blink => EffectSlot::Blink(BlinkEffect::from_params(params)),
            Self::Breath => EffectSlot::Breath(BreathEffect::from_params(params)),
            Self::Rainbow => {
                EffectSlot::Rainbow(RainbowEffect::from_params(RainbowVariant::Plain, params))
            }
            Self::RainbowCycle => {
                EffectSlot::Rainbow(RainbowEffect::from_params(RainbowVariant::Cycle, params))
            }
            Self::Sparkle => EffectSlot::Sparkle(SparkleEffect::from_params(params)),
            Self::Chase => EffectSlot::Chase(ChaseEffect::from_params(params)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => EFFECT_NAME_SOLID,
            Self::Blink => EFFECT_NAME_BLINK,
            Self::Breath => EFFECT_NAME_BREATH,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
            Self::RainbowCycle => EFFECT_NAME_RAINBOW_CYCLE,
            Self::Sparkle => EFFECT_NAME_SPARKLE,
            Self::Chase => EFFECT_NAME_CHASE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_SOLID => Some(Self::Solid),
            EFFECT_NAME_BLINK => Some(Self::Blink),
            EFFECT_NAME_BREATH => Some(Self::Breath),
            EFFECT_NAME_RAINBOW => Some(Self::Rainbow),
            EFFECT_NAME_RAINBOW_CYCLE => Some(Self::RainbowCycle),
            EFFECT_NAME_SPARKLE => Some(Self::Sparkle),
            EFFECT_NAME_CHASE => Some(Self::Chase),
            _ => None,
        }
    }
}

impl EffectSlot {
    /// Build the slot for a payload's effect id.
    pub fn from_payload(params: &EffectPayload) -> Self {
        EffectId::from_raw_or_default(params.fx).to_slot(params)
    }

    /// Render the current effect
    pub fn render(&mut self, now: Instant, leds: &mut [Rgb]) {
        match self {
            Self::Solid(effect) => effect.render(now, leds),
            Self::Blink(effect) => effect.render(now, leds),
            Self::Breath(effect) => effect.render(now, leds),
            Self::Rainbow(effect) => effect.render(now, leds),
            Self::Sparkle(effect) => effect.render(now, leds),
            Self::Chase(effect) => effect.render(now, leds),
        }
    }

    /// Brightness the rendered frame should be scaled by
    pub fn brightness(&self, now: Instant, base: u8) -> u8 {
        match self {
            Self::Solid(effect) => effect.brightness(now, base),
            Self::Blink(effect) => effect.brightness(now, base),
            Self::Breath(effect) => effect.brightness(now, base),
            Self::Rainbow(effect) => effect.brightness(now, base),
            Self::Sparkle(effect) => effect.brightness(now, base),
            Self::Chase(effect) => effect.brightness(now, base),
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::Solid(_) => EffectId::Solid,
            Self::Blink(_) => EffectId::Blink,
            Self::Breath(_) => EffectId::Breath,
            Self::Rainbow(effect) => match effect.variant() {
                RainbowVariant::Plain => EffectId::Rainbow,
                RainbowVariant::Cycle => EffectId::RainbowCycle,
            },
            Self::Sparkle(_) => EffectId::Sparkle,
            Self::Chase(_) => EffectId::Chase,
        }
    }
}
