//! Palette sampling derived from a segment's three scheme colors.
//!
//! There are no stored palettes: the palette id selects one of five ways of
//! deriving a color at a 0-255 position from the primary, secondary and
//! tertiary colors.

use core::f64::consts::TAU;

use crate::color::{Hsv, Rgb, blend_unit, hsv_to_rgb};

/// Weight of the hue-derived color in [`PaletteMode::HueTint`].
const HUE_TINT_WEIGHT: f64 = 0.25;

/// Blend mode selected by `palette mod 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMode {
    /// Primary nudged toward the position's hue
    HueTint,
    /// Primary -> secondary -> tertiary
    Gradient,
    /// Sinusoid between primary and secondary
    Oscillate,
    /// Hard thirds of primary, secondary, tertiary
    Step,
    /// Tertiary -> primary
    Reverse,
}

impl PaletteMode {
    pub const fn from_palette(palette: u8) -> Self {
        match palette % 5 {
            0 => Self::HueTint,
            1 => Self::Gradient,
            2 => Self::Oscillate,
            3 => Self::Step,
            _ => Self::Reverse,
        }
    }
}

/// Sample the scheme-derived palette at `position` (0-255).
pub fn palette_color(position: u8, palette: u8, colors: &[Rgb; 3]) -> Rgb {
    let [primary, secondary, tertiary] = *colors;
    let t = f64::from(position) / 255.0;

    match PaletteMode::from_palette(palette) {
        PaletteMode::HueTint => {
            let hue = hsv_to_rgb(Hsv {
                hue: position,
                sat: 255,
                val: 255,
            });
            blend_unit(primary, hue, HUE_TINT_WEIGHT)
        }
        PaletteMode::Gradient => {
            if t < 0.5 {
                blend_unit(primary, secondary, t * 2.0)
            } else {
                blend_unit(secondary, tertiary, (t - 0.5) * 2.0)
            }
        }
        PaletteMode::Oscillate => {
            let weight = 0.5 + 0.5 * libm::sin(t * TAU);
            blend_unit(primary, secondary, weight)
        }
        PaletteMode::Step => match position {
            0..85 => primary,
            85..170 => secondary,
            _ => tertiary,
        },
        PaletteMode::Reverse => blend_unit(tertiary, primary, t),
    }
}
