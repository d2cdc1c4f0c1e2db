use crate::{
    color::{Hsv, Rgb},
    math8::{clamp_byte, lerp_unit, scale_unit},
};

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Convert an HSV triple (all channels 0-255) to RGB.
///
/// Six-sector conversion on the unit interval, rounded back to bytes. This
/// intentionally differs from `smart_leds::hsv::hsv2rgb` (integer rainbow
/// mapping) because golden frames are defined against this curve.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let hf = (f64::from(hsv.hue) / 255.0) * 6.0;
    let sf = f64::from(hsv.sat) / 255.0;
    let vf = f64::from(hsv.val) / 255.0;

    let sector = libm::floor(hf);
    let f = hf - sector;
    let p = vf * (1.0 - sf);
    let q = vf * (1.0 - sf * f);
    let t = vf * (1.0 - sf * (1.0 - f));

    let (r, g, b) = match (sector as u32) % 6 {
        0 => (vf, t, p),
        1 => (q, vf, p),
        2 => (p, vf, t),
        3 => (p, q, vf),
        4 => (t, p, vf),
        _ => (vf, p, q),
    };

    Rgb {
        r: clamp_byte(r * 255.0, 0),
        g: clamp_byte(g * 255.0, 0),
        b: clamp_byte(b * 255.0, 0),
    }
}

/// Linear blend with a `0.0..=1.0` weight, rounded per channel.
#[inline]
pub fn blend_unit(a: Rgb, b: Rgb, t: f64) -> Rgb {
    Rgb {
        r: lerp_unit(a.r, b.r, t),
        g: lerp_unit(a.g, b.g, t),
        b: lerp_unit(a.b, b.b, t),
    }
}

/// Scale every channel by a `0.0..=1.0` factor, rounded per channel.
#[inline]
pub fn scale_color(color: Rgb, factor: f64) -> Rgb {
    Rgb {
        r: scale_unit(color.r, factor),
        g: scale_unit(color.g, factor),
        b: scale_unit(color.b, factor),
    }
}

/// Apply a 0-255 brightness: `round(channel * brightness / 255)`.
#[inline]
pub fn apply_brightness(color: Rgb, brightness: u8) -> Rgb {
    scale_color(color, f64::from(brightness) / 255.0)
}

#[inline]
pub const fn is_black(color: Rgb) -> bool {
    color.r == 0 && color.g == 0 && color.b == 0
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
