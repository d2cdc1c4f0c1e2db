//! 8-bit and integer helpers shared by effects, segments and the scheduler.
//!
//! Everything here is a pure function of its arguments so rendered frames stay
//! reproducible for a given `(command, time)` input.

use embassy_time::Duration;

/// Multiplier used to spread indices across the hash input space.
pub const GOLDEN_RATIO_32: u64 = 0x9e37_79b9;

/// Multiplier applied to simulated milliseconds when seeding noise.
pub const TIME_STRIDE: u64 = 31;

/// Round a float and clamp it into `0..=255`.
///
/// Non-finite input yields `fallback`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_byte(value: f64, fallback: u8) -> u8 {
    if !value.is_finite() {
        return fallback;
    }
    libm::round(value).clamp(0.0, 255.0) as u8
}

/// Round a float and clamp it to a non-negative integer.
///
/// Non-finite input yields `None`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_non_negative(value: f64) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    Some(libm::round(value).clamp(0.0, f64::from(u32::MAX)) as u32)
}

/// Round a float into an inclusive integer range.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn clamp_int(value: f64, min: i32, max: i32, fallback: i32) -> i32 {
    if !value.is_finite() {
        return fallback;
    }
    libm::round(value).clamp(f64::from(min), f64::from(max)) as i32
}

/// Scale a channel by a `0.0..=1.0` factor with rounding.
#[inline]
pub fn scale_unit(value: u8, factor: f64) -> u8 {
    clamp_byte(f64::from(value) * factor, 0)
}

/// Linear interpolation between two channels with a `0.0..=1.0` weight.
#[inline]
pub fn lerp_unit(a: u8, b: u8, t: f64) -> u8 {
    let a = f64::from(a);
    let b = f64::from(b);
    clamp_byte(a + (b - a) * t, 0)
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16;
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    );
    partial = partial.wrapping_add(0x8000);

    (partial >> 16) as u8
}

/// Calculate progress (0-255) based on elapsed time and duration
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn progress8(elapsed: Duration, duration: Duration) -> u8 {
    if duration.as_millis() == 0 {
        return 255;
    }
    if elapsed.as_millis() >= duration.as_millis() {
        return 255;
    }

    ((elapsed.as_millis() * 255) / duration.as_millis()) as u8
}

/// 32-bit xorshift step used for sparkle positions and playlist shuffles.
///
/// The seed is wrapped to 32 bits and the right shift is arithmetic on the
/// signed value; golden vectors depend on both.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub const fn xorshift32(seed: u64) -> u32 {
    let mut x = seed as u32 as i32;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    x as u32
}

/// Hash seed for a position at a simulated timestamp.
#[inline]
pub const fn noise_seed(index: u64, millis: u64) -> u64 {
    index
        .wrapping_mul(GOLDEN_RATIO_32)
        .wrapping_add(millis.wrapping_mul(TIME_STRIDE))
}
