//! Frame compositing
//!
//! Renders every resolved segment on the engine in declared order and
//! scatters the virtual pixels into one physical frame. Overlapping segments
//! are not blended: the later segment overwrites the earlier one.

use embassy_time::Instant;

use crate::{
    command::{CommandEnvelope, EffectCommand},
    engine::{EngineBackend, MAX_LEDS},
    error::RenderError,
    math8::clamp_byte,
    segment::{MapCache, ResolvedSegment, resolve},
};

/// Global brightness when a command does not set one
pub const DEFAULT_GLOBAL_BRIGHTNESS: u8 = 255;

/// Effective brightness of a segment: `round(global * segment / 255)`.
pub fn effective_brightness(global: u8, segment: u8) -> u8 {
    clamp_byte(f64::from(global) * f64::from(segment) / 255.0, 0)
}

/// Single-segment command sent to the engine for `segment`.
pub fn segment_command(segment: &ResolvedSegment, global_brightness: u8) -> EffectCommand {
    EffectCommand {
        on: true,
        bri: effective_brightness(global_brightness, segment.brightness),
        seg: segment.payload,
    }
}

/// Render `command` at `now` into a `led_count * 3` byte frame.
///
/// Engines only have to render the first [`MAX_LEDS`] virtual pixels of a
/// segment; pixels mapped past the rendered buffer stay black.
///
/// `cache` must be owned by the caller for as long as maps should be
/// reused. It is cleared when `led_count` changes and only keeps the shapes
/// `command` declares.
pub fn render_composited_frame<E>(
    engine: &mut E,
    command: &CommandEnvelope,
    led_count: usize,
    now: Instant,
    cache: &mut MapCache,
) -> Result<Vec<u8>, RenderError>
where
    E: EngineBackend + ?Sized,
{
    let led_count = led_count.max(1);
    let mut frame = vec![0; led_count * 3];
    cache.sync_led_count(led_count);

    let global_on = command.on.unwrap_or(true);
    let global_brightness = command.bri.unwrap_or(DEFAULT_GLOBAL_BRIGHTNESS);
    if !global_on || global_brightness == 0 {
        return Ok(frame);
    }

    let segments = resolve(command, led_count);
    for segment in &segments {
        let range = segment.start * 3..segment.stop * 3;
        if !segment.on || segment.brightness == 0 {
            frame[range].fill(0);
            continue;
        }

        let payload = serde_json::to_string(&segment_command(segment, global_brightness))
            .map_err(|err| RenderError::Encode(err.to_string()))?;
        engine.init(segment.virtual_length);
        engine.json_command(&payload);
        if !engine.last_error().is_empty() {
            return Err(RenderError::Rejected(engine.last_error().to_string()));
        }

        let rendered = engine.render_frame(now);
        let expected = segment.virtual_length.min(MAX_LEDS) * 3;
        if rendered.len() < expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: rendered.len(),
            });
        }

        let map = cache.get_or_build(segment);
        for (pixel, slot) in frame[range].chunks_exact_mut(3).zip(map.as_slice()) {
            let source = slot.and_then(|virtual_index| {
                let start = virtual_index * 3;
                rendered.get(start..start + 3)
            });
            match source {
                Some(color) => pixel.copy_from_slice(color),
                None => pixel.fill(0),
            }
        }
    }
    cache.retain(segments.iter().map(ResolvedSegment::map_key));

    Ok(frame)
}
