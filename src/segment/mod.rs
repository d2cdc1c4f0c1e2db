//! Segment resolution
//!
//! Turns the declared segments of a command into [`ResolvedSegment`]s with
//! clamped bounds, grouping, offset and effect payload. Degenerate geometry
//! never fails: it is corrected, dropped, or replaced by one full-strip
//! default segment.

mod map;

pub use map::{MapCache, MapKey, SegmentIndexMap};

use crate::command::{CommandEnvelope, DEFAULT_COLORS, EffectPayload, SegmentPayload};
use crate::effect::EffectId;

pub const DEFAULT_SEGMENT_BRIGHTNESS: u8 = 125;
pub const DEFAULT_SPEED: u8 = 128;
pub const DEFAULT_INTENSITY: u8 = 128;

/// Effect parameters of a segment that declares none.
pub const DEFAULT_PAYLOAD: EffectPayload = EffectPayload {
    fx: EffectId::Rainbow.as_raw(),
    sx: DEFAULT_SPEED,
    ix: DEFAULT_INTENSITY,
    pal: 0,
    c1: 0,
    c2: 0,
    colors: DEFAULT_COLORS,
};

/// One segment after clamping, ready to be mapped and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSegment {
    /// Position in the declared segment list
    pub index: usize,
    pub id: Option<u32>,
    pub name: Option<String>,
    pub start: usize,
    /// Exclusive
    pub stop: usize,
    pub length: usize,
    pub virtual_length: usize,
    pub on: bool,
    pub brightness: u8,
    pub offset: usize,
    pub group: u8,
    pub spacing: u8,
    pub reverse: bool,
    pub mirror: bool,
    pub start_y: Option<u32>,
    pub stop_y: Option<u32>,
    pub payload: EffectPayload,
}

impl ResolvedSegment {
    /// Full-strip segment used when nothing else survives resolution.
    pub fn full_strip(led_count: usize) -> Self {
        let led_count = led_count.max(1);
        Self {
            index: 0,
            id: None,
            name: None,
            start: 0,
            stop: led_count,
            length: led_count,
            virtual_length: led_count,
            on: true,
            brightness: DEFAULT_SEGMENT_BRIGHTNESS,
            offset: 0,
            group: 1,
            spacing: 0,
            reverse: false,
            mirror: false,
            start_y: None,
            stop_y: None,
            payload: DEFAULT_PAYLOAD,
        }
    }

    /// Physical LEDs per group/spacing cycle.
    pub fn cycle(&self) -> usize {
        usize::from(self.group) + usize::from(self.spacing)
    }

    /// Cache key covering every shape-defining field.
    pub const fn map_key(&self) -> MapKey {
        MapKey {
            start: self.start,
            stop: self.stop,
            offset: self.offset,
            group: self.group,
            spacing: self.spacing,
            reverse: self.reverse,
            mirror: self.mirror,
        }
    }

    fn from_payload(index: usize, seg: &SegmentPayload, led_count: usize) -> Option<Self> {
        let to_index = |value: Option<u32>| value.map(|v| usize::try_from(v).unwrap_or(usize::MAX));

        let start = to_index(seg.start).unwrap_or(0).min(led_count - 1);
        let stop = to_index(seg.stop)
            .unwrap_or(led_count)
            .min(led_count)
            .max(start + 1);
        let length = stop - start;
        if length == 0 {
            return None;
        }

        let group = seg.grp.unwrap_or(1).max(1);
        let spacing = seg.spc.unwrap_or(0);
        let cycle = usize::from(group) + usize::from(spacing);
        let virtual_length = length.div_ceil(cycle).max(1);
        let offset = to_index(seg.ofs).unwrap_or(0) % virtual_length;

        Some(Self {
            index,
            id: seg.i,
            name: seg.n.clone(),
            start,
            stop,
            length,
            virtual_length,
            on: seg.on.unwrap_or(true),
            brightness: seg.bri.unwrap_or(DEFAULT_SEGMENT_BRIGHTNESS),
            offset,
            group,
            spacing,
            reverse: seg.rev.unwrap_or(false),
            mirror: seg.mi.unwrap_or(false),
            start_y: seg.start_y,
            stop_y: seg.stop_y,
            payload: EffectPayload {
                fx: seg.fx.unwrap_or(DEFAULT_PAYLOAD.fx),
                sx: seg.sx.unwrap_or(DEFAULT_SPEED),
                ix: seg.ix.unwrap_or(DEFAULT_INTENSITY),
                pal: seg.pal.unwrap_or(0),
                c1: seg.c1.unwrap_or(0),
                c2: seg.c2.unwrap_or(0),
                colors: seg.colors(),
            },
        })
    }
}

/// Resolve every declared segment of `command` against the physical strip.
///
/// Declared order is preserved. An empty or fully degenerate list yields a
/// single full-strip default segment.
pub fn resolve(command: &CommandEnvelope, led_count: usize) -> Vec<ResolvedSegment> {
    let led_count = led_count.max(1);
    let resolved: Vec<ResolvedSegment> = command
        .segments()
        .iter()
        .enumerate()
        .filter_map(|(index, seg)| ResolvedSegment::from_payload(index, seg, led_count))
        .collect();

    if resolved.is_empty() {
        return vec![ResolvedSegment::full_strip(led_count)];
    }
    resolved
}
