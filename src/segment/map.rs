//! Physical-to-virtual index maps and their cache

use std::collections::HashMap;

use log::debug;

use super::ResolvedSegment;

/// Shape-defining fields of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapKey {
    pub start: usize,
    pub stop: usize,
    pub offset: usize,
    pub group: u8,
    pub spacing: u8,
    pub reverse: bool,
    pub mirror: bool,
}

/// Lookup from physical-local index to virtual pixel index.
///
/// `None` marks a pixel in a spacing gap; it is never lit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentIndexMap {
    local_to_virtual: Vec<Option<usize>>,
    virtual_length: usize,
}

impl SegmentIndexMap {
    pub fn build(segment: &ResolvedSegment) -> Self {
        let length = segment.length;
        let group = usize::from(segment.group);
        let cycle = segment.cycle().max(1);
        let virtual_length = segment.virtual_length.max(1);
        let half = length.saturating_sub(1) / 2;

        let local_to_virtual = (0..length)
            .map(|local| {
                let order = if segment.reverse {
                    length - 1 - local
                } else {
                    local
                };
                let mapped = if segment.mirror && order > half {
                    length - 1 - order
                } else {
                    order
                };

                if mapped % cycle >= group {
                    return None;
                }
                Some((mapped / cycle + segment.offset) % virtual_length)
            })
            .collect();

        Self {
            local_to_virtual,
            virtual_length,
        }
    }

    /// Virtual index for a physical-local pixel
    pub fn get(&self, local: usize) -> Option<usize> {
        self.local_to_virtual.get(local).copied().flatten()
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.local_to_virtual
    }

    pub fn len(&self) -> usize {
        self.local_to_virtual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local_to_virtual.is_empty()
    }

    pub const fn virtual_length(&self) -> usize {
        self.virtual_length
    }
}

/// Index maps keyed by segment shape.
///
/// Owned by the caller and passed to the compositor. The cache is dropped
/// as a whole whenever the physical LED count changes, and the compositor
/// evicts shapes the current command no longer declares.
#[derive(Debug, Default)]
pub struct MapCache {
    maps: HashMap<MapKey, SegmentIndexMap>,
    led_count: Option<usize>,
}

impl MapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached map for `segment`, building it on first use.
    pub fn get_or_build(&mut self, segment: &ResolvedSegment) -> &SegmentIndexMap {
        self.maps
            .entry(segment.map_key())
            .or_insert_with(|| SegmentIndexMap::build(segment))
    }

    /// Drop every map when `led_count` differs from the last one seen.
    pub fn sync_led_count(&mut self, led_count: usize) {
        if self.led_count != Some(led_count) {
            if !self.maps.is_empty() {
                debug!("led count changed to {led_count}, dropping {} maps", self.maps.len());
            }
            self.maps.clear();
            self.led_count = Some(led_count);
        }
    }

    /// Keep only the maps whose shape is in `keys`.
    pub fn retain<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = MapKey>,
    {
        let keys: Vec<MapKey> = keys.into_iter().collect();
        let before = self.maps.len();
        self.maps.retain(|key, _| keys.contains(key));
        if self.maps.len() < before {
            debug!("evicted {} stale segment maps", before - self.maps.len());
        }
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
