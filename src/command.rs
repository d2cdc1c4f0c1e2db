//! Command envelope wire types.
//!
//! The envelope arrives pre-validated from the host, but numeric fields are
//! still read leniently: any JSON number is accepted, then rounded and
//! clamped into its range. Non-finite values behave as if the field were
//! absent.

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::{BLACK, Rgb, rgb_from_u32};
use crate::error::CommandError;
use crate::math8::{clamp_byte, clamp_non_negative};

/// Primary color used when a command does not carry one.
pub const DEFAULT_PRIMARY: Rgb = rgb_from_u32(0xFF_AA_00);

/// Default scheme colors: amber, black, black.
pub const DEFAULT_COLORS: [Rgb; 3] = [DEFAULT_PRIMARY, BLACK, BLACK];

/// Top-level command: power, brightness, segments and an optional playlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(
        default,
        deserialize_with = "byte_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub bri: Option<u8>,
    #[serde(default, skip_serializing_if = "SegmentList::is_empty")]
    pub seg: SegmentList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist: Option<PlaylistDescriptor>,
    /// Advance the running playlist to its next entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub np: Option<bool>,
}

impl CommandEnvelope {
    /// Parse an envelope from JSON text.
    pub fn from_json(payload: &str) -> Result<Self, CommandError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Serialize the envelope back to compact JSON.
    pub fn to_json(&self) -> Result<String, CommandError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Ordered segment list. Empty when the command declared none.
    pub fn segments(&self) -> &[SegmentPayload] {
        self.seg.as_slice()
    }
}

/// `seg` is either a single object or an array on the wire; it is always a
/// list once parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentList(pub Vec<SegmentPayload>);

impl SegmentList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[SegmentPayload] {
        &self.0
    }
}

impl From<Vec<SegmentPayload>> for SegmentList {
    fn from(segments: Vec<SegmentPayload>) -> Self {
        Self(segments)
    }
}

impl From<SegmentPayload> for SegmentList {
    fn from(segment: SegmentPayload) -> Self {
        Self(vec![segment])
    }
}

impl<'de> Deserialize<'de> for SegmentList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<SegmentPayload>),
            One(Box<SegmentPayload>),
        }

        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            Some(OneOrMany::Many(segments)) => Self(segments),
            Some(OneOrMany::One(segment)) => Self(vec![*segment]),
            None => Self::default(),
        })
    }
}

impl Serialize for SegmentList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }
}

/// One declared segment, as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentPayload {
    /// Segment id
    #[serde(default, deserialize_with = "index_field", skip_serializing_if = "Option::is_none")]
    pub i: Option<u32>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, deserialize_with = "index_field", skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, deserialize_with = "index_field", skip_serializing_if = "Option::is_none")]
    pub stop: Option<u32>,
    #[serde(default, deserialize_with = "index_field", skip_serializing_if = "Option::is_none")]
    pub ofs: Option<u32>,
    #[serde(
        default,
        rename = "startY",
        deserialize_with = "index_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_y: Option<u32>,
    #[serde(
        default,
        rename = "stopY",
        deserialize_with = "index_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop_y: Option<u32>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mi: Option<bool>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub grp: Option<u8>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub spc: Option<u8>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub fx: Option<u8>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub sx: Option<u8>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub ix: Option<u8>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub pal: Option<u8>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub c1: Option<u8>,
    #[serde(default, deserialize_with = "byte_field", skip_serializing_if = "Option::is_none")]
    pub c2: Option<u8>,
    /// Up to three colors, each `[r, g, b]`
    #[serde(default, deserialize_with = "color_field", skip_serializing_if = "Option::is_none")]
    pub col: Option<Vec<Vec<u8>>>,
}

impl SegmentPayload {
    /// Resolve the color slots: a missing list yields the defaults, a
    /// present list keeps slot 0 amber and slots 1/2 black where absent or
    /// empty. Missing channels read as 0.
    pub fn colors(&self) -> [Rgb; 3] {
        let Some(col) = &self.col else {
            return DEFAULT_COLORS;
        };

        let mut colors = DEFAULT_COLORS;
        for (slot, color) in colors.iter_mut().enumerate() {
            let Some(channels) = col.get(slot).filter(|c| !c.is_empty()) else {
                continue;
            };
            let channel = |index: usize| channels.get(index).copied().unwrap_or(0);
            *color = Rgb {
                r: channel(0),
                g: channel(1),
                b: channel(2),
            };
        }
        colors
    }
}

/// Timing field that may be one scalar or one value per playlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timing {
    Scalar(f64),
    PerEntry(Vec<f64>),
}

/// Playlist descriptor as received, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDescriptor {
    /// Preset ids
    #[serde(default)]
    pub ps: Option<Vec<f64>>,
    /// Per-entry duration in tenths of a second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dur: Option<Timing>,
    /// Per-entry transition in tenths of a second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<Timing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Shuffle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<bool>,
}

/// Single-segment payload handed to an engine backend for one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectCommand {
    pub on: bool,
    pub bri: u8,
    pub seg: EffectPayload,
}

/// Clamped effect parameters of one resolved segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectPayload {
    pub fx: u8,
    pub sx: u8,
    pub ix: u8,
    pub pal: u8,
    pub c1: u8,
    pub c2: u8,
    pub colors: [Rgb; 3],
}

impl Serialize for EffectPayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let col: [[u8; 3]; 3] = self.colors.map(|c| [c.r, c.g, c.b]);
        let mut state = serializer.serialize_struct("EffectPayload", 7)?;
        state.serialize_field("fx", &self.fx)?;
        state.serialize_field("sx", &self.sx)?;
        state.serialize_field("ix", &self.ix)?;
        state.serialize_field("pal", &self.pal)?;
        state.serialize_field("c1", &self.c1)?;
        state.serialize_field("c2", &self.c2)?;
        state.serialize_field("col", &col)?;
        state.end()
    }
}

fn byte_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| clamp_byte(v, 0)))
}

fn index_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.and_then(clamp_non_negative))
}

fn color_field<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Vec<u8>>>, D::Error> {
    let value = Option::<Vec<Option<Vec<f64>>>>::deserialize(deserializer)?;
    Ok(value.map(|slots| {
        slots
            .into_iter()
            .take(3)
            .map(|slot| {
                slot.unwrap_or_default()
                    .into_iter()
                    .take(3)
                    .map(|channel| clamp_byte(channel, 0))
                    .collect()
            })
            .collect()
    }))
}
