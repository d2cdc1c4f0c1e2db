use embassy_time::Duration;

use crate::{
    command::{PlaylistDescriptor, Timing},
    error::PlaylistError,
    math8::clamp_int,
};

/// Highest preset id a playlist may reference
pub const MAX_PRESET_ID: u8 = 250;
/// Longest playlist kept after normalization
pub const MAX_ENTRIES: usize = 100;
/// Upper bound for duration and transition, in tenths of a second
pub const MAX_TIMING: u16 = 65530;
pub const DEFAULT_DURATION: u16 = 100;
pub const DEFAULT_TRANSITION: u16 = 0;
/// End value meaning "return to the preset the playlist started from"
pub const END_RETURN_TO_SOURCE: u8 = 255;

const TENTH_MS: u64 = 100;

/// One step of a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub preset: u8,
    /// Tenths of a second
    pub duration: u16,
    /// Tenths of a second
    pub transition: u16,
}

impl PlaylistEntry {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration) * TENTH_MS)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(u64::from(self.transition) * TENTH_MS)
    }
}

/// What happens after the last pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndAction {
    /// Stop and keep the current state
    None,
    /// Load this preset, then stop
    Preset(u8),
    /// Reload the preset active when the playlist started
    ReturnToSource,
}

/// Playlist after clamping and length reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPlaylist {
    /// Never empty
    pub entries: Vec<PlaylistEntry>,
    /// `0` repeats forever, `N` plays the list `N` times
    pub repeat: u16,
    pub end: u8,
    pub shuffle: bool,
}

/// Normalization outcome with the warnings it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub playlist: NormalizedPlaylist,
    pub warnings: Vec<String>,
}

impl NormalizedPlaylist {
    /// Validate and clamp a descriptor.
    ///
    /// A descriptor without any valid preset id is rejected as a whole;
    /// everything else is corrected and reported in
    /// [`Normalized::warnings`].
    pub fn normalize(descriptor: &PlaylistDescriptor) -> Result<Normalized, PlaylistError> {
        let mut warnings = Vec::new();

        let Some(raw_presets) = &descriptor.ps else {
            return Err(PlaylistError::MissingPresets);
        };
        let mut presets: Vec<u8> = raw_presets
            .iter()
            .map(|&id| clamp_int(id, 0, 255, 0))
            .filter(|id| (1..=i32::from(MAX_PRESET_ID)).contains(id))
            .filter_map(|id| u8::try_from(id).ok())
            .collect();
        if presets.is_empty() {
            return Err(PlaylistError::NoValidPresets);
        }
        if presets.len() > MAX_ENTRIES {
            presets.truncate(MAX_ENTRIES);
            warnings.push(format!("playlist.ps was clamped to {MAX_ENTRIES} entries"));
        }

        let len = presets.len();
        let durations = timing_values(
            descriptor.dur.as_ref(),
            len,
            DEFAULT_DURATION,
            "dur",
            &mut warnings,
        );
        let transitions = timing_values(
            descriptor.transition.as_ref(),
            len,
            DEFAULT_TRANSITION,
            "transition",
            &mut warnings,
        );

        let mut shuffle = descriptor.r.unwrap_or(false);
        let repeat = clamp_int(descriptor.repeat.unwrap_or(0.0), -32768, 32767, 0);
        let repeat = if repeat < 0 {
            shuffle = true;
            warnings
                .push("playlist.repeat < 0 normalized to infinite repeat with shuffle enabled".into());
            0
        } else {
            u16::try_from(repeat).unwrap_or(0)
        };

        let end = u8::try_from(clamp_int(descriptor.end.unwrap_or(0.0), 0, 255, 0)).unwrap_or(0);
        let end = if end > MAX_PRESET_ID && end != END_RETURN_TO_SOURCE {
            warnings.push("playlist.end > 250 (except 255) normalized to 0".into());
            0
        } else {
            end
        };

        let entries = presets
            .into_iter()
            .zip(durations.into_iter().zip(transitions))
            .map(|(preset, (duration, transition))| PlaylistEntry {
                preset,
                duration,
                transition,
            })
            .collect();

        Ok(Normalized {
            playlist: Self {
                entries,
                repeat,
                end,
                shuffle,
            },
            warnings,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn presets(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().map(|entry| entry.preset)
    }

    pub const fn end_action(&self) -> EndAction {
        match self.end {
            0 => EndAction::None,
            END_RETURN_TO_SOURCE => EndAction::ReturnToSource,
            preset => EndAction::Preset(preset),
        }
    }
}

/// Clamp a timing field and stretch it to `len` values.
///
/// A scalar is broadcast silently. A short array repeats its last value and a
/// long one is cut; both add a warning.
fn timing_values(
    timing: Option<&Timing>,
    len: usize,
    fallback: u16,
    key: &str,
    warnings: &mut Vec<String>,
) -> Vec<u16> {
    let clamp = |value: f64| {
        u16::try_from(clamp_int(value, 0, i32::from(MAX_TIMING), i32::from(fallback)))
            .unwrap_or(fallback)
    };

    let mut values = match timing {
        None => vec![fallback; len],
        Some(Timing::Scalar(value)) => vec![clamp(*value); len],
        Some(Timing::PerEntry(values)) => values.iter().copied().map(clamp).collect(),
    };

    if values.is_empty() {
        values.push(fallback);
    }
    if values.len() < len {
        let last = values.last().copied().unwrap_or(fallback);
        values.resize(len, last);
        warnings.push(format!("playlist.{key} was extended to match playlist.ps length"));
    }
    if values.len() > len {
        values.truncate(len);
        warnings.push(format!("playlist.{key} was truncated to playlist.ps length"));
    }
    values
}
