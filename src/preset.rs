//! Stored presets
//!
//! A preset is a command envelope with a display name, addressed by an id in
//! `1..=250`. The store reads and writes the `presets.json` layout: one
//! object keyed by the decimal id.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    command::{CommandEnvelope, PlaylistDescriptor},
    error::PresetError,
    playlist::MAX_PRESET_ID,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(rename = "n", default)]
    pub name: String,
    #[serde(flatten)]
    pub command: CommandEnvelope,
}

impl Preset {
    pub fn new(name: impl Into<String>, command: CommandEnvelope) -> Self {
        Self {
            name: name.into(),
            command,
        }
    }

    /// Playlist started when this preset is loaded
    pub const fn playlist(&self) -> Option<&PlaylistDescriptor> {
        self.command.playlist.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetStore {
    presets: BTreeMap<u8, Preset>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `presets.json` document.
    ///
    /// Entries with a non-numeric or out-of-range key, an empty body, or an
    /// unreadable body are skipped with a warning.
    pub fn from_json(document: &str) -> Result<Self, PresetError> {
        let entries: Map<String, Value> =
            serde_json::from_str(document).map_err(|err| PresetError::Parse(err.to_string()))?;

        let mut store = Self::new();
        for (key, body) in entries {
            let Ok(id) = key.parse::<u32>() else {
                warn!("skipping preset with non-numeric id {key:?}");
                continue;
            };
            if body.as_object().is_some_and(Map::is_empty) {
                debug!("skipping empty preset {id}");
                continue;
            }
            let preset = match serde_json::from_value::<Preset>(body) {
                Ok(preset) => preset,
                Err(err) => {
                    warn!("skipping unreadable preset {id}: {err}");
                    continue;
                }
            };
            if let Err(err) = store.insert(id, preset) {
                warn!("skipping preset: {err}");
            }
        }
        Ok(store)
    }

    /// Serialize the store as a `presets.json` document.
    pub fn to_json(&self) -> Result<String, PresetError> {
        let document: BTreeMap<String, &Preset> = self
            .presets
            .iter()
            .map(|(id, preset)| (id.to_string(), preset))
            .collect();
        serde_json::to_string(&document).map_err(|err| PresetError::Parse(err.to_string()))
    }

    pub fn insert(&mut self, id: u32, preset: Preset) -> Result<Option<Preset>, PresetError> {
        let id = u8::try_from(id)
            .ok()
            .filter(|id| (1..=MAX_PRESET_ID).contains(id))
            .ok_or(PresetError::InvalidId(id))?;
        Ok(self.presets.insert(id, preset))
    }

    pub fn get(&self, id: u8) -> Option<&Preset> {
        self.presets.get(&id)
    }

    /// Like [`Self::get`], but a missing preset is an error
    pub fn load(&self, id: u8) -> Result<&Preset, PresetError> {
        self.get(id).ok_or(PresetError::Missing(id))
    }

    pub fn remove(&mut self, id: u8) -> Option<Preset> {
        self.presets.remove(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.presets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Preset)> {
        self.presets.iter().map(|(id, preset)| (*id, preset))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
