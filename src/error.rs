//! Error taxonomy.
//!
//! Only [`RenderError`] is allowed to halt the simulation tick loop; the
//! other kinds are reported and the previous valid state is kept.

/// Malformed command payload.
#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("json parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Playlist descriptor rejected as a whole.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("playlist.ps must be a non-empty array")]
    MissingPresets,
    #[error("playlist.ps contained no valid preset IDs (1..250)")]
    NoValidPresets,
}

/// Preset store rejected an entry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("preset id {0} is outside 1..=250")]
    InvalidId(u32),
    #[error("preset {0} is not stored")]
    Missing(u8),
    #[error("invalid preset file: {0}")]
    Parse(String),
}

/// Failure while producing a composited frame.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("engine returned {actual} bytes, expected at least {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("engine rejected segment payload: {0}")]
    Rejected(String),
    #[error("could not encode segment payload: {0}")]
    Encode(String),
}
