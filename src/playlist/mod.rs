//! Playlists
//!
//! A playlist cycles through stored presets on a timer. Descriptors are
//! normalized once when a playlist starts; the scheduler then works on the
//! normalized form with simulated time passed in explicitly.

mod normalize;
mod scheduler;

pub use normalize::{
    DEFAULT_DURATION, DEFAULT_TRANSITION, END_RETURN_TO_SOURCE, EndAction, MAX_ENTRIES,
    MAX_PRESET_ID, MAX_TIMING, Normalized, NormalizedPlaylist, PlaylistEntry,
};
pub use scheduler::{PlaylistEvent, PlaylistScheduler};
