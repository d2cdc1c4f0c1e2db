//! Playlist scheduler
//!
//! Timed state machine driving a normalized playlist. The scheduler never
//! loads presets itself; each [`PlaylistScheduler::tick`] returns the event
//! the caller has to apply.

use embassy_time::{Duration, Instant};
use log::{debug, info};

use super::{EndAction, Normalized, NormalizedPlaylist, PlaylistEntry};
use crate::{
    command::PlaylistDescriptor,
    error::PlaylistError,
    math8::{noise_seed, xorshift32},
};

/// Work the caller must perform after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistEvent {
    /// Load `preset`, crossfading over `transition`
    Activate { preset: u8, transition: Duration },
    /// The playlist ended; load `preset` if set
    Finished { preset: Option<u8> },
}

#[derive(Debug, Clone)]
struct PlaylistRuntime {
    playlist: NormalizedPlaylist,
    /// Entry indices in play order
    order: Vec<usize>,
    /// Position in `order`; `None` before the first activation
    index: Option<usize>,
    last_advance: Instant,
    /// Extra passes left after the current one; `None` repeats forever
    remaining: Option<u16>,
    pending_immediate: bool,
    advance_requested: bool,
    source: Option<u8>,
}

impl PlaylistRuntime {
    fn new(playlist: NormalizedPlaylist, source: Option<u8>) -> Self {
        let remaining = playlist.repeat.checked_sub(1);
        Self {
            order: (0..playlist.len()).collect(),
            playlist,
            index: None,
            last_advance: Instant::from_millis(0),
            remaining,
            pending_immediate: true,
            advance_requested: false,
            source,
        }
    }

    fn current_entry(&self) -> Option<&PlaylistEntry> {
        let index = self.index?;
        self.playlist.entries.get(*self.order.get(index)?)
    }

    fn is_due(&self, now: Instant) -> bool {
        if self.pending_immediate || self.advance_requested {
            return true;
        }
        self.current_entry().is_none_or(|entry| {
            now.saturating_duration_since(self.last_advance) >= entry.duration()
        })
    }

    /// Deterministic Fisher-Yates over the play order.
    #[allow(clippy::cast_possible_truncation)]
    fn reshuffle(&mut self, now: Instant) {
        for i in (1..self.order.len()).rev() {
            let noise = xorshift32(noise_seed(i as u64, now.as_millis()));
            let j = noise as usize % (i + 1);
            self.order.swap(i, j);
        }
    }
}

/// Playlist state: idle when no runtime is present.
#[derive(Debug, Clone, Default)]
pub struct PlaylistScheduler {
    runtime: Option<PlaylistRuntime>,
    active_preset: Option<u8>,
}

impl PlaylistScheduler {
    pub const fn new() -> Self {
        Self {
            runtime: None,
            active_preset: None,
        }
    }

    /// Normalize `descriptor` and start it. The first entry activates on the
    /// next tick.
    ///
    /// An invalid descriptor leaves the current state untouched.
    pub fn start(
        &mut self,
        descriptor: &PlaylistDescriptor,
        source: Option<u8>,
    ) -> Result<Vec<String>, PlaylistError> {
        let Normalized { playlist, warnings } = NormalizedPlaylist::normalize(descriptor)?;
        self.start_normalized(playlist, source);
        Ok(warnings)
    }

    pub fn start_normalized(&mut self, playlist: NormalizedPlaylist, source: Option<u8>) {
        info!(
            "playlist started with {} entries (repeat {}, end {}, shuffle {})",
            playlist.len(),
            playlist.repeat,
            playlist.end,
            playlist.shuffle
        );
        self.runtime = Some(PlaylistRuntime::new(playlist, source));
    }

    /// Go idle unconditionally.
    pub fn stop(&mut self) {
        if self.runtime.take().is_some() {
            info!("playlist stopped");
        }
    }

    /// Advance on the next tick without waiting for the entry duration.
    pub fn request_advance(&mut self) {
        if let Some(runtime) = &mut self.runtime {
            runtime.advance_requested = true;
        }
    }

    /// Re-anchor the current entry's start after the clock was reset.
    pub fn rebase(&mut self, now: Instant) {
        if let Some(runtime) = &mut self.runtime {
            runtime.last_advance = now;
        }
    }

    /// Record a preset loaded outside the playlist.
    pub fn activate_preset(&mut self, preset: u8) {
        self.active_preset = Some(preset);
    }

    pub const fn active_preset(&self) -> Option<u8> {
        self.active_preset
    }

    pub const fn is_running(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn playlist(&self) -> Option<&NormalizedPlaylist> {
        self.runtime.as_ref().map(|runtime| &runtime.playlist)
    }

    /// Position in the play order of the active entry
    pub fn current_index(&self) -> Option<usize> {
        self.runtime.as_ref().and_then(|runtime| runtime.index)
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.runtime.as_ref().and_then(PlaylistRuntime::current_entry)
    }

    /// Presets in the current play order
    pub fn order(&self) -> Vec<u8> {
        self.runtime
            .as_ref()
            .map(|runtime| {
                runtime
                    .order
                    .iter()
                    .filter_map(|&i| runtime.playlist.entries.get(i))
                    .map(|entry| entry.preset)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Extra passes left after the current one; `None` while idle or when
    /// repeating forever.
    pub fn remaining_repeats(&self) -> Option<u16> {
        self.runtime.as_ref().and_then(|runtime| runtime.remaining)
    }

    /// Advance the playlist if due at `now`.
    pub fn tick(&mut self, now: Instant) -> Option<PlaylistEvent> {
        let runtime = self.runtime.as_mut()?;
        if !runtime.is_due(now) {
            return None;
        }

        let next = match runtime.index {
            None => 0,
            Some(index) => {
                let next = (index + 1) % runtime.order.len();
                if next == 0 {
                    if runtime.remaining == Some(0) {
                        return Some(self.finish());
                    }
                    if let Some(left) = &mut runtime.remaining {
                        *left -= 1;
                    }
                    if runtime.playlist.shuffle {
                        runtime.reshuffle(now);
                    }
                }
                next
            }
        };

        runtime.index = Some(next);
        runtime.last_advance = now;
        runtime.pending_immediate = false;
        runtime.advance_requested = false;

        let entry = *runtime.current_entry()?;
        debug!("playlist entry {next} activates preset {}", entry.preset);
        self.active_preset = Some(entry.preset);
        Some(PlaylistEvent::Activate {
            preset: entry.preset,
            transition: entry.transition(),
        })
    }

    fn finish(&mut self) -> PlaylistEvent {
        let Some(runtime) = self.runtime.take() else {
            return PlaylistEvent::Finished { preset: None };
        };

        let preset = match runtime.playlist.end_action() {
            EndAction::None => None,
            EndAction::Preset(preset) => Some(preset),
            EndAction::ReturnToSource => runtime.source,
        };
        info!("playlist finished, end preset {preset:?}");
        if let Some(preset) = preset {
            self.active_preset = Some(preset);
        }
        PlaylistEvent::Finished { preset }
    }
}
