//! Simulation driver
//!
//! Owns the engine, map cache, active command, presets and playlist, and
//! advances simulated time by one fixed interval per [`Simulation::tick`].
//! Hosts talk to it only through a [`SimulationChannel`].

use embassy_time::{Duration, Instant};
use log::{debug, error, info, warn};
use serde::Deserialize;

use crate::{
    channel::{Channel, Receiver, Sender},
    command::CommandEnvelope,
    compositor::render_composited_frame,
    engine::{EngineBackend, EngineSlot},
    error::CommandError,
    playlist::{PlaylistEvent, PlaylistScheduler},
    preset::PresetStore,
    segment::MapCache,
    transition::FrameTransition,
};

pub const DEFAULT_LED_COUNT: usize = 300;
pub const DEFAULT_TICK_RATE: u32 = 30;

/// Milliseconds of simulated time per tick at `tick_rate` ticks per second.
pub fn tick_interval(tick_rate: u32) -> Duration {
    Duration::from_millis(u64::from((1000 / tick_rate.max(1)).max(1)))
}

/// Startup configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub led_count: usize,
    /// Ticks per second
    pub tick_rate: u32,
    pub running: bool,
    /// Simulated time after init and reset
    pub start_millis: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            led_count: DEFAULT_LED_COUNT,
            tick_rate: DEFAULT_TICK_RATE,
            running: true,
            start_millis: 0,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(payload: &str) -> Result<Self, CommandError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.tick_rate)
    }
}

/// Message posted by the host
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationMessage {
    /// Re-initialize the strip and the tick rate; the clock restarts
    Init { led_count: usize, tick_rate: u32 },
    /// Pause or resume; resuming clears a recorded error
    Running(bool),
    /// Command envelope as JSON text
    Json(String),
    /// The physical LED count changed
    Topology { led_count: usize },
    /// Restart the clock without stopping the playlist
    Reset,
    ApplyPreset(u8),
    StopPlaylist,
    /// Skip to the next playlist entry
    NextEntry,
}

/// Type alias for the simulation channel
pub type SimulationChannel<const SIZE: usize> = Channel<SimulationMessage, SIZE>;

/// Type alias for the simulation sender
pub type SimulationSender<'a, const SIZE: usize> = Sender<'a, SimulationMessage, SIZE>;

/// Type alias for the simulation receiver
pub type SimulationReceiver<'a, const SIZE: usize> = Receiver<'a, SimulationMessage, SIZE>;

/// Output of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult<'a> {
    pub simulated_millis: u64,
    /// `led_count * 3` bytes
    pub frame: &'a [u8],
    pub error: Option<&'a str>,
}

pub struct Simulation<'a, const SIZE: usize> {
    messages: SimulationReceiver<'a, SIZE>,
    engine: EngineSlot,
    cache: MapCache,
    command: CommandEnvelope,
    presets: PresetStore,
    playlist: PlaylistScheduler,
    transition: FrameTransition,

    led_count: usize,
    interval: Duration,
    start: Instant,
    now: Instant,
    running: bool,
    frame: Vec<u8>,
    last_error: Option<String>,
}

impl<'a, const SIZE: usize> Simulation<'a, SIZE> {
    pub fn new(
        messages: SimulationReceiver<'a, SIZE>,
        engine: EngineSlot,
        config: &SimulationConfig,
    ) -> Self {
        let led_count = config.led_count.max(1);
        let start = Instant::from_millis(config.start_millis);
        let mut simulation = Self {
            messages,
            engine,
            cache: MapCache::new(),
            command: CommandEnvelope::default(),
            presets: PresetStore::new(),
            playlist: PlaylistScheduler::new(),
            transition: FrameTransition::new(),
            led_count,
            interval: config.tick_interval(),
            start,
            now: start,
            running: config.running,
            frame: vec![0; led_count * 3],
            last_error: None,
        };
        simulation.engine.init(led_count);
        info!(
            "simulation ready: {led_count} leds, {} ms ticks, {} engine",
            simulation.interval.as_millis(),
            simulation.engine.kind()
        );
        simulation
    }

    /// Replace the preset store
    #[must_use]
    pub fn with_presets(mut self, presets: PresetStore) -> Self {
        self.presets = presets;
        self
    }

    pub const fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn presets_mut(&mut self) -> &mut PresetStore {
        &mut self.presets
    }

    pub const fn command(&self) -> &CommandEnvelope {
        &self.command
    }

    pub const fn playlist(&self) -> &PlaylistScheduler {
        &self.playlist
    }

    pub const fn engine(&self) -> &EngineSlot {
        &self.engine
    }

    /// Last successfully rendered frame
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub const fn now(&self) -> Instant {
        self.now
    }

    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Process one tick
    ///
    /// Drains pending messages, then, when running, advances the clock by
    /// one interval, steps the playlist and renders. Returns `None` while
    /// paused.
    pub fn tick(&mut self) -> Option<FrameResult<'_>> {
        self.process_messages();
        if !self.running {
            return None;
        }

        self.now += self.interval;
        if let Some(event) = self.playlist.tick(self.now) {
            self.apply_event(event);
        }
        self.render();

        Some(FrameResult {
            simulated_millis: self.now.as_millis(),
            frame: &self.frame,
            error: self.last_error.as_deref(),
        })
    }

    /// Process pending messages from the channel (non-blocking)
    fn process_messages(&mut self) {
        for message in self.messages.try_iter() {
            self.handle_message(message);
        }
    }

    fn handle_message(&mut self, message: SimulationMessage) {
        match message {
            SimulationMessage::Init {
                led_count,
                tick_rate,
            } => {
                self.interval = tick_interval(tick_rate);
                self.resize(led_count);
                self.now = self.start;
                self.playlist.rebase(self.now);
                info!("simulation re-initialized: {} leds", self.led_count);
            }
            SimulationMessage::Running(running) => {
                self.running = running;
                if running {
                    self.last_error = None;
                }
            }
            SimulationMessage::Json(payload) => match CommandEnvelope::from_json(&payload) {
                Ok(command) => {
                    let source = self.playlist.active_preset();
                    self.install_command(command, source);
                }
                Err(err) => {
                    warn!("rejected command: {err}");
                    self.last_error = Some(err.to_string());
                }
            },
            SimulationMessage::Topology { led_count } => self.resize(led_count),
            SimulationMessage::Reset => {
                self.now = self.start;
                self.engine.init(self.led_count);
                self.transition.cancel();
                self.playlist.rebase(self.now);
            }
            SimulationMessage::ApplyPreset(id) => self.load_preset(id),
            SimulationMessage::StopPlaylist => self.playlist.stop(),
            SimulationMessage::NextEntry => self.playlist.request_advance(),
        }
    }

    fn resize(&mut self, led_count: usize) {
        self.led_count = led_count.max(1);
        self.engine.init(self.led_count);
        self.cache.clear();
        self.transition.cancel();
        self.frame.resize(self.led_count * 3, 0);
    }

    /// Install a parsed envelope. An envelope that only carries playlist
    /// controls leaves the rendered command in place.
    fn install_command(&mut self, mut command: CommandEnvelope, source: Option<u8>) {
        if self.running {
            self.last_error = None;
        }
        if command.np == Some(true) {
            self.playlist.request_advance();
        }

        let playlist = command.playlist.take();
        let carries_state = command.on.is_some() || command.bri.is_some() || !command.seg.is_empty();
        if carries_state || (playlist.is_none() && command.np.is_none()) {
            self.set_command(command);
        }

        if let Some(descriptor) = playlist {
            match self.playlist.start(&descriptor, source) {
                Ok(warnings) => warnings.iter().for_each(|w| warn!("{w}")),
                Err(err) => warn!("playlist rejected: {err}"),
            }
        }
    }

    fn set_command(&mut self, command: CommandEnvelope) {
        self.command = command;
        self.cache.clear();
    }

    /// Load a stored preset by hand. A preset carrying a playlist starts it
    /// with the previously active preset as its source.
    fn load_preset(&mut self, id: u8) {
        let preset = match self.presets.load(id) {
            Ok(preset) => preset.clone(),
            Err(err) => {
                warn!("{err}");
                return;
            }
        };

        let source = self.playlist.active_preset();
        self.playlist.activate_preset(id);
        info!("preset {id} ({}) loaded", preset.name);
        self.install_command(preset.command, source);
    }

    fn apply_event(&mut self, event: PlaylistEvent) {
        match event {
            PlaylistEvent::Activate { preset, transition } => {
                let Some(stored) = self.presets.get(preset) else {
                    warn!("playlist references missing preset {preset}");
                    return;
                };
                let mut command = stored.command.clone();
                if command.playlist.take().is_some() {
                    debug!("ignoring nested playlist in preset {preset}");
                }
                self.set_command(command);
                self.transition.start(&self.frame, transition, self.now);
            }
            PlaylistEvent::Finished { preset: Some(preset) } => self.load_preset(preset),
            PlaylistEvent::Finished { preset: None } => {}
        }
    }

    fn render(&mut self) {
        match render_composited_frame(
            &mut self.engine,
            &self.command,
            self.led_count,
            self.now,
            &mut self.cache,
        ) {
            Ok(mut frame) => {
                self.transition.apply(self.now, &mut frame);
                self.frame = frame;
            }
            Err(err) => {
                error!("render failed, pausing simulation: {err}");
                self.running = false;
                self.transition.cancel();
                self.last_error = Some(err.to_string());
            }
        }
    }
}
