pub mod channel;
pub mod color;
pub mod command;
pub mod compositor;
pub mod effect;
pub mod engine;
pub mod error;
pub mod math8;
pub mod playlist;
pub mod preset;
pub mod segment;
pub mod simulation;
pub mod transition;

pub use command::{CommandEnvelope, EffectCommand, EffectPayload, PlaylistDescriptor, SegmentPayload};
pub use compositor::render_composited_frame;
pub use effect::{EffectId, EffectSlot};
pub use engine::{EngineBackend, EngineSlot, SoftwareEngine};
pub use error::{CommandError, PlaylistError, PresetError, RenderError};
pub use playlist::{NormalizedPlaylist, PlaylistEvent, PlaylistScheduler};
pub use preset::{Preset, PresetStore};
pub use segment::{MapCache, ResolvedSegment, SegmentIndexMap, resolve};
pub use simulation::{
    FrameResult, Simulation, SimulationChannel, SimulationConfig, SimulationMessage,
    SimulationReceiver, SimulationSender,
};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};
