//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One owned `SimulationState`, advanced by `tick`
//! - Randomness only through an injected `RandomSource`
//! - Effects and audio are reported as data (particles, `GameEvent`s)

pub mod arc;
pub mod collision;
pub mod geometry;
pub mod lifecycle;
pub mod particles;
pub mod random;
pub mod slow_motion;
pub mod spawner;
pub mod stars;
pub mod state;
pub mod text;
pub mod tick;
pub mod wheel;

pub use arc::AnnularSector;
pub use collision::{Resolution, resolve};
pub use geometry::{ObjectOutline, SegmentBand, WheelTier, boundary_path, boundary_radius, object_outline, segment_band};
pub use particles::{Particle, ParticleSystem, ParticleVariant};
pub use random::{RandomSource, SequenceRng};
pub use slow_motion::SlowMotionTimer;
pub use spawner::{spawn_object, speed_for_elapsed};
pub use stars::{BackgroundStar, Starfield};
pub use state::{
    ColorTag, FallingObject, GameEvent, GamePhase, SEGMENT_ORDER, SessionState, ShapeTag,
    SimulationState, Viewport,
};
pub use text::{FloatingText, FloatingTextSystem};
pub use tick::{TickInput, tick};
pub use wheel::{Rotation, Wheel, rotation_for_key, rotation_for_tap};
