//! Chroma Wheel - A reflex color-matching wheel arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (wheel physics, spawning, matching, effects)
//! - `audio`: Level-tiered procedural sound synthesis
//! - `renderer`: Draw list generation and WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (quality, volume)
//! - `highscores`: Best score persistence

pub mod audio;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Wheel outer radius in logical pixels
    pub const WHEEL_RADIUS: f32 = 115.0;
    /// Core cutout radius as a fraction of the wheel radius
    pub const WHEEL_INNER_RATIO: f32 = 0.55;
    /// Falling object radius
    pub const OBJECT_RADIUS: f32 = 14.0;
    /// Wheel center sits this far below the viewport center
    pub const WHEEL_CENTER_OFFSET_Y: f32 = 80.0;
    /// Spawn height (above the visible area)
    pub const SPAWN_Y: f32 = -50.0;

    /// Initial fall speed (pixels per tick)
    pub const BASE_SPEED: f32 = 3.0;
    /// Fall speed gained per second of play
    pub const SPEED_RAMP_PER_SEC: f32 = 0.05;

    /// Wheel spring constants
    pub const SPRING_TENSION: f32 = 0.15;
    pub const SPRING_FRICTION: f32 = 0.65;
    /// Pulse relaxation rate toward 1.0 per tick
    pub const PULSE_RELAX: f32 = 0.15;
    /// Pulse scale set on a successful match
    pub const PULSE_PEAK: f32 = 1.2;
    /// Attract-mode spin (radians per tick)
    pub const IDLE_SPIN_RATE: f32 = 0.005;
    /// Taps beyond radius * this factor fall back to a clockwise turn
    pub const TAP_RADIUS_FACTOR: f32 = 1.6;

    /// Score needed per level
    pub const POINTS_PER_LEVEL: u32 = 10;
    /// Number of colored wheel segments
    pub const SEGMENT_COUNT: usize = 4;

    /// Chance that a spawn is a wildcard (snowflake)
    pub const WILDCARD_CHANCE: f32 = 0.08;
    /// Fall speed multiplier while slow motion is active
    pub const SLOW_MOTION_FACTOR: f32 = 0.4;
    /// Slow motion window (milliseconds)
    pub const SLOW_MOTION_DURATION_MS: f32 = 3000.0;
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle_positive(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a `#RRGGBB` literal into RGB floats (0-1)
pub const fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
