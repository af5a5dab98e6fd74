//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`]. Values
//! default to the shipped balance in [`crate::consts`]; a JSON document may
//! override any subset of fields.
//!
//! Preconditions (not validated): radii, speeds and durations are positive,
//! probabilities are in `[0, 1]`, tier thresholds are ascending.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::state::ShapeTag;

/// Points awarded per falling object shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub circle: u32,
    pub square: u32,
    pub hexagon: u32,
    pub diamond: u32,
    pub star: u32,
    /// Wildcards pay out in slow motion, not points
    pub wildcard: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            circle: 1,
            square: 1,
            hexagon: 2,
            diamond: 2,
            star: 3,
            wildcard: 0,
        }
    }
}

impl ScoreTable {
    pub fn points(&self, shape: ShapeTag) -> u32 {
        match shape {
            ShapeTag::Circle => self.circle,
            ShapeTag::Square => self.square,
            ShapeTag::Hexagon => self.hexagon,
            ShapeTag::Diamond => self.diamond,
            ShapeTag::Star => self.star,
            ShapeTag::Wildcard => self.wildcard,
        }
    }
}

/// Particle burst and decay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Particles per match explosion
    pub count: usize,
    /// Alpha lost per tick
    pub decay: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Shockwave radius growth per tick
    pub shockwave_growth: f32,
    /// Shockwave alpha lost per tick
    pub shockwave_decay: f32,
    /// Fragments per wheel segment when the wheel explodes
    pub fragments_per_segment: usize,
    /// Confetti pieces in a record burst
    pub confetti_count: usize,
    /// Confetti gravity as a fraction of `gravity`
    pub confetti_gravity_scale: f32,
    /// Confetti velocity retained per tick
    pub confetti_drag: f32,
    /// Confetti alpha lost per tick
    pub confetti_decay: f32,
    /// Confetti horizontal sway amplitude (pixels per tick)
    pub confetti_sway: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            count: 20,
            decay: 0.02,
            speed_min: 2.0,
            speed_max: 6.0,
            size_min: 2.0,
            size_max: 5.0,
            gravity: 0.15,
            shockwave_growth: 15.0,
            shockwave_decay: 0.03,
            fragments_per_segment: 50,
            confetti_count: 90,
            confetti_gravity_scale: 0.3,
            confetti_drag: 0.96,
            confetti_decay: 0.008,
            confetti_sway: 0.6,
        }
    }
}

/// Complete gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub wheel_radius: f32,
    pub object_radius: f32,
    pub spawn_y: f32,
    pub base_speed: f32,
    pub speed_ramp_per_sec: f32,
    pub spring_tension: f32,
    pub spring_friction: f32,
    pub wildcard_chance: f32,
    pub slow_motion_factor: f32,
    pub slow_motion_duration_ms: f32,
    pub score_table: ScoreTable,
    pub particles: ParticleTuning,
    /// Level at which audio/particle tier 2 and tier 3 begin
    pub audio_tiers: [u32; 2],
    /// Highest level of the circle, square, hexagon and octagon wheel tiers
    pub wheel_tiers: [u32; 4],
    /// Background stars at full quality
    pub star_count: usize,
    /// Floating text rise speed (pixels per tick)
    pub text_rise_speed: f32,
    /// Floating text alpha lost per tick
    pub text_decay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            wheel_radius: WHEEL_RADIUS,
            object_radius: OBJECT_RADIUS,
            spawn_y: SPAWN_Y,
            base_speed: BASE_SPEED,
            speed_ramp_per_sec: SPEED_RAMP_PER_SEC,
            spring_tension: SPRING_TENSION,
            spring_friction: SPRING_FRICTION,
            wildcard_chance: WILDCARD_CHANCE,
            slow_motion_factor: SLOW_MOTION_FACTOR,
            slow_motion_duration_ms: SLOW_MOTION_DURATION_MS,
            score_table: ScoreTable::default(),
            particles: ParticleTuning::default(),
            audio_tiers: [4, 8],
            wheel_tiers: [10, 20, 30, 40],
            star_count: 50,
            text_rise_speed: 2.0,
            text_decay: 0.02,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a JSON tuning document, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning JSON ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Core cutout radius
    pub fn wheel_inner_radius(&self) -> f32 {
        self.wheel_radius * WHEEL_INNER_RATIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table_defaults() {
        let table = ScoreTable::default();
        assert_eq!(table.points(ShapeTag::Circle), 1);
        assert_eq!(table.points(ShapeTag::Wildcard), 0);
        assert!(table.points(ShapeTag::Star) > table.points(ShapeTag::Circle));
        assert!(table.points(ShapeTag::Hexagon) > table.points(ShapeTag::Circle));
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(
            r#"{ "base_speed": 5.5, "score_table": { "star": 7 }, "particles": { "count": 4 } }"#,
        )
        .unwrap();
        assert_eq!(tuning.base_speed, 5.5);
        assert_eq!(tuning.score_table.star, 7);
        assert_eq!(tuning.score_table.circle, 1);
        assert_eq!(tuning.particles.count, 4);
        assert_eq!(tuning.particles.gravity, 0.15);
        assert_eq!(tuning.wheel_radius, WHEEL_RADIUS);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert!(Tuning::from_json("{ not json").is_err());
        assert_eq!(Tuning::from_json_or_default("{ not json"), Tuning::default());
    }
}
