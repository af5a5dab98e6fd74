//! Falling object spawn policy

use super::random::{RandomSource, pick};
use super::state::{BASE_SHAPES, FallingObject, SEGMENT_ORDER, ShapeTag};
use crate::tuning::Tuning;

/// Fall speed after `elapsed_ms` of play
pub fn speed_for_elapsed(tuning: &Tuning, elapsed_ms: f32) -> f32 {
    tuning.base_speed + (elapsed_ms / 1000.0) * tuning.speed_ramp_per_sec
}

/// Draw a new object at the spawn height
///
/// Color is uniform over the four segment colors. The shape is a wildcard
/// with `wildcard_chance`, otherwise uniform over the base shapes.
pub fn spawn_object<R: RandomSource + ?Sized>(rng: &mut R, tuning: &Tuning, speed: f32) -> FallingObject {
    let color = pick(rng, &SEGMENT_ORDER);
    let shape = if rng.chance(tuning.wildcard_chance) {
        ShapeTag::Wildcard
    } else {
        pick(rng, &BASE_SHAPES)
    };
    FallingObject {
        y: tuning.spawn_y,
        color,
        shape,
        radius: tuning.object_radius,
        speed,
    }
}
