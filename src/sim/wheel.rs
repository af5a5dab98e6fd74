//! Wheel rotation control
//!
//! The wheel has two notions of orientation: a discrete logical index (0-3)
//! that decides matches, and a continuous visual angle that chases the target
//! angle through a damped spring. The visual angle never decides anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use super::state::{ColorTag, SEGMENT_ORDER};
use crate::consts::{IDLE_SPIN_RATE, PULSE_PEAK, PULSE_RELAX, SEGMENT_COUNT, TAP_RADIUS_FACTOR};

/// A rotation command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// Quarter turn clockwise on screen (left segment comes to the top)
    Clockwise,
    /// Quarter turn counter-clockwise (right segment comes to the top)
    CounterClockwise,
    /// Half turn (bottom segment comes to the top)
    HalfTurn,
}

impl Rotation {
    /// Signed quarter-turn count
    pub fn amount(self) -> i32 {
        match self {
            Rotation::Clockwise => 1,
            Rotation::CounterClockwise => -1,
            Rotation::HalfTurn => 2,
        }
    }
}

/// Screen quadrant of a tap around the wheel center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapQuadrant {
    Top,
    Right,
    Bottom,
    Left,
}

impl TapQuadrant {
    /// Quadrant from an offset relative to the wheel center (screen space, y down)
    pub fn from_offset(offset: Vec2) -> Self {
        let degrees = crate::normalize_angle_positive(offset.y.atan2(offset.x)).to_degrees();
        if (45.0..135.0).contains(&degrees) {
            TapQuadrant::Bottom
        } else if (135.0..225.0).contains(&degrees) {
            TapQuadrant::Left
        } else if (225.0..315.0).contains(&degrees) {
            TapQuadrant::Top
        } else {
            TapQuadrant::Right
        }
    }

    /// Command that brings the tapped segment to the top
    pub fn rotation(self) -> Option<Rotation> {
        match self {
            TapQuadrant::Right => Some(Rotation::CounterClockwise),
            TapQuadrant::Left => Some(Rotation::Clockwise),
            TapQuadrant::Bottom => Some(Rotation::HalfTurn),
            TapQuadrant::Top => None,
        }
    }
}

/// Translate a pointer tap into a rotation command
///
/// Taps outside the wheel's influence radius always turn clockwise.
pub fn rotation_for_tap(offset: Vec2, wheel_radius: f32) -> Option<Rotation> {
    if offset.length() >= wheel_radius * TAP_RADIUS_FACTOR {
        return Some(Rotation::Clockwise);
    }
    TapQuadrant::from_offset(offset).rotation()
}

/// Command issued by the designated key (Space)
pub fn rotation_for_key() -> Rotation {
    Rotation::Clockwise
}

/// Wheel orientation and spring state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wheel {
    /// Discrete orientation in [0, 4)
    logical_index: u8,
    /// Angle the spring is pulling toward (radians)
    pub target_angle: f32,
    /// Angle currently drawn (radians)
    pub visual_angle: f32,
    /// Radians per tick
    pub angular_velocity: f32,
    /// Hit "thump" scale, relaxes toward 1.0
    pub pulse_scale: f32,
}

impl Default for Wheel {
    fn default() -> Self {
        Self {
            logical_index: 0,
            target_angle: 0.0,
            visual_angle: 0.0,
            angular_velocity: 0.0,
            pulse_scale: 1.0,
        }
    }
}

impl Wheel {
    pub fn logical_index(&self) -> u8 {
        self.logical_index
    }

    /// Apply a rotation command (callers gate on the session being active)
    pub fn rotate(&mut self, rotation: Rotation) {
        let amount = rotation.amount();
        let n = SEGMENT_COUNT as i32;
        self.logical_index = (self.logical_index as i32 + amount + n).rem_euclid(n) as u8;
        self.target_angle += amount as f32 * FRAC_PI_2;
    }

    /// Index into [`SEGMENT_ORDER`] of the segment currently at the top
    pub fn active_segment(&self) -> usize {
        (SEGMENT_COUNT - self.logical_index as usize) % SEGMENT_COUNT
    }

    /// Color currently rotated to the top
    pub fn active_color(&self) -> ColorTag {
        SEGMENT_ORDER[self.active_segment()]
    }

    /// Advance the spring one tick and relax the pulse
    pub fn step(&mut self, tension: f32, friction: f32) {
        let diff = self.target_angle - self.visual_angle;
        self.angular_velocity += diff * tension;
        self.angular_velocity *= friction;
        self.visual_angle += self.angular_velocity;

        self.pulse_scale += (1.0 - self.pulse_scale) * PULSE_RELAX;
    }

    /// Attract-mode spin (visual only)
    pub fn idle_spin(&mut self) {
        self.visual_angle += IDLE_SPIN_RATE;
    }

    /// Match feedback
    pub fn thump(&mut self) {
        self.pulse_scale = PULSE_PEAK;
    }

    /// Scale to draw at: pulse minus a squash while spinning fast
    pub fn render_scale(&self) -> f32 {
        let stretch = (self.angular_velocity.abs() * 0.1).min(0.05);
        self.pulse_scale - stretch
    }

    /// Back to the unrotated orientation (fresh start at level 1)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keep the current orientation without a spin-back (continue)
    pub fn hold(&mut self) {
        self.target_angle = self.visual_angle;
        self.angular_velocity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn settle(wheel: &mut Wheel, ticks: usize) {
        for _ in 0..ticks {
            wheel.step(0.15, 0.65);
        }
    }

    #[test]
    fn test_rotate_updates_index_and_target() {
        let mut wheel = Wheel::default();
        wheel.rotate(Rotation::CounterClockwise);
        assert_eq!(wheel.logical_index(), 3);
        assert!((wheel.target_angle + FRAC_PI_2).abs() < 1e-6);
        wheel.rotate(Rotation::HalfTurn);
        assert_eq!(wheel.logical_index(), 1);
        assert!((wheel.target_angle - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_active_color_follows_index() {
        let mut wheel = Wheel::default();
        assert_eq!(wheel.active_color(), ColorTag::Red);
        wheel.rotate(Rotation::Clockwise);
        assert_eq!(wheel.active_color(), ColorTag::Yellow);
        wheel.rotate(Rotation::Clockwise);
        assert_eq!(wheel.active_color(), ColorTag::Green);
        wheel.rotate(Rotation::HalfTurn);
        assert_eq!(wheel.active_color(), ColorTag::Red);
        wheel.rotate(Rotation::CounterClockwise);
        assert_eq!(wheel.active_color(), ColorTag::Blue);
    }

    #[test]
    fn test_spring_converges_without_snapping() {
        let mut wheel = Wheel::default();
        wheel.rotate(Rotation::Clockwise);
        wheel.step(0.15, 0.65);
        assert!(wheel.visual_angle > 0.0);
        assert!(wheel.visual_angle < wheel.target_angle, "no snap on the first tick");

        settle(&mut wheel, 120);
        assert!((wheel.visual_angle - wheel.target_angle).abs() < 1e-3);
        assert!(wheel.angular_velocity.abs() < 1e-3);
    }

    #[test]
    fn test_half_turn_converges() {
        let mut wheel = Wheel::default();
        wheel.rotate(Rotation::HalfTurn);
        settle(&mut wheel, 150);
        assert!((wheel.visual_angle - std::f32::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn test_pulse_relaxes() {
        let mut wheel = Wheel::default();
        wheel.thump();
        assert_eq!(wheel.pulse_scale, 1.2);
        settle(&mut wheel, 60);
        assert!((wheel.pulse_scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_hold_keeps_orientation() {
        let mut wheel = Wheel::default();
        wheel.rotate(Rotation::Clockwise);
        settle(&mut wheel, 3);
        let visual = wheel.visual_angle;
        wheel.hold();
        settle(&mut wheel, 10);
        assert!((wheel.visual_angle - visual).abs() < 1e-6);
        assert_eq!(wheel.logical_index(), 1);
    }

    #[test]
    fn test_tap_quadrants() {
        let r = 115.0;
        // Screen space: +y is down
        assert_eq!(rotation_for_tap(Vec2::new(50.0, 0.0), r), Some(Rotation::CounterClockwise));
        assert_eq!(rotation_for_tap(Vec2::new(-50.0, 0.0), r), Some(Rotation::Clockwise));
        assert_eq!(rotation_for_tap(Vec2::new(0.0, 50.0), r), Some(Rotation::HalfTurn));
        assert_eq!(rotation_for_tap(Vec2::new(0.0, -50.0), r), None);
        // Diagonal boundaries: 45 degrees belongs to bottom, 315 to right
        assert_eq!(TapQuadrant::from_offset(Vec2::new(10.0, 10.0)), TapQuadrant::Bottom);
        assert_eq!(TapQuadrant::from_offset(Vec2::new(10.0, -10.0)), TapQuadrant::Right);
        assert_eq!(TapQuadrant::from_offset(Vec2::new(-10.0, -10.0)), TapQuadrant::Top);
    }

    #[test]
    fn test_far_tap_turns_clockwise() {
        let r = 115.0;
        assert_eq!(rotation_for_tap(Vec2::new(0.0, -r * 2.0), r), Some(Rotation::Clockwise));
        assert_eq!(rotation_for_key(), Rotation::Clockwise);
    }

    fn any_rotation() -> impl Strategy<Value = Rotation> {
        prop_oneof![
            Just(Rotation::Clockwise),
            Just(Rotation::CounterClockwise),
            Just(Rotation::HalfTurn),
        ]
    }

    proptest! {
        #[test]
        fn prop_logical_index_is_sum_mod_four(rotations in prop::collection::vec(any_rotation(), 0..64)) {
            let mut wheel = Wheel::default();
            let mut sum = 0i32;
            for r in &rotations {
                wheel.rotate(*r);
                sum += r.amount();
                prop_assert!(wheel.logical_index() < 4);
            }
            prop_assert_eq!(wheel.logical_index() as i32, sum.rem_euclid(4));
        }

        #[test]
        fn prop_active_color_independent_of_visual(
            rotations in prop::collection::vec(any_rotation(), 0..16),
            ticks in 0usize..40,
        ) {
            let mut wheel = Wheel::default();
            for r in &rotations {
                wheel.rotate(*r);
            }
            let before = wheel.active_color();
            settle(&mut wheel, ticks);
            prop_assert_eq!(wheel.active_color(), before);
            let expected = SEGMENT_ORDER[(4 - wheel.logical_index() as usize) % 4];
            prop_assert_eq!(before, expected);
        }
    }
}
