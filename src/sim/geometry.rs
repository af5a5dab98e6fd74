//! Wheel silhouettes and falling object outlines
//!
//! The wheel's outline changes with level. All paths are relative to the
//! shape's center in screen space (y down) and unrotated; the renderer applies
//! the wheel's visual angle and scale.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI, TAU};

use super::arc::AnnularSector;
use super::state::ShapeTag;
use crate::polar_to_cartesian;

/// Samples used for round outlines
pub const CIRCLE_SAMPLES: usize = 64;
/// Samples per wheel segment edge
pub const BAND_SAMPLES: usize = 24;
/// Angular gap trimmed from each side of a segment (radians)
pub const SEGMENT_GAP: f32 = 0.08;

/// Wheel silhouette, one per band of levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelTier {
    Circle,
    Square,
    Hexagon,
    Octagon,
    Star,
}

/// Star tier spikes (multiple of four keeps quarter-turn symmetry)
const STAR_SPIKES: usize = 8;
const STAR_OUTER: f32 = 1.15;
const STAR_INNER: f32 = 0.82;

impl WheelTier {
    /// Tier for a level; `thresholds` are the highest levels of the circle,
    /// square, hexagon and octagon tiers
    pub fn for_level(level: u32, thresholds: &[u32; 4]) -> Self {
        const ORDER: [WheelTier; 4] = [
            WheelTier::Circle,
            WheelTier::Square,
            WheelTier::Hexagon,
            WheelTier::Octagon,
        ];
        thresholds
            .iter()
            .zip(ORDER)
            .find(|(max, _)| level <= **max)
            .map(|(_, tier)| tier)
            .unwrap_or(WheelTier::Star)
    }

    /// (sides, angle of the first vertex) for polygon tiers
    fn polygon(self) -> Option<(usize, f32)> {
        match self {
            WheelTier::Square => Some((4, FRAC_PI_4)),
            WheelTier::Hexagon => Some((6, -FRAC_PI_2)),
            WheelTier::Octagon => Some((8, FRAC_PI_4)),
            WheelTier::Circle | WheelTier::Star => None,
        }
    }

    pub fn is_round(self) -> bool {
        self == WheelTier::Circle
    }
}

/// Regular polygon whose apothem (center to edge midpoint) is `apothem`
pub fn regular_polygon(sides: usize, apothem: f32, first_vertex: f32) -> Vec<Vec2> {
    let circumradius = apothem / (PI / sides as f32).cos();
    (0..sides)
        .map(|i| polar_to_cartesian(circumradius, first_vertex + TAU * i as f32 / sides as f32))
        .collect()
}

/// Star alternating between `outer` and `inner` radii, first spike at `first`
pub fn star_polygon(spikes: usize, outer: f32, inner: f32, first: f32) -> Vec<Vec2> {
    let step = PI / spikes as f32;
    (0..spikes * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            polar_to_cartesian(r, first + step * i as f32)
        })
        .collect()
}

/// Closed outline of a wheel tier
pub fn boundary_path(tier: WheelTier, radius: f32) -> Vec<Vec2> {
    if let Some((sides, first)) = tier.polygon() {
        return regular_polygon(sides, radius, first);
    }
    match tier {
        WheelTier::Star => star_polygon(
            STAR_SPIKES,
            radius * STAR_OUTER,
            radius * STAR_INNER,
            -FRAC_PI_2,
        ),
        _ => (0..CIRCLE_SAMPLES)
            .map(|i| polar_to_cartesian(radius, TAU * i as f32 / CIRCLE_SAMPLES as f32))
            .collect(),
    }
}

#[inline]
fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Distance from the center to the outline along `theta` (ray cast)
pub fn boundary_radius(tier: WheelTier, radius: f32, theta: f32) -> f32 {
    if tier.is_round() {
        return radius;
    }
    let path = boundary_path(tier, radius);
    let dir = Vec2::from_angle(theta);
    let mut nearest = f32::INFINITY;

    for (i, &a) in path.iter().enumerate() {
        let b = path[(i + 1) % path.len()];
        let edge = b - a;
        let denom = cross(dir, edge);
        if denom.abs() < 1e-9 {
            continue;
        }
        let t = cross(a, edge) / denom;
        let s = cross(a, dir) / denom;
        if t > 0.0 && (-1e-5..=1.0 + 1e-5).contains(&s) {
            nearest = nearest.min(t);
        }
    }

    if nearest.is_finite() { nearest } else { radius }
}

/// Matched outer/inner polylines of one colored segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentBand {
    pub outer: Vec<Vec2>,
    pub inner: Vec<Vec2>,
}

/// Segment `index` (0 = top, clockwise) clipped to the tier silhouette
/// between the core cutout `inner` and the outline at `outer`
pub fn segment_band(tier: WheelTier, outer: f32, inner: f32, index: usize, gap: f32) -> SegmentBand {
    let sector = AnnularSector::wheel_segment(index, inner, outer, gap);
    if tier.is_round() {
        return SegmentBand {
            outer: sector.sample_outer_edge(BAND_SAMPLES),
            inner: sector.sample_inner_edge(BAND_SAMPLES),
        };
    }

    let angles: Vec<f32> = sector.sample_angles(BAND_SAMPLES).collect();
    SegmentBand {
        outer: angles
            .iter()
            .map(|&theta| polar_to_cartesian(boundary_radius(tier, outer, theta), theta))
            .collect(),
        inner: angles
            .iter()
            .map(|&theta| polar_to_cartesian(boundary_radius(tier, inner, theta), theta))
            .collect(),
    }
}

/// Fillable outline of a falling object shape
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectOutline {
    /// Single convex-from-center polygon
    Polygon(Vec<Vec2>),
    /// Snowflake: crossed bars, tip dots and a core dot
    Snowflake {
        /// Quad corners per bar
        bars: Vec<[Vec2; 4]>,
        tips: Vec<Vec2>,
        tip_radius: f32,
        core_radius: f32,
    },
}

/// Width of a snowflake bar
const SNOWFLAKE_BAR_WIDTH: f32 = 4.0;
const SNOWFLAKE_TIP_RADIUS: f32 = 3.0;

fn rounded_square(half: f32, corner: f32) -> Vec<Vec2> {
    const CORNER_SAMPLES: usize = 4;
    let inset = half - corner;
    // Corner centers clockwise from top-right, each sweeping a quarter turn
    let corners = [
        (Vec2::new(inset, -inset), -FRAC_PI_2),
        (Vec2::new(inset, inset), 0.0),
        (Vec2::new(-inset, inset), FRAC_PI_2),
        (Vec2::new(-inset, -inset), PI),
    ];
    corners
        .iter()
        .flat_map(|&(c, start)| {
            (0..=CORNER_SAMPLES).map(move |i| {
                let theta = start + FRAC_PI_2 * i as f32 / CORNER_SAMPLES as f32;
                c + polar_to_cartesian(corner, theta)
            })
        })
        .collect()
}

/// Outline of an object shape of the given radius, relative to its center
pub fn object_outline(shape: ShapeTag, radius: f32) -> ObjectOutline {
    let polygon = match shape {
        ShapeTag::Circle => (0..CIRCLE_SAMPLES / 2)
            .map(|i| polar_to_cartesian(radius, TAU * i as f32 / (CIRCLE_SAMPLES / 2) as f32))
            .collect(),
        ShapeTag::Square => rounded_square(radius, radius * 0.4),
        ShapeTag::Hexagon => (0..6)
            .map(|i| polar_to_cartesian(radius * 1.15, FRAC_PI_3 * i as f32 - FRAC_PI_6))
            .collect(),
        ShapeTag::Diamond => {
            let r = radius * 1.2;
            vec![
                Vec2::new(0.0, -r),
                Vec2::new(r, 0.0),
                Vec2::new(0.0, r),
                Vec2::new(-r, 0.0),
            ]
        }
        ShapeTag::Star => star_polygon(5, radius * 1.3, radius * 0.6, -FRAC_PI_2),
        ShapeTag::Wildcard => return snowflake(radius),
    };
    ObjectOutline::Polygon(polygon)
}

fn snowflake(radius: f32) -> ObjectOutline {
    let len = radius * 1.2;
    let half_w = SNOWFLAKE_BAR_WIDTH / 2.0;
    let mut bars = Vec::with_capacity(4);
    let mut tips = Vec::with_capacity(8);
    for i in 0..4 {
        // Bar along the rotated vertical axis
        let axis = Vec2::from_angle(FRAC_PI_4 * i as f32 - FRAC_PI_2);
        let side = axis.perp() * half_w;
        let (a, b) = (axis * len, -axis * len);
        bars.push([a - side, a + side, b + side, b - side]);
        tips.push(a);
        tips.push(b);
    }
    ObjectOutline::Snowflake {
        bars,
        tips,
        tip_radius: SNOWFLAKE_TIP_RADIUS,
        core_radius: radius * 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [u32; 4] = [10, 20, 30, 40];

    #[test]
    fn test_tier_for_level() {
        assert_eq!(WheelTier::for_level(1, &TIERS), WheelTier::Circle);
        assert_eq!(WheelTier::for_level(10, &TIERS), WheelTier::Circle);
        assert_eq!(WheelTier::for_level(11, &TIERS), WheelTier::Square);
        assert_eq!(WheelTier::for_level(20, &TIERS), WheelTier::Square);
        assert_eq!(WheelTier::for_level(21, &TIERS), WheelTier::Hexagon);
        assert_eq!(WheelTier::for_level(31, &TIERS), WheelTier::Octagon);
        assert_eq!(WheelTier::for_level(40, &TIERS), WheelTier::Octagon);
        assert_eq!(WheelTier::for_level(41, &TIERS), WheelTier::Star);
        assert_eq!(WheelTier::for_level(500, &TIERS), WheelTier::Star);
    }

    #[test]
    fn test_square_corners_on_diagonals() {
        let path = boundary_path(WheelTier::Square, 100.0);
        assert_eq!(path.len(), 4);
        for p in &path {
            assert!((p.x.abs() - 100.0).abs() < 1e-3);
            assert!((p.y.abs() - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_boundary_radius_apothem() {
        for tier in [WheelTier::Square, WheelTier::Hexagon, WheelTier::Octagon] {
            let path = boundary_path(tier, 100.0);
            let min = (0..360)
                .map(|d| boundary_radius(tier, 100.0, (d as f32).to_radians()))
                .fold(f32::INFINITY, f32::min);
            assert!((min - 100.0).abs() < 0.5, "{tier:?} apothem {min}");
            assert!(path.iter().all(|p| p.length() >= 100.0));
        }
        assert_eq!(boundary_radius(WheelTier::Circle, 100.0, 1.234), 100.0);
    }

    #[test]
    fn test_square_boundary_ray_cast() {
        // Straight right hits the edge midpoint; the diagonal hits a corner
        assert!((boundary_radius(WheelTier::Square, 100.0, 0.0) - 100.0).abs() < 1e-3);
        let corner = boundary_radius(WheelTier::Square, 100.0, FRAC_PI_4);
        assert!((corner - 100.0 * 2f32.sqrt()).abs() < 1e-2);
    }

    #[test]
    fn test_star_is_quarter_turn_symmetric() {
        for d in [0.0f32, 10.0, 33.0, 71.0] {
            let theta = d.to_radians();
            let a = boundary_radius(WheelTier::Star, 100.0, theta);
            let b = boundary_radius(WheelTier::Star, 100.0, theta + FRAC_PI_2);
            assert!((a - b).abs() < 1e-2);
            assert!(a >= 100.0 * STAR_INNER - 1e-2 && a <= 100.0 * STAR_OUTER + 1e-2);
        }
    }

    #[test]
    fn test_segment_band_between_radii() {
        for tier in [WheelTier::Circle, WheelTier::Square, WheelTier::Star] {
            for index in 0..4 {
                let band = segment_band(tier, 115.0, 63.25, index, SEGMENT_GAP);
                assert_eq!(band.outer.len(), BAND_SAMPLES);
                assert_eq!(band.inner.len(), BAND_SAMPLES);
                for (o, i) in band.outer.iter().zip(&band.inner) {
                    assert!(o.length() > i.length());
                }
            }
        }
        // Top band lies above the center
        let top = segment_band(WheelTier::Square, 115.0, 63.25, 0, SEGMENT_GAP);
        assert!(top.outer.iter().all(|p| p.y < 0.0));
    }

    #[test]
    fn test_object_outlines() {
        let r = 14.0;
        match object_outline(ShapeTag::Diamond, r) {
            ObjectOutline::Polygon(p) => {
                assert_eq!(p.len(), 4);
                assert!((p[0].y + 16.8).abs() < 1e-4);
            }
            other => panic!("unexpected {other:?}"),
        }
        match object_outline(ShapeTag::Star, r) {
            ObjectOutline::Polygon(p) => {
                assert_eq!(p.len(), 10);
                assert!((p[0] - Vec2::new(0.0, -18.2)).length() < 1e-3);
            }
            other => panic!("unexpected {other:?}"),
        }
        match object_outline(ShapeTag::Hexagon, r) {
            ObjectOutline::Polygon(p) => {
                assert_eq!(p.len(), 6);
                assert!(p.iter().all(|v| (v.length() - 16.1).abs() < 1e-3));
            }
            other => panic!("unexpected {other:?}"),
        }
        match object_outline(ShapeTag::Square, r) {
            ObjectOutline::Polygon(p) => assert!(p.iter().all(|v| v.x.abs() <= r + 1e-3)),
            other => panic!("unexpected {other:?}"),
        }
        match object_outline(ShapeTag::Wildcard, r) {
            ObjectOutline::Snowflake { bars, tips, core_radius, .. } => {
                assert_eq!(bars.len(), 4);
                assert_eq!(tips.len(), 8);
                assert!((core_radius - 4.2).abs() < 1e-4);
                assert!(tips.iter().all(|t| (t.length() - 16.8).abs() < 1e-3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
