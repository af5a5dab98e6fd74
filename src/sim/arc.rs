//! Annular sector geometry for round wheel segments
//!
//! In polar coordinates (screen space, y down, angles clockwise from +x), a
//! sector is defined by:
//! - inner_radius, outer_radius: radial extent of the band
//! - theta_start, theta_end: angular extent, swept clockwise from start to end

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::{normalize_angle_positive, polar_to_cartesian};

/// A ring band between two angles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnularSector {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Start angle (radians, normalized to [0, 2π))
    pub theta_start: f32,
    /// End angle (radians, normalized to [0, 2π))
    pub theta_end: f32,
}

impl AnnularSector {
    pub fn new(inner_radius: f32, outer_radius: f32, theta_start: f32, theta_end: f32) -> Self {
        Self {
            inner_radius,
            outer_radius,
            theta_start: normalize_angle_positive(theta_start),
            theta_end: normalize_angle_positive(theta_end),
        }
    }

    /// Sector covering wheel segment `index` (0 = top), trimmed by `gap` on
    /// both sides
    pub fn wheel_segment(index: usize, inner_radius: f32, outer_radius: f32, gap: f32) -> Self {
        let start = index as f32 * FRAC_PI_2 - 3.0 * FRAC_PI_4 + gap;
        let end = index as f32 * FRAC_PI_2 - FRAC_PI_4 - gap;
        Self::new(inner_radius, outer_radius, start, end)
    }

    /// Angular span of the sector (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        normalize_angle_positive(self.theta_end - self.theta_start)
    }

    pub fn mid_angle(&self) -> f32 {
        self.theta_start + self.angular_span() / 2.0
    }

    /// Check if an angle is within the sector's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        normalize_angle_positive(theta - self.theta_start) <= self.angular_span()
    }

    /// `num_points` angles evenly spaced from start to end
    pub fn sample_angles(&self, num_points: usize) -> impl Iterator<Item = f32> + '_ {
        let span = self.angular_span();
        (0..num_points).map(move |i| {
            let t = i as f32 / (num_points - 1).max(1) as f32;
            self.theta_start + t * span
        })
    }

    /// Sample points along the outer edge
    pub fn sample_outer_edge(&self, num_points: usize) -> Vec<Vec2> {
        self.sample_angles(num_points)
            .map(|theta| polar_to_cartesian(self.outer_radius, theta))
            .collect()
    }

    /// Sample points along the inner edge
    pub fn sample_inner_edge(&self, num_points: usize) -> Vec<Vec2> {
        self.sample_angles(num_points)
            .map(|theta| polar_to_cartesian(self.inner_radius, theta))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_top_segment_spans_up() {
        let top = AnnularSector::wheel_segment(0, 60.0, 115.0, 0.0);
        assert!((top.angular_span() - FRAC_PI_2).abs() < 1e-5);
        // Straight up on screen is -π/2
        assert!(top.contains_angle(-FRAC_PI_2));
        assert!(!top.contains_angle(0.0));
    }

    #[test]
    fn test_segments_in_clockwise_order() {
        let right = AnnularSector::wheel_segment(1, 60.0, 115.0, 0.08);
        let bottom = AnnularSector::wheel_segment(2, 60.0, 115.0, 0.08);
        let left = AnnularSector::wheel_segment(3, 60.0, 115.0, 0.08);
        assert!(right.contains_angle(0.0));
        assert!(bottom.contains_angle(FRAC_PI_2));
        assert!(left.contains_angle(PI));
        assert!((right.angular_span() - (FRAC_PI_2 - 0.16)).abs() < 1e-5);
    }

    #[test]
    fn test_wraparound_sector() {
        // Left segment straddles the ±π seam
        let left = AnnularSector::wheel_segment(3, 60.0, 115.0, 0.0);
        assert!(left.contains_angle(PI));
        assert!(left.contains_angle(-PI + 0.01));
        assert!(!left.contains_angle(0.0));
    }

    #[test]
    fn test_edge_samples() {
        let s = AnnularSector::wheel_segment(0, 50.0, 100.0, 0.0);
        let outer = s.sample_outer_edge(9);
        let inner = s.sample_inner_edge(9);
        assert_eq!(outer.len(), 9);
        assert!(outer.iter().all(|p| (p.length() - 100.0).abs() < 1e-3));
        assert!(inner.iter().all(|p| (p.length() - 50.0).abs() < 1e-3));
        // Middle sample points straight up
        assert!(outer[4].x.abs() < 1e-3 && outer[4].y < 0.0);
    }
}
