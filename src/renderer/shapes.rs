//! Shape generation for 2D primitives
//!
//! Every primitive becomes a plain triangle list in screen space.

use glam::Vec2;
use std::f32::consts::TAU;

use super::scene::{DrawCommand, Frame};
use super::vertex::Vertex;

/// Circle segment count for a radius (small dots stay cheap)
pub fn segments_for_radius(radius: f32) -> u32 {
    (radius * 0.75).clamp(12.0, 64.0) as u32
}

#[inline]
fn push_tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

#[inline]
fn push_quad(out: &mut Vec<Vertex>, a1: Vec2, b1: Vec2, a2: Vec2, b2: Vec2, color: [f32; 4]) {
    push_tri(out, a1, b1, a2, color);
    push_tri(out, a2, b1, b2, color);
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        push_tri(
            &mut vertices,
            center,
            center + Vec2::from_angle(theta1) * radius,
            center + Vec2::from_angle(theta2) * radius,
            color,
        );
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let inner_radius = inner_radius.max(0.0);

    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * TAU);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * TAU);

        push_quad(
            &mut vertices,
            center + d1 * inner_radius,
            center + d1 * outer_radius,
            center + d2 * inner_radius,
            center + d2 * outer_radius,
            color,
        );
    }

    vertices
}

/// Triangle fan from `center` over a closed outline
///
/// Correct for any outline that is star-shaped around `center`.
pub fn fan(center: Vec2, points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        push_tri(&mut vertices, center, a, b, color);
    }
    vertices
}

/// Region between two matched polylines (wheel segments)
pub fn band(outer: &[Vec2], inner: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    let n = outer.len().min(inner.len());
    if n < 2 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((n - 1) * 6);
    for i in 0..n - 1 {
        push_quad(&mut vertices, inner[i], outer[i], inner[i + 1], outer[i + 1], color);
    }
    vertices
}

/// Constant-width polyline, one quad per segment
pub fn polyline(points: &[Vec2], width: f32, closed: bool, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let half = width / 2.0;
    let count = if closed { points.len() } else { points.len() - 1 };
    let mut vertices = Vec::with_capacity(count * 6);

    for i in 0..count {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];
        let dir = (p2 - p1).normalize_or_zero();
        // Extend each end by half the width so corners overlap instead of notching
        let (p1, p2) = (p1 - dir * half, p2 + dir * half);
        let perp = dir.perp() * half;
        push_quad(&mut vertices, p1 + perp, p1 - perp, p2 + perp, p2 - perp, color);
    }

    vertices
}

/// Single triangle with per-corner colors (gradients)
pub fn gradient_triangle(points: [Vec2; 3], colors: [[f32; 4]; 3]) -> Vec<Vertex> {
    points
        .iter()
        .zip(colors)
        .map(|(p, c)| Vertex::new(p.x, p.y, c))
        .collect()
}

/// Triangles for one draw command (text is drawn by the host)
pub fn tessellate(command: &DrawCommand) -> Vec<Vertex> {
    match command {
        DrawCommand::Circle {
            center,
            radius,
            color,
        } => circle(*center, *radius, *color, segments_for_radius(*radius)),
        DrawCommand::Ring {
            center,
            radius,
            width,
            color,
        } => ring(
            *center,
            radius - width / 2.0,
            radius + width / 2.0,
            *color,
            segments_for_radius(*radius),
        ),
        DrawCommand::Fill {
            center,
            points,
            color,
        } => fan(*center, points, *color),
        DrawCommand::Band {
            outer,
            inner,
            color,
        } => band(outer, inner, *color),
        DrawCommand::Stroke {
            points,
            width,
            closed,
            color,
        } => polyline(points, *width, *closed, *color),
        DrawCommand::Gradient { points, colors } => gradient_triangle(*points, *colors),
        DrawCommand::Text(_) => Vec::new(),
    }
}

/// Triangles for a whole frame, in draw order
pub fn tessellate_frame(frame: &Frame) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for command in &frame.commands {
        vertices.extend(tessellate(command));
    }
    vertices
}
