//! Frame description built from simulation state
//!
//! `build_frame` only reads the state. It produces screen-space draw commands
//! in paint order; `shapes` turns them into triangles and the host draws text
//! commands in its own layer.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_3, TAU};

use super::vertex::{colors, rgba};
use crate::audio::AudioTier;
use crate::polar_to_cartesian;
use crate::sim::arc::AnnularSector;
use crate::sim::geometry::{
    BAND_SAMPLES, ObjectOutline, SEGMENT_GAP, WheelTier, boundary_path, object_outline,
    segment_band,
};
use crate::sim::particles::{Particle, ParticleVariant};
use crate::sim::state::{FallingObject, GamePhase, SEGMENT_ORDER, ShapeTag, SimulationState, WILDCARD_RGB};

/// Extra radius of the soft glow behind each wheel segment
const SEGMENT_GLOW_SPREAD: f32 = 6.0;
/// Target indicator sits this far above the wheel rim
const INDICATOR_OFFSET: f32 = 15.0;
/// Dash length of the high-level hub ring
const HUB_DASH: f32 = 5.0;

/// Text label drawn by the host
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    /// Baseline center
    pub pos: Vec2,
    pub text: String,
    pub font_size: f32,
    pub color: [f32; 4],
}

/// One screen-space primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Stroked circle centered on `radius`
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: [f32; 4],
    },
    /// Filled outline, fanned from `center`
    Fill {
        center: Vec2,
        points: Vec<Vec2>,
        color: [f32; 4],
    },
    /// Area between matched outer and inner polylines
    Band {
        outer: Vec<Vec2>,
        inner: Vec<Vec2>,
        color: [f32; 4],
    },
    Stroke {
        points: Vec<Vec2>,
        width: f32,
        closed: bool,
        color: [f32; 4],
    },
    /// Triangle with per-corner colors
    Gradient {
        points: [Vec2; 3],
        colors: [[f32; 4]; 3],
    },
    Text(TextCommand),
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: [f32; 4],
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Text labels in paint order
    pub fn texts(&self) -> impl Iterator<Item = &TextCommand> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(t) => Some(t),
            _ => None,
        })
    }
}

/// Background color for a level (dark red after a mismatch)
pub fn theme_color(level: u32, game_over: bool) -> [f32; 3] {
    if game_over {
        colors::GAME_OVER
    } else {
        let themes = &colors::LEVEL_THEMES;
        themes[(level.max(1) as usize - 1) % themes.len()]
    }
}

/// Rotation, scale and position of the wheel on screen
#[derive(Debug, Clone, Copy)]
struct Placement {
    origin: Vec2,
    rotation: Vec2,
    scale: f32,
}

impl Placement {
    fn new(origin: Vec2, angle: f32, scale: f32) -> Self {
        Self {
            origin,
            rotation: Vec2::from_angle(angle),
            scale,
        }
    }

    fn point(&self, p: Vec2) -> Vec2 {
        self.origin + self.rotation.rotate(p * self.scale)
    }

    fn points(&self, ps: &[Vec2]) -> Vec<Vec2> {
        ps.iter().map(|&p| self.point(p)).collect()
    }

    fn len(&self, l: f32) -> f32 {
        l * self.scale
    }
}

fn circle_points(radius: f32, samples: usize) -> Vec<Vec2> {
    (0..samples)
        .map(|i| polar_to_cartesian(radius, TAU * i as f32 / samples as f32))
        .collect()
}

fn square_points(half: f32) -> Vec<Vec2> {
    vec![
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
}

/// Build the draw list for the current state
pub fn build_frame(state: &SimulationState) -> Frame {
    let session = state.session();
    let phase = state.phase();
    let mut commands = Vec::new();

    push_stars(&mut commands, state);

    match phase {
        GamePhase::Idle => push_wheel(&mut commands, state, 1.0),
        GamePhase::Playing => push_wheel(&mut commands, state, state.wheel.render_scale()),
        GamePhase::GameOver => {}
    }

    if let Some(obj) = &state.falling {
        push_object(&mut commands, obj, state.viewport.wheel_center().x);
    }

    for p in state.particles.iter() {
        push_particle(&mut commands, p);
    }

    for t in state.texts.iter() {
        commands.push(DrawCommand::Text(TextCommand {
            pos: t.pos,
            text: t.text.clone(),
            font_size: t.font_size,
            color: rgba(t.color, t.alpha.clamp(0.0, 1.0)),
        }));
    }

    if phase == GamePhase::Playing {
        push_indicator(&mut commands, state);
    }

    Frame {
        clear_color: rgba(theme_color(session.level(), session.game_over), 1.0),
        commands,
    }
}

fn push_stars(out: &mut Vec<DrawCommand>, state: &SimulationState) {
    out.extend(state.stars.iter().map(|s| DrawCommand::Circle {
        center: s.pos,
        radius: s.size,
        color: rgba(colors::WHITE, s.alpha),
    }));
}

fn push_wheel(out: &mut Vec<DrawCommand>, state: &SimulationState, scale: f32) {
    let tuning = &state.tuning;
    let level = state.session().level();
    let tier = WheelTier::for_level(level, &tuning.wheel_tiers);
    let finish = AudioTier::for_level(level, tuning.audio_tiers);
    let outer = tuning.wheel_radius;
    let inner = tuning.wheel_inner_radius();
    let place = Placement::new(state.viewport.wheel_center(), state.wheel.visual_angle, scale);

    for (index, color) in SEGMENT_ORDER.iter().enumerate() {
        let rgb = color.rgb();

        let glow = segment_band(tier, outer + SEGMENT_GLOW_SPREAD, inner, index, SEGMENT_GAP);
        out.push(DrawCommand::Band {
            outer: place.points(&glow.outer),
            inner: place.points(&glow.inner),
            color: rgba(rgb, 0.25),
        });

        let band = segment_band(tier, outer, inner, index, SEGMENT_GAP);
        out.push(DrawCommand::Band {
            outer: place.points(&band.outer),
            inner: place.points(&band.inner),
            color: rgba(rgb, 1.0),
        });

        if tier.is_round() {
            push_segment_detail(out, &place, finish, index, outer, inner);
        } else {
            let mut edge = band.outer.clone();
            edge.extend(band.inner.iter().rev());
            out.push(DrawCommand::Stroke {
                points: place.points(&edge),
                width: place.len(2.0),
                closed: true,
                color: rgba(colors::WHITE, 0.2),
            });
        }
    }

    push_core(out, &place, tier, finish, inner);
}

/// Surface detail on a round segment: gloss, bevel or sheen by tier
fn push_segment_detail(
    out: &mut Vec<DrawCommand>,
    place: &Placement,
    finish: AudioTier,
    index: usize,
    outer: f32,
    inner: f32,
) {
    let mid_radius = (outer + inner) / 2.0;
    let sector = AnnularSector::wheel_segment(index, mid_radius, outer - 2.0, SEGMENT_GAP);
    let mid_angle = sector.mid_angle();

    if finish == AudioTier::Chip {
        let at = place.point(polar_to_cartesian(mid_radius, mid_angle));
        out.push(DrawCommand::Circle {
            center: at,
            radius: place.len(14.0),
            color: rgba(colors::WHITE, 0.2),
        });
        out.push(DrawCommand::Circle {
            center: at,
            radius: place.len(7.0),
            color: rgba(colors::WHITE, 0.35),
        });
    } else if finish == AudioTier::Laser {
        out.push(DrawCommand::Stroke {
            points: place.points(&sector.sample_inner_edge(BAND_SAMPLES)),
            width: place.len(4.0),
            closed: false,
            color: [0.0, 0.0, 0.0, 0.3],
        });
        out.push(DrawCommand::Stroke {
            points: place.points(&sector.sample_outer_edge(BAND_SAMPLES)),
            width: place.len(2.0),
            closed: false,
            color: rgba(colors::WHITE, 0.2),
        });
    } else {
        let at = place.point(polar_to_cartesian(outer * 0.8, mid_angle));
        out.push(DrawCommand::Circle {
            center: at,
            radius: place.len(10.0),
            color: rgba(colors::WHITE, 0.12),
        });
        out.push(DrawCommand::Circle {
            center: at,
            radius: place.len(5.0),
            color: rgba(colors::WHITE, 0.2),
        });
    }
}

fn push_core(
    out: &mut Vec<DrawCommand>,
    place: &Placement,
    tier: WheelTier,
    finish: AudioTier,
    inner: f32,
) {
    let center = place.origin;

    if tier == WheelTier::Square {
        out.push(DrawCommand::Fill {
            center,
            points: place.points(&square_points(inner - 5.0)),
            color: rgba(colors::CORE, 1.0),
        });
        let frame = place.points(&square_points(inner - 10.0));
        out.push(DrawCommand::Stroke {
            points: frame.clone(),
            width: place.len(9.0),
            closed: true,
            color: rgba(colors::CORE_FRAME, 0.25),
        });
        out.push(DrawCommand::Stroke {
            points: frame,
            width: place.len(3.0),
            closed: true,
            color: rgba(colors::CORE_FRAME, 1.0),
        });
        out.push(DrawCommand::Fill {
            center,
            points: place.points(&square_points(5.0)),
            color: rgba(colors::WHITE, 1.0),
        });
        return;
    }

    let core = if tier.is_round() {
        circle_points(inner - 5.0, 64)
    } else {
        boundary_path(tier, inner - 5.0)
    };
    out.push(DrawCommand::Fill {
        center,
        points: place.points(&core),
        color: rgba(colors::CORE, 1.0),
    });

    let hub_ring = place.len(inner - 8.0);
    if finish == AudioTier::Chip {
        out.push(DrawCommand::Circle {
            center,
            radius: place.len(15.0),
            color: rgba(colors::HUB_GLOW, 0.3),
        });
        out.push(DrawCommand::Circle {
            center,
            radius: place.len(9.0),
            color: rgba(colors::HUB_GLOW, 0.8),
        });
        out.push(DrawCommand::Circle {
            center,
            radius: place.len(3.0),
            color: rgba(colors::WHITE, 1.0),
        });
        push_dashed_ring(out, place, inner - 8.0);
    } else if finish == AudioTier::Laser {
        let hexagon: Vec<Vec2> = (0..6)
            .map(|i| polar_to_cartesian(12.0, FRAC_PI_3 * i as f32))
            .collect();
        let hexagon = place.points(&hexagon);
        out.push(DrawCommand::Fill {
            center,
            points: hexagon.clone(),
            color: rgba(colors::HUB_STEEL, 1.0),
        });
        out.push(DrawCommand::Stroke {
            points: hexagon,
            width: place.len(1.0),
            closed: true,
            color: rgba(colors::HUB_EDGE, 1.0),
        });
        out.push(DrawCommand::Ring {
            center,
            radius: hub_ring,
            width: place.len(3.0),
            color: rgba(colors::HUB_STEEL, 1.0),
        });
    } else {
        out.push(DrawCommand::Ring {
            center,
            radius: hub_ring,
            width: place.len(2.0),
            color: rgba(colors::WHITE, 0.1),
        });
        out.push(DrawCommand::Circle {
            center,
            radius: place.len(8.0),
            color: rgba(colors::HUB_DOT, 1.0),
        });
    }
}

/// Alternating dash/gap of `HUB_DASH` length around a circle
fn push_dashed_ring(out: &mut Vec<DrawCommand>, place: &Placement, radius: f32) {
    let dash_angle = HUB_DASH / radius;
    let dashes = (TAU / (dash_angle * 2.0)).floor() as usize;
    for i in 0..dashes {
        let start = i as f32 * dash_angle * 2.0;
        let arc = [
            polar_to_cartesian(radius, start),
            polar_to_cartesian(radius, start + dash_angle / 2.0),
            polar_to_cartesian(radius, start + dash_angle),
        ];
        out.push(DrawCommand::Stroke {
            points: place.points(&arc),
            width: place.len(1.0),
            closed: false,
            color: rgba(colors::HUB_GLOW, 1.0),
        });
    }
}

fn push_object(out: &mut Vec<DrawCommand>, obj: &FallingObject, x: f32) {
    let at = Vec2::new(x, obj.y);
    let body = obj.rgb();
    let r = obj.radius;

    // Tail fading upward from the body
    let tail = obj.speed * 2.0;
    out.push(DrawCommand::Gradient {
        points: [
            Vec2::new(x - r * 0.6, obj.y),
            Vec2::new(x, obj.y - tail),
            Vec2::new(x + r * 0.6, obj.y),
        ],
        colors: [rgba(body, 0.5), rgba(colors::WHITE, 0.0), rgba(body, 0.5)],
    });

    let glow = if obj.is_wildcard() { 10.0 } else { 5.0 };
    out.push(DrawCommand::Circle {
        center: at,
        radius: r + glow,
        color: rgba(body, 0.2),
    });

    match object_outline(obj.shape, r) {
        ObjectOutline::Polygon(points) => {
            out.push(DrawCommand::Fill {
                center: at,
                points: points.iter().map(|&p| at + p).collect(),
                color: rgba(body, 1.0),
            });
        }
        ObjectOutline::Snowflake {
            bars,
            tips,
            tip_radius,
            core_radius,
        } => {
            for bar in &bars {
                out.push(DrawCommand::Fill {
                    center: at,
                    points: bar.iter().map(|&p| at + p).collect(),
                    color: rgba(WILDCARD_RGB, 1.0),
                });
            }
            for &tip in &tips {
                out.push(DrawCommand::Circle {
                    center: at + tip,
                    radius: tip_radius,
                    color: rgba(colors::WHITE, 1.0),
                });
            }
            out.push(DrawCommand::Circle {
                center: at,
                radius: core_radius,
                color: rgba(colors::WHITE, 1.0),
            });
        }
    }

    let highlight = match obj.shape {
        ShapeTag::Wildcard => None,
        ShapeTag::Square => Some((Vec2::new(-r * 0.4, -r * 0.4), 3.0)),
        ShapeTag::Star => Some((Vec2::new(-2.0, -4.0), 2.0)),
        _ => Some((Vec2::new(-3.0, -3.0), 3.0)),
    };
    if let Some((offset, radius)) = highlight {
        out.push(DrawCommand::Circle {
            center: at + offset,
            radius,
            color: rgba(colors::WHITE, 0.6),
        });
    }
}

fn rotated_rect(center: Vec2, half: Vec2, angle: f32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(angle);
    [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .iter()
    .map(|&c| center + rot.rotate(c))
    .collect()
}

fn push_particle(out: &mut Vec<DrawCommand>, p: &Particle) {
    let alpha = p.alpha.clamp(0.0, 1.0);
    let color = rgba(p.color, alpha);
    let command = match p.variant {
        ParticleVariant::Circle => DrawCommand::Circle {
            center: p.pos,
            radius: p.size,
            color,
        },
        ParticleVariant::Square => DrawCommand::Fill {
            center: p.pos,
            points: rotated_rect(p.pos, Vec2::splat(p.size / 2.0), p.rotation),
            color,
        },
        ParticleVariant::Confetti => DrawCommand::Fill {
            center: p.pos,
            points: rotated_rect(p.pos, Vec2::new(p.size / 2.0, p.size * 0.3), p.rotation),
            color,
        },
        ParticleVariant::Line => {
            let dir = p.vel.normalize_or(Vec2::X);
            DrawCommand::Stroke {
                points: vec![p.pos, p.pos + dir * p.size * 3.0],
                width: 2.0,
                closed: false,
                color,
            }
        }
        ParticleVariant::Shockwave => DrawCommand::Ring {
            center: p.pos,
            radius: p.size,
            width: p.ring_width(),
            color: rgba(colors::WHITE, alpha),
        },
    };
    out.push(command);
}

fn push_indicator(out: &mut Vec<DrawCommand>, state: &SimulationState) {
    let finish = AudioTier::for_level(state.session().level(), state.tuning.audio_tiers);
    let center = state.viewport.wheel_center();
    let tip = Vec2::new(center.x, center.y - state.tuning.wheel_radius - INDICATOR_OFFSET);
    let chevron = vec![
        tip + Vec2::new(-10.0, -8.0),
        tip + Vec2::new(0.0, 4.0),
        tip + Vec2::new(10.0, -8.0),
    ];

    let main = match finish {
        AudioTier::Soft => colors::WHITE,
        AudioTier::Laser => colors::INDICATOR_MID,
        AudioTier::Chip => colors::INDICATOR_HIGH,
    };

    for (width, color) in [
        (10.0, rgba(colors::WHITE, 0.25)),
        (4.0, rgba(main, 1.0)),
        (2.0, rgba(colors::HUB_EDGE, 1.0)),
    ] {
        out.push(DrawCommand::Stroke {
            points: chevron.clone(),
            width,
            closed: false,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::SequenceRng;
    use crate::sim::state::{ColorTag, Viewport};
    use crate::tuning::Tuning;
    use std::f32::consts::FRAC_PI_2;

    fn state() -> SimulationState {
        let mut rng = SequenceRng::constant(0.5);
        SimulationState::new(Tuning::default(), Viewport::new(400.0, 800.0), &mut rng)
    }

    fn playing() -> SimulationState {
        let mut s = state();
        s.start();
        s.sync_lifecycle();
        s
    }

    fn count_bands(frame: &Frame) -> usize {
        frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Band { .. }))
            .count()
    }

    #[test]
    fn test_theme_cycles_by_level() {
        assert_eq!(theme_color(1, false), colors::LEVEL_THEMES[0]);
        assert_eq!(theme_color(3, false), colors::LEVEL_THEMES[2]);
        assert_eq!(theme_color(8, false), colors::LEVEL_THEMES[0]);
        assert_eq!(theme_color(8, true), colors::GAME_OVER);
    }

    #[test]
    fn test_idle_frame_has_wheel_without_indicator() {
        let s = state();
        let frame = build_frame(&s);
        assert_eq!(count_bands(&frame), 8);
        assert_eq!(frame.clear_color, rgba(colors::LEVEL_THEMES[0], 1.0));
        assert_eq!(frame.texts().count(), 0);
        // Stars come first
        assert!(matches!(frame.commands[0], DrawCommand::Circle { .. }));
    }

    #[test]
    fn test_game_over_hides_wheel() {
        let mut s = playing();
        s.set_game_over(true);
        let frame = build_frame(&s);
        assert_eq!(count_bands(&frame), 0);
        assert_eq!(frame.clear_color, rgba(colors::GAME_OVER, 1.0));
    }

    #[test]
    fn test_playing_frame_order() {
        let mut s = playing();
        s.falling = Some(FallingObject {
            y: 100.0,
            color: ColorTag::Blue,
            shape: ShapeTag::Diamond,
            radius: 14.0,
            speed: 3.0,
        });
        s.texts.spawn(Vec2::new(200.0, 300.0), "+2", ColorTag::Blue.rgb(), 24.0, 2.0);
        let frame = build_frame(&s);

        let texts: Vec<_> = frame.texts().collect();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text, "+2");

        // Indicator strokes close the frame
        assert!(matches!(
            frame.commands.last(),
            Some(DrawCommand::Stroke { closed: false, .. })
        ));
        let gradient = frame
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Gradient { .. }))
            .unwrap();
        let last_band = frame
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Band { .. }))
            .unwrap();
        assert!(last_band < gradient, "object drawn over the wheel");
    }

    #[test]
    fn test_wheel_follows_visual_angle() {
        let mut s = playing();
        s.wheel.visual_angle = FRAC_PI_2;
        let frame = build_frame(&s);
        let center = s.viewport.wheel_center();
        let red = rgba(ColorTag::Red.rgb(), 1.0);
        let outer = frame
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Band { outer, color, .. } if *color == red => Some(outer.clone()),
                _ => None,
            })
            .unwrap();
        let mean = outer.iter().copied().sum::<Vec2>() / outer.len() as f32;
        assert!(mean.x > center.x + 50.0, "red rotated to the right: {mean:?}");
        assert!((mean.y - center.y).abs() < 10.0);
    }

    #[test]
    fn test_square_tier_core_frame() {
        let mut s = playing();
        s.set_score_and_level(110);
        let frame = build_frame(&s);
        let pink = rgba(colors::CORE_FRAME, 1.0);
        assert!(frame.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Stroke { color, closed: true, .. } if *color == pink
        )));
    }

    #[test]
    fn test_snowflake_has_no_highlight() {
        let mut s = playing();
        s.falling = Some(FallingObject {
            y: 100.0,
            color: ColorTag::Red,
            shape: ShapeTag::Wildcard,
            radius: 14.0,
            speed: 3.0,
        });
        let frame = build_frame(&s);
        let highlight = rgba(colors::WHITE, 0.6);
        assert!(!frame.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { color, .. } if *color == highlight
        )));
        let cyan = rgba(WILDCARD_RGB, 1.0);
        let bars = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { color, .. } if *color == cyan))
            .count();
        assert_eq!(bars, 4);
    }

    #[test]
    fn test_wheel_and_indicator_follow_tuned_tiers() {
        let mut s = playing();
        s.tuning.audio_tiers = [2, 3];
        s.set_score_and_level(25);
        assert_eq!(
            ParticleVariant::for_level(s.session().level(), s.tuning.audio_tiers),
            ParticleVariant::Line
        );

        let frame = build_frame(&s);
        let n = frame.commands.len();
        let high = rgba(colors::INDICATOR_HIGH, 1.0);
        assert!(matches!(
            &frame.commands[n - 2],
            DrawCommand::Stroke { color, .. } if *color == high
        ));
        let glow = rgba(colors::HUB_GLOW, 0.8);
        assert!(frame.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { color, .. } if *color == glow
        )));
    }

    #[test]
    fn test_shockwave_ring_width() {
        let mut s = playing();
        let mut rng = SequenceRng::constant(0.5);
        let cfg = s.tuning.particles.clone();
        s.particles
            .wheel_explosion(Vec2::new(200.0, 480.0), 0.0, 115.0, &cfg, &mut rng);
        let frame = build_frame(&s);
        let ring = frame
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Ring { radius, width, .. } if *radius == 115.0 => Some(*width),
                _ => None,
            })
            .unwrap();
        assert_eq!(ring, 50.0);
    }
}
