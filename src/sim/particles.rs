//! Particle effects: match bursts, wheel shatter, record confetti

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI, TAU};

use super::random::{RandomSource, pick};
use super::state::{ColorTag, SEGMENT_ORDER};
use crate::tuning::ParticleTuning;

/// Default live particle cap (quality presets lower it)
pub const DEFAULT_PARTICLE_CAP: usize = 2000;

/// How a particle moves and is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleVariant {
    /// Filled dot
    Circle,
    /// Filled square spinning as it fades
    Square,
    /// Streak along the velocity
    Line,
    /// Expanding stroked ring; grows in place
    Shockwave,
    /// Slow-falling spinning paper
    Confetti,
}

impl ParticleVariant {
    /// Burst variant for a level: circle, then square at the first audio
    /// tier, then line at the second
    pub fn for_level(level: u32, tiers: [u32; 2]) -> Self {
        if level >= tiers[1] {
            ParticleVariant::Line
        } else if level >= tiers[0] {
            ParticleVariant::Square
        } else {
            ParticleVariant::Circle
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 3],
    pub alpha: f32,
    /// Radius, side length or (shockwave) ring radius
    pub size: f32,
    pub variant: ParticleVariant,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Sway phase offset (confetti)
    pub phase: f32,
}

impl Particle {
    fn new(pos: Vec2, vel: Vec2, color: [f32; 3], size: f32, variant: ParticleVariant) -> Self {
        Self {
            pos,
            vel,
            color,
            alpha: 1.0,
            size,
            variant,
            rotation: 0.0,
            rotation_speed: 0.0,
            phase: 0.0,
        }
    }

    /// Stroke width of a shockwave ring
    pub fn ring_width(&self) -> f32 {
        50.0 * self.alpha
    }
}

/// Live particles, oldest first
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    cap: usize,
    ticks: u64,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            cap: DEFAULT_PARTICLE_CAP,
            ticks: 0,
        }
    }
}

impl ParticleSystem {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.enforce_cap();
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    fn enforce_cap(&mut self) {
        if self.particles.len() > self.cap {
            let excess = self.particles.len() - self.cap;
            self.particles.drain(..excess);
        }
    }

    /// Radial burst where a falling object was caught
    pub fn explosion<R: RandomSource + ?Sized>(
        &mut self,
        at: Vec2,
        color: [f32; 3],
        variant: ParticleVariant,
        cfg: &ParticleTuning,
        rng: &mut R,
    ) {
        for _ in 0..cfg.count {
            let angle = rng.range(0.0, TAU);
            let speed = rng.range(cfg.speed_min, cfg.speed_max);
            let size = rng.range(cfg.size_min, cfg.size_max);
            let vel = Vec2::from_angle(angle) * speed;
            self.push(Particle::new(at, vel, color, size, variant));
        }
        self.enforce_cap();
    }

    /// Shockwave plus fragments flung out of each segment's current direction
    pub fn wheel_explosion<R: RandomSource + ?Sized>(
        &mut self,
        center: Vec2,
        visual_angle: f32,
        wheel_radius: f32,
        cfg: &ParticleTuning,
        rng: &mut R,
    ) {
        self.push(Particle::new(
            center,
            Vec2::ZERO,
            [1.0, 1.0, 1.0],
            wheel_radius,
            ParticleVariant::Shockwave,
        ));

        for (index, color) in SEGMENT_ORDER.iter().enumerate() {
            let base = index as f32 * FRAC_PI_2 - FRAC_PI_2 + visual_angle;
            for _ in 0..cfg.fragments_per_segment {
                let angle = base + rng.range(-0.5, 0.5) * PI;
                let dir = Vec2::from_angle(angle);
                let speed = rng.range(5.0, 20.0);
                let start = rng.range(20.0, 60.0);
                let size = rng.range(2.0, 10.0);
                let variant = if rng.chance(0.5) {
                    ParticleVariant::Line
                } else {
                    ParticleVariant::Square
                };
                self.push(Particle::new(
                    center + dir * start,
                    dir * speed,
                    color.rgb(),
                    size,
                    variant,
                ));
            }
        }
        self.enforce_cap();
    }

    /// Upward fountain of multicolored confetti
    pub fn confetti_burst<R: RandomSource + ?Sized>(
        &mut self,
        at: Vec2,
        cfg: &ParticleTuning,
        rng: &mut R,
    ) {
        for _ in 0..cfg.confetti_count {
            let angle = -FRAC_PI_2 + rng.range(-FRAC_PI_3, FRAC_PI_3);
            let speed = rng.range(6.0, 14.0);
            let color: ColorTag = pick(rng, &SEGMENT_ORDER);
            let mut p = Particle::new(
                at,
                Vec2::from_angle(angle) * speed,
                color.rgb(),
                rng.range(4.0, 8.0),
                ParticleVariant::Confetti,
            );
            p.rotation = rng.range(0.0, TAU);
            p.rotation_speed = rng.range(-0.2, 0.2);
            p.phase = rng.range(0.0, TAU);
            self.push(p);
        }
        self.enforce_cap();
    }

    /// Advance one tick and drop faded particles
    pub fn step(&mut self, cfg: &ParticleTuning) {
        self.ticks += 1;
        let t = self.ticks as f32;

        for p in &mut self.particles {
            match p.variant {
                ParticleVariant::Shockwave => {
                    p.size += cfg.shockwave_growth;
                    p.alpha -= cfg.shockwave_decay;
                }
                ParticleVariant::Confetti => {
                    p.vel.y += cfg.gravity * cfg.confetti_gravity_scale;
                    p.vel *= cfg.confetti_drag;
                    p.pos += p.vel;
                    p.pos.x += (t * 0.1 + p.phase).sin() * cfg.confetti_sway;
                    p.rotation += p.rotation_speed;
                    p.alpha -= cfg.confetti_decay;
                }
                ParticleVariant::Circle | ParticleVariant::Square | ParticleVariant::Line => {
                    p.pos += p.vel;
                    p.vel.y += cfg.gravity;
                    p.alpha -= cfg.decay;
                    if p.variant == ParticleVariant::Square {
                        p.rotation = p.alpha * 10.0;
                    }
                }
            }
        }

        self.particles.retain(|p| p.alpha > 0.0);
    }
}
