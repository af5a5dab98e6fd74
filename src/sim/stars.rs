//! Drifting background starfield

use glam::Vec2;

use super::random::RandomSource;
use super::state::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundStar {
    pub pos: Vec2,
    pub size: f32,
    pub fall_speed: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Starfield {
    stars: Vec<BackgroundStar>,
}

impl Starfield {
    /// Scatter `count` stars uniformly over the viewport
    pub fn new<R: RandomSource + ?Sized>(count: usize, viewport: Viewport, rng: &mut R) -> Self {
        let stars = (0..count)
            .map(|_| BackgroundStar {
                pos: Vec2::new(rng.range(0.0, viewport.width), rng.range(0.0, viewport.height)),
                size: rng.range(0.5, 2.5),
                fall_speed: rng.range(0.1, 0.6),
                alpha: rng.range(0.1, 0.6),
            })
            .collect();
        Self { stars }
    }

    pub fn capacity(&self) -> usize {
        self.stars.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackgroundStar> {
        self.stars.iter()
    }

    /// Drift down, wrapping to the top past the bottom edge
    pub fn step(&mut self, viewport: Viewport) {
        for star in &mut self.stars {
            star.pos.y += star.fall_speed;
            if star.pos.y > viewport.height {
                star.pos.y = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::SequenceRng;

    #[test]
    fn test_stars_within_ranges() {
        let mut rng = SequenceRng::new(vec![0.0, 0.25, 0.5, 0.75, 0.99]);
        let viewport = Viewport::new(320.0, 480.0);
        let field = Starfield::new(50, viewport, &mut rng);
        assert_eq!(field.capacity(), 50);
        for s in field.iter() {
            assert!((0.0..320.0).contains(&s.pos.x));
            assert!((0.0..480.0).contains(&s.pos.y));
            assert!((0.5..2.5).contains(&s.size));
            assert!((0.1..0.6).contains(&s.fall_speed));
            assert!((0.1..0.6).contains(&s.alpha));
        }
    }

    #[test]
    fn test_stars_wrap() {
        let mut rng = SequenceRng::new(vec![0.5, 0.999, 0.5, 0.999, 0.5]);
        let viewport = Viewport::new(100.0, 100.0);
        let mut field = Starfield::new(1, viewport, &mut rng);
        let start = field.iter().next().unwrap().pos.y;
        assert!(start > 99.0);
        for _ in 0..10 {
            field.step(viewport);
        }
        assert!(field.iter().next().unwrap().pos.y < 10.0);
    }
}
