//! Floating score text

use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: [f32; 3],
    pub alpha: f32,
    /// Pixels per tick (negative rises)
    pub vertical_velocity: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FloatingTextSystem {
    texts: Vec<FloatingText>,
}

impl FloatingTextSystem {
    pub fn spawn(
        &mut self,
        pos: Vec2,
        text: impl Into<String>,
        color: [f32; 3],
        font_size: f32,
        rise_speed: f32,
    ) {
        self.texts.push(FloatingText {
            pos,
            text: text.into(),
            color,
            alpha: 1.0,
            vertical_velocity: -rise_speed,
            font_size,
        });
    }

    pub fn step(&mut self, decay: f32) {
        for t in &mut self.texts {
            t.pos.y += t.vertical_velocity;
            t.alpha -= decay;
        }
        self.texts.retain(|t| t.alpha > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatingText> {
        self.texts.iter()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn clear(&mut self) {
        self.texts.clear();
    }
}
