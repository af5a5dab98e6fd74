//! Slow-motion window triggered by wildcards
//!
//! Each trigger or cancel bumps a generation counter. The pending reset
//! carries the generation it was armed with, so an expiry that belongs to a
//! superseded window does nothing.

/// Reset armed by the most recent trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingReset {
    pub generation: u64,
    pub remaining_ms: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlowMotionTimer {
    multiplier: f32,
    generation: u64,
    pending: Option<PendingReset>,
}

impl Default for SlowMotionTimer {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            generation: 0,
            pending: None,
        }
    }
}

impl SlowMotionTimer {
    /// Fall speed multiplier (1.0 when inactive)
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<PendingReset> {
        self.pending
    }

    /// Start (or restart) a window; returns the generation of the new reset
    pub fn trigger(&mut self, factor: f32, duration_ms: f32) -> u64 {
        self.generation += 1;
        self.multiplier = factor;
        self.pending = Some(PendingReset {
            generation: self.generation,
            remaining_ms: duration_ms,
        });
        self.generation
    }

    /// End any window immediately and invalidate its reset
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.multiplier = 1.0;
    }

    /// Count down the pending reset; returns true when it fired
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        pending.remaining_ms -= dt_ms;
        if pending.remaining_ms > 0.0 {
            return false;
        }
        let generation = pending.generation;
        self.fire(generation)
    }

    /// Apply the reset armed with `generation`; stale generations are ignored
    pub fn fire(&mut self, generation: u64) -> bool {
        match self.pending {
            Some(pending) if pending.generation == generation => {
                self.multiplier = 1.0;
                self.pending = None;
                true
            }
            _ => {
                log::trace!("Ignoring stale slow-motion reset (generation {generation})");
                false
            }
        }
    }
}
