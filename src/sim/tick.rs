//! Per-frame simulation tick
//!
//! Core game loop. Each call observes lifecycle transitions, applies queued
//! rotations, then advances the starfield, wheel, spawner, falling object and
//! effects in that order.

use super::collision::{self, Resolution};
use super::random::RandomSource;
use super::spawner::{spawn_object, speed_for_elapsed};
use super::state::{GameEvent, GamePhase, SimulationState};
use super::wheel::Rotation;

/// Input commands collected between two ticks
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Rotation commands in arrival order
    pub rotations: Vec<Rotation>,
}

impl TickInput {
    pub fn push(&mut self, rotation: Rotation) {
        self.rotations.push(rotation);
    }

    /// Hosts clear one-shot input after every tick
    pub fn clear(&mut self) {
        self.rotations.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}

/// Advance the simulation by one frame of `dt_ms` milliseconds
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut SimulationState,
    input: &TickInput,
    dt_ms: f32,
    rng: &mut R,
) -> Resolution {
    state.time_ticks += 1;
    state.sync_lifecycle();

    let active = state.session.is_active();
    if active {
        for &rotation in &input.rotations {
            state.wheel.rotate(rotation);
        }
    } else if !input.is_empty() {
        log::trace!("Ignoring {} rotation(s) outside play", input.rotations.len());
    }

    state.stars.step(state.viewport);

    if state.phase() == GamePhase::Idle {
        state.wheel.idle_spin();
    } else {
        state
            .wheel
            .step(state.tuning.spring_tension, state.tuning.spring_friction);
    }

    let mut resolution = Resolution::Pending;
    if active {
        state.elapsed_ms += dt_ms;
        state.current_speed = speed_for_elapsed(&state.tuning, state.elapsed_ms);

        if state.falling.is_none() {
            let obj = spawn_object(rng, &state.tuning, state.current_speed);
            log::debug!("Spawned {:?} {:?} at speed {:.2}", obj.color, obj.shape, obj.speed);
            state.falling = Some(obj);
        }

        let multiplier = state.slow_motion.multiplier();
        if let Some(obj) = state.falling.as_mut() {
            obj.y += obj.speed * multiplier;
        }
        resolution = collision::resolve(state, rng);
    }
    state.observe_lifecycle();

    state.particles.step(&state.tuning.particles);
    state.texts.step(state.tuning.text_decay);

    if state.slow_motion.advance(dt_ms) {
        state.emit(GameEvent::SlowMotionEnded);
    }

    resolution
}
