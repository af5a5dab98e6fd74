//! Match resolution at the hit line
//!
//! A falling object is judged exactly once, on the first tick its center
//! reaches the hit line above the wheel. A match scores and spawns effects; a
//! mismatch shatters the wheel and ends the run.

use glam::Vec2;

use super::particles::ParticleVariant;
use super::random::RandomSource;
use super::state::{FallingObject, GameEvent, SimulationState, WILDCARD_RGB};
use crate::audio::{SoundCue, SoundTrigger};

/// Outcome of a resolution check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No object, or it has not reached the hit line yet
    Pending,
    Matched { points: u32, wildcard: bool },
    Missed,
}

const RECORD_TEXT_SIZE: f32 = 40.0;
const FREEZE_TEXT_SIZE: f32 = 36.0;

/// Font size of a "+points" label
pub fn points_text_size(points: u32) -> f32 {
    if points > 2 { 32.0 } else { 24.0 }
}

/// Resolve the falling object if it has reached the hit line
pub fn resolve<R: RandomSource + ?Sized>(state: &mut SimulationState, rng: &mut R) -> Resolution {
    let hit_y = state.hit_y();
    let reached = state.falling.as_ref().is_some_and(|obj| obj.y >= hit_y);
    if !reached || !state.session.is_active() {
        return Resolution::Pending;
    }
    let Some(obj) = state.falling.take() else {
        return Resolution::Pending;
    };

    let active = state.wheel.active_color();
    if obj.matches(active) {
        on_match(state, &obj, rng)
    } else {
        log::debug!("Mismatch: {:?} object against {:?}", obj.color, active);
        on_miss(state, rng)
    }
}

fn on_match<R: RandomSource + ?Sized>(
    state: &mut SimulationState,
    obj: &FallingObject,
    rng: &mut R,
) -> Resolution {
    let level = state.session.level();
    let score = state.session.score();
    let points = state.tuning.score_table.points(obj.shape);
    let wildcard = obj.is_wildcard();

    state.emit(GameEvent::Sound(SoundTrigger::new(SoundCue::Score, level, score)));

    let center = state.viewport.wheel_center();
    let hit_y = state.hit_y();
    let variant = ParticleVariant::for_level(level, state.tuning.audio_tiers);
    state.particles.explosion(
        Vec2::new(center.x, hit_y + obj.radius),
        obj.rgb(),
        variant,
        &state.tuning.particles,
        rng,
    );

    let text_at = Vec2::new(center.x, hit_y);
    let rise = state.tuning.text_rise_speed;
    if wildcard {
        state
            .slow_motion
            .trigger(state.tuning.slow_motion_factor, state.tuning.slow_motion_duration_ms);
        state.emit(GameEvent::Sound(SoundTrigger::new(SoundCue::Freeze, level, score)));
        state.emit(GameEvent::SlowMotionStarted);
        state.texts.spawn(text_at, "FREEZE!", WILDCARD_RGB, FREEZE_TEXT_SIZE, rise);
    } else {
        state
            .texts
            .spawn(text_at, format!("+{points}"), obj.rgb(), points_text_size(points), rise);
    }

    let leveled_up = state.session.add_points(points);
    let new_score = state.session.score();
    let new_level = state.session.level();
    log::debug!("Match {:?} +{points} -> score {new_score}", obj.shape);

    let mut fanfare = false;
    if state.record.check(new_score) {
        log::info!("New record: {new_score}");
        state.particles.confetti_burst(text_at, &state.tuning.particles, rng);
        state.texts.spawn(
            Vec2::new(center.x, hit_y - 60.0),
            "NEW RECORD!",
            [1.0, 1.0, 1.0],
            RECORD_TEXT_SIZE,
            rise,
        );
        state.emit(GameEvent::NewRecord { score: new_score });
        fanfare = true;
    }

    if leveled_up {
        log::info!("Level up: {new_level}");
        state.emit(GameEvent::LevelUp { level: new_level });
        fanfare = true;
    }

    // Record and level-up share one cue
    if fanfare {
        state.emit(GameEvent::Sound(SoundTrigger::new(SoundCue::LevelUp, new_level, new_score)));
    }

    state.wheel.thump();
    state.emit(GameEvent::ScoreChanged {
        score: new_score,
        level: new_level,
    });

    Resolution::Matched { points, wildcard }
}

fn on_miss<R: RandomSource + ?Sized>(state: &mut SimulationState, rng: &mut R) -> Resolution {
    let level = state.session.level();
    let score = state.session.score();

    state.emit(GameEvent::Sound(SoundTrigger::new(SoundCue::GameOver, level, score)));
    state.particles.wheel_explosion(
        state.viewport.wheel_center(),
        state.wheel.visual_angle,
        state.tuning.wheel_radius,
        &state.tuning.particles,
        rng,
    );

    state.session.game_over = true;
    if state.slow_motion.is_active() {
        state.emit(GameEvent::SlowMotionEnded);
    }
    state.slow_motion.cancel();

    log::info!("Game over at score {score}, level {level}");
    state.emit(GameEvent::GameOver { score, level });
    Resolution::Missed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::SequenceRng;
    use crate::sim::state::{ColorTag, ShapeTag, Viewport};
    use crate::sim::wheel::Rotation;
    use crate::tuning::Tuning;

    fn playing_state() -> SimulationState {
        let mut rng = SequenceRng::constant(0.5);
        let mut state = SimulationState::new(Tuning::default(), Viewport::new(400.0, 800.0), &mut rng);
        state.start();
        state.sync_lifecycle();
        state
    }

    fn drop_at_hit_line(state: &mut SimulationState, color: ColorTag, shape: ShapeTag) {
        state.falling = Some(FallingObject {
            y: state.hit_y(),
            color,
            shape,
            radius: 14.0,
            speed: 3.0,
        });
    }

    #[test]
    fn test_pending_above_hit_line() {
        let mut state = playing_state();
        let mut rng = SequenceRng::constant(0.5);
        assert_eq!(resolve(&mut state, &mut rng), Resolution::Pending);

        drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Circle);
        state.falling.as_mut().unwrap().y -= 0.5;
        assert_eq!(resolve(&mut state, &mut rng), Resolution::Pending);
        assert!(state.falling.is_some());
    }

    #[test]
    fn test_match_scores_and_celebrates() {
        let mut state = playing_state();
        let mut rng = SequenceRng::constant(0.5);
        drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Star);

        let result = resolve(&mut state, &mut rng);
        assert_eq!(result, Resolution::Matched { points: 3, wildcard: false });
        assert!(state.falling.is_none());
        assert_eq!(state.session().score(), 3);
        assert_eq!(state.wheel.pulse_scale, 1.2);
        assert_eq!(state.particles.len(), 20);

        let text = state.texts.iter().next().unwrap();
        assert_eq!(text.text, "+3");
        assert_eq!(text.font_size, 32.0);

        let events = state.drain_events();
        assert_eq!(
            events.first(),
            Some(&GameEvent::Sound(SoundTrigger::new(SoundCue::Score, 1, 0)))
        );
        assert_eq!(
            events.last(),
            Some(&GameEvent::ScoreChanged { score: 3, level: 1 })
        );
    }

    #[test]
    fn test_explosion_variant_uses_level() {
        let mut state = playing_state();
        let mut rng = SequenceRng::constant(0.5);
        state.set_score_and_level(85);
        drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Circle);
        resolve(&mut state, &mut rng);
        assert!(state.particles.iter().all(|p| p.variant == ParticleVariant::Line));
    }

    #[test]
    fn test_mismatch_ends_run() {
        let mut state = playing_state();
        let mut rng = SequenceRng::constant(0.5);
        state.wheel.rotate(Rotation::Clockwise);
        drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Circle);

        assert_eq!(resolve(&mut state, &mut rng), Resolution::Missed);
        assert!(state.session().game_over);
        assert!(state.falling.is_none());
        assert_eq!(state.particles.len(), 1 + 200);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 0, level: 1 }));
        assert!(events.contains(&GameEvent::Sound(SoundTrigger::new(SoundCue::GameOver, 1, 0))));

        // No further resolution this session
        drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Circle);
        assert_eq!(resolve(&mut state, &mut rng), Resolution::Pending);
    }

    #[test]
    fn test_wildcard_overrides_color() {
        let mut state = playing_state();
        let mut rng = SequenceRng::constant(0.5);
        state.wheel.rotate(Rotation::HalfTurn);
        assert_eq!(state.wheel.active_color(), ColorTag::Green);
        drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Wildcard);

        let result = resolve(&mut state, &mut rng);
        assert_eq!(result, Resolution::Matched { points: 0, wildcard: true });
        assert_eq!(state.slow_motion.multiplier(), 0.4);
        assert_eq!(state.texts.iter().next().unwrap().text, "FREEZE!");
        assert!(state.particles.iter().all(|p| p.color == WILDCARD_RGB));

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::SlowMotionStarted));
        assert!(events.contains(&GameEvent::Sound(SoundTrigger::new(SoundCue::Freeze, 1, 0))));
    }

    #[test]
    fn test_level_up_event() {
        let mut state = playing_state();
        let mut rng = SequenceRng::constant(0.5);
        state.set_score_and_level(9);
        state.drain_events();
        drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Circle);
        resolve(&mut state, &mut rng);

        assert_eq!((state.session().score(), state.session().level()), (10, 2));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert!(events.contains(&GameEvent::Sound(SoundTrigger::new(SoundCue::LevelUp, 2, 10))));
    }

    #[test]
    fn test_record_confetti_once() {
        let mut rng = SequenceRng::constant(0.5);
        let mut state =
            SimulationState::new(Tuning::default(), Viewport::new(400.0, 800.0), &mut rng);
        state.set_high_score(2);
        state.start();
        state.sync_lifecycle();

        let mut records = 0;
        for _ in 0..5 {
            drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Circle);
            resolve(&mut state, &mut rng);
            records += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::NewRecord { .. }))
                .count();
        }
        assert_eq!(state.session().score(), 5);
        assert_eq!(records, 1);
        assert!(state.texts.iter().any(|t| t.text == "NEW RECORD!"));
    }

    #[test]
    fn test_record_on_level_up_plays_one_fanfare() {
        let mut rng = SequenceRng::constant(0.5);
        let mut state =
            SimulationState::new(Tuning::default(), Viewport::new(400.0, 800.0), &mut rng);
        state.set_high_score(9);
        state.start();
        state.sync_lifecycle();
        state.set_score_and_level(9);

        drop_at_hit_line(&mut state, ColorTag::Red, ShapeTag::Circle);
        resolve(&mut state, &mut rng);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::NewRecord { score: 10 }));
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        let fanfares = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Sound(t) if t.cue == SoundCue::LevelUp))
            .count();
        assert_eq!(fanfares, 1);
    }
}
