//! Session lifecycle: start, restart, continue
//!
//! Lifecycle calls only flip session fields. The reset they imply (clearing
//! objects and effects, re-homing the wheel, resetting the speed ramp) is
//! applied by [`SimulationState::sync_lifecycle`] at the start of the next
//! tick, so hosts that set the fields directly get the same behavior.

use super::state::{GameEvent, SessionState, SimulationState};

impl SimulationState {
    /// Begin a fresh run from level 1
    pub fn start(&mut self) {
        log::info!("Starting new run");
        self.begin(0);
    }

    /// Start over from level 1 after a game over
    pub fn restart(&mut self) {
        log::info!("Restarting run");
        self.begin(0);
    }

    /// Resume at the start of the level the last run ended on
    pub fn continue_level(&mut self) {
        let level = self.session.level();
        log::info!("Continuing at level {level}");
        self.begin(SessionState::level_floor(level));
    }

    fn begin(&mut self, score: u32) {
        self.session.set_score(score);
        self.session.game_over = false;
        self.session.playing = true;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.session.playing = playing;
    }

    pub fn set_game_over(&mut self, game_over: bool) {
        self.session.game_over = game_over;
    }

    /// Overwrite the score (level follows from it)
    pub fn set_score_and_level(&mut self, score: u32) {
        self.session.set_score(score);
    }

    /// Detect a start or restart since the last call and apply the reset
    ///
    /// Returns true if a reset was applied.
    pub fn sync_lifecycle(&mut self) -> bool {
        let playing = self.session.playing;
        let game_over = self.session.game_over;
        let restarted = self.watch.was_game_over && !game_over;
        let started = !self.watch.was_playing && playing;
        self.observe_lifecycle();

        if restarted || started {
            self.reset_run();
            true
        } else {
            false
        }
    }

    /// Record the current session flags as seen, without resetting
    ///
    /// Called after the tick's own mutations (a miss ending the run) so a
    /// lifecycle call made before the next tick is still detected.
    pub(crate) fn observe_lifecycle(&mut self) {
        self.watch.was_playing = self.session.playing;
        self.watch.was_game_over = self.session.game_over;
    }

    fn reset_run(&mut self) {
        self.falling = None;
        self.particles.clear();
        self.texts.clear();

        // A fresh run re-homes the wheel; a continue keeps its orientation
        if self.session.level() == 1 {
            self.wheel.reset();
        } else {
            self.wheel.hold();
        }

        if self.slow_motion.is_active() {
            self.emit(GameEvent::SlowMotionEnded);
        }
        self.slow_motion.cancel();

        self.elapsed_ms = 0.0;
        self.current_speed = self.tuning.base_speed;
        self.record.arm(self.session.high_score);

        log::debug!(
            "Run reset: score {}, level {}, high score {}",
            self.session.score(),
            self.session.level(),
            self.session.high_score
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::random::SequenceRng;
    use crate::sim::state::{GamePhase, SimulationState, Viewport};
    use crate::sim::wheel::Rotation;
    use crate::tuning::Tuning;

    fn state() -> SimulationState {
        let mut rng = SequenceRng::constant(0.5);
        SimulationState::new(Tuning::default(), Viewport::default(), &mut rng)
    }

    #[test]
    fn test_start_applies_reset_once() {
        let mut s = state();
        assert_eq!(s.phase(), GamePhase::Idle);
        s.start();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.sync_lifecycle());
        assert!(!s.sync_lifecycle());
    }

    #[test]
    fn test_continue_keeps_level_and_orientation() {
        let mut s = state();
        s.start();
        s.sync_lifecycle();
        s.set_score_and_level(47);
        s.wheel.rotate(Rotation::Clockwise);
        s.elapsed_ms = 60_000.0;
        s.current_speed = 6.0;
        s.set_game_over(true);
        s.sync_lifecycle();

        s.continue_level();
        assert!(s.sync_lifecycle());
        assert_eq!(s.session().score(), 40);
        assert_eq!(s.session().level(), 5);
        assert_eq!(s.wheel.logical_index(), 1);
        assert_eq!(s.wheel.target_angle, s.wheel.visual_angle);
        assert_eq!(s.current_speed, 3.0);
        assert_eq!(s.elapsed_ms, 0.0);
    }

    #[test]
    fn test_restart_rehomes_wheel() {
        let mut s = state();
        s.start();
        s.sync_lifecycle();
        s.set_score_and_level(23);
        s.wheel.rotate(Rotation::CounterClockwise);
        s.set_game_over(true);
        s.sync_lifecycle();

        s.restart();
        assert!(s.sync_lifecycle());
        assert_eq!(s.session().score(), 0);
        assert_eq!(s.session().level(), 1);
        assert_eq!(s.wheel.logical_index(), 0);
        assert_eq!(s.wheel.visual_angle, 0.0);
    }

    #[test]
    fn test_reset_cancels_slow_motion() {
        let mut s = state();
        s.start();
        s.sync_lifecycle();
        let generation = s.slow_motion.trigger(0.4, 3000.0);
        s.set_game_over(true);
        s.sync_lifecycle();
        s.restart();
        s.sync_lifecycle();
        assert_eq!(s.slow_motion.multiplier(), 1.0);
        assert!(!s.slow_motion.fire(generation));
    }
}
