//! Game state and core simulation types
//!
//! Everything the per-frame tick reads or writes lives in [`SimulationState`].
//! There are no module-level globals; hosts own exactly one state value.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particles::ParticleSystem;
use super::slow_motion::SlowMotionTimer;
use super::stars::Starfield;
use super::text::FloatingTextSystem;
use super::wheel::Wheel;
use crate::audio::SoundTrigger;
use crate::consts::{POINTS_PER_LEVEL, WHEEL_CENTER_OFFSET_Y};
use crate::hex_rgb;
use crate::sim::random::RandomSource;
use crate::tuning::Tuning;

/// Wheel segment / falling object colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorTag {
    Red,
    Blue,
    Green,
    Yellow,
}

/// Segment colors clockwise from the top of the unrotated wheel
pub const SEGMENT_ORDER: [ColorTag; 4] = [
    ColorTag::Red,
    ColorTag::Blue,
    ColorTag::Green,
    ColorTag::Yellow,
];

/// Accent used for wildcard effects (cyan-400)
pub const WILDCARD_RGB: [f32; 3] = hex_rgb(0x22D3EE);

impl ColorTag {
    pub fn rgb(self) -> [f32; 3] {
        match self {
            ColorTag::Red => hex_rgb(0xEF4444),
            ColorTag::Blue => hex_rgb(0x3B82F6),
            ColorTag::Green => hex_rgb(0x22C55E),
            ColorTag::Yellow => hex_rgb(0xEAB308),
        }
    }
}

/// Falling object shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeTag {
    Circle,
    Square,
    Hexagon,
    Diamond,
    Star,
    /// Snowflake: matches any color and triggers slow motion
    Wildcard,
}

/// Shapes drawn for regular (non-wildcard) spawns
pub const BASE_SHAPES: [ShapeTag; 5] = [
    ShapeTag::Circle,
    ShapeTag::Square,
    ShapeTag::Hexagon,
    ShapeTag::Diamond,
    ShapeTag::Star,
];

/// The single object falling toward the wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    /// Vertical position of the object's center (screen space, y down)
    pub y: f32,
    pub color: ColorTag,
    pub shape: ShapeTag,
    pub radius: f32,
    /// Fall speed locked in at spawn (pixels per tick)
    pub speed: f32,
}

impl FallingObject {
    pub fn is_wildcard(&self) -> bool {
        self.shape == ShapeTag::Wildcard
    }

    /// Whether this object matches the color rotated to the top segment
    pub fn matches(&self, active: ColorTag) -> bool {
        self.is_wildcard() || self.color == active
    }

    /// Display color of the object body
    pub fn rgb(&self) -> [f32; 3] {
        if self.is_wildcard() {
            WILDCARD_RGB
        } else {
            self.color.rgb()
        }
    }
}

/// Lifecycle phase derived from the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not playing: attract mode, wheel spins on its own
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended on a mismatch
    GameOver,
}

/// Score, level and lifecycle flags
///
/// The level is derived from the score, including when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredSession")]
pub struct SessionState {
    pub playing: bool,
    pub game_over: bool,
    score: u32,
    level: u32,
    pub high_score: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            playing: false,
            game_over: false,
            score: 0,
            level: 1,
            high_score: 0,
        }
    }
}

/// Serialized form of [`SessionState`]; any stored level is ignored
#[derive(Deserialize)]
#[serde(default)]
struct StoredSession {
    playing: bool,
    game_over: bool,
    score: u32,
    high_score: u32,
}

impl Default for StoredSession {
    fn default() -> Self {
        let session = SessionState::default();
        Self {
            playing: session.playing,
            game_over: session.game_over,
            score: session.score,
            high_score: session.high_score,
        }
    }
}

impl From<StoredSession> for SessionState {
    fn from(stored: StoredSession) -> Self {
        let mut session = SessionState {
            playing: stored.playing,
            game_over: stored.game_over,
            high_score: stored.high_score,
            ..Default::default()
        };
        session.set_score(stored.score);
        session
    }
}

impl SessionState {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else if self.playing {
            GamePhase::Playing
        } else {
            GamePhase::Idle
        }
    }

    /// Whether rotations, spawns and resolution are live
    pub fn is_active(&self) -> bool {
        self.playing && !self.game_over
    }

    /// Level reached at a given score
    pub fn level_for_score(score: u32) -> u32 {
        score / POINTS_PER_LEVEL + 1
    }

    /// Lowest score of a level (where Continue resumes)
    pub fn level_floor(level: u32) -> u32 {
        level.saturating_sub(1) * POINTS_PER_LEVEL
    }

    /// Set the score and recompute the level from it
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
        self.level = Self::level_for_score(score);
    }

    /// Add points; returns true if the level increased
    pub fn add_points(&mut self, points: u32) -> bool {
        let before = self.level;
        self.set_score(self.score.saturating_add(points));
        self.level > before
    }

    /// Percent of the current level completed (0-90 in steps of 10)
    pub fn level_progress(&self) -> u32 {
        (self.score % POINTS_PER_LEVEL) * (100 / POINTS_PER_LEVEL)
    }
}

/// Logical viewport provided by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Wheel center (slightly below the middle of the screen)
    pub fn wheel_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0 + WHEEL_CENTER_OFFSET_Y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Score or level changed (counters, progress bar)
    ScoreChanged { score: u32, level: u32 },
    /// A new level was reached
    LevelUp { level: u32 },
    /// The session high score was beaten for the first time this session
    NewRecord { score: u32 },
    SlowMotionStarted,
    SlowMotionEnded,
    /// Mismatch ended the run
    GameOver { score: u32, level: u32 },
    /// Audio cue for the synthesizer
    Sound(SoundTrigger),
}

/// Tracks the one-time record celebration of a session
#[derive(Debug, Clone, Default)]
pub struct RecordTracker {
    /// High score when the session started
    pub baseline: u32,
    /// Already celebrated this session
    pub celebrated: bool,
}

impl RecordTracker {
    pub fn arm(&mut self, high_score: u32) {
        self.baseline = high_score;
        self.celebrated = false;
    }

    /// Returns true exactly once per session, when `score` first exceeds a
    /// nonzero baseline
    pub fn check(&mut self, score: u32) -> bool {
        if self.celebrated || self.baseline == 0 || score <= self.baseline {
            return false;
        }
        self.celebrated = true;
        true
    }
}

/// Session flags seen at the previous tick (transition detection)
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SessionWatch {
    pub was_playing: bool,
    pub was_game_over: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub(crate) session: SessionState,
    pub wheel: Wheel,
    /// At most one object falls at a time
    pub falling: Option<FallingObject>,
    pub particles: ParticleSystem,
    pub texts: FloatingTextSystem,
    pub stars: Starfield,
    pub slow_motion: SlowMotionTimer,
    /// Play time of the current session (drives the speed ramp)
    pub elapsed_ms: f32,
    /// Speed the next spawn will use
    pub current_speed: f32,
    /// Frames simulated since creation
    pub time_ticks: u64,
    pub record: RecordTracker,
    pub(crate) watch: SessionWatch,
    pub(crate) events: Vec<GameEvent>,
}

impl SimulationState {
    /// Create an idle simulation (attract mode)
    pub fn new<R: RandomSource + ?Sized>(tuning: Tuning, viewport: Viewport, rng: &mut R) -> Self {
        let stars = Starfield::new(tuning.star_count, viewport, rng);
        let current_speed = tuning.base_speed;
        Self {
            tuning,
            viewport,
            session: SessionState::default(),
            wheel: Wheel::default(),
            falling: None,
            particles: ParticleSystem::default(),
            texts: FloatingTextSystem::default(),
            stars,
            slow_motion: SlowMotionTimer::default(),
            elapsed_ms: 0.0,
            current_speed,
            time_ticks: 0,
            record: RecordTracker::default(),
            watch: SessionWatch::default(),
            events: Vec::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    /// Y coordinate at which a falling object is resolved
    pub fn hit_y(&self) -> f32 {
        self.viewport.wheel_center().y - self.tuning.wheel_radius - self.tuning.object_radius + 5.0
    }

    /// Drain events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Whether the host should keep scheduling frames
    pub fn needs_frame(&self) -> bool {
        match self.phase() {
            GamePhase::Idle | GamePhase::Playing => true,
            GamePhase::GameOver => !self.particles.is_empty() || !self.texts.is_empty(),
        }
    }

    /// Update the high score known to the core (from the persistence layer)
    pub fn set_high_score(&mut self, high_score: u32) {
        self.session.high_score = high_score;
    }

    /// Resize: re-scatters the starfield over the new area
    pub fn set_viewport<R: RandomSource + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.viewport = viewport;
        self.stars = Starfield::new(self.stars.capacity(), viewport, rng);
    }

    /// Cap on live particles (from the quality preset)
    pub fn set_particle_cap(&mut self, cap: usize) {
        self.particles.set_cap(cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::SequenceRng;

    #[test]
    fn test_deserialized_level_follows_score() {
        let s: SessionState =
            serde_json::from_str(r#"{ "playing": true, "score": 47, "level": 1 }"#).unwrap();
        assert_eq!((s.score(), s.level()), (47, 5));
        assert!(s.playing);

        let round = serde_json::to_string(&s).unwrap();
        let back: SessionState = serde_json::from_str(&round).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_level_follows_score() {
        let mut s = SessionState::default();
        assert_eq!(s.level(), 1);
        assert!(!s.add_points(9));
        assert_eq!((s.score(), s.level()), (9, 1));
        assert!(s.add_points(1));
        assert_eq!((s.score(), s.level()), (10, 2));
        s.set_score(47);
        assert_eq!(s.level(), 5);
        assert_eq!(s.level_progress(), 70);
    }

    #[test]
    fn test_level_floor() {
        assert_eq!(SessionState::level_floor(1), 0);
        assert_eq!(SessionState::level_floor(5), 40);
        assert_eq!(SessionState::level_for_score(SessionState::level_floor(5)), 5);
    }

    #[test]
    fn test_phase_derivation() {
        let mut s = SessionState::default();
        assert_eq!(s.phase(), GamePhase::Idle);
        s.playing = true;
        assert_eq!(s.phase(), GamePhase::Playing);
        s.game_over = true;
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(!s.is_active());
    }

    #[test]
    fn test_wildcard_matches_any_color() {
        let obj = FallingObject {
            y: 0.0,
            color: ColorTag::Red,
            shape: ShapeTag::Wildcard,
            radius: 14.0,
            speed: 3.0,
        };
        for color in SEGMENT_ORDER {
            assert!(obj.matches(color));
        }
        let plain = FallingObject { shape: ShapeTag::Circle, ..obj };
        assert!(plain.matches(ColorTag::Red));
        assert!(!plain.matches(ColorTag::Green));
    }

    #[test]
    fn test_record_tracker_once() {
        let mut r = RecordTracker::default();
        r.arm(0);
        assert!(!r.check(5), "zero baseline never celebrates");

        r.arm(12);
        assert!(!r.check(12), "must strictly exceed");
        assert!(r.check(13));
        assert!(!r.check(20), "only once per session");

        r.arm(20);
        assert!(r.check(21));
    }

    #[test]
    fn test_hit_line_above_wheel() {
        let mut rng = SequenceRng::constant(0.5);
        let state = SimulationState::new(Tuning::default(), Viewport::new(400.0, 800.0), &mut rng);
        let center = state.viewport.wheel_center();
        assert_eq!(center, Vec2::new(200.0, 480.0));
        assert_eq!(state.hit_y(), 480.0 - 115.0 - 14.0 + 5.0);
        assert!(state.needs_frame());
    }
}
