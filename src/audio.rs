//! Procedural sound effects
//!
//! Sounds are synthesized from a single oscillator with a frequency sweep and
//! a gain envelope, so no audio files are needed. [`synthesize`] turns a
//! gameplay cue into a [`Tone`] description; [`AudioManager`] plays tones
//! through the Web Audio API on wasm32 and is silent elsewhere.

use serde::{Deserialize, Serialize};

use crate::sim::random::RandomSource;

/// Gameplay moments that make a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Successful match
    Score,
    /// Mismatch ended the run
    GameOver,
    /// Wildcard caught, slow motion starts
    Freeze,
    /// New level or new record
    LevelUp,
}

/// A cue plus the session context it was raised in
///
/// `level` and `score` are the values before any points from the triggering
/// match are awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundTrigger {
    pub cue: SoundCue,
    pub level: u32,
    pub score: u32,
}

impl SoundTrigger {
    pub fn new(cue: SoundCue, level: u32, score: u32) -> Self {
        Self { cue, level, score }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Interpolation toward an envelope's end value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// Parameter sweep from `start` to `end` over `time` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub start: f32,
    pub end: f32,
    pub ramp: Ramp,
    pub time: f32,
}

impl Envelope {
    pub fn linear(start: f32, end: f32, time: f32) -> Self {
        Self {
            start,
            end,
            ramp: Ramp::Linear,
            time,
        }
    }

    pub fn exponential(start: f32, end: f32, time: f32) -> Self {
        Self {
            start,
            end,
            ramp: Ramp::Exponential,
            time,
        }
    }
}

/// One synthesized sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Frequency sweep (Hz)
    pub frequency: Envelope,
    /// Gain envelope (0-1, before volume scaling)
    pub gain: Envelope,
    /// Oscillator stops after this many seconds
    pub duration: f32,
}

/// Score sound family by level band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioTier {
    /// Soft triangle blip
    Soft,
    /// Descending sawtooth laser
    Laser,
    /// Rising 8-bit square chirp
    Chip,
}

impl AudioTier {
    /// `tiers` are the first levels of the laser and chip bands
    pub fn for_level(level: u32, tiers: [u32; 2]) -> Self {
        if level < tiers[0] {
            AudioTier::Soft
        } else if level < tiers[1] {
            AudioTier::Laser
        } else {
            AudioTier::Chip
        }
    }
}

/// Build the tone for a cue
pub fn synthesize<R: RandomSource + ?Sized>(trigger: SoundTrigger, tiers: [u32; 2], rng: &mut R) -> Tone {
    match trigger.cue {
        SoundCue::Score => score_tone(AudioTier::for_level(trigger.level, tiers), trigger.score, rng),
        SoundCue::GameOver => Tone {
            waveform: Waveform::Sawtooth,
            frequency: Envelope::exponential(150.0, 10.0, 1.0),
            gain: Envelope::linear(0.7, 0.001, 1.0),
            duration: 1.0,
        },
        SoundCue::Freeze => Tone {
            waveform: Waveform::Sine,
            frequency: Envelope::linear(1200.0, 800.0, 0.5),
            gain: Envelope::linear(0.5, 0.0, 0.5),
            duration: 0.5,
        },
        SoundCue::LevelUp => Tone {
            waveform: Waveform::Triangle,
            frequency: Envelope::linear(440.0, 1320.0, 0.6),
            gain: Envelope::exponential(0.6, 0.01, 0.6),
            duration: 0.6,
        },
    }
}

fn score_tone<R: RandomSource + ?Sized>(tier: AudioTier, score: u32, rng: &mut R) -> Tone {
    match tier {
        AudioTier::Soft => {
            let f = rng.range(600.0, 700.0);
            Tone {
                waveform: Waveform::Triangle,
                frequency: Envelope::exponential(f, f * 0.5, 0.1),
                gain: Envelope::exponential(0.8, 0.01, 0.1),
                duration: 0.1,
            }
        }
        AudioTier::Laser => {
            let f = 800.0 - (score % 10) as f32 * 20.0;
            Tone {
                waveform: Waveform::Sawtooth,
                frequency: Envelope::exponential(f, 100.0, 0.15),
                gain: Envelope::exponential(0.5, 0.01, 0.15),
                duration: 0.15,
            }
        }
        AudioTier::Chip => {
            let f = rng.range(200.0, 250.0);
            Tone {
                waveform: Waveform::Square,
                frequency: Envelope::linear(f, f * 2.0, 0.05),
                gain: Envelope::exponential(0.4, 0.01, 0.1),
                duration: 0.1,
            }
        }
    }
}

/// Exponential ramps cannot reach zero
#[cfg(target_arch = "wasm32")]
const MIN_EXPONENTIAL_TARGET: f32 = 1e-4;

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<web_sys::AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = web_sys::AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume the audio context (browsers require a user gesture)
    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            ctx.resume().ok();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn resume(&self) {}

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a tone
    pub fn play(&self, tone: &Tone) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.schedule(tone, vol);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn schedule(&self, tone: &Tone, _vol: f32) {
        log::trace!("Audio unavailable, skipping {:?} tone", tone.waveform);
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule(&self, tone: &Tone, vol: f32) {
        use web_sys::{AudioContextState, AudioParam};

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == AudioContextState::Suspended {
            ctx.resume().ok();
        }

        let Some((osc, gain)) = create_osc(ctx, tone) else {
            return;
        };
        let t = ctx.current_time();

        let apply = |param: AudioParam, env: &Envelope, scale: f32| {
            param.set_value_at_time(env.start * scale, t).ok();
            let at = t + env.time as f64;
            match env.ramp {
                Ramp::Linear => {
                    param.linear_ramp_to_value_at_time(env.end * scale, at).ok();
                }
                Ramp::Exponential => {
                    let end = (env.end * scale).max(MIN_EXPONENTIAL_TARGET);
                    param.exponential_ramp_to_value_at_time(end, at).ok();
                }
            }
        };
        apply(osc.frequency(), &tone.frequency, 1.0);
        apply(gain.gain(), &tone.gain, vol);

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration as f64).ok();
    }
}

/// Create an oscillator routed through a gain node
#[cfg(target_arch = "wasm32")]
fn create_osc(
    ctx: &web_sys::AudioContext,
    tone: &Tone,
) -> Option<(web_sys::OscillatorNode, web_sys::GainNode)> {
    use web_sys::OscillatorType;

    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(match tone.waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    });
    osc.frequency().set_value(tone.frequency.start);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}
