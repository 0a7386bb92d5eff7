//! Sound effects and haptics
//!
//! Game cues are turned into effects by [`plan`], which is where the config
//! switches apply. [`Effects`] then plays them: synthesized fundsp buffers
//! through rodio, and the terminal bell in place of device vibration.
//! Everything here is best effort. A missing audio device only logs.

use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use fundsp::prelude32::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source, buffer::SamplesBuffer};

use crate::config::Config;
use crate::consts::GAME_OVER_CUE_DELAY;
use crate::game::Cue;

const SAMPLE_RATE: u32 = 44100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Flap,
    Hit,
    Score,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Play(Sound),
    /// Play once the delay has passed, independent of the frame clock
    PlayAfter(Sound, Duration),
    /// Start the background loop from the top
    MusicRestart,
    MusicPause,
    Bell,
}

/// Effects for one cue under `config`
pub fn plan(cue: Cue, config: &Config) -> Vec<Effect> {
    let mut effects = Vec::new();
    match cue {
        Cue::Start => {
            if config.music {
                effects.push(Effect::MusicRestart);
            }
        }
        Cue::Flap => {
            if config.sound {
                effects.push(Effect::Play(Sound::Flap));
            }
        }
        Cue::Score => {
            if config.sound {
                effects.push(Effect::Play(Sound::Score));
            }
        }
        Cue::Hit => {
            if config.sound {
                effects.push(Effect::Play(Sound::Hit));
            }
            if config.vibration {
                effects.push(Effect::Bell);
            }
            if config.sound {
                effects.push(Effect::PlayAfter(Sound::GameOver, GAME_OVER_CUE_DELAY));
            }
            if config.music {
                effects.push(Effect::MusicPause);
            }
        }
    }
    effects
}

// ── Synthesis ───────────────────────────────────────────────────────────────

fn render(mut unit: Box<dyn AudioUnit>, seconds: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    unit.reset();
    let n = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

/// Rising chirp
fn synth_flap() -> Vec<f32> {
    let freq = lfo(|t: f32| -> f32 { 500.0 + 700.0 * (t / 0.08).min(1.0) });
    let gain = envelope(|t: f32| -> f32 { 0.2 * (1.0 - t / 0.1).max(0.0) });
    render(Box::new((freq >> sine()) * gain), 0.1)
}

/// Noise burst
fn synth_hit() -> Vec<f32> {
    let gain = envelope(|t: f32| -> f32 { 0.3 * (-t * 30.0).exp() });
    render(Box::new(noise() * gain), 0.15)
}

/// Two-note ping
fn synth_score() -> Vec<f32> {
    let freq = lfo(|t: f32| -> f32 { if t < 0.07 { 880.0 } else { 1320.0 } });
    let gain = envelope(|t: f32| -> f32 { 0.15 * (1.0 - t / 0.2).max(0.0) });
    render(Box::new((freq >> sine()) * gain), 0.2)
}

/// Falling saw, 400Hz to 80Hz
fn synth_game_over() -> Vec<f32> {
    let freq = lfo(|t: f32| -> f32 { 400.0 + (80.0 - 400.0) * (t / 0.4).min(1.0) });
    let gain = envelope(|t: f32| -> f32 { 0.15 * (1.0 - (t / 0.5).min(1.0)) });
    render(Box::new((freq >> saw()) * gain), 0.5)
}

const MELODY: [f32; 16] = [
    523.3, 659.3, 784.0, 659.3, 587.3, 698.5, 880.0, 698.5, 523.3, 659.3, 784.0, 1046.5, 784.0,
    659.3, 587.3, 493.9,
];
const MELODY_STEP: f32 = 0.25;

/// Square-wave arpeggio, one bar per loop
fn synth_music() -> Vec<f32> {
    let freq = lfo(|t: f32| -> f32 {
        MELODY[(t / MELODY_STEP) as usize % MELODY.len()]
    });
    let gain = envelope(|t: f32| -> f32 {
        let phase = (t / MELODY_STEP).fract();
        0.04 * (1.0 - 0.7 * phase)
    });
    render(
        Box::new((freq >> square()) * gain),
        MELODY_STEP * MELODY.len() as f32,
    )
}

/// Pre-rendered sample buffers
pub struct SoundBank {
    flap: Vec<f32>,
    hit: Vec<f32>,
    score: Vec<f32>,
    game_over: Vec<f32>,
    music: Vec<f32>,
}

impl SoundBank {
    pub fn synthesize() -> Self {
        Self {
            flap: synth_flap(),
            hit: synth_hit(),
            score: synth_score(),
            game_over: synth_game_over(),
            music: synth_music(),
        }
    }

    pub fn samples(&self, sound: Sound) -> &[f32] {
        match sound {
            Sound::Flap => &self.flap,
            Sound::Hit => &self.hit,
            Sound::Score => &self.score,
            Sound::GameOver => &self.game_over,
        }
    }

    pub fn music(&self) -> &[f32] {
        &self.music
    }
}

fn buffer(samples: &[f32]) -> SamplesBuffer<f32> {
    SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec())
}

// ── Output ──────────────────────────────────────────────────────────────────

struct AudioOut {
    // Dropping the stream stops all sound
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
    bank: SoundBank,
    volume: f32,
}

impl AudioOut {
    fn open(volume: f32) -> Result<Self, Box<dyn Error>> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            music: None,
            bank: SoundBank::synthesize(),
            volume,
        })
    }

    fn play(&self, sound: Sound, delay: Duration) {
        let source = buffer(self.bank.samples(sound))
            .amplify(self.volume)
            .delay(delay);
        if let Err(e) = self.handle.play_raw(source) {
            log::debug!("could not play {sound:?}: {e}");
        }
    }

    fn restart_music(&mut self) {
        if self.music.is_none() {
            match Sink::try_new(&self.handle) {
                Ok(sink) => self.music = Some(sink),
                Err(e) => {
                    log::warn!("music disabled: {e}");
                    return;
                }
            }
        }
        if let Some(sink) = &self.music {
            sink.clear();
            sink.append(
                buffer(self.bank.music())
                    .amplify(self.volume)
                    .repeat_infinite(),
            );
            sink.play();
        }
    }

    fn pause_music(&self) {
        if let Some(sink) = &self.music {
            sink.pause();
        }
    }
}

/// Plays game cues according to the config
pub struct Effects {
    config: Config,
    out: Option<AudioOut>,
}

impl Effects {
    /// Open the default audio device if the config wants sound
    pub fn new(config: &Config) -> Self {
        let out = if config.wants_audio() {
            match AudioOut::open(config.volume) {
                Ok(out) => Some(out),
                Err(e) => {
                    log::warn!("audio unavailable, playing silently: {e}");
                    None
                }
            }
        } else {
            None
        };
        Self {
            config: config.clone(),
            out,
        }
    }

    /// No audio device; the bell still rings if enabled
    pub fn silent(config: &Config) -> Self {
        Self {
            config: config.clone(),
            out: None,
        }
    }

    pub fn has_audio(&self) -> bool {
        self.out.is_some()
    }

    pub fn dispatch(&mut self, cues: impl IntoIterator<Item = Cue>) {
        for cue in cues {
            for effect in plan(cue, &self.config) {
                self.apply(effect);
            }
        }
    }

    fn apply(&mut self, effect: Effect) {
        if effect == Effect::Bell {
            ring_bell();
            return;
        }
        let Some(out) = self.out.as_mut() else {
            return;
        };
        match effect {
            Effect::Play(sound) => out.play(sound, Duration::ZERO),
            Effect::PlayAfter(sound, delay) => out.play(sound, delay),
            Effect::MusicRestart => out.restart_music(),
            Effect::MusicPause => out.pause_music(),
            Effect::Bell => {}
        }
    }
}

fn ring_bell() {
    let mut out = io::stdout();
    if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
        log::debug!("bell failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_plans_sting_after_delay() {
        let effects = plan(Cue::Hit, &Config::enhanced());
        assert_eq!(
            effects,
            vec![
                Effect::Play(Sound::Hit),
                Effect::Bell,
                Effect::PlayAfter(Sound::GameOver, Duration::from_millis(300)),
                Effect::MusicPause,
            ]
        );
    }

    #[test]
    fn test_minimal_config_plans_nothing() {
        let config = Config::minimal();
        for cue in [Cue::Start, Cue::Flap, Cue::Hit, Cue::Score] {
            assert!(plan(cue, &config).is_empty(), "{cue:?}");
        }
    }

    #[test]
    fn test_sound_without_music() {
        let config = Config {
            music: false,
            vibration: false,
            ..Config::enhanced()
        };
        assert!(plan(Cue::Start, &config).is_empty());
        assert_eq!(plan(Cue::Flap, &config), vec![Effect::Play(Sound::Flap)]);
        assert_eq!(plan(Cue::Score, &config), vec![Effect::Play(Sound::Score)]);
    }

    #[test]
    fn test_sound_bank_lengths_and_levels() {
        let bank = SoundBank::synthesize();
        assert_eq!(bank.samples(Sound::Flap).len(), 4410);
        assert_eq!(bank.samples(Sound::GameOver).len(), 22050);
        assert_eq!(bank.music().len(), 44100 * 4);
        for sound in [Sound::Flap, Sound::Hit, Sound::Score, Sound::GameOver] {
            let samples = bank.samples(sound);
            assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
            assert!(samples.iter().any(|s| s.abs() > 0.0), "{sound:?} is silent");
        }
    }

    #[test]
    fn test_silent_effects_ignore_audio_cues() {
        let config = Config {
            vibration: false,
            ..Config::enhanced()
        };
        let mut effects = Effects::silent(&config);
        assert!(!effects.has_audio());
        effects.dispatch([Cue::Start, Cue::Flap, Cue::Score, Cue::Hit]);
    }
}
