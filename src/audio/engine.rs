//! Audio engine worker: owns the synthesis voices, applies commands from
//! the frame loop and renders sample chunks into the output ring buffer
//! (and optionally a WAV tee).

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use ringbuf::HeapProd;
use tracing::{debug, warn};

use crate::audio::events::{AudioCommand, CreatureVoiceId, VoiceId};
use crate::audio::output::AudioOutput;
use crate::audio::sequencer::{BASS_FREQ_HZ, CHORDAL_VOICES};
use crate::audio::voice::{Envelope, LinearRamp, Oscillator, PinkNoise, Reverb, Waveform};
use crate::config::OutputGuardSetting;

/// Samples rendered per engine iteration.
const HOP: usize = 256;

const REVERB_RT60_SEC: f32 = 6.0;
const REVERB_WET: f32 = 0.35;

struct ChordalVoice {
    osc: Oscillator,
    env: Envelope,
    /// Mode gate: ducked to zero while a fist is held, restored by the next
    /// trigger.
    gate: LinearRamp,
}

struct BassVoice {
    osc: Oscillator,
    level: LinearRamp,
}

struct CreatureVoice {
    wind: PinkNoise,
    wind_level: LinearRamp,
    pulse: Oscillator,
    pulse_level: LinearRamp,
}

#[derive(Debug, Clone, Copy)]
pub struct MixerConfig {
    pub sample_rate: u32,
    pub guard: OutputGuardSetting,
}

/// The synthesis voice bank. Kept separate from the worker thread so the
/// command/render path is testable synchronously.
pub struct Mixer {
    fs: f32,
    dt: f32,
    started: bool,
    chordal: Vec<ChordalVoice>,
    bass: BassVoice,
    creatures: HashMap<CreatureVoiceId, CreatureVoice>,
    reverb: Reverb,
    guard: OutputGuardSetting,
}

impl Mixer {
    pub fn new(cfg: MixerConfig) -> Self {
        let fs = cfg.sample_rate as f32;
        let chordal = CHORDAL_VOICES
            .iter()
            .map(|c| ChordalVoice {
                osc: Oscillator::new(Waveform::Triangle, c.freq_hz),
                env: Envelope::new(0.01, 0.2, 0.1, 1.5, 0.3),
                gate: LinearRamp::new(1.0),
            })
            .collect();
        Self {
            fs,
            dt: 1.0 / fs,
            started: false,
            chordal,
            bass: BassVoice {
                osc: Oscillator::new(Waveform::Sawtooth, BASS_FREQ_HZ),
                level: LinearRamp::new(0.0),
            },
            creatures: HashMap::new(),
            reverb: Reverb::new(fs, REVERB_RT60_SEC, REVERB_WET),
            guard: cfg.guard,
        }
    }

    pub fn apply(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Start => {
                self.started = true;
            }
            AudioCommand::Trigger {
                voice: VoiceId::Chordal(i),
            } => {
                if let Some(v) = self.chordal.get_mut(i) {
                    v.gate.snap(1.0);
                    v.env.trigger();
                } else {
                    warn!("trigger for unknown chordal voice {i}");
                }
            }
            AudioCommand::Trigger { voice } => {
                warn!(?voice, "trigger for non-chordal voice ignored");
            }
            AudioCommand::SetLevel {
                voice,
                level,
                ramp_sec,
            } => match voice {
                VoiceId::Chordal(i) => {
                    if let Some(v) = self.chordal.get_mut(i) {
                        v.gate.set(level, ramp_sec);
                    }
                }
                VoiceId::Bass => self.bass.level.set(level, ramp_sec),
                VoiceId::Wind(id) => {
                    if let Some(cv) = self.creatures.get_mut(&id) {
                        cv.wind_level.set(level, ramp_sec);
                    } else {
                        warn!(id, "wind level for unknown creature voice");
                    }
                }
                VoiceId::Pulse(id) => {
                    if let Some(cv) = self.creatures.get_mut(&id) {
                        cv.pulse_level.set(level, ramp_sec);
                    } else {
                        warn!(id, "pulse level for unknown creature voice");
                    }
                }
            },
            AudioCommand::SetFreq { voice, freq_hz } => match voice {
                VoiceId::Bass => self.bass.osc.set_freq(freq_hz),
                VoiceId::Pulse(id) => {
                    if let Some(cv) = self.creatures.get_mut(&id) {
                        cv.pulse.set_freq(freq_hz);
                    }
                }
                VoiceId::Chordal(i) => {
                    if let Some(v) = self.chordal.get_mut(i) {
                        v.osc.set_freq(freq_hz);
                    }
                }
                VoiceId::Wind(id) => {
                    warn!(id, "wind voices have no frequency");
                }
            },
            AudioCommand::SpawnCreatureVoice { id } => {
                self.creatures.entry(id).or_insert_with(|| CreatureVoice {
                    wind: PinkNoise::new(id.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
                    wind_level: LinearRamp::new(0.0),
                    pulse: Oscillator::new(Waveform::Sine, 60.0),
                    pulse_level: LinearRamp::new(0.0),
                });
            }
            AudioCommand::DisposeCreatureVoice { id } => {
                if self.creatures.remove(&id).is_none() {
                    debug!(id, "creature voice already disposed");
                }
            }
        }
    }

    pub fn render(&mut self, out: &mut [f32]) {
        if !self.started {
            out.fill(0.0);
            return;
        }
        for sample in out.iter_mut() {
            let mut bus = 0.0;
            for v in self.chordal.iter_mut() {
                bus += v.osc.tick(self.fs) * v.env.tick(self.dt) * v.gate.tick(self.dt);
            }
            bus += self.bass.osc.tick(self.fs) * self.bass.level.tick(self.dt);

            let mut dry = 0.0;
            for cv in self.creatures.values_mut() {
                bus += cv.wind.tick() * cv.wind_level.tick(self.dt);
                dry += cv.pulse.tick(self.fs) * cv.pulse_level.tick(self.dt);
            }

            let mixed = self.reverb.tick(bus) + dry;
            *sample = apply_guard(self.guard, mixed);
        }
    }

    #[cfg(test)]
    pub(crate) fn debug_chordal_gate_target(&self, i: usize) -> f32 {
        self.chordal[i].gate.target()
    }

    #[cfg(test)]
    pub(crate) fn debug_bass_level_target(&self) -> f32 {
        self.bass.level.target()
    }

    #[cfg(test)]
    pub(crate) fn debug_creature_voice_count(&self) -> usize {
        self.creatures.len()
    }
}

fn apply_guard(guard: OutputGuardSetting, x: f32) -> f32 {
    match guard {
        OutputGuardSetting::None => x,
        OutputGuardSetting::SoftClip => {
            // tanh drive with a ceiling just below full scale.
            let drive = 2.0;
            let ceiling = 0.98;
            (x * drive).tanh() * ceiling / drive.tanh()
        }
    }
}

/// Spawn the engine worker. Chunks are paced against wall-clock so a
/// WAV-only run (no output device) still renders in real time. The loop
/// exits when the command channel disconnects.
pub fn spawn(
    rx: Receiver<AudioCommand>,
    mut prod: Option<HeapProd<f32>>,
    wav_tx: Option<Sender<Vec<f32>>>,
    cfg: MixerConfig,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("audio-engine".into())
        .spawn(move || {
            let mut mixer = Mixer::new(cfg);
            let mut chunk = vec![0.0f32; HOP];
            let hop_duration = Duration::from_secs_f32(HOP as f32 / cfg.sample_rate as f32);
            let mut next_deadline = Instant::now();

            loop {
                loop {
                    match rx.try_recv() {
                        Ok(cmd) => mixer.apply(cmd),
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            debug!("command channel closed, audio engine stopping");
                            return;
                        }
                    }
                }

                mixer.render(&mut chunk);
                if let Some(prod) = prod.as_mut() {
                    AudioOutput::push_samples(prod, &chunk);
                }
                if let Some(tx) = &wav_tx {
                    let _ = tx.try_send(chunk.clone());
                }

                next_deadline += hop_duration;
                let now = Instant::now();
                if now < next_deadline {
                    thread::sleep(next_deadline - now);
                } else {
                    next_deadline = now;
                }
            }
        })
        .expect("spawn audio engine")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer() -> Mixer {
        Mixer::new(MixerConfig {
            sample_rate: 48_000,
            guard: OutputGuardSetting::SoftClip,
        })
    }

    #[test]
    fn silent_until_started() {
        let mut m = mixer();
        m.apply(AudioCommand::Trigger {
            voice: VoiceId::Chordal(0),
        });
        let mut out = vec![1.0f32; 512];
        m.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn fist_mode_targets_are_exclusive() {
        let mut m = mixer();
        m.apply(AudioCommand::Start);
        for i in 0..5 {
            m.apply(AudioCommand::SetLevel {
                voice: VoiceId::Chordal(i),
                level: 0.0,
                ramp_sec: 0.5,
            });
        }
        m.apply(AudioCommand::SetLevel {
            voice: VoiceId::Bass,
            level: 0.25,
            ramp_sec: 0.1,
        });
        assert!(m.debug_bass_level_target() > 0.0);
        for i in 0..5 {
            assert_eq!(m.debug_chordal_gate_target(i), 0.0);
        }

        // Back to normal mode: the bass target falls to zero.
        m.apply(AudioCommand::SetLevel {
            voice: VoiceId::Bass,
            level: 0.0,
            ramp_sec: 1.0,
        });
        assert_eq!(m.debug_bass_level_target(), 0.0);
    }

    #[test]
    fn triggered_chordal_voice_makes_sound() {
        let mut m = mixer();
        m.apply(AudioCommand::Start);
        m.apply(AudioCommand::Trigger {
            voice: VoiceId::Chordal(2),
        });
        let mut out = vec![0.0f32; 4_800];
        m.render(&mut out);
        assert!(out.iter().any(|&s| s.abs() > 1e-4));
    }

    #[test]
    fn creature_voice_dispose_is_idempotent() {
        let mut m = mixer();
        m.apply(AudioCommand::SpawnCreatureVoice { id: 7 });
        assert_eq!(m.debug_creature_voice_count(), 1);
        m.apply(AudioCommand::DisposeCreatureVoice { id: 7 });
        m.apply(AudioCommand::DisposeCreatureVoice { id: 7 });
        assert_eq!(m.debug_creature_voice_count(), 0);
        // Parameters for a disposed voice are dropped, not applied.
        m.apply(AudioCommand::SetLevel {
            voice: VoiceId::Wind(7),
            level: 0.2,
            ramp_sec: 0.1,
        });
        assert_eq!(m.debug_creature_voice_count(), 0);
    }

    #[test]
    fn guard_bounds_output() {
        for x in [-10.0f32, -1.0, 0.0, 1.0, 10.0] {
            let y = apply_guard(OutputGuardSetting::SoftClip, x);
            assert!(y.abs() <= 0.98 + 1e-6);
        }
    }
}
