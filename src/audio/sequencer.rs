//! Generative sequencing: five de-synchronized chordal voices and a bass
//! voice cross-faded in while a fist is held. Pure parameter computation —
//! the engine applies the emitted commands.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::events::{AudioCommand, VoiceId};

/// Chordal voice table: frequency (Hz), trigger interval (frames), starting
/// timer offset (frames). A Cmaj9 spread; intervals are mutually prime-ish
/// so the voices drift in and out of alignment.
pub const CHORDAL_VOICES: [ChordalConfig; 5] = [
    ChordalConfig {
        freq_hz: 130.81,
        interval: 240.0,
        start_timer: 0.0,
    },
    ChordalConfig {
        freq_hz: 164.81,
        interval: 150.0,
        start_timer: 30.0,
    },
    ChordalConfig {
        freq_hz: 196.00,
        interval: 90.0,
        start_timer: 60.0,
    },
    ChordalConfig {
        freq_hz: 246.94,
        interval: 192.0,
        start_timer: 100.0,
    },
    ChordalConfig {
        freq_hz: 293.66,
        interval: 110.0,
        start_timer: 10.0,
    },
];

pub const BASS_FREQ_HZ: f32 = 55.0;

/// Trigger jitter range in frames, applied per check.
const JITTER: f32 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct ChordalConfig {
    pub freq_hz: f32,
    pub interval: f32,
    pub start_timer: f32,
}

struct VoiceTimer {
    interval: f32,
    timer: f32,
}

/// Per-frame command generator for the soundtrack. Exactly one mode is
/// active per frame: chordal sequencing, or the bass pulse while a fist is
/// held anywhere in the scene.
pub struct Sequencer {
    voices: Vec<VoiceTimer>,
    rng: StdRng,
}

impl Sequencer {
    pub fn new(seed: u64) -> Self {
        let voices = CHORDAL_VOICES
            .iter()
            .map(|c| VoiceTimer {
                interval: c.interval,
                timer: c.start_timer,
            })
            .collect();
        Self {
            voices,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn step(&mut self, frame: u64, fist_active: bool, out: &mut Vec<AudioCommand>) {
        if fist_active {
            // Chordal layer ducks out; the bass pulses in with a slow
            // level throb and a light frequency wobble.
            for i in 0..self.voices.len() {
                out.push(AudioCommand::SetLevel {
                    voice: VoiceId::Chordal(i),
                    level: 0.0,
                    ramp_sec: 0.5,
                });
            }
            let throb = 0.2 + 0.1 * (frame as f32 * 0.2).sin();
            out.push(AudioCommand::SetLevel {
                voice: VoiceId::Bass,
                level: throb,
                ramp_sec: 0.1,
            });
            out.push(AudioCommand::SetFreq {
                voice: VoiceId::Bass,
                freq_hz: BASS_FREQ_HZ + 3.0 * (frame as f32 * 0.8).sin(),
            });
        } else {
            out.push(AudioCommand::SetLevel {
                voice: VoiceId::Bass,
                level: 0.0,
                ramp_sec: 1.0,
            });
            for (i, voice) in self.voices.iter_mut().enumerate() {
                voice.timer += 1.0;
                let humanize = self.rng.random_range(-JITTER..JITTER);
                if voice.timer >= voice.interval + humanize {
                    out.push(AudioCommand::Trigger {
                        voice: VoiceId::Chordal(i),
                    });
                    voice.timer = 0.0;
                }
            }
        }
    }
}
