use glam::Vec2;
use rand::Rng;

use crate::audio::events::{AudioCommand, CreatureVoiceId, VoiceId};
use crate::scene::tentacle::Tentacle;
use crate::scene::FrameCtx;
use crate::tracking::hand::{map_to_canvas, HandObservation};

pub const TENTACLES: usize = 30;
pub const TENTACLE_GROUPS: usize = 5;

/// Position ease rates; idle drift is deliberately calmer.
const EASE_ACTIVE: f32 = 0.1;
const EASE_IDLE: f32 = 0.04;

/// Idle orbit geometry for the tentacle float targets.
const ORBIT_RADIUS: f32 = 80.0;
const ORBIT_WOBBLE: f32 = 20.0;
const ORBIT_SPEED: f32 = 0.02;

/// Velocity → wind level mapping: 30 canvas units/frame saturates at 0.3.
const WIND_FULL_VELOCITY: f32 = 30.0;
const WIND_MAX_LEVEL: f32 = 0.3;

/// An animated entity bound to one tracked hand (or idling): a glowing core
/// trailing 30 tentacles, with an owned wind/pulse voice pair.
pub struct Creature {
    pub pos: Vec2,
    prev_pos: Vec2,
    pub is_idle: bool,
    pub is_fist: bool,
    pub ring_angle: f32,
    pub tentacles: Vec<Tentacle>,
    noise_off: f32,
    voice_id: CreatureVoiceId,
    voice_disposed: bool,
}

impl Creature {
    pub fn new<R: Rng + ?Sized>(center: Vec2, voice_id: CreatureVoiceId, rng: &mut R) -> Self {
        let tentacles = (0..TENTACLES)
            .map(|i| Tentacle::new(i % TENTACLE_GROUPS, center))
            .collect();
        Self {
            pos: center,
            prev_pos: center,
            is_idle: true,
            is_fist: false,
            ring_angle: 0.0,
            tentacles,
            noise_off: rng.random_range(0.0..1000.0),
            voice_id,
            voice_disposed: false,
        }
    }

    pub fn voice_id(&self) -> CreatureVoiceId {
        self.voice_id
    }

    /// Per-frame animation step. `hand` present drives the creature from the
    /// observation; absent switches it to idle wandering. Voice parameters
    /// are only emitted once global audio has been started.
    pub fn update(
        &mut self,
        hand: Option<&HandObservation>,
        is_fist: bool,
        ctx: &FrameCtx,
        audio_started: bool,
        cmds: &mut Vec<AudioCommand>,
    ) {
        self.is_fist = is_fist;
        self.prev_pos = self.pos;
        // Tentacle roots and idle orbits reference the position as of the
        // start of the frame, before this frame's easing.
        let base = self.pos;
        let frame = ctx.frame;

        let target = match hand {
            Some(h) => {
                self.is_idle = false;
                let tips = h.tips();
                for t in self.tentacles.iter_mut() {
                    let tip = map_to_canvas(tips[t.group], ctx.video, ctx.canvas);
                    t.update(base, tip, frame);
                }
                map_to_canvas(h.palm(), ctx.video, ctx.canvas)
            }
            None => {
                self.is_idle = true;
                for t in self.tentacles.iter_mut() {
                    let angle = frame as f32 * ORBIT_SPEED
                        + t.group as f32 * std::f32::consts::TAU / TENTACLE_GROUPS as f32;
                    let r = ORBIT_RADIUS
                        + (frame as f32 * 0.05 + t.group as f32).sin() * ORBIT_WOBBLE;
                    let float_target = base + Vec2::from_angle(angle) * r;
                    t.update(base, float_target, frame);
                }
                let time = frame as f32 * 0.002;
                Vec2::new(
                    ctx.field.sample01_1d(time + self.noise_off) * ctx.canvas.x,
                    ctx.field.sample01_1d(time + self.noise_off + 100.0) * ctx.canvas.y,
                )
            }
        };

        let ease = if self.is_idle { EASE_IDLE } else { EASE_ACTIVE };
        self.pos = self.pos.lerp(target, ease);
        self.ring_angle += 0.04;

        // Idle drift must not drive the audio activity cue.
        let velocity = if self.is_idle {
            0.0
        } else {
            self.pos.distance(self.prev_pos)
        };

        if audio_started {
            self.push_voice_params(velocity, frame, cmds);
        }
    }

    fn push_voice_params(&self, velocity: f32, frame: u64, cmds: &mut Vec<AudioCommand>) {
        let wind = (velocity / WIND_FULL_VELOCITY).clamp(0.0, 1.0) * WIND_MAX_LEVEL;
        cmds.push(AudioCommand::SetLevel {
            voice: VoiceId::Wind(self.voice_id),
            level: wind,
            ramp_sec: 0.2,
        });

        if self.is_fist {
            cmds.push(AudioCommand::SetLevel {
                voice: VoiceId::Pulse(self.voice_id),
                level: 0.4,
                ramp_sec: 0.1,
            });
            cmds.push(AudioCommand::SetFreq {
                voice: VoiceId::Pulse(self.voice_id),
                freq_hz: 60.0 - (frame % 20) as f32,
            });
        } else {
            cmds.push(AudioCommand::SetLevel {
                voice: VoiceId::Pulse(self.voice_id),
                level: 0.0,
                ramp_sec: 0.2,
            });
        }
    }

    /// Release the owned voice pair. Idempotent, and safe to call whether or
    /// not audio was ever started.
    pub fn dispose(&mut self, cmds: &mut Vec<AudioCommand>) {
        if self.voice_disposed {
            return;
        }
        self.voice_disposed = true;
        cmds.push(AudioCommand::DisposeCreatureVoice { id: self.voice_id });
    }
}
