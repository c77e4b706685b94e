/// Identifier of a per-creature voice pair; allocated by the scene, owned
/// 1:1 by a creature for its lifetime.
pub type CreatureVoiceId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceId {
    /// One of the five polyrhythmic chordal voices.
    Chordal(usize),
    /// The shared pulsing bass voice.
    Bass,
    /// A creature's pink-noise wind layer.
    Wind(CreatureVoiceId),
    /// A creature's fist pulse tone.
    Pulse(CreatureVoiceId),
}

/// Fire-and-forget parameter commands from the frame loop to the audio
/// engine worker. Sending never blocks the frame; the engine applies them
/// at the next render chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    /// User gesture received; voices may sound from now on.
    Start,
    /// Restart a chordal voice's envelope.
    Trigger { voice: VoiceId },
    /// Ramp a voice's output level to `level` over `ramp_sec` seconds.
    SetLevel {
        voice: VoiceId,
        level: f32,
        ramp_sec: f32,
    },
    SetFreq { voice: VoiceId, freq_hz: f32 },
    /// Register a silent wind/pulse pair for a new creature.
    SpawnCreatureVoice { id: CreatureVoiceId },
    /// Tear a creature's pair down; idempotent.
    DisposeCreatureVoice { id: CreatureVoiceId },
}
