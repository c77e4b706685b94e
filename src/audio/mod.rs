pub mod engine;
pub mod events;
pub mod output;
pub mod sequencer;
pub mod voice;
pub mod writer;

pub use engine::{Mixer, MixerConfig};
pub use events::{AudioCommand, CreatureVoiceId, VoiceId};
pub use output::AudioOutput;
pub use sequencer::Sequencer;
pub use writer::WavOutput;
