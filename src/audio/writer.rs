use crossbeam_channel::Receiver;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::warn;

/// WAV capture thread: receives rendered chunks from the engine and writes
/// them as 16-bit mono. Finalizes when the channel disconnects.
pub struct WavOutput;

impl WavOutput {
    pub fn run(
        rx: Receiver<Vec<f32>>,
        path: String,
        sample_rate: u32,
    ) -> std::thread::JoinHandle<()> {
        std::thread::Builder::new()
            .name("wav-writer".into())
            .spawn(move || {
                let spec = WavSpec {
                    channels: 1,
                    sample_rate,
                    bits_per_sample: 16,
                    sample_format: SampleFormat::Int,
                };
                let mut writer = match WavWriter::create(&path, spec) {
                    Ok(w) => w,
                    Err(err) => {
                        warn!("could not create {path}: {err}; wav capture disabled");
                        return;
                    }
                };

                while let Ok(samples) = rx.recv() {
                    for &s in samples.iter() {
                        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                        if writer.write_sample(v).is_err() {
                            warn!("wav write failed; stopping capture");
                            return;
                        }
                    }
                }

                if let Err(err) = writer.finalize() {
                    warn!("wav finalize failed: {err}");
                }
            })
            .expect("spawn wav writer")
    }
}
