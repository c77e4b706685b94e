use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::*;
use ringbuf::{HeapCons, HeapProd, HeapRb};
use tracing::warn;

/// Connection to the default output device. The engine worker pushes mono
/// samples into the ring buffer; the device callback duplicates them across
/// the device's channels.
pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    pub sample_rate: u32,
}

impl AudioOutput {
    /// Open the default device, or `None` when no usable output exists
    /// (the animation keeps running without sound).
    pub fn open(latency_ms: f32) -> Option<(Self, HeapProd<f32>)> {
        let host = cpal::default_host();
        let device = match host.default_output_device() {
            Some(d) => d,
            None => {
                warn!("no audio output device; running silent");
                return None;
            }
        };
        let supported = match device.default_output_config() {
            Ok(c) => c,
            Err(err) => {
                warn!("no default output config: {err}; running silent");
                return None;
            }
        };
        let sample_rate = supported.sample_rate();
        let channels = supported.channels();

        let config = cpal::StreamConfig {
            channels,
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity = (sample_rate as f32 * latency_ms / 1000.0) as usize;
        let rb = HeapRb::<f32>::new(capacity.max(1) * 10);
        let (prod, mut cons): (HeapProd<f32>, HeapCons<f32>) = rb.split();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let n_frames = data.len() / channels as usize;
                    for frame in 0..n_frames {
                        // Mono source: same value on every channel. An
                        // underrun plays silence rather than stale samples.
                        let s = cons.try_pop().unwrap_or(0.0);
                        for ch in 0..channels as usize {
                            data[frame * channels as usize + ch] = s;
                        }
                    }
                },
                |err| warn!("audio stream error: {err}"),
                None,
            )
            .ok()?;
        if let Err(err) = stream.play() {
            warn!("could not start audio stream: {err}");
            return None;
        }

        Some((
            Self {
                stream: Some(stream),
                sample_rate,
            },
            prod,
        ))
    }

    /// Blocking push from the engine worker; waits briefly for the device
    /// callback to drain when the buffer is full.
    pub fn push_samples(prod: &mut HeapProd<f32>, samples: &[f32]) {
        let mut offset = 0;
        while offset < samples.len() {
            let written = prod.push_slice(&samples[offset..]);
            offset += written;
            if offset < samples.len() {
                std::thread::sleep(std::time::Duration::from_micros(200));
            }
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stream.take();
    }
}
