//! Video-frame boundary: frames arrive from an external capture producer
//! as whole RGBA buffers; the renderer samples whatever frame is current.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::debug;

pub const DEMO_WIDTH: usize = 320;
pub const DEMO_HEIGHT: usize = 240;

/// One captured frame, RGBA, row-major.
#[derive(Clone)]
pub struct VideoFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl VideoFrame {
    /// Availability predicate checked once per frame: the mosaic renderer
    /// only runs when this holds, instead of catching sampling errors.
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0 && self.pixels.len() >= self.width * self.height * 4
    }

    /// Average brightness (0–255) at a pixel, clamped into bounds.
    pub fn brightness_at(&self, x: usize, y: usize) -> f32 {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let i = (y * self.width + x) * 4;
        let r = self.pixels[i] as f32;
        let g = self.pixels[i + 1] as f32;
        let b = self.pixels[i + 2] as f32;
        (r + g + b) / 3.0
    }
}

pub fn frame_channel() -> (Sender<VideoFrame>, Receiver<VideoFrame>) {
    bounded(2)
}

/// Synthetic capture producer for running without a camera: a soft bright
/// disc drifting over a dark frame, enough to exercise the mosaic layer.
pub fn spawn_demo_frames(tx: Sender<VideoFrame>, stop: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("demo-video".into())
        .spawn(move || {
            let mut t = 0.0f32;
            loop {
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                t += 1.0 / 15.0;

                let cx = DEMO_WIDTH as f32 * (0.5 + 0.3 * (t * 0.4).cos());
                let cy = DEMO_HEIGHT as f32 * (0.5 + 0.3 * (t * 0.3).sin());
                let mut pixels = vec![0u8; DEMO_WIDTH * DEMO_HEIGHT * 4];
                for y in 0..DEMO_HEIGHT {
                    for x in 0..DEMO_WIDTH {
                        let dx = x as f32 - cx;
                        let dy = y as f32 - cy;
                        let d = (dx * dx + dy * dy).sqrt();
                        let v = (1.0 - d / 90.0).clamp(0.0, 1.0);
                        let level = (v * 220.0) as u8;
                        let i = (y * DEMO_WIDTH + x) * 4;
                        pixels[i] = level;
                        pixels[i + 1] = level;
                        pixels[i + 2] = level;
                        pixels[i + 3] = 255;
                    }
                }

                if tx
                    .send(VideoFrame {
                        width: DEMO_WIDTH,
                        height: DEMO_HEIGHT,
                        pixels,
                    })
                    .is_err()
                {
                    debug!("frame channel closed, demo capture stopping");
                    break;
                }
                thread::sleep(Duration::from_millis(66));
            }
        })
        .expect("spawn demo video")
}
