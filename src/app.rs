use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec2;
use tracing::info;

use crate::audio::engine::{self, MixerConfig};
use crate::audio::events::AudioCommand;
use crate::audio::output::AudioOutput;
use crate::audio::sequencer::Sequencer;
use crate::audio::writer::WavOutput;
use crate::cli::Args;
use crate::config::AppConfig;
use crate::render;
use crate::scene::Scene;
use crate::tracking::hand::HandObservation;
use crate::video::VideoFrame;

/// Command channel capacity; sends are fire-and-forget and never block the
/// frame callback.
const CMD_CHANNEL_CAP: usize = 256;

pub struct App {
    config: AppConfig,
    scene: Scene,
    sequencer: Sequencer,
    scene_seed: u64,
    hands_rx: Receiver<Vec<HandObservation>>,
    latest_hands: Vec<HandObservation>,
    video_rx: Receiver<VideoFrame>,
    latest_frame: Option<VideoFrame>,
    cmd_tx: Option<Sender<AudioCommand>>,
    cmd_buf: Vec<AudioCommand>,
    _audio_out: Option<AudioOutput>,
    engine_handle: Option<JoinHandle<()>>,
    wav_handle: Option<JoinHandle<()>>,
    audio_started: bool,
    any_fist: bool,
    exiting: Arc<AtomicBool>,
}

impl App {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        args: Args,
        config: AppConfig,
        exiting: Arc<AtomicBool>,
        hands_rx: Receiver<Vec<HandObservation>>,
        video_rx: Receiver<VideoFrame>,
    ) -> Self {
        let scene_seed = args.seed.unwrap_or_else(rand::random);

        // Audio plumbing: device output, engine worker, optional wav tee.
        let mut audio_out = None;
        let mut producer = None;
        if args.play {
            if let Some((out, prod)) = AudioOutput::open(config.audio.latency_ms) {
                audio_out = Some(out);
                producer = Some(prod);
            }
        }
        let (cmd_tx, engine_handle, wav_handle) = if producer.is_some() || args.wav.is_some() {
            let sample_rate = audio_out
                .as_ref()
                .map(|o| o.sample_rate)
                .unwrap_or(config.audio.sample_rate);
            let (wav_tx, wav_handle) = match args.wav.clone() {
                Some(path) => {
                    let (tx, rx) = bounded(16);
                    (Some(tx), Some(WavOutput::run(rx, path, sample_rate)))
                }
                None => (None, None),
            };
            let (tx, rx) = bounded(CMD_CHANNEL_CAP);
            let handle = engine::spawn(
                rx,
                producer,
                wav_tx,
                MixerConfig {
                    sample_rate,
                    guard: config.audio.output_guard,
                },
            );
            (Some(tx), Some(handle), wav_handle)
        } else {
            (None, None, None)
        };

        // Nominal size until the first layout pass reports the real canvas.
        let scene = Scene::new(
            Vec2::new(1280.0, 720.0),
            &config.scene,
            &config.tracking,
            scene_seed,
        );
        let mut app = Self {
            config,
            scene,
            sequencer: Sequencer::new(scene_seed),
            scene_seed,
            hands_rx,
            latest_hands: Vec::new(),
            video_rx,
            latest_frame: None,
            cmd_tx,
            cmd_buf: Vec::new(),
            _audio_out: audio_out,
            engine_handle,
            wav_handle,
            audio_started: false,
            any_fist: false,
            exiting,
        };
        app.scene.announce_voices(&mut app.cmd_buf);
        app.flush_commands();
        app
    }

    /// Largest 16:9 rect within 80% of the available area, centered.
    fn canvas_rect(avail: egui::Rect) -> egui::Rect {
        let target = avail.size() * 0.8;
        let (w, h) = if target.x / target.y > 16.0 / 9.0 {
            (target.y * 16.0 / 9.0, target.y)
        } else {
            (target.x, target.x * 9.0 / 16.0)
        };
        egui::Rect::from_center_size(avail.center(), egui::Vec2::new(w, h))
    }

    /// Resize discards and recreates the whole scene; voices are released
    /// first so the engine registry stays consistent.
    fn rebuild_scene(&mut self, size: Vec2) {
        self.scene.teardown(&mut self.cmd_buf);
        self.scene = Scene::new(size, &self.config.scene, &self.config.tracking, self.scene_seed);
        self.scene.announce_voices(&mut self.cmd_buf);
        self.any_fist = false;
        info!(w = size.x, h = size.y, "scene rebuilt");
    }

    fn flush_commands(&mut self) {
        match &self.cmd_tx {
            Some(tx) => {
                for cmd in self.cmd_buf.drain(..) {
                    let _ = tx.try_send(cmd);
                }
            }
            None => self.cmd_buf.clear(),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.exiting.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Drain inputs to the latest value; each message is a whole frame's
        // worth of observations, replacing the previous one atomically.
        while let Ok(hands) = self.hands_rx.try_recv() {
            self.latest_hands = hands;
        }
        while let Ok(frame) = self.video_rx.try_recv() {
            self.latest_frame = Some(frame);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let canvas = Self::canvas_rect(ui.max_rect());
                let size = Vec2::new(canvas.width(), canvas.height());
                if self.scene.size.distance(size) > 0.5 {
                    self.rebuild_scene(size);
                }

                if !self.audio_started && ui.input(|i| i.pointer.any_pressed()) {
                    self.audio_started = true;
                    self.cmd_buf.push(AudioCommand::Start);
                    info!("audio started");
                }

                let any_fist =
                    self.scene
                        .step(&self.latest_hands, self.audio_started, &mut self.cmd_buf);
                self.any_fist = any_fist;
                if self.audio_started {
                    self.sequencer
                        .step(self.scene.frame, any_fist, &mut self.cmd_buf);
                }
                self.flush_commands();

                render::draw(
                    &ui.painter_at(canvas),
                    canvas,
                    &self.scene,
                    self.latest_frame.as_ref(),
                    self.any_fist,
                    self.audio_started,
                    self.config.scene.mosaic_cell_px,
                );
            });

        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Closing the command channel stops the engine; the engine in turn
        // drops its wav sender so the writer can finalize.
        self.cmd_tx.take();
        if let Some(handle) = self.engine_handle.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.wav_handle.take() {
            let _ = handle.join();
        }
    }
}
