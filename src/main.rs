// Entry point: launches the egui/eframe app and wires up the input
// producers (demo drivers, or nothing — an external capture+pose process
// owns the channel senders in an installation build).

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use medusae::app::App;
use medusae::cli::Args;
use medusae::config::AppConfig;
use medusae::{tracking, video};

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load_or_default(&args.config);

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let (hands_tx, hands_rx) = tracking::source::hand_channel();
    let (frames_tx, frames_rx) = video::frame_channel();
    if args.demo {
        let _ = tracking::source::spawn_demo_hands(hands_tx, stop_flag.clone());
        let _ = video::spawn_demo_frames(frames_tx, stop_flag.clone());
    }
    // Without --demo the senders drop here; the scene idles until a real
    // producer is wired to the channels.

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1440.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "medusae",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(App::new(
                cc,
                args,
                config,
                stop_flag.clone(),
                hands_rx,
                frames_rx,
            )))
        }),
    )
}
