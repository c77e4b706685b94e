use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec2;
use tracing::debug;

use crate::tracking::hand::{HandObservation, LANDMARKS, PALM, TIPS};

/// Channel capacity for hand deliveries. The frame loop drains to the
/// latest value, so a small buffer is plenty.
const CHANNEL_CAP: usize = 4;

/// Create the hand-observation channel. The sender side belongs to whatever
/// pose producer feeds the app (an external capture+inference process, or
/// the built-in demo driver); each message is the full set of hands seen in
/// one video frame, replacing the previous set atomically.
pub fn hand_channel() -> (Sender<Vec<HandObservation>>, Receiver<Vec<HandObservation>>) {
    bounded(CHANNEL_CAP)
}

/// Synthetic pose producer for running without a camera: one hand slowly
/// orbiting the frame, closing into a fist for a stretch of every cycle.
pub fn spawn_demo_hands(
    tx: Sender<Vec<HandObservation>>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("demo-hands".into())
        .spawn(move || {
            let video = Vec2::new(320.0, 240.0);
            let center = video * 0.5;
            let mut t = 0.0f32;
            loop {
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                t += 1.0 / 30.0;

                let palm = center
                    + Vec2::new((t * 0.6).cos() * 60.0, (t * 0.45).sin() * 40.0);
                // Close the hand for the last quarter of every 8 s cycle.
                let closed = t % 8.0 > 6.0;
                let spread = if closed { 8.0 } else { 55.0 };

                // Fan of fingertip headings, thumb well apart from the
                // index so the open hand never reads as a fist.
                let finger_angles = [-2.2f32, -1.25, -0.9, -0.55, -0.2];
                let mut landmarks = [palm; LANDMARKS];
                landmarks[PALM] = palm;
                for (k, &tip_idx) in TIPS.iter().enumerate() {
                    let angle = finger_angles[k] + (t * 1.3 + k as f32).sin() * 0.05;
                    landmarks[tip_idx] = palm + Vec2::from_angle(angle) * spread;
                }

                if tx.send(vec![HandObservation::from_landmarks(landmarks)]).is_err() {
                    debug!("hand channel closed, demo driver stopping");
                    break;
                }
                thread::sleep(Duration::from_millis(33));
            }
        })
        .expect("spawn demo hands")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_driver_stops_on_disconnect() {
        let (tx, rx) = hand_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_demo_hands(tx, stop);
        let first = rx.recv().expect("one delivery");
        assert_eq!(first.len(), 1);
        drop(rx);
        handle.join().expect("driver exits cleanly");
    }
}
