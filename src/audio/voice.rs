//! Sample-rate synthesis primitives: oscillators, a pluck envelope, linear
//! parameter ramps, pink noise and a small shared reverb.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// Phase-accumulator oscillator.
#[derive(Debug)]
pub struct Oscillator {
    waveform: Waveform,
    freq_hz: f32,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, freq_hz: f32) -> Self {
        Self {
            waveform,
            freq_hz,
            phase: 0.0,
        }
    }

    pub fn set_freq(&mut self, freq_hz: f32) {
        if freq_hz.is_finite() && freq_hz > 0.0 {
            self.freq_hz = freq_hz;
        }
    }

    pub fn tick(&mut self, fs: f32) -> f32 {
        self.phase += self.freq_hz / fs;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        match self.waveform {
            Waveform::Sine => (self.phase * std::f32::consts::TAU).sin(),
            Waveform::Triangle => 4.0 * (self.phase - 0.5).abs() - 1.0,
            Waveform::Sawtooth => 2.0 * self.phase - 1.0,
        }
    }
}

/// Pluck-shaped envelope: attack to the peak, decay to the sustain level,
/// then immediately release to zero. `trigger` restarts it from the top.
#[derive(Debug)]
pub struct Envelope {
    attack_sec: f32,
    decay_sec: f32,
    sustain_level: f32,
    release_sec: f32,
    peak: f32,
    elapsed: f32,
    active: bool,
}

impl Envelope {
    pub fn new(attack_sec: f32, decay_sec: f32, sustain_frac: f32, release_sec: f32, peak: f32) -> Self {
        Self {
            attack_sec: attack_sec.max(1e-4),
            decay_sec: decay_sec.max(1e-4),
            sustain_level: (sustain_frac * peak).max(0.0),
            release_sec: release_sec.max(1e-4),
            peak,
            elapsed: 0.0,
            active: false,
        }
    }

    pub fn trigger(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    pub fn tick(&mut self, dt: f32) -> f32 {
        if !self.active {
            return 0.0;
        }
        let t = self.elapsed;
        self.elapsed += dt;

        let level = if t < self.attack_sec {
            self.peak * (t / self.attack_sec)
        } else if t < self.attack_sec + self.decay_sec {
            let u = (t - self.attack_sec) / self.decay_sec;
            self.peak + (self.sustain_level - self.peak) * u
        } else {
            let u = (t - self.attack_sec - self.decay_sec) / self.release_sec;
            if u >= 1.0 {
                self.active = false;
                0.0
            } else {
                self.sustain_level * (1.0 - u)
            }
        };
        level.max(0.0)
    }
}

/// Linear parameter ramp: `set` aims at a target over a duration, `tick`
/// advances one sample toward it. Zero duration snaps.
#[derive(Debug)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    rate_per_sec: f32,
}

impl LinearRamp {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            rate_per_sec: 0.0,
        }
    }

    pub fn set(&mut self, target: f32, ramp_sec: f32) {
        if !target.is_finite() {
            return;
        }
        self.target = target;
        if !ramp_sec.is_finite() || ramp_sec <= 0.0 {
            self.current = target;
            self.rate_per_sec = 0.0;
        } else {
            self.rate_per_sec = (target - self.current) / ramp_sec;
        }
    }

    pub fn snap(&mut self, value: f32) {
        if value.is_finite() {
            self.current = value;
            self.target = value;
            self.rate_per_sec = 0.0;
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn tick(&mut self, dt: f32) -> f32 {
        if self.current != self.target {
            let step = self.rate_per_sec * dt;
            let next = self.current + step;
            let overshot = (self.target - self.current).signum() != (self.target - next).signum();
            self.current = if overshot || step == 0.0 {
                self.target
            } else {
                next
            };
        }
        self.current
    }
}

/// Single-sample pink noise (Paul Kellet 3-pole filter).
#[derive(Debug)]
pub struct PinkNoise {
    rng: StdRng,
    b0: f32,
    b1: f32,
    b2: f32,
}

impl PinkNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
        }
    }

    pub fn tick(&mut self) -> f32 {
        let white: f32 = self.rng.random_range(-1.0..1.0);
        self.b0 = 0.99765 * self.b0 + white * 0.099_046_0;
        self.b1 = 0.96300 * self.b1 + white * 0.296_516_4;
        self.b2 = 0.57000 * self.b2 + white * 1.052_691_3;
        let pink = self.b0 + self.b1 + self.b2 + white * 0.1848;
        pink * 0.25
    }
}

struct Comb {
    buf: Vec<f32>,
    idx: usize,
    feedback: f32,
}

impl Comb {
    fn new(delay_samples: usize, delay_sec: f32, rt60_sec: f32) -> Self {
        // Feedback chosen so the tail falls 60 dB over the reverb time.
        let feedback = 10.0f32.powf(-3.0 * delay_sec / rt60_sec.max(0.1));
        Self {
            buf: vec![0.0; delay_samples.max(1)],
            idx: 0,
            feedback,
        }
    }

    fn tick(&mut self, x: f32) -> f32 {
        let read = self.buf[self.idx];
        self.buf[self.idx] = x + read * self.feedback;
        self.idx = (self.idx + 1) % self.buf.len();
        read
    }
}

struct Allpass {
    buf: Vec<f32>,
    idx: usize,
    gain: f32,
}

impl Allpass {
    fn new(delay_samples: usize, gain: f32) -> Self {
        Self {
            buf: vec![0.0; delay_samples.max(1)],
            idx: 0,
            gain,
        }
    }

    fn tick(&mut self, x: f32) -> f32 {
        let delayed = self.buf[self.idx];
        let y = delayed - self.gain * x;
        self.buf[self.idx] = x + self.gain * y;
        self.idx = (self.idx + 1) % self.buf.len();
        y
    }
}

/// Small Schroeder reverb shared by the chordal, bass and wind voices.
pub struct Reverb {
    combs: Vec<Comb>,
    allpass: Allpass,
    wet: f32,
}

impl Reverb {
    pub fn new(fs: f32, rt60_sec: f32, wet: f32) -> Self {
        let delays_sec = [0.0297, 0.0371, 0.0411, 0.0437];
        let combs = delays_sec
            .iter()
            .map(|&d| Comb::new((d * fs) as usize, d, rt60_sec))
            .collect();
        Self {
            combs,
            allpass: Allpass::new((0.005 * fs) as usize, 0.7),
            wet: wet.clamp(0.0, 1.0),
        }
    }

    pub fn tick(&mut self, x: f32) -> f32 {
        let mut sum = 0.0;
        for comb in self.combs.iter_mut() {
            sum += comb.tick(x);
        }
        let wet = self.allpass.tick(sum / self.combs.len() as f32);
        x + wet * self.wet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_is_silent_until_triggered() {
        let mut env = Envelope::new(0.01, 0.2, 0.1, 1.5, 0.3);
        let dt = 1.0 / 48_000.0;
        for _ in 0..100 {
            assert_eq!(env.tick(dt), 0.0);
        }
        env.trigger();
        let mut peak = 0.0f32;
        for _ in 0..48_000 {
            peak = peak.max(env.tick(dt));
        }
        assert!(peak > 0.29 && peak <= 0.3, "peak={peak}");
    }

    #[test]
    fn envelope_decays_to_zero() {
        let mut env = Envelope::new(0.01, 0.2, 0.1, 0.5, 0.3);
        env.trigger();
        let dt = 1.0 / 1_000.0;
        let mut last = 0.0;
        for _ in 0..2_000 {
            last = env.tick(dt);
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn ramp_reaches_target_without_overshoot() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.set(0.5, 0.1);
        let dt = 1.0 / 48_000.0;
        let mut last = 0.0;
        for _ in 0..(48_000 / 5) {
            last = ramp.tick(dt);
            assert!(last <= 0.5 + 1e-6);
        }
        assert!((last - 0.5).abs() < 1e-4, "last={last}");
    }

    #[test]
    fn ramp_snap_is_immediate() {
        let mut ramp = LinearRamp::new(0.3);
        ramp.set(0.0, 0.0);
        assert_eq!(ramp.tick(1.0 / 48_000.0), 0.0);
    }

    #[test]
    fn pink_noise_stays_sane() {
        let mut pink = PinkNoise::new(123);
        for _ in 0..10_000 {
            let s = pink.tick();
            assert!(s.is_finite());
            assert!(s.abs() < 2.0);
        }
    }
}
