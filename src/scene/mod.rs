//! Scene state: the creature collection, ambient particle/vine systems and
//! the per-frame reconciliation loop that binds them to the hand stream.

pub mod creature;
pub mod field;
pub mod particles;
pub mod tentacle;
pub mod vines;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::audio::events::AudioCommand;
use crate::config::{SceneConfig, TrackingConfig};
use crate::scene::creature::Creature;
use crate::scene::field::NoiseField;
use crate::scene::particles::FlowParticle;
use crate::scene::vines::EdgeVine;
use crate::tracking::hand::HandObservation;

/// Read-only per-frame context shared by the animated subsystems.
pub struct FrameCtx<'a> {
    pub frame: u64,
    pub canvas: Vec2,
    pub video: Vec2,
    pub field: &'a NoiseField,
}

/// All mutable scene state, owned as one value. Created at startup and
/// recreated wholesale on resize; `teardown` releases creature voices first.
pub struct Scene {
    pub size: Vec2,
    pub frame: u64,
    pub creatures: Vec<Creature>,
    pub particles: Vec<FlowParticle>,
    pub vines: Vec<EdgeVine>,
    field: NoiseField,
    rng: StdRng,
    next_voice_id: u64,
    video_size: Vec2,
    fist_threshold: f32,
    max_vines: usize,
    vine_spawn_period: u64,
}

impl Scene {
    pub fn new(size: Vec2, scene_cfg: &SceneConfig, tracking_cfg: &TrackingConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let field = NoiseField::new(rng.random::<u32>());
        let mut scene = Self {
            size,
            frame: 0,
            creatures: Vec::new(),
            particles: Vec::new(),
            vines: Vec::new(),
            field,
            rng,
            next_voice_id: 0,
            video_size: Vec2::new(
                tracking_cfg.video_width as f32,
                tracking_cfg.video_height as f32,
            ),
            fist_threshold: tracking_cfg.fist_threshold_px,
            max_vines: scene_cfg.max_vines,
            vine_spawn_period: scene_cfg.vine_spawn_period.max(1),
        };
        // The scene is never empty: one idle creature from the first frame.
        scene.spawn_creature();
        for _ in 0..scene_cfg.flow_particles {
            let p = FlowParticle::new(size, &mut scene.rng);
            scene.particles.push(p);
        }
        scene
    }

    /// Advance everything by one frame. Returns the global any-fist signal,
    /// computed from this frame's updated creature flags.
    pub fn step(
        &mut self,
        hands: &[HandObservation],
        audio_started: bool,
        cmds: &mut Vec<AudioCommand>,
    ) -> bool {
        self.frame += 1;

        if self.frame % self.vine_spawn_period == 0 && self.vines.len() < self.max_vines {
            let vine = EdgeVine::new(self.size, &mut self.rng);
            self.vines.push(vine);
        }

        // Particles read the primary creature's position from before this
        // frame's creature updates.
        let repel = if !hands.is_empty() {
            self.creatures.first().map(|c| c.pos)
        } else {
            None
        };

        self.reconcile(hands.len(), cmds);

        let ctx = FrameCtx {
            frame: self.frame,
            canvas: self.size,
            video: self.video_size,
            field: &self.field,
        };

        for vine in self.vines.iter_mut() {
            vine.step(ctx.field, ctx.frame, ctx.canvas);
        }
        self.vines.retain(|v| !v.is_dead());

        for p in self.particles.iter_mut() {
            p.step(ctx.field, ctx.frame, repel, ctx.canvas);
        }

        for (i, creature) in self.creatures.iter_mut().enumerate() {
            if hands.is_empty() {
                creature.update(None, false, &ctx, audio_started, cmds);
            } else if let Some(hand) = hands.get(i) {
                let is_fist = hand.is_fist(self.fist_threshold);
                creature.update(Some(hand), is_fist, &ctx, audio_started, cmds);
            }
            // A creature whose hand slot is empty this frame keeps its
            // prior state untouched.
        }

        self.creatures.iter().any(|c| c.is_fist && !c.is_idle)
    }

    /// Grow or shrink the creature collection until it matches the tracked
    /// hand count (never below one).
    fn reconcile(&mut self, hand_count: usize, cmds: &mut Vec<AudioCommand>) {
        let target = hand_count.max(1);
        while self.creatures.len() < target {
            let id = self.spawn_creature();
            cmds.push(AudioCommand::SpawnCreatureVoice { id });
        }
        while self.creatures.len() > target {
            if let Some(mut removed) = self.creatures.pop() {
                removed.dispose(cmds);
                debug!(remaining = self.creatures.len(), "creature removed");
            }
        }
    }

    fn spawn_creature(&mut self) -> u64 {
        let id = self.next_voice_id;
        self.next_voice_id += 1;
        let creature = Creature::new(self.size * 0.5, id, &mut self.rng);
        self.creatures.push(creature);
        id
    }

    /// Voice-registration commands for the creatures already present; sent
    /// right after construction so the engine knows the initial creature.
    pub fn announce_voices(&self, cmds: &mut Vec<AudioCommand>) {
        for creature in &self.creatures {
            cmds.push(AudioCommand::SpawnCreatureVoice {
                id: creature.voice_id(),
            });
        }
    }

    /// Release every creature's audio voice; called before the scene is
    /// discarded (resize or shutdown).
    pub fn teardown(&mut self, cmds: &mut Vec<AudioCommand>) {
        for creature in self.creatures.iter_mut() {
            creature.dispose(cmds);
        }
    }
}
