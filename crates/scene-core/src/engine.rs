//! The per-tick scheduler. One `advance` call runs to completion before
//! the next is scheduled by the frontend's frame loop; after `cancel` the
//! engine ignores input and ticks forever, so a stray callback firing
//! during teardown observes nothing.

use crate::constants::*;
use crate::entity::EntityId;
use crate::input::{InteractionState, PointerInput};
use crate::recipe::{RecipeError, SceneRecipe};
use crate::scene::Scene;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Explicit motion-preference flag from the host; disables drag, zoom
    /// and parallax and adds a steady auto-rotation.
    pub reduced_motion: bool,
    pub hint_timeout_sec: f32,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            hint_timeout_sec: HINT_TIMEOUT_SEC,
            seed: 42,
        }
    }
}

/// Entity ids that changed owners this tick, so the renderer can create
/// and release GPU resources atomically with the state step.
#[derive(Clone, Debug, Default)]
pub struct TickDelta {
    pub spawned: SmallVec<[EntityId; 2]>,
    pub evicted: SmallVec<[EntityId; 2]>,
}

impl TickDelta {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.evicted.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
struct HintState {
    visible: bool,
    elapsed: f32,
    timeout: f32,
}

pub struct SceneEngine {
    pub scene: Scene,
    pub input: InteractionState,
    config: EngineConfig,
    rng: StdRng,
    churn_timer: f32,
    hint: HintState,
    cancelled: bool,
}

impl SceneEngine {
    pub fn new(recipe: &SceneRecipe, aspect: f32, config: EngineConfig) -> Result<Self, RecipeError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let scene = Scene::build(recipe, aspect, &mut rng)?;
        let input = InteractionState::new(scene.camera.eye.z);
        Ok(Self {
            scene,
            input,
            hint: HintState {
                visible: true,
                elapsed: 0.0,
                timeout: config.hint_timeout_sec,
            },
            config,
            rng,
            churn_timer: 0.0,
            cancelled: false,
        })
    }

    pub fn pointer(&mut self, input: PointerInput) {
        if self.cancelled {
            return;
        }
        self.input.apply(input, self.config.reduced_motion);
    }

    /// Host resize: update projection aspect and the pointer-normalization
    /// bounds. No-op once cancelled, so a resize observed mid-teardown is
    /// absorbed.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if self.cancelled {
            return;
        }
        self.scene.camera.set_viewport(width, height);
        self.input.set_surface_size(width, height);
    }

    /// Stop the engine. Idempotent; every later call on the engine is a
    /// no-op.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn hint_visible(&self) -> bool {
        !self.cancelled && self.hint.visible
    }

    pub fn advance(&mut self, dt: f32) -> TickDelta {
        let mut delta = TickDelta::default();
        if self.cancelled || dt <= 0.0 {
            return delta;
        }

        // user-driven offset: apply accumulated velocity, then decay it
        self.scene.user_yaw += self.input.velocity.x * dt;
        self.scene.user_pitch += self.input.velocity.y * dt;
        self.input.damp(dt);

        // autonomous drift never stops, even mid-interaction
        let extra = if self.config.reduced_motion {
            REDUCED_MOTION_SPIN
        } else {
            0.0
        };
        for g in self.scene.groups.iter_mut() {
            g.pitch += g.drift.x * dt;
            g.yaw += (g.drift.y + extra) * dt;
        }

        for e in self.scene.entities.values_mut() {
            if let Some(phase) = e.pulse_phase.as_mut() {
                *phase += dt * BADGE_PULSE_RATE;
            }
        }

        self.scene.step_markers(dt);
        self.step_churn(dt, &mut delta);

        // camera: clamped dolly plus hover-gated parallax (pointer y grows
        // downward, eye y up)
        let parallax = if self.input.hovering() && !self.config.reduced_motion {
            Vec2::new(self.input.pointer_norm.x, -self.input.pointer_norm.y)
        } else {
            Vec2::ZERO
        };
        self.scene.camera.set_parallax_target(parallax);
        self.scene.camera.step(self.input.zoom_target, dt);

        if self.hint.visible {
            self.hint.elapsed += dt;
            if self.hint.elapsed >= self.hint.timeout || self.input.drag_happened {
                self.hint.visible = false;
            }
        }
        delta
    }

    fn step_churn(&mut self, dt: f32, delta: &mut TickDelta) {
        let Some(style) = self.scene.arc_style else {
            return;
        };
        self.churn_timer += dt;
        if self.churn_timer < style.churn_interval_sec {
            return;
        }
        // at most one replacement per tick, even after a stalled frame
        self.churn_timer = 0.0;

        let slot = self.scene.spawn_arc(&style, &mut self.rng);
        delta.spawned.push(slot.line);
        if let Some(m) = slot.marker {
            delta.spawned.push(m.entity);
        }
        if let Some(old) = self.scene.arcs.push(slot) {
            self.scene.remove(old.line);
            delta.evicted.push(old.line);
            if let Some(m) = old.marker {
                self.scene.remove(m.entity);
                delta.evicted.push(m.entity);
            }
        }
    }
}
