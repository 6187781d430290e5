//! Pointer/wheel interaction as one explicit state machine, translated
//! from DOM events by the web frontend and consumed by the scheduler.

use crate::constants::*;
use glam::Vec2;

/// Pointer/wheel events, positions in surface CSS pixels.
#[derive(Clone, Copy, Debug)]
pub enum PointerInput {
    Enter,
    Leave,
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Wheel { delta_y: f32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Hovering,
    Dragging,
}

/// Written only by `apply` (the controller side); the scheduler reads it
/// and advances the time-derived decay in `damp`.
#[derive(Clone, Debug)]
pub struct InteractionState {
    pub phase: Phase,
    /// Accumulated angular velocity in rad/s: x drives yaw, y pitch.
    pub velocity: Vec2,
    /// Pointer position normalized to [-1, 1] within the surface bounds.
    pub pointer_norm: Vec2,
    /// Wheel-adjusted camera distance, always within the dolly clamp.
    pub zoom_target: f32,
    /// Latched on the first drag movement; dismisses the hint.
    pub drag_happened: bool,
    last: Vec2,
    surface: Vec2,
}

impl InteractionState {
    pub fn new(zoom: f32) -> Self {
        Self {
            phase: Phase::Idle,
            velocity: Vec2::ZERO,
            pointer_norm: Vec2::ZERO,
            zoom_target: zoom.clamp(CAMERA_MIN_Z, CAMERA_MAX_Z),
            drag_happened: false,
            last: Vec2::ZERO,
            surface: Vec2::ZERO,
        }
    }

    pub fn set_surface_size(&mut self, width: f32, height: f32) {
        self.surface = Vec2::new(width.max(0.0), height.max(0.0));
    }

    pub fn hovering(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn apply(&mut self, input: PointerInput, reduced_motion: bool) {
        match input {
            PointerInput::Enter => {
                if self.phase == Phase::Idle {
                    self.phase = Phase::Hovering;
                }
            }
            PointerInput::Leave => {
                self.phase = Phase::Idle;
                self.velocity = Vec2::ZERO;
                self.pointer_norm = Vec2::ZERO;
            }
            PointerInput::Down { x, y } => {
                self.last = Vec2::new(x, y);
                if self.phase == Phase::Hovering && !reduced_motion {
                    self.phase = Phase::Dragging;
                }
            }
            PointerInput::Move { x, y } => {
                let pos = Vec2::new(x, y);
                if self.phase == Phase::Dragging && !reduced_motion {
                    let delta = pos - self.last;
                    self.velocity += delta * DRAG_SENSITIVITY;
                    self.velocity = self.velocity.clamp_length_max(MAX_ANGULAR_VELOCITY);
                    if delta != Vec2::ZERO {
                        self.drag_happened = true;
                    }
                }
                self.last = pos;
                self.pointer_norm = self.normalize(pos);
            }
            PointerInput::Up => {
                if self.phase == Phase::Dragging {
                    self.phase = Phase::Hovering;
                }
            }
            PointerInput::Wheel { delta_y } => {
                // hover-gated so page scrolling outside the surface is untouched
                if self.phase == Phase::Idle || reduced_motion {
                    return;
                }
                self.zoom_target = (self.zoom_target + delta_y * WHEEL_ZOOM_STEP)
                    .clamp(CAMERA_MIN_Z, CAMERA_MAX_Z);
            }
        }
    }

    /// Geometric inertia decay, normalized to the reference frame rate so
    /// the feel is independent of the display's refresh interval.
    pub fn damp(&mut self, dt: f32) {
        self.velocity *= DAMPING_PER_FRAME.powf(dt * REFERENCE_FRAME_HZ);
    }

    fn normalize(&self, pos: Vec2) -> Vec2 {
        if self.surface.x <= 0.0 || self.surface.y <= 0.0 {
            return Vec2::ZERO;
        }
        let n = pos / self.surface * 2.0 - Vec2::ONE;
        n.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }
}
