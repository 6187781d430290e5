use crate::label::BadgeBitmap;
use glam::Vec3;

pub type EntityId = u32;

/// Geometry of one generated entity. Closed curves repeat their first
/// sample, so a polyline is always drawable as a single strip.
#[derive(Clone, Debug)]
pub enum Geometry {
    /// Connected run of line segments.
    Polyline { points: Vec<Vec3> },
    /// Batch of billboarded round points drawn as one instanced entity.
    Sparks { points: Vec<Vec3>, size: f32 },
    /// Billboarded circular badge with a glyph bitmap baked at build time.
    Badge {
        center: Vec3,
        diameter: f32,
        bitmap: BadgeBitmap,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct Appearance {
    pub color: [f32; 4],
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    /// Spin group whose drift/orientation this entity follows.
    pub group: usize,
    pub geometry: Geometry,
    pub appearance: Appearance,
    /// Phase for entities that breathe (badges); `None` for static ones.
    pub pulse_phase: Option<f32>,
    /// Geometry is rewritten by the scheduler each tick (arc markers).
    pub dynamic: bool,
}
