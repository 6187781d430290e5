use crate::camera::Camera;
use crate::entity::{Appearance, Entity, EntityId, Geometry};
use crate::generators;
use crate::label;
use crate::pool::{ArcMarker, ArcPool, ArcSlot};
use crate::recipe::{ArcStyle, RecipeError, SceneRecipe};
use fnv::FnvHashMap;
use glam::{Mat4, Vec2};
use rand::prelude::*;
use rand::rngs::StdRng;
use smallvec::SmallVec;

/// Flat lighting terms applied by the renderer.
#[derive(Clone, Copy, Debug)]
pub struct Lighting {
    pub ambient: f32,
}

/// One independently drifting subset of the scene. User rotation is added
/// on top of the drift orientation at draw time.
#[derive(Clone, Copy, Debug)]
pub struct SpinGroup {
    pub drift: Vec2,
    pub pitch: f32,
    pub yaw: f32,
}

impl SpinGroup {
    pub fn model(&self, user_yaw: f32, user_pitch: f32) -> Mat4 {
        Mat4::from_rotation_y(self.yaw + user_yaw) * Mat4::from_rotation_x(self.pitch + user_pitch)
    }
}

/// Root owner of everything one mount renders. Built once per mount from a
/// recipe; nothing here survives teardown or is shared between mounts.
pub struct Scene {
    pub entities: FnvHashMap<EntityId, Entity>,
    /// Stable draw order; eviction removes ids here in the same tick.
    pub order: Vec<EntityId>,
    pub groups: SmallVec<[SpinGroup; 4]>,
    pub camera: Camera,
    pub lighting: Lighting,
    pub arcs: ArcPool,
    pub arc_style: Option<ArcStyle>,
    pub surface_radius: f32,
    pub user_yaw: f32,
    pub user_pitch: f32,
    next_id: EntityId,
}

impl Scene {
    pub fn build(recipe: &SceneRecipe, aspect: f32, rng: &mut StdRng) -> Result<Self, RecipeError> {
        recipe.validate()?;
        let mut scene = Scene {
            entities: FnvHashMap::default(),
            order: Vec::new(),
            groups: recipe
                .groups
                .iter()
                .map(|g| SpinGroup {
                    drift: g.drift,
                    pitch: 0.0,
                    yaw: 0.0,
                })
                .collect(),
            camera: Camera::new(recipe.camera_distance, aspect),
            lighting: Lighting {
                ambient: recipe.ambient,
            },
            arcs: ArcPool::new(recipe.arcs.map(|a| a.max_arcs).unwrap_or(0)),
            arc_style: recipe.arcs,
            surface_radius: recipe.surface_radius,
            user_yaw: 0.0,
            user_pitch: 0.0,
            next_id: 0,
        };

        if let Some(knot) = &recipe.knot {
            let points = generators::torus_knot(knot.p, knot.q, knot.radius, knot.tube, knot.samples);
            scene.insert(knot.group, Geometry::Polyline { points }, knot.color, None, false);
        }
        for ring in &recipe.rings {
            let points =
                generators::orbit_ring(ring.radius, ring.squash, ring.tilt_axis, ring.tilt_angle, 160);
            scene.insert(ring.group, Geometry::Polyline { points }, ring.color, None, false);
        }
        if let Some(sphere) = &recipe.wire_sphere {
            for points in generators::wire_sphere(
                sphere.radius,
                sphere.lat_rings,
                sphere.long_rings,
                sphere.segments,
            ) {
                scene.insert(sphere.group, Geometry::Polyline { points }, sphere.color, None, false);
            }
        }
        if let Some(chain) = &recipe.chain {
            for points in generators::chain_links(
                chain.links,
                chain.link_radius,
                chain.squash,
                chain.spacing,
                chain.segments,
            ) {
                scene.insert(chain.group, Geometry::Polyline { points }, chain.color, None, false);
            }
        }
        if let Some(style) = recipe.arcs {
            // start at capacity so the first churn already evicts
            for _ in 0..style.max_arcs {
                let slot = scene.spawn_arc(&style, rng);
                scene.arcs.push(slot);
            }
        }
        for band in &recipe.stars {
            let points = generators::star_shell(rng, band.count, band.radius);
            scene.insert(
                band.group,
                Geometry::Sparks {
                    points,
                    size: band.size,
                },
                band.color,
                None,
                false,
            );
        }
        for badge in &recipe.badges {
            let fg = color_to_rgba8(badge.color);
            let bitmap = label::rasterize_badge(badge.glyph, 48, fg, [255, 255, 255, 220]);
            let dir = badge.direction.normalize_or_zero();
            scene.insert(
                badge.group,
                Geometry::Badge {
                    center: dir * recipe.surface_radius * 1.05,
                    diameter: badge.diameter,
                    bitmap,
                },
                [1.0, 1.0, 1.0, badge.color[3].max(0.9)],
                Some(0.0),
                false,
            );
        }

        log::debug!(
            "scene built: {} entities, {} groups, {} pooled arcs",
            scene.entities.len(),
            scene.groups.len(),
            scene.arcs.len()
        );
        Ok(scene)
    }

    pub fn insert(
        &mut self,
        group: usize,
        geometry: Geometry,
        color: [f32; 4],
        pulse_phase: Option<f32>,
        dynamic: bool,
    ) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                group: group.min(self.groups.len().saturating_sub(1)),
                geometry,
                appearance: Appearance { color },
                pulse_phase,
                dynamic,
            },
        );
        self.order.push(id);
        id
    }

    /// Remove an entity; unknown ids are a no-op so disposal stays
    /// idempotent.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let found = self.entities.remove(&id).is_some();
        if found {
            self.order.retain(|&e| e != id);
        }
        found
    }

    /// Generate one connector between random points on the reference
    /// sphere. The caller owns pushing the slot into the pool.
    pub fn spawn_arc(&mut self, style: &ArcStyle, rng: &mut StdRng) -> ArcSlot {
        let a = generators::random_surface_point(rng, self.surface_radius);
        let b = generators::random_surface_point(rng, self.surface_radius);
        let (points, curve) = generators::arc_between(a, b, style.lift, style.segments);
        let line = self.insert(style.group, Geometry::Polyline { points }, style.color, None, false);
        let marker = if style.with_markers {
            let (lo, hi) = style.marker_speed;
            let speed = lo + rng.gen::<f32>() * (hi - lo).max(0.0);
            let progress = rng.gen::<f32>();
            let entity = self.insert(
                style.group,
                Geometry::Sparks {
                    points: vec![curve.eval(progress)],
                    size: style.marker_size,
                },
                style.marker_color,
                None,
                true,
            );
            Some(ArcMarker {
                entity,
                progress,
                speed,
            })
        } else {
            None
        };
        ArcSlot { line, marker, curve }
    }

    /// Advance every traveling marker and reseat it on its curve.
    pub fn step_markers(&mut self, dt: f32) {
        for slot in self.arcs.iter_mut() {
            let Some(marker) = slot.marker.as_mut() else {
                continue;
            };
            marker.progress = (marker.progress + marker.speed * dt).fract();
            if let Some(entity) = self.entities.get_mut(&marker.entity) {
                if let Geometry::Sparks { points, .. } = &mut entity.geometry {
                    if let Some(p) = points.first_mut() {
                        *p = slot.curve.eval(marker.progress);
                    }
                }
            }
        }
    }
}

fn color_to_rgba8(c: [f32; 4]) -> [u8; 4] {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(c[0]), q(c[1]), q(c[2]), q(c[3])]
}
