//! Pure factory functions for the procedural geometry the scenes are
//! assembled from. Each returns plain point data; entity bookkeeping and
//! GPU upload happen elsewhere.

use glam::{Quat, Vec3};
use rand::prelude::*;
use std::f32::consts::TAU;

/// Quadratic Bezier through two surface points and a lifted control point.
#[derive(Clone, Copy, Debug)]
pub struct ArcCurve {
    pub a: Vec3,
    pub ctrl: Vec3,
    pub b: Vec3,
}

impl ArcCurve {
    pub fn eval(&self, u: f32) -> Vec3 {
        let t = u.clamp(0.0, 1.0);
        let s = 1.0 - t;
        self.a * (s * s) + self.ctrl * (2.0 * s * t) + self.b * (t * t)
    }
}

/// Closed planar ellipse, tilted by an axis-angle rotation.
pub fn orbit_ring(
    radius: f32,
    squash: f32,
    tilt_axis: Vec3,
    tilt_angle: f32,
    segments: usize,
) -> Vec<Vec3> {
    let axis = if tilt_axis.length_squared() > 1e-12 {
        tilt_axis.normalize()
    } else {
        Vec3::Y
    };
    let rot = Quat::from_axis_angle(axis, tilt_angle);
    let n = segments.max(3);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = i as f32 / n as f32 * TAU;
        let p = Vec3::new(t.cos() * radius, 0.0, t.sin() * radius * squash);
        points.push(rot * p);
    }
    points
}

/// Closed (p, q) torus-knot skeleton curve.
pub fn torus_knot(p: u32, q: u32, radius: f32, tube: f32, samples: usize) -> Vec<Vec3> {
    let n = samples.max(16);
    let (pf, qf) = (p as f32, q as f32);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = i as f32 / n as f32 * TAU;
        let r = radius + tube * (qf * t).cos();
        points.push(Vec3::new(
            r * (pf * t).cos(),
            tube * (qf * t).sin(),
            r * (pf * t).sin(),
        ));
    }
    points
}

/// Latitude circles plus longitude great circles for a wireframe sphere.
/// Either count may be zero.
pub fn wire_sphere(
    radius: f32,
    lat_rings: usize,
    long_rings: usize,
    segments: usize,
) -> Vec<Vec<Vec3>> {
    let n = segments.max(8);
    let mut out = Vec::with_capacity(lat_rings + long_rings);
    for i in 1..=lat_rings {
        let phi = std::f32::consts::PI * i as f32 / (lat_rings + 1) as f32;
        let y = radius * phi.cos();
        let r = radius * phi.sin();
        let mut ring = Vec::with_capacity(n + 1);
        for s in 0..=n {
            let t = s as f32 / n as f32 * TAU;
            ring.push(Vec3::new(r * t.cos(), y, r * t.sin()));
        }
        out.push(ring);
    }
    for i in 0..long_rings {
        let rot = Quat::from_rotation_y(std::f32::consts::PI * i as f32 / long_rings.max(1) as f32);
        let mut ring = Vec::with_capacity(n + 1);
        for s in 0..=n {
            let t = s as f32 / n as f32 * TAU;
            ring.push(rot * Vec3::new(radius * t.cos(), radius * t.sin(), 0.0));
        }
        out.push(ring);
    }
    out
}

/// A run of elliptical links along the x axis, neighbours rotated a
/// quarter turn so they read as interlocked.
pub fn chain_links(
    count: usize,
    link_radius: f32,
    squash: f32,
    spacing: f32,
    segments: usize,
) -> Vec<Vec<Vec3>> {
    let n = segments.max(8);
    let span = count.saturating_sub(1) as f32 * spacing;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let x = i as f32 * spacing - span * 0.5;
        let angle = if i % 2 == 0 {
            0.0
        } else {
            std::f32::consts::FRAC_PI_2
        };
        let rot = Quat::from_axis_angle(Vec3::X, angle);
        let mut ring = Vec::with_capacity(n + 1);
        for s in 0..=n {
            let t = s as f32 / n as f32 * TAU;
            let p = Vec3::new(t.cos() * link_radius, t.sin() * link_radius * squash, 0.0);
            ring.push(rot * p + Vec3::new(x, 0.0, 0.0));
        }
        out.push(ring);
    }
    out
}

/// Quadratic arc between two points on (or near) the reference sphere,
/// bowed outward along the average normal. Returns the sampled polyline
/// and the curve used to reposition a traveling marker.
pub fn arc_between(a: Vec3, b: Vec3, lift: f32, segments: usize) -> (Vec<Vec3>, ArcCurve) {
    let mid = (a + b) * 0.5;
    let outward = if mid.length_squared() > 1e-12 {
        mid.normalize()
    } else {
        // antipodal endpoints: bow over the pole
        Vec3::Y
    };
    let reach = a.length().max(b.length());
    let curve = ArcCurve {
        a,
        ctrl: outward * (reach + lift),
        b,
    };
    let n = segments.max(2);
    let points = (0..=n).map(|i| curve.eval(i as f32 / n as f32)).collect();
    (points, curve)
}

/// Uniformly random unit direction.
pub fn random_unit_dir<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let y = rng.gen::<f32>() * 2.0 - 1.0;
    let r = (1.0 - y * y).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Random point on the reference sphere, used for connector endpoints.
pub fn random_surface_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    random_unit_dir(rng) * radius
}

/// `count` random directions scaled to one radius band, batched into a
/// single point set.
pub fn star_shell<R: Rng + ?Sized>(rng: &mut R, count: usize, radius: f32) -> Vec<Vec3> {
    (0..count).map(|_| random_unit_dir(rng) * radius).collect()
}
