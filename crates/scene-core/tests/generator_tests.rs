use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scene_core::generators::{
    arc_between, chain_links, orbit_ring, random_unit_dir, star_shell, torus_knot, wire_sphere,
};
use scene_core::label::{glyph_rows, rasterize_badge};

#[test]
fn orbit_ring_is_closed_and_sampled() {
    let pts = orbit_ring(1.25, 0.55, Vec3::new(0.3, 0.6, 0.1), 0.8, 160);
    assert_eq!(pts.len(), 161);
    assert!((pts[0] - pts[160]).length() < 1e-4);
}

#[test]
fn orbit_ring_tilt_preserves_distances() {
    let flat = orbit_ring(1.0, 0.55, Vec3::Y, 0.0, 64);
    let tilted = orbit_ring(1.0, 0.55, Vec3::new(1.0, 0.2, 0.4), 1.1, 64);
    for (a, b) in flat.iter().zip(tilted.iter()) {
        assert!((a.length() - b.length()).abs() < 1e-4);
    }
}

#[test]
fn orbit_ring_zero_axis_falls_back() {
    let pts = orbit_ring(1.0, 1.0, Vec3::ZERO, 0.7, 32);
    assert_eq!(pts.len(), 33);
    for p in &pts {
        assert!((p.length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn torus_knot_is_closed() {
    let pts = torus_knot(2, 3, 0.7, 0.18, 240);
    assert_eq!(pts.len(), 241);
    assert!((pts[0] - pts[240]).length() < 1e-3);
}

#[test]
fn wire_sphere_rings_lie_on_the_sphere() {
    let rings = wire_sphere(1.0, 9, 12, 64);
    assert_eq!(rings.len(), 21);
    for ring in &rings {
        for p in ring {
            assert!((p.length() - 1.0).abs() < 1e-3);
        }
    }
}

#[test]
fn wire_sphere_latitude_only_is_allowed() {
    let rings = wire_sphere(0.8, 8, 0, 48);
    assert_eq!(rings.len(), 8);
}

#[test]
fn chain_links_are_centered_closed_loops() {
    let links = chain_links(7, 0.42, 0.62, 0.52, 96);
    assert_eq!(links.len(), 7);
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    for link in &links {
        assert_eq!(link.len(), 97);
        assert!((link[0] - link[96]).length() < 1e-4);
        for p in link {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
        }
    }
    // the run is centered on the origin
    assert!((min_x + max_x).abs() < 1e-3);
}

#[test]
fn arc_matches_endpoints_and_bows_outward() {
    let a = Vec3::new(1.0, 0.0, 0.0);
    let b = Vec3::new(0.0, 0.8, 0.6);
    let (pts, curve) = arc_between(a, b, 0.3, 40);
    assert_eq!(pts.len(), 41);
    assert!((curve.eval(0.0) - a).length() < 1e-5);
    assert!((curve.eval(1.0) - b).length() < 1e-5);
    let chord_mid = (a + b) * 0.5;
    assert!(curve.eval(0.5).length() > chord_mid.length());
}

#[test]
fn arc_handles_antipodal_endpoints() {
    let a = Vec3::X;
    let b = -Vec3::X;
    let (_, curve) = arc_between(a, b, 0.3, 16);
    assert!(curve.ctrl.is_finite());
    assert!(curve.eval(0.5).length() > 0.0);
}

#[test]
fn star_shell_count_and_radius() {
    let mut rng = StdRng::seed_from_u64(7);
    let stars = star_shell(&mut rng, 180, 1.35);
    assert_eq!(stars.len(), 180);
    for p in &stars {
        assert!((p.length() - 1.35).abs() < 1e-3);
    }
}

#[test]
fn random_directions_are_unit_length() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let d = random_unit_dir(&mut rng);
        assert!((d.length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn badge_bitmap_has_expected_shape() {
    let bmp = rasterize_badge('D', 48, [255, 255, 255, 255], [128, 220, 255, 220]);
    assert_eq!(bmp.size, 48);
    assert_eq!(bmp.rgba.len(), 48 * 48 * 4);
}

#[test]
fn badge_corners_are_transparent_and_glyph_is_drawn() {
    let fg = [250, 250, 250, 255];
    let bmp = rasterize_badge('H', 48, fg, [128, 220, 255, 220]);
    // outside the disc
    assert_eq!(bmp.rgba[3], 0);
    // the crossbar of H covers the bitmap center
    let c = 24usize;
    let o = (c * 48 + c) * 4;
    assert_eq!(&bmp.rgba[o..o + 4], &fg);
}

#[test]
fn unknown_glyph_yields_plain_disc() {
    assert!(glyph_rows('A').is_some());
    assert!(glyph_rows('7').is_some());
    assert!(glyph_rows('?').is_none());
    let bmp = rasterize_badge('?', 32, [255, 255, 255, 255], [0, 0, 0, 255]);
    assert_eq!(bmp.rgba.len(), 32 * 32 * 4);
}
