use scene_core::{
    EngineConfig, Geometry, PointerInput, SceneEngine, SceneRecipe, CAMERA_MAX_Z, CAMERA_MIN_Z,
};

const DT: f32 = 1.0 / 60.0;

fn engine(recipe: SceneRecipe) -> SceneEngine {
    let mut e = SceneEngine::new(&recipe, 600.0 / 360.0, EngineConfig::default())
        .expect("recipe must build");
    e.set_viewport(600.0, 360.0);
    e
}

#[test]
fn viewport_drives_camera_aspect() {
    let mut e = engine(SceneRecipe::core_knot());
    assert!((e.scene.camera.aspect - 600.0 / 360.0).abs() < 1e-6);
    e.set_viewport(800.0, 400.0);
    assert!((e.scene.camera.aspect - 2.0).abs() < 1e-6);
}

#[test]
fn idle_ticks_drift_the_scene_but_not_the_camera() {
    let mut e = engine(SceneRecipe::core_knot());
    let eye0 = e.scene.camera.eye;
    let yaw0: Vec<f32> = e.scene.groups.iter().map(|g| g.yaw).collect();
    for _ in 0..100 {
        e.advance(DT);
    }
    let moved = e
        .scene
        .groups
        .iter()
        .zip(&yaw0)
        .any(|(g, y0)| (g.yaw - y0).abs() > 1e-4);
    assert!(moved, "autonomous drift must rotate the groups");
    assert!((e.scene.camera.eye - eye0).length() < 1e-5);
}

#[test]
fn released_drag_decays_to_rest() {
    let mut e = engine(SceneRecipe::core_knot());
    e.pointer(PointerInput::Enter);
    e.pointer(PointerInput::Down { x: 100.0, y: 100.0 });
    e.pointer(PointerInput::Move { x: 150.0, y: 100.0 });
    e.pointer(PointerInput::Up);
    let mut prev = e.input.velocity.length();
    assert!(prev > 0.0);
    let yaw_before = e.scene.user_yaw;
    for _ in 0..60 {
        e.advance(DT);
        let mag = e.input.velocity.length();
        assert!(mag < prev, "inertia must decay tick over tick");
        prev = mag;
    }
    assert!(prev < 0.02);
    assert!(e.scene.user_yaw > yaw_before, "inertia keeps rotating after release");
}

#[test]
fn camera_z_honors_the_dolly_clamp() {
    let mut e = engine(SceneRecipe::core_knot());
    e.pointer(PointerInput::Enter);
    for _ in 0..200 {
        e.pointer(PointerInput::Wheel { delta_y: 400.0 });
        e.advance(DT);
        assert!(e.scene.camera.eye.z <= CAMERA_MAX_Z + 1e-4);
    }
    for _ in 0..400 {
        e.pointer(PointerInput::Wheel { delta_y: -400.0 });
        e.advance(DT);
        assert!(e.scene.camera.eye.z >= CAMERA_MIN_Z - 1e-4);
    }
}

#[test]
fn parallax_only_applies_while_hovering() {
    let mut e = engine(SceneRecipe::core_knot());
    e.pointer(PointerInput::Enter);
    e.pointer(PointerInput::Move { x: 600.0, y: 180.0 });
    for _ in 0..120 {
        e.advance(DT);
    }
    assert!(e.scene.camera.eye.x > 0.05, "pointer at the right edge pans the eye");

    e.pointer(PointerInput::Leave);
    for _ in 0..240 {
        e.advance(DT);
    }
    assert!(e.scene.camera.eye.x.abs() < 1e-3, "eye recenters once hover ends");
}

#[test]
fn marker_progress_wraps_into_unit_range() {
    let mut e = engine(SceneRecipe::network_globe());
    for _ in 0..500 {
        e.advance(DT);
        for slot in e.scene.arcs.iter() {
            if let Some(m) = slot.marker {
                assert!((0.0..1.0).contains(&m.progress));
            }
        }
    }
}

#[test]
fn churn_keeps_the_pool_at_capacity_and_is_fifo() {
    let mut e = engine(SceneRecipe::network_globe());
    let cap = e.scene.arcs.capacity();
    assert_eq!(e.scene.arcs.len(), cap, "the pool starts full");
    let oldest = e.scene.arcs.iter().next().expect("non-empty").line;

    // one churn interval in a single late tick still evicts exactly once
    let delta = e.advance(1.5);
    assert!(delta.evicted.contains(&oldest));
    assert_eq!(e.scene.arcs.len(), cap);
    assert!(!e.scene.entities.contains_key(&oldest));
    for id in &delta.spawned {
        assert!(e.scene.entities.contains_key(id));
    }

    // long run: the bound holds forever
    for _ in 0..600 {
        e.advance(DT);
        assert!(e.scene.arcs.len() <= cap);
    }
}

#[test]
fn churn_evicts_line_and_marker_together() {
    let mut e = engine(SceneRecipe::network_globe());
    let first = *e.scene.arcs.iter().next().expect("non-empty");
    let marker_id = first.marker.expect("globe arcs carry markers").entity;
    let delta = e.advance(1.5);
    assert!(delta.evicted.contains(&first.line));
    assert!(delta.evicted.contains(&marker_id));
    assert!(!e.scene.entities.contains_key(&marker_id));
}

#[test]
fn markers_ride_their_curves() {
    let mut e = engine(SceneRecipe::network_globe());
    e.advance(DT);
    for slot in e.scene.arcs.iter() {
        let Some(m) = slot.marker else { continue };
        let entity = e.scene.entities.get(&m.entity).expect("marker entity exists");
        if let Geometry::Sparks { points, .. } = &entity.geometry {
            let expect = slot.curve.eval(m.progress);
            assert!((points[0] - expect).length() < 1e-4);
        } else {
            panic!("marker must be a spark");
        }
    }
}

#[test]
fn cancelled_engine_ignores_everything() {
    let mut e = engine(SceneRecipe::network_globe());
    e.advance(DT);
    e.cancel();
    assert!(e.is_cancelled());

    let aspect = e.scene.camera.aspect;
    e.set_viewport(1024.0, 256.0);
    assert_eq!(e.scene.camera.aspect, aspect);

    e.pointer(PointerInput::Enter);
    e.pointer(PointerInput::Down { x: 0.0, y: 0.0 });
    e.pointer(PointerInput::Move { x: 300.0, y: 0.0 });
    assert_eq!(e.input.velocity.length(), 0.0);

    let yaw: Vec<f32> = e.scene.groups.iter().map(|g| g.yaw).collect();
    let delta = e.advance(1.0);
    assert!(delta.is_empty());
    let unchanged = e
        .scene
        .groups
        .iter()
        .zip(&yaw)
        .all(|(g, y0)| g.yaw == *y0);
    assert!(unchanged, "no mutation after cancel");

    // cancelling again is a no-op, not an error
    e.cancel();
    assert!(e.is_cancelled());
}

#[test]
fn reduced_motion_spins_without_interaction() {
    let cfg = EngineConfig {
        reduced_motion: true,
        ..EngineConfig::default()
    };
    let mut e = SceneEngine::new(&SceneRecipe::core_knot(), 1.0, cfg).expect("build");
    e.set_viewport(600.0, 360.0);
    e.pointer(PointerInput::Enter);
    e.pointer(PointerInput::Down { x: 0.0, y: 0.0 });
    e.pointer(PointerInput::Move { x: 200.0, y: 0.0 });
    assert_eq!(e.input.velocity.length(), 0.0, "drag is disabled");

    let yaw0 = e.scene.groups[0].yaw;
    e.advance(1.0);
    assert!(e.scene.groups[0].yaw > yaw0);
    assert!(e.scene.camera.eye.x.abs() < 1e-6, "parallax is disabled");
}

#[test]
fn hint_hides_after_timeout() {
    let cfg = EngineConfig {
        hint_timeout_sec: 0.5,
        ..EngineConfig::default()
    };
    let mut e = SceneEngine::new(&SceneRecipe::core_knot(), 1.0, cfg).expect("build");
    assert!(e.hint_visible());
    for _ in 0..20 {
        e.advance(DT);
    }
    assert!(e.hint_visible());
    for _ in 0..20 {
        e.advance(DT);
    }
    assert!(!e.hint_visible());
}

#[test]
fn hint_hides_on_first_drag() {
    let mut e = engine(SceneRecipe::core_knot());
    assert!(e.hint_visible());
    e.pointer(PointerInput::Enter);
    e.pointer(PointerInput::Down { x: 10.0, y: 10.0 });
    e.pointer(PointerInput::Move { x: 40.0, y: 10.0 });
    e.advance(DT);
    assert!(!e.hint_visible());
}

#[test]
fn badge_pulse_phases_advance() {
    let mut e = engine(SceneRecipe::network_globe());
    let badge_count = e
        .scene
        .entities
        .values()
        .filter(|en| en.pulse_phase.is_some())
        .count();
    assert!(badge_count > 0, "globe badges pulse");
    e.advance(DT);
    for entity in e.scene.entities.values() {
        if let Some(phase) = entity.pulse_phase {
            assert!(phase > 0.0);
        }
    }
}
