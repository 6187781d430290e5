// Sanity checks on the tuning constants and their relationships.

use scene_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(DAMPING_PER_FRAME > 0.0 && DAMPING_PER_FRAME < 1.0);
    assert!(REFERENCE_FRAME_HZ > 0.0);
    assert!(DRAG_SENSITIVITY > 0.0);
    assert!(MAX_ANGULAR_VELOCITY > 0.0);
    assert!(WHEEL_ZOOM_STEP > 0.0);
    assert!(ZOOM_SMOOTHING_PER_SEC > 0.0);
    assert!(PARALLAX_SMOOTHING_PER_SEC > 0.0);
    assert!(HINT_TIMEOUT_SEC > 0.0);
    assert!(BADGE_PULSE_RATE > 0.0);
    assert!(BADGE_PULSE_AMPLITUDE > 0.0 && BADGE_PULSE_AMPLITUDE < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_constants_have_logical_relationships() {
    assert!(CAMERA_MIN_Z < CAMERA_MAX_Z);
    assert!(CAMERA_ZNEAR > 0.0);
    assert!(CAMERA_ZNEAR < CAMERA_MIN_Z);
    assert!(CAMERA_ZFAR > CAMERA_MAX_Z);
    assert!(CAMERA_FOVY_RADIANS > 0.0 && CAMERA_FOVY_RADIANS < std::f32::consts::PI);
    // a full parallax deflection never pushes the eye past the subject
    assert!(PARALLAX_RANGE < CAMERA_MIN_Z);
    // the slowest autorotate still completes a turn within a few minutes
    assert!(REDUCED_MOTION_SPIN > 0.01 && REDUCED_MOTION_SPIN < 1.0);
}
