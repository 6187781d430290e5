// Shared camera/interaction/scheduler tuning constants used by the engine
// and the web frontend.

// Camera
pub const CAMERA_FOVY_RADIANS: f32 = 0.8727; // 50 degrees
pub const CAMERA_MIN_Z: f32 = 2.2;
pub const CAMERA_MAX_Z: f32 = 6.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const ZOOM_SMOOTHING_PER_SEC: f32 = 8.0;
pub const WHEEL_ZOOM_STEP: f32 = 0.0025; // world units per pixel of wheel deltaY
pub const PARALLAX_RANGE: f32 = 0.4; // eye offset in world units at full deflection
pub const PARALLAX_SMOOTHING_PER_SEC: f32 = 6.0;

// Interaction
pub const DRAG_SENSITIVITY: f32 = 0.006; // rad/s of angular velocity per pixel dragged
pub const DAMPING_PER_FRAME: f32 = 0.94; // geometric inertia decay at the reference rate
pub const REFERENCE_FRAME_HZ: f32 = 60.0;
pub const MAX_ANGULAR_VELOCITY: f32 = 5.0; // rad/s

// Scheduler
pub const BADGE_PULSE_RATE: f32 = 2.4; // rad/s of badge pulse phase
pub const BADGE_PULSE_AMPLITUDE: f32 = 0.12; // scale swing at full pulse
pub const REDUCED_MOTION_SPIN: f32 = 0.084; // rad/s, the old mobile autorotate speed
pub const HINT_TIMEOUT_SEC: f32 = 6.0;
