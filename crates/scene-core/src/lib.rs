pub mod camera;
pub mod constants;
pub mod engine;
pub mod entity;
pub mod generators;
pub mod input;
pub mod label;
pub mod pool;
pub mod recipe;
pub mod scene;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use camera::Camera;
pub use constants::*;
pub use engine::{EngineConfig, SceneEngine, TickDelta};
pub use entity::{Appearance, Entity, EntityId, Geometry};
pub use generators::ArcCurve;
pub use input::{InteractionState, Phase, PointerInput};
pub use label::BadgeBitmap;
pub use pool::{ArcMarker, ArcPool, ArcSlot};
pub use recipe::{RecipeError, SceneRecipe, SceneVariant};
pub use scene::{Lighting, Scene, SpinGroup};
