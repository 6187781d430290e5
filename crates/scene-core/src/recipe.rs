//! Declarative scene recipes. One engine consumes a recipe instead of each
//! visual theme re-deriving its own scheduler/controller/lifecycle logic;
//! the four constructors mirror the landing page's hero variants.

use glam::{Vec2, Vec3};
use smallvec::{smallvec, SmallVec};
use std::str::FromStr;
use thiserror::Error;

// Palette shared by the variants (the site's neon-cyan family).
pub const NEON_CORE: [f32; 4] = [0.05, 0.83, 1.0, 0.9];
pub const NEON_ORBIT: [f32; 4] = [0.44, 0.89, 1.0, 0.45];
pub const NEON_SPARK: [f32; 4] = [0.75, 0.95, 1.0, 0.9];
pub const NET_WIRE: [f32; 4] = [0.22, 0.85, 1.0, 0.35];
pub const NET_ARC: [f32; 4] = [0.44, 0.89, 1.0, 0.35];

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("unknown scene variant: {0}")]
    UnknownVariant(String),
    #[error("recipe generates no entities")]
    Empty,
    #[error("arc pool capacity must be at least 1")]
    ArcCapacity,
    #[error("arc churn interval must be positive")]
    ChurnInterval,
}

#[derive(Clone, Copy, Debug)]
pub struct GroupSpec {
    /// Drift rates in rad/s: x drives pitch, y drives yaw.
    pub drift: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub struct RingSpec {
    pub radius: f32,
    pub squash: f32,
    pub tilt_axis: Vec3,
    pub tilt_angle: f32,
    pub color: [f32; 4],
    pub group: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct KnotSpec {
    pub p: u32,
    pub q: u32,
    pub radius: f32,
    pub tube: f32,
    pub samples: usize,
    pub color: [f32; 4],
    pub group: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct WireSphereSpec {
    pub radius: f32,
    pub lat_rings: usize,
    pub long_rings: usize,
    pub segments: usize,
    pub color: [f32; 4],
    pub group: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct ChainSpec {
    pub links: usize,
    pub link_radius: f32,
    pub squash: f32,
    pub spacing: f32,
    pub segments: usize,
    pub color: [f32; 4],
    pub group: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct StarBand {
    pub count: usize,
    pub radius: f32,
    pub size: f32,
    pub color: [f32; 4],
    pub group: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct ArcStyle {
    pub max_arcs: usize,
    pub churn_interval_sec: f32,
    pub lift: f32,
    pub segments: usize,
    pub color: [f32; 4],
    pub with_markers: bool,
    pub marker_color: [f32; 4],
    pub marker_size: f32,
    /// Per-arc marker speed is drawn uniformly from this range (rev/s).
    pub marker_speed: (f32, f32),
    pub group: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct BadgeSpec {
    pub glyph: char,
    /// Unit direction from the origin; scaled by the surface radius.
    pub direction: Vec3,
    pub diameter: f32,
    pub color: [f32; 4],
    pub group: usize,
}

#[derive(Clone, Debug)]
pub struct SceneRecipe {
    pub groups: SmallVec<[GroupSpec; 4]>,
    pub rings: Vec<RingSpec>,
    pub knot: Option<KnotSpec>,
    pub wire_sphere: Option<WireSphereSpec>,
    pub chain: Option<ChainSpec>,
    pub stars: SmallVec<[StarBand; 2]>,
    pub arcs: Option<ArcStyle>,
    pub badges: Vec<BadgeSpec>,
    /// Reference sphere radius used to sample connector endpoints.
    pub surface_radius: f32,
    pub camera_distance: f32,
    /// Flat ambient light level applied by the renderer.
    pub ambient: f32,
}

impl SceneRecipe {
    pub fn validate(&self) -> Result<(), RecipeError> {
        if let Some(arcs) = &self.arcs {
            if arcs.max_arcs == 0 {
                return Err(RecipeError::ArcCapacity);
            }
            if arcs.churn_interval_sec <= 0.0 {
                return Err(RecipeError::ChurnInterval);
            }
        }
        let empty = self.rings.is_empty()
            && self.knot.is_none()
            && self.wire_sphere.is_none()
            && self.chain.is_none()
            && self.stars.is_empty()
            && self.arcs.is_none()
            && self.badges.is_empty();
        if empty {
            return Err(RecipeError::Empty);
        }
        Ok(())
    }

    fn bare(groups: SmallVec<[GroupSpec; 4]>, camera_distance: f32, ambient: f32) -> Self {
        Self {
            groups,
            rings: Vec::new(),
            knot: None,
            wire_sphere: None,
            chain: None,
            stars: SmallVec::new(),
            arcs: None,
            badges: Vec::new(),
            surface_radius: 1.0,
            camera_distance,
            ambient,
        }
    }

    /// Neon torus knot with tilted orbit ellipses and a spark shell.
    pub fn core_knot() -> Self {
        let mut r = Self::bare(
            smallvec![
                GroupSpec { drift: Vec2::new(0.12, 0.35) },
                GroupSpec { drift: Vec2::new(0.0, 0.08) },
                GroupSpec { drift: Vec2::new(0.0, 0.04) },
            ],
            2.9,
            0.85,
        );
        r.knot = Some(KnotSpec {
            p: 2,
            q: 3,
            radius: 0.7,
            tube: 0.18,
            samples: 240,
            color: NEON_CORE,
            group: 0,
        });
        for i in 0..7usize {
            let f = i as f32;
            r.rings.push(RingSpec {
                radius: 1.25 + (i % 2) as f32 * 0.1,
                squash: 0.55,
                tilt_axis: Vec3::new((f * 0.37).sin(), 0.6, (f * 0.61).cos()),
                tilt_angle: std::f32::consts::FRAC_PI_6 * (f * 0.5 + 0.5),
                color: NEON_ORBIT,
                group: 1,
            });
        }
        r.stars.push(StarBand {
            count: 180,
            radius: 1.35,
            size: 0.02,
            color: NEON_SPARK,
            group: 2,
        });
        r
    }

    /// Wireframe globe with surface sparks, churning connector arcs with
    /// traveling markers, and labeled hub badges.
    pub fn network_globe() -> Self {
        let mut r = Self::bare(
            smallvec![
                GroupSpec { drift: Vec2::new(0.0, 0.10) },
                GroupSpec { drift: Vec2::new(0.0, 0.10) },
                GroupSpec { drift: Vec2::new(0.0, 0.05) },
            ],
            3.0,
            0.9,
        );
        r.wire_sphere = Some(WireSphereSpec {
            radius: 1.0,
            lat_rings: 9,
            long_rings: 12,
            segments: 64,
            color: NET_WIRE,
            group: 0,
        });
        r.stars.push(StarBand {
            count: 80,
            radius: 1.0,
            size: 0.02,
            color: NEON_SPARK,
            group: 2,
        });
        r.arcs = Some(ArcStyle {
            max_arcs: 18,
            churn_interval_sec: 1.4,
            lift: 0.3,
            segments: 40,
            color: NET_ARC,
            with_markers: true,
            marker_color: NEON_SPARK,
            marker_size: 0.035,
            marker_speed: (0.15, 0.45),
            group: 1,
        });
        let hubs: [(char, Vec3); 5] = [
            ('D', Vec3::new(0.2, 0.7, 0.7)),
            ('T', Vec3::new(-0.8, 0.3, 0.5)),
            ('Y', Vec3::new(0.7, -0.2, 0.7)),
            ('S', Vec3::new(-0.4, -0.6, 0.7)),
            ('W', Vec3::new(0.9, 0.4, -0.2)),
        ];
        for (glyph, dir) in hubs {
            r.badges.push(BadgeSpec {
                glyph,
                direction: dir,
                diameter: 0.16,
                color: NEON_SPARK,
                group: 1,
            });
        }
        r
    }

    /// Interlocked chain links with a wide spark shell.
    pub fn chain_links() -> Self {
        let mut r = Self::bare(
            smallvec![
                GroupSpec { drift: Vec2::new(0.10, 0.22) },
                GroupSpec { drift: Vec2::new(0.0, 0.04) },
            ],
            2.9,
            0.85,
        );
        r.chain = Some(ChainSpec {
            links: 7,
            link_radius: 0.42,
            squash: 0.62,
            spacing: 0.52,
            segments: 96,
            color: NEON_CORE,
            group: 0,
        });
        r.stars.push(StarBand {
            count: 120,
            radius: 1.5,
            size: 0.02,
            color: NEON_SPARK,
            group: 1,
        });
        r
    }

    /// Latitude-band planet with three fixed-tilt rings and two star bands.
    pub fn ringed_planet() -> Self {
        let mut r = Self::bare(
            smallvec![
                GroupSpec { drift: Vec2::new(0.0, 0.06) },
                GroupSpec { drift: Vec2::new(0.0, 0.03) },
                GroupSpec { drift: Vec2::new(0.0, 0.01) },
            ],
            3.4,
            0.9,
        );
        r.wire_sphere = Some(WireSphereSpec {
            radius: 0.8,
            lat_rings: 8,
            long_rings: 0,
            segments: 64,
            color: NEON_CORE,
            group: 0,
        });
        let tilt_axis = Vec3::new(1.0, 0.0, 0.3);
        for radius in [1.2, 1.45, 1.7] {
            r.rings.push(RingSpec {
                radius,
                squash: 1.0,
                tilt_axis,
                tilt_angle: 0.45,
                color: NEON_ORBIT,
                group: 1,
            });
        }
        r.stars.push(StarBand {
            count: 160,
            radius: 2.4,
            size: 0.03,
            color: NEON_SPARK,
            group: 2,
        });
        r.stars.push(StarBand {
            count: 90,
            radius: 3.2,
            size: 0.03,
            color: NEON_SPARK,
            group: 2,
        });
        r.surface_radius = 0.8;
        r
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneVariant {
    CoreKnot,
    NetworkGlobe,
    ChainLinks,
    RingedPlanet,
}

impl SceneVariant {
    pub fn recipe(self) -> SceneRecipe {
        match self {
            SceneVariant::CoreKnot => SceneRecipe::core_knot(),
            SceneVariant::NetworkGlobe => SceneRecipe::network_globe(),
            SceneVariant::ChainLinks => SceneRecipe::chain_links(),
            SceneVariant::RingedPlanet => SceneRecipe::ringed_planet(),
        }
    }
}

impl FromStr for SceneVariant {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core-knot" | "knot" => Ok(SceneVariant::CoreKnot),
            "network-globe" | "globe" => Ok(SceneVariant::NetworkGlobe),
            "chain" | "chain-links" => Ok(SceneVariant::ChainLinks),
            "planet" | "ringed-planet" => Ok(SceneVariant::RingedPlanet),
            other => Err(RecipeError::UnknownVariant(other.to_string())),
        }
    }
}
