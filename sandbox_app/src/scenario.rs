//! Scenario files
//!
//! A scenario describes a scene to build and how long to run it. It is
//! loaded through [`Config`], so both TOML and RON work:
//!
//! ```toml
//! dt = 0.01
//! ticks = 500
//!
//! [[bodies]]
//! name = "ball"
//! mass = 1.0
//! centroid = [0.0, 10.0]
//! shape = { type = "regular", sides = 12, radius = 1.0 }
//!
//! [[bodies]]
//! name = "floor"
//! kind = "anchor"
//! mass = 1.0
//! centroid = [0.0, -1.0]
//! shape = { type = "rectangle", width = 40.0, height = 2.0 }
//!
//! [[collisions]]
//! type = "physics"
//! elasticity = 0.8
//! a = "ball"
//! b = "floor"
//! ```

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rust_physics::physics::polygon::MIN_VERTICES;
use rust_physics::prelude::*;

/// Errors raised while loading or building a scenario
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// The file could not be read or parsed
    #[error("failed to load scenario: {0}")]
    Config(#[from] ConfigError),

    /// Two bodies share a name
    #[error("body name '{0}' is used more than once")]
    DuplicateBody(String),

    /// A binding names a body that is not declared
    #[error("no body named '{0}'")]
    UnknownBody(String),

    /// A body mass is zero, negative or not finite
    #[error("body '{name}' has invalid mass {mass}")]
    InvalidMass {
        /// Body name
        name: String,
        /// Offending mass
        mass: f64,
    },

    /// A number in the scenario is NaN or infinite
    #[error("'{name}' has a non-finite {field}")]
    NonFinite {
        /// Body the value belongs to, or the first body of a binding
        name: String,
        /// Offending field
        field: &'static str,
    },

    /// A body shape cannot be built
    #[error("body '{name}' has an invalid shape: {source}")]
    Geometry {
        /// Body name
        name: String,
        /// Underlying geometry error
        source: GeometryError,
    },

    /// A body shape has no area, so it has no centroid
    #[error("body '{0}' has a zero-area shape")]
    DegenerateShape(String),

    /// The time step is negative or not finite
    #[error("invalid time step {0}")]
    InvalidStep(f64),

    /// The scene rejected a binding
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Shape of a body before placement, centered on the origin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeConfig {
    /// Axis-aligned rectangle
    Rectangle {
        /// Width along x
        width: f64,
        /// Height along y
        height: f64,
    },
    /// Regular polygon inscribed in a circle
    Regular {
        /// Vertex count
        sides: usize,
        /// Circumradius
        radius: f64,
    },
    /// Explicit vertex ring; placed so its centroid lands on the body centroid
    Vertices {
        /// Vertices in ring order
        points: Vec<Vec2>,
    },
}

impl ShapeConfig {
    fn values(&self) -> Vec<f64> {
        match self {
            Self::Rectangle { width, height } => vec![*width, *height],
            Self::Regular { radius, .. } => vec![*radius],
            Self::Vertices { points } => points.iter().flat_map(|p| [p.x, p.y]).collect(),
        }
    }

    fn build(&self) -> Result<Polygon, GeometryError> {
        match self {
            Self::Rectangle { width, height } => Ok(Polygon::rectangle(*width, *height)),
            Self::Regular { sides, .. } if *sides < MIN_VERTICES => {
                Err(GeometryError::TooFewVertices(*sides))
            }
            Self::Regular { sides, radius } => Ok(Polygon::regular(*sides, *radius)),
            Self::Vertices { points } => Polygon::try_from(points.clone()),
        }
    }
}

/// Initial state of one named body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Unique name used by bindings and reports
    pub name: String,
    /// Shape before placement
    pub shape: ShapeConfig,
    /// Mass
    pub mass: f64,
    /// Initial centroid
    #[serde(default)]
    pub centroid: Vec2,
    /// Initial velocity
    #[serde(default)]
    pub velocity: Vec2,
    /// Initial orientation in radians
    #[serde(default)]
    pub angle: f64,
    /// Initial angular velocity in radians per second
    #[serde(default)]
    pub angular_velocity: f64,
    /// Body kind
    #[serde(default)]
    pub kind: BodyKind,
    /// Display color
    #[serde(default)]
    pub color: Color,
    /// External asset reference
    #[serde(default)]
    pub asset: Option<String>,
    /// Seconds until the body is removed
    #[serde(default)]
    pub lifetime: Option<f64>,
}

/// A force binding between named bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForceConfig {
    /// Inverse-square attraction
    Gravity {
        /// Gravitational constant
        g: f64,
        /// First body
        a: String,
        /// Second body
        b: String,
    },
    /// Zero-rest-length spring
    Spring {
        /// Stiffness
        k: f64,
        /// First body
        a: String,
        /// Second body
        b: String,
    },
    /// Linear drag
    Drag {
        /// Drag coefficient
        gamma: f64,
        /// Body slowed down
        body: String,
    },
}

/// A collision binding between named bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollisionConfig {
    /// Both bodies are removed on contact
    Destructive {
        /// First body
        a: String,
        /// Second body
        b: String,
    },
    /// Only `b` is removed on contact
    OneSided {
        /// Body that survives
        a: String,
        /// Body that is removed
        b: String,
    },
    /// The bodies bounce with coefficient of restitution `elasticity`
    Physics {
        /// Coefficient of restitution
        elasticity: f64,
        /// First body
        a: String,
        /// Second body
        b: String,
    },
}

/// Everything needed to build and run a scene
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Time step in seconds
    pub dt: f64,
    /// Number of ticks to run
    pub ticks: u64,
    /// Kernel policies
    pub physics: PhysicsConfig,
    /// Bodies in insertion order
    pub bodies: Vec<BodyConfig>,
    /// Force bindings
    pub forces: Vec<ForceConfig>,
    /// Collision bindings
    pub collisions: Vec<CollisionConfig>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            ticks: 600,
            physics: PhysicsConfig::default(),
            bodies: Vec::new(),
            forces: Vec::new(),
            collisions: Vec::new(),
        }
    }
}

impl Config for ScenarioConfig {}

/// A built scene plus the names of its bodies
#[derive(Debug)]
pub struct Scenario {
    /// The scene to tick
    pub scene: Scene,
    /// Body names by handle
    pub names: HashMap<BodyHandle, String>,
}

impl Scenario {
    /// Name of a body, or a placeholder for bodies spawned at runtime
    pub fn name_of(&self, handle: BodyHandle) -> &str {
        self.names.get(&handle).map_or("<spawned>", String::as_str)
    }
}

impl ScenarioConfig {
    /// Build the scene described by this configuration
    ///
    /// # Errors
    ///
    /// Fails on duplicate or unknown body names, bad masses or shapes,
    /// non-finite numbers, and bindings the scene rejects.
    pub fn build(&self) -> Result<Scenario, ScenarioError> {
        if !(self.dt.is_finite() && self.dt >= 0.0) {
            return Err(ScenarioError::InvalidStep(self.dt));
        }

        let mut scene = Scene::with_config(self.physics.clone());
        let mut handles: HashMap<&str, BodyHandle> = HashMap::new();

        for config in &self.bodies {
            if handles.contains_key(config.name.as_str()) {
                return Err(ScenarioError::DuplicateBody(config.name.clone()));
            }
            let handle = scene.add_body(config.build()?);
            handles.insert(&config.name, handle);
        }

        let lookup = |name: &str| {
            handles
                .get(name)
                .copied()
                .ok_or_else(|| ScenarioError::UnknownBody(name.to_string()))
        };

        for force in &self.forces {
            let (name, field, value) = match force {
                ForceConfig::Gravity { g, a, .. } => (a, "g", *g),
                ForceConfig::Spring { k, a, .. } => (a, "k", *k),
                ForceConfig::Drag { gamma, body } => (body, "gamma", *gamma),
            };
            ensure_finite(name, field, &[value])?;
            match force {
                ForceConfig::Gravity { g, a, b } => {
                    scene.create_newtonian_gravity(*g, lookup(a)?, lookup(b)?)?;
                }
                ForceConfig::Spring { k, a, b } => scene.create_spring(*k, lookup(a)?, lookup(b)?)?,
                ForceConfig::Drag { gamma, body } => scene.create_drag(*gamma, lookup(body)?)?,
            }
        }

        for collision in &self.collisions {
            match collision {
                CollisionConfig::Destructive { a, b } => {
                    scene.create_destructive_collision(lookup(a)?, lookup(b)?)?;
                }
                CollisionConfig::OneSided { a, b } => {
                    scene.create_one_sided_destructive_collision(lookup(a)?, lookup(b)?)?;
                }
                CollisionConfig::Physics { elasticity, a, b } => {
                    ensure_finite(a, "elasticity", &[*elasticity])?;
                    scene.create_physics_collision(*elasticity, lookup(a)?, lookup(b)?)?;
                }
            }
        }

        info!(
            "built scenario: {} bodies, {} forces, {} collision bindings",
            scene.body_count(),
            scene.force_count(),
            scene.collision_count()
        );

        let names = handles
            .into_iter()
            .map(|(name, handle)| (handle, name.to_string()))
            .collect();
        Ok(Scenario { scene, names })
    }
}

impl BodyConfig {
    fn build(&self) -> Result<Body, ScenarioError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ScenarioError::InvalidMass {
                name: self.name.clone(),
                mass: self.mass,
            });
        }

        ensure_finite(&self.name, "shape", &self.shape.values())?;
        ensure_finite(&self.name, "centroid", self.centroid.as_slice())?;
        ensure_finite(&self.name, "velocity", self.velocity.as_slice())?;
        ensure_finite(&self.name, "angle", &[self.angle])?;
        ensure_finite(&self.name, "angular_velocity", &[self.angular_velocity])?;
        if let Some(lifetime) = self.lifetime {
            ensure_finite(&self.name, "lifetime", &[lifetime])?;
        }

        let shape = self.shape.build().map_err(|source| ScenarioError::Geometry {
            name: self.name.clone(),
            source,
        })?;
        if shape.is_degenerate() {
            return Err(ScenarioError::DegenerateShape(self.name.clone()));
        }

        let mut body = Body::new(shape, self.mass, self.color)
            .with_kind(self.kind)
            .with_angular_velocity(self.angular_velocity);
        if let Some(asset) = &self.asset {
            body = body.with_asset(asset.clone());
        }
        if let Some(lifetime) = self.lifetime {
            body = body.with_lifetime(lifetime);
        }

        body.set_centroid(self.centroid);
        body.set_angle(self.angle);
        body.set_velocity(self.velocity);
        debug!("body '{}' ({:?}) at {:?}", self.name, self.kind, self.centroid);
        Ok(body)
    }
}

fn ensure_finite(name: &str, field: &'static str, values: &[f64]) -> Result<(), ScenarioError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ScenarioError::NonFinite {
            name: name.to_string(),
            field,
        })
    }
}
