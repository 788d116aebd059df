//! # Rust Physics
//!
//! A discrete-time 2D rigid-shape physics kernel.
//!
//! ## Features
//!
//! - **Geometry**: 2D vector helpers and counter-clockwise polygons (area, centroid, translate, rotate)
//! - **SAT Collision**: Exact separating-axis test between convex polygons with a minimum-penetration axis
//! - **Force Registry**: Pluggable generators (inverse-square gravity, linear spring, linear drag)
//! - **Collision Handlers**: Per-pair handlers that may remove, spawn, or push bodies
//! - **Scene Pipeline**: reset → accumulate → integrate → collide → prune, safe against bodies
//!   being created and destroyed by the forces and collisions the tick itself triggers
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_physics::prelude::*;
//!
//! let mut scene = Scene::new();
//! let ball = scene.add_body(Body::new(Polygon::regular(16, 1.0), 1.0, Color::BLACK));
//! let floor = scene.add_body(
//!     Body::new(Polygon::rectangle(100.0, 2.0), 1.0, Color::BLACK)
//!         .with_kind(BodyKind::Anchor),
//! );
//! scene.body_mut(ball).unwrap().set_centroid(Vec2::new(0.0, 10.0));
//! scene.body_mut(floor).unwrap().set_centroid(Vec2::new(0.0, -1.0));
//! scene.body_mut(ball).unwrap().set_velocity(Vec2::new(0.0, -20.0));
//! scene.create_destructive_collision(ball, floor).unwrap();
//!
//! while scene.body_count() > 0 {
//!     scene.tick(0.01);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod physics;

/// Common imports for kernel users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig, WorldBounds},
        foundation::{
            collections::BodyHandle,
            color::Color,
            math::{Vec2, Vec2Ext},
        },
        physics::{
            body::{Body, BodyKind, KindTraits},
            collision::{find_collision, CollisionInfo},
            forces::{Drag, ForceGenerator, NewtonianGravity, Spring},
            handlers::{CollisionHandler, Contact},
            polygon::{GeometryError, Polygon},
            scene::{Scene, SceneError, TickPhase, TickStats},
        },
    };
}
