//! Physics module: geometry, collision detection and the simulation scene
//!
//! Bodies live in a [`Scene`](scene::Scene) together with the force
//! generators and collision handlers bound to them. Each call to
//! [`Scene::tick`](scene::Scene::tick) runs five phases in order: reset the
//! force accumulators, accumulate forces, integrate, detect and dispatch
//! collisions, then prune removed bodies and the bindings that referenced them.

pub mod body;
pub mod body_set;
pub mod collision;
pub mod forces;
pub mod handlers;
pub mod polygon;
pub mod scene;

#[cfg(test)]
mod tests;

pub use body::{Body, BodyKind, KindTraits};
pub use body_set::BodySet;
pub use collision::{find_collision, CollisionInfo};
pub use forces::{Drag, ForceGenerator, NewtonianGravity, Spring};
pub use handlers::{CollisionHandler, Contact, Destructive, OneSidedDestructive, PhysicsCollision};
pub use polygon::{GeometryError, Polygon};
pub use scene::{Scene, SceneError, TickPhase, TickStats};
