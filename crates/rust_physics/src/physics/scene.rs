//! Scene: body ownership and the per-tick pipeline
//!
//! A tick runs five phases in a fixed order:
//!
//! 1. **Reset** clears every force accumulator.
//! 2. **Accumulate** applies each force generator whose bodies are all active.
//! 3. **Integrate** advances velocities and then positions (semi-implicit Euler).
//! 4. **Collide** runs the SAT test for every collision binding whose bodies are
//!    both active and calls the handler on overlap.
//! 5. **Prune** drops flagged bodies and every binding that referenced them.
//!
//! Nothing is removed before phase 5. Handlers see the scene mutably and may
//! flag bodies, add bodies or create bindings; new bindings join the scene
//! after the collide phase, so they are first evaluated on the next tick.

use std::fmt;
use std::mem;

use thiserror::Error;

use crate::config::PhysicsConfig;
use crate::foundation::collections::BodyHandle;
use crate::foundation::logging::{debug, trace};
use crate::physics::body::{Body, KindTraits};
use crate::physics::body_set::BodySet;
use crate::physics::collision::find_collision;
use crate::physics::forces::{Drag, ForceGenerator, NewtonianGravity, Spring};
use crate::physics::handlers::{
    CollisionHandler, Contact, Destructive, OneSidedDestructive, PhysicsCollision,
};

/// Errors raised when binding forces or collisions
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a body in this scene
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),

    /// A pairwise binding names the same body twice
    #[error("body {0:?} cannot interact with itself")]
    SelfInteraction(BodyHandle),
}

/// Where the scene currently is in its tick pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    /// Between ticks
    Idle,
    /// Clearing force accumulators
    Reset,
    /// Applying force generators
    Accumulate,
    /// Advancing velocity and position
    Integrate,
    /// Detecting collisions and running handlers
    Collide,
    /// Removing flagged bodies and stale bindings
    Prune,
}

/// Counters describing one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Force generators applied during accumulation
    pub forces_applied: usize,
    /// Collision handlers invoked
    pub collisions: usize,
    /// Bodies pruned at the end of the tick
    pub removed: usize,
}

struct CollisionBinding {
    bodies: [BodyHandle; 2],
    handler: Box<dyn CollisionHandler>,
}

/// Owns bodies, force generators and collision bindings, and advances them in time
pub struct Scene {
    bodies: BodySet,
    forces: Vec<Box<dyn ForceGenerator>>,
    collisions: Vec<CollisionBinding>,
    config: PhysicsConfig,
    time: f64,
    phase: TickPhase,
}

impl Scene {
    /// Create an empty scene with the default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create an empty scene
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: BodySet::new(),
            forces: Vec::new(),
            collisions: Vec::new(),
            config,
            time: 0.0,
            phase: TickPhase::Idle,
        }
    }

    /// Scene configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Take ownership of `body` and return its handle
    ///
    /// Bodies added from a collision handler are integrated from the next
    /// tick on.
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.insert(body);
        debug!("added body {handle:?} ({} total)", self.bodies.len());
        handle
    }

    /// Body behind `handle`, if it has not been pruned
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Mutable body behind `handle`, if it has not been pruned
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// The `index`-th body in insertion order
    pub fn body_at(&self, index: usize) -> Option<&Body> {
        self.bodies.handle_at(index).and_then(|handle| self.bodies.get(handle))
    }

    /// Bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    /// Handles in insertion order
    pub fn handles(&self) -> &[BodyHandle] {
        self.bodies.handles()
    }

    /// Number of bodies, including ones flagged but not yet pruned
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Flag a body for removal at the end of the current (or next) tick
    ///
    /// Returns false if the handle is unknown.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.remove();
                true
            }
            None => false,
        }
    }

    /// Register a force generator
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] if the generator names a body
    /// that is not in this scene.
    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) -> Result<(), SceneError> {
        for &handle in force.bodies() {
            self.check_body(handle)?;
        }
        debug!("bound {} force to {:?}", force.name(), force.bodies());
        self.forces.push(Box::new(force));
        Ok(())
    }

    /// Bind inverse-square gravity with constant `g` between `a` and `b`
    ///
    /// # Errors
    ///
    /// Fails if either body is unknown or `a == b`.
    pub fn create_newtonian_gravity(
        &mut self,
        g: f64,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Result<(), SceneError> {
        self.check_pair(a, b)?;
        let gravity =
            NewtonianGravity::new(g, a, b).with_min_distance(self.config.min_gravity_distance);
        self.add_force(gravity)
    }

    /// Bind a zero-rest-length spring of stiffness `k` between `a` and `b`
    ///
    /// # Errors
    ///
    /// Fails if either body is unknown or `a == b`.
    pub fn create_spring(&mut self, k: f64, a: BodyHandle, b: BodyHandle) -> Result<(), SceneError> {
        self.check_pair(a, b)?;
        self.add_force(Spring::new(k, a, b))
    }

    /// Bind linear drag with coefficient `gamma` to `body`
    ///
    /// # Errors
    ///
    /// Fails if the body is unknown.
    pub fn create_drag(&mut self, gamma: f64, body: BodyHandle) -> Result<(), SceneError> {
        self.add_force(Drag::new(gamma, body))
    }

    /// Bind `handler` to the pair `(a, b)`
    ///
    /// The handler runs once per tick while the two shapes overlap, and is
    /// dropped when either body is pruned or the scene is dropped.
    ///
    /// # Errors
    ///
    /// Fails if either body is unknown or `a == b`.
    pub fn create_collision<H: CollisionHandler + 'static>(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        handler: H,
    ) -> Result<(), SceneError> {
        self.check_pair(a, b)?;
        debug!("bound collision handler to {a:?} and {b:?}");
        self.collisions.push(CollisionBinding {
            bodies: [a, b],
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Remove both bodies when they touch
    ///
    /// # Errors
    ///
    /// Fails if either body is unknown or `a == b`.
    pub fn create_destructive_collision(&mut self, a: BodyHandle, b: BodyHandle) -> Result<(), SceneError> {
        self.create_collision(a, b, Destructive)
    }

    /// Remove `b` when it touches `a`
    ///
    /// # Errors
    ///
    /// Fails if either body is unknown or `a == b`.
    pub fn create_one_sided_destructive_collision(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Result<(), SceneError> {
        self.create_collision(a, b, OneSidedDestructive)
    }

    /// Bounce `a` and `b` apart with coefficient of restitution `elasticity`
    ///
    /// # Errors
    ///
    /// Fails if either body is unknown or `a == b`.
    pub fn create_physics_collision(
        &mut self,
        elasticity: f64,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Result<(), SceneError> {
        self.create_collision(a, b, PhysicsCollision::new(elasticity))
    }

    /// Number of registered force generators
    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    /// Number of registered collision bindings
    pub fn collision_count(&self) -> usize {
        self.collisions.len()
    }

    /// Simulated time elapsed over all ticks
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current pipeline phase; [`TickPhase::Idle`] outside of `tick`
    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    /// Drop every body and binding and rewind the clock
    ///
    /// # Panics
    ///
    /// Panics when called from inside a tick.
    pub fn clear(&mut self) {
        assert_eq!(self.phase, TickPhase::Idle, "Scene::clear called during a tick");
        self.forces.clear();
        self.collisions.clear();
        self.bodies.clear();
        self.time = 0.0;
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// # Panics
    ///
    /// Panics if `dt` is negative or not finite, or if called from inside a
    /// collision handler of this scene.
    pub fn tick(&mut self, dt: f64) -> TickStats {
        assert!(dt.is_finite() && dt >= 0.0, "tick needs a finite, non-negative dt, got {dt}");
        assert_eq!(
            self.phase,
            TickPhase::Idle,
            "Scene::tick called re-entrantly"
        );

        self.phase = TickPhase::Reset;
        for (_, body) in self.bodies.iter_mut() {
            body.clear_force();
        }

        self.phase = TickPhase::Accumulate;
        let forces_applied = self.accumulate();

        self.phase = TickPhase::Integrate;
        for (_, body) in self.bodies.iter_mut() {
            if !body.is_removed() {
                body.integrate(dt);
            }
        }
        self.time += dt;

        self.phase = TickPhase::Collide;
        let collisions = self.collide();

        self.phase = TickPhase::Prune;
        let removed = self.prune();

        self.phase = TickPhase::Idle;

        let stats = TickStats {
            forces_applied,
            collisions,
            removed,
        };
        trace!("tick t={:.6}: {stats:?}", self.time);
        stats
    }

    fn accumulate(&mut self) -> usize {
        let mut applied = 0;
        for force in &self.forces {
            if force.bodies().iter().all(|&handle| self.bodies.is_active(handle)) {
                force.apply(&mut self.bodies);
                applied += 1;
            }
        }
        applied
    }

    fn collide(&mut self) -> usize {
        // Handlers get `&mut self`; keep the binding list out of reach meanwhile.
        let mut bindings = mem::take(&mut self.collisions);
        let mut invoked = 0;

        for binding in &mut bindings {
            let [a, b] = binding.bodies;
            if !(self.bodies.is_active(a) && self.bodies.is_active(b)) {
                continue;
            }
            let (Some(body_a), Some(body_b)) = (self.bodies.get(a), self.bodies.get(b)) else {
                continue;
            };

            let info = find_collision(body_a.world_shape(), body_b.world_shape());
            if !info.collided {
                continue;
            }

            trace!("collision {a:?} / {b:?} depth {:.3e}", info.depth);
            let contact = Contact {
                a,
                b,
                axis: info.axis,
                depth: info.depth,
            };
            binding.handler.on_collision(self, &contact);
            invoked += 1;
        }

        let created = mem::replace(&mut self.collisions, bindings);
        self.collisions.extend(created);
        invoked
    }

    fn prune(&mut self) -> usize {
        let bounds = self.config.world_bounds;
        for (handle, body) in self.bodies.iter_mut() {
            if body.is_removed() {
                continue;
            }
            if body.is_expired() {
                debug!("body {handle:?} expired");
                body.remove();
            } else if let Some(bounds) = bounds {
                if body.kind().traits().contains(KindTraits::CULLED) && !bounds.contains(&body.centroid()) {
                    debug!("body {handle:?} left the world at {:?}", body.centroid());
                    body.remove();
                }
            }
        }

        let removed = self.bodies.prune();
        if removed > 0 {
            let bodies = &self.bodies;
            let alive = |handles: &[BodyHandle]| handles.iter().all(|&handle| bodies.contains(handle));
            let (forces, collisions) = (self.forces.len(), self.collisions.len());

            self.forces.retain(|force| alive(force.bodies()));
            self.collisions.retain(|binding| alive(binding.bodies.as_slice()));

            debug!(
                "pruned {removed} bodies, {} forces and {} collision bindings",
                forces - self.forces.len(),
                collisions - self.collisions.len()
            );
        }
        removed
    }

    fn check_body(&self, handle: BodyHandle) -> Result<(), SceneError> {
        if self.bodies.contains(handle) {
            Ok(())
        } else {
            Err(SceneError::UnknownBody(handle))
        }
    }

    fn check_pair(&self, a: BodyHandle, b: BodyHandle) -> Result<(), SceneError> {
        self.check_body(a)?;
        self.check_body(b)?;
        if a == b {
            return Err(SceneError::SelfInteraction(a));
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("bodies", &self.bodies.len())
            .field("forces", &self.forces.len())
            .field("collisions", &self.collisions.len())
            .field("time", &self.time)
            .field("phase", &self.phase)
            .finish()
    }
}
