//! Force generators
//!
//! A force generator is bound to a fixed list of bodies and, once per tick,
//! adds its contribution to their force accumulators. The scene only calls a
//! generator while every body it is bound to is still active, and drops the
//! generator when any of them is pruned.

use std::cell::Cell;

use crate::config::DEFAULT_MIN_GRAVITY_DISTANCE;
use crate::foundation::collections::BodyHandle;
use crate::foundation::logging::warn;
use crate::foundation::math::Vec2Ext;
use crate::physics::body_set::BodySet;

/// A force bound to one or more bodies
pub trait ForceGenerator {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// The bodies this generator acts on
    fn bodies(&self) -> &[BodyHandle];

    /// Add this tick's contribution to the bound bodies' force accumulators
    fn apply(&self, bodies: &mut BodySet);
}

/// Inverse-square attraction between two bodies
///
/// Magnitude `G·m₁·m₂ / r²` where `r` is the centroid separation, applied
/// equal and opposite along the line between the centroids.
#[derive(Debug)]
pub struct NewtonianGravity {
    bodies: [BodyHandle; 2],
    constant: f64,
    min_distance: f64,
    warned: Cell<bool>,
}

impl NewtonianGravity {
    /// Bind gravity with constant `constant` between `a` and `b`
    pub fn new(constant: f64, a: BodyHandle, b: BodyHandle) -> Self {
        Self {
            bodies: [a, b],
            constant,
            min_distance: DEFAULT_MIN_GRAVITY_DISTANCE,
            warned: Cell::new(false),
        }
    }

    /// Skip the force while the centroids are closer than `min_distance`
    #[must_use]
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// The gravitational constant
    pub fn constant(&self) -> f64 {
        self.constant
    }
}

impl ForceGenerator for NewtonianGravity {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    fn apply(&self, bodies: &mut BodySet) {
        let [a, b] = self.bodies;
        let Some([body_a, body_b]) = bodies.get_pair_mut(a, b) else {
            return;
        };

        let offset = body_b.centroid() - body_a.centroid();
        let distance = offset.magnitude();
        if distance < self.min_distance {
            // r → 0 would blow up the force; sit this tick out
            if !self.warned.replace(true) {
                warn!(
                    "gravity skipped: centroid separation {distance:e} below {:e}",
                    self.min_distance
                );
            }
            return;
        }

        let magnitude = self.constant * body_a.mass() * body_b.mass() / (distance * distance);
        let force = offset.unit_or_zero() * magnitude;
        body_a.add_force(force);
        body_b.add_force(-force);
    }
}

/// Zero-rest-length linear spring between two bodies
///
/// The force on `a` is `k·(c_b − c_a)` and `b` receives the opposite.
#[derive(Debug)]
pub struct Spring {
    bodies: [BodyHandle; 2],
    stiffness: f64,
}

impl Spring {
    /// Bind a spring of stiffness `stiffness` between `a` and `b`
    pub const fn new(stiffness: f64, a: BodyHandle, b: BodyHandle) -> Self {
        Self {
            bodies: [a, b],
            stiffness,
        }
    }

    /// Spring constant
    pub const fn stiffness(&self) -> f64 {
        self.stiffness
    }
}

impl ForceGenerator for Spring {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    fn apply(&self, bodies: &mut BodySet) {
        let [a, b] = self.bodies;
        let Some([body_a, body_b]) = bodies.get_pair_mut(a, b) else {
            return;
        };

        let force = (body_b.centroid() - body_a.centroid()) * self.stiffness;
        body_a.add_force(force);
        body_b.add_force(-force);
    }
}

/// Linear drag `−γ·v` on a single body
#[derive(Debug)]
pub struct Drag {
    body: [BodyHandle; 1],
    gamma: f64,
}

impl Drag {
    /// Bind drag with coefficient `gamma` to `body`
    pub const fn new(gamma: f64, body: BodyHandle) -> Self {
        Self { body: [body], gamma }
    }

    /// Drag coefficient
    pub const fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl ForceGenerator for Drag {
    fn name(&self) -> &'static str {
        "drag"
    }

    fn bodies(&self) -> &[BodyHandle] {
        &self.body
    }

    fn apply(&self, bodies: &mut BodySet) {
        if let Some(body) = bodies.get_mut(self.body[0]) {
            let force = -body.velocity() * self.gamma;
            body.add_force(force);
        }
    }
}
