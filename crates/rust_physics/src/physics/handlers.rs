//! Collision handlers
//!
//! A handler is bound to an ordered pair of bodies and runs once per tick
//! while their shapes overlap. It receives the whole scene, so it can flag
//! bodies for removal, spawn new ones, bind new forces or queue impulses.
//! Removals take effect in the prune phase at the end of the tick.
//!
//! State a handler needs lives inside the handler value itself and is
//! dropped together with the binding.

use crate::foundation::collections::BodyHandle;
use crate::foundation::logging::debug;
use crate::foundation::math::Vec2;
use crate::physics::scene::Scene;

/// A detected overlap between two bound bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// First body of the binding
    pub a: BodyHandle,
    /// Second body of the binding
    pub b: BodyHandle,
    /// Unit axis of minimum overlap, pointing from `a` towards `b`
    pub axis: Vec2,
    /// Penetration depth along `axis`
    pub depth: f64,
}

/// Response to a collision between two bound bodies
pub trait CollisionHandler {
    /// Called during the collide phase while the two bodies overlap
    fn on_collision(&mut self, scene: &mut Scene, contact: &Contact);
}

impl<F> CollisionHandler for F
where
    F: FnMut(&mut Scene, &Contact),
{
    fn on_collision(&mut self, scene: &mut Scene, contact: &Contact) {
        self(scene, contact);
    }
}

/// Removes both bodies on contact
#[derive(Debug, Clone, Copy, Default)]
pub struct Destructive;

impl CollisionHandler for Destructive {
    fn on_collision(&mut self, scene: &mut Scene, contact: &Contact) {
        debug!("destructive collision removes {:?} and {:?}", contact.a, contact.b);
        scene.remove_body(contact.a);
        scene.remove_body(contact.b);
    }
}

/// Removes only the second body on contact, e.g. a bullet hitting a wall
#[derive(Debug, Clone, Copy, Default)]
pub struct OneSidedDestructive;

impl CollisionHandler for OneSidedDestructive {
    fn on_collision(&mut self, scene: &mut Scene, contact: &Contact) {
        debug!("one-sided collision removes {:?}", contact.b);
        scene.remove_body(contact.b);
    }
}

/// Bounces the bodies apart with a coefficient of restitution
///
/// The impulse is `J = μ(1 + C)(u_b − u_a)` along the contact axis, where `μ`
/// is the reduced mass and `u` the velocity component along the axis.
/// Bodies that ignore forces count as infinitely heavy. Bodies that are
/// already separating are left alone, so a contact that lasts several ticks
/// bounces once. The impulses are queued and take effect in the next
/// integration step.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsCollision {
    elasticity: f64,
}

impl PhysicsCollision {
    /// Create a handler with coefficient of restitution `elasticity` (0 inelastic, 1 elastic)
    pub const fn new(elasticity: f64) -> Self {
        Self { elasticity }
    }

    /// Coefficient of restitution
    pub const fn elasticity(&self) -> f64 {
        self.elasticity
    }

    /// Impulse to add to `a` (and subtract from `b`), or `None` when no bounce is due
    fn impulse(&self, scene: &Scene, contact: &Contact) -> Option<Vec2> {
        let body_a = scene.body(contact.a)?;
        let body_b = scene.body(contact.b)?;

        let inverse_sum = body_a.inverse_mass() + body_b.inverse_mass();
        if inverse_sum <= 0.0 {
            return None;
        }

        let u_a = body_a.velocity().dot(&contact.axis);
        let u_b = body_b.velocity().dot(&contact.axis);
        let closing = u_b - u_a;
        if closing >= 0.0 {
            return None;
        }

        let reduced_mass = inverse_sum.recip();
        Some(contact.axis * (reduced_mass * (1.0 + self.elasticity) * closing))
    }
}

impl CollisionHandler for PhysicsCollision {
    fn on_collision(&mut self, scene: &mut Scene, contact: &Contact) {
        let Some(impulse) = self.impulse(scene, contact) else {
            return;
        };

        if let Some(body) = scene.body_mut(contact.a) {
            body.add_impulse(impulse);
        }
        if let Some(body) = scene.body_mut(contact.b) {
            body.add_impulse(-impulse);
        }
    }
}
