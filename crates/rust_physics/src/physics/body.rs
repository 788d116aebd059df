//! Simulated bodies
//!
//! A [`Body`] keeps its shape twice: a local copy relative to its centroid
//! at angle zero, and a world copy derived from (local, centroid, angle).
//! Every mutation of centroid or angle re-derives the world copy, so the two
//! can never disagree.

use std::any::Any;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::math::{Vec2, Vec2Ext};
use crate::physics::polygon::Polygon;

bitflags! {
    /// Per-kind behaviour switches consulted by the scene pipeline
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindTraits: u8 {
        /// Accumulated forces and impulses change the velocity
        const DYNAMIC = 1 << 0;
        /// Velocity and angular velocity advance centroid and angle
        const MOVING = 1 << 1;
        /// Removed once the centroid leaves the configured world bounds
        const CULLED = 1 << 2;
        /// Positioned by the driver (e.g. pointer input) rather than by forces
        const EXTERNALLY_DRIVEN = 1 << 3;
    }
}

/// Closed set of body kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// Free body moved by forces, culled when it leaves the world
    #[default]
    Ordinary,
    /// Body driven by player input; ignores forces
    Player,
    /// Immovable body, e.g. a gravity well or the ground
    Anchor,
    /// Short-lived visual effect; moves kinematically and usually expires
    Effect,
}

impl BodyKind {
    /// The behaviour table for this kind
    pub const fn traits(self) -> KindTraits {
        match self {
            Self::Ordinary => KindTraits::DYNAMIC
                .union(KindTraits::MOVING)
                .union(KindTraits::CULLED),
            Self::Player => KindTraits::MOVING.union(KindTraits::EXTERNALLY_DRIVEN),
            Self::Anchor => KindTraits::empty(),
            Self::Effect => KindTraits::MOVING,
        }
    }

    /// Whether forces and impulses affect bodies of this kind
    pub const fn is_dynamic(self) -> bool {
        self.traits().contains(KindTraits::DYNAMIC)
    }
}

/// A rigid shape with mass, kinematic state and metadata
pub struct Body {
    local: Polygon,
    world: Polygon,
    centroid: Vec2,
    angle: f64,
    velocity: Vec2,
    angular_velocity: f64,
    mass: f64,
    force: Vec2,
    impulse: Vec2,
    kind: BodyKind,
    color: Color,
    asset: Option<String>,
    radius_hint: f64,
    lifetime: Option<f64>,
    info: Option<Box<dyn Any>>,
    removed: bool,
}

impl Body {
    /// Create a body from a shape, mass and color
    ///
    /// The centroid is the area centroid of `shape` and the angle starts at
    /// zero, so the world shape equals `shape`. The radius hint defaults to
    /// the distance from the centroid to the farthest vertex.
    ///
    /// # Panics
    ///
    /// Panics if `mass` is not finite and positive, or if `shape` has zero area.
    pub fn new(shape: Polygon, mass: f64, color: Color) -> Self {
        assert!(
            mass.is_finite() && mass > 0.0,
            "body mass must be finite and positive, got {mass}"
        );

        let centroid = shape.centroid();
        let radius_hint = shape.radius_about(centroid);
        let local = shape.translated(-centroid);

        Self {
            local,
            world: shape,
            centroid,
            angle: 0.0,
            velocity: Vec2::zeros(),
            angular_velocity: 0.0,
            mass,
            force: Vec2::zeros(),
            impulse: Vec2::zeros(),
            kind: BodyKind::Ordinary,
            color,
            asset: None,
            radius_hint,
            lifetime: None,
            info: None,
            removed: false,
        }
    }

    /// Set the body kind
    #[must_use]
    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attach an external asset reference (e.g. an image path); never interpreted
    #[must_use]
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Override the radius hint used by renderers to size sprites
    #[must_use]
    pub fn with_radius_hint(mut self, radius: f64) -> Self {
        self.radius_hint = radius;
        self
    }

    /// Set the initial angular velocity (radians per second)
    #[must_use]
    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Attach opaque auxiliary data owned by the body
    #[must_use]
    pub fn with_info<T: Any>(mut self, info: T) -> Self {
        self.info = Some(Box::new(info));
        self
    }

    /// Flag the body for removal after `seconds` of simulated time
    #[must_use]
    pub fn with_lifetime(mut self, seconds: f64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    /// Snapshot of the world-space shape
    pub fn shape(&self) -> Polygon {
        self.world.clone()
    }

    /// Borrow the world-space shape
    pub fn world_shape(&self) -> &Polygon {
        &self.world
    }

    /// Borrow the centroid-relative shape at angle zero
    pub fn local_shape(&self) -> &Polygon {
        &self.local
    }

    /// Centroid in world space
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Move the body so its centroid is at `centroid`
    pub fn set_centroid(&mut self, centroid: Vec2) {
        self.centroid = centroid;
        self.rebuild_world();
    }

    /// Orientation in radians
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Rotate the body about its centroid to the absolute angle `angle`
    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
        self.rebuild_world();
    }

    /// Declare the current world shape to be at `angle` without rotating it
    ///
    /// Used when a caller builds an already-rotated shape (a slice cut at
    /// some angle, say) and wants later rotation to continue from there.
    pub fn set_initial_angle(&mut self, angle: f64) {
        self.local = self.world.translated(-self.centroid);
        self.local.rotate(-angle, Vec2::zeros());
        self.angle = angle;
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set the linear velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Angular velocity in radians per second
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Set the angular velocity
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    /// Mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// `1 / mass` for dynamic kinds, 0 for kinds that ignore forces
    pub fn inverse_mass(&self) -> f64 {
        if self.kind.is_dynamic() {
            self.mass.recip()
        } else {
            0.0
        }
    }

    /// Body kind
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Change the body kind
    pub fn set_kind(&mut self, kind: BodyKind) {
        self.kind = kind;
    }

    /// Display color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Change the display color
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// External asset reference, if any
    pub fn asset(&self) -> Option<&str> {
        self.asset.as_deref()
    }

    /// Radius hint for renderers
    pub fn radius_hint(&self) -> f64 {
        self.radius_hint
    }

    /// Remaining lifetime in seconds, if the body expires
    pub fn lifetime(&self) -> Option<f64> {
        self.lifetime
    }

    /// Auxiliary data, if present and of type `T`
    pub fn info<T: Any>(&self) -> Option<&T> {
        self.info.as_ref()?.downcast_ref()
    }

    /// Mutable auxiliary data, if present and of type `T`
    pub fn info_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.info.as_mut()?.downcast_mut()
    }

    /// Force accumulated so far this tick
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Add to the force accumulator; cleared at the start of every tick
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Impulse waiting to be applied
    pub fn impulse(&self) -> Vec2 {
        self.impulse
    }

    /// Queue an impulse; applied and cleared by the next integration step
    pub fn add_impulse(&mut self, impulse: Vec2) {
        self.impulse += impulse;
    }

    /// Flag the body for removal at the end of the current (or next) tick
    pub fn remove(&mut self) {
        self.removed = true;
    }

    /// Whether the body is flagged for removal
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Kinetic energy `½ m |v|²`
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub(crate) fn clear_force(&mut self) {
        self.force = Vec2::zeros();
    }

    /// Semi-implicit Euler step: velocity first, then position from the new velocity
    pub(crate) fn integrate(&mut self, dt: f64) {
        let traits = self.kind.traits();

        if traits.contains(KindTraits::DYNAMIC) {
            self.velocity += (self.force * dt + self.impulse) / self.mass;
        }
        self.impulse = Vec2::zeros();

        if traits.contains(KindTraits::MOVING) {
            self.centroid += self.velocity * dt;
            self.angle += self.angular_velocity * dt;
            self.rebuild_world();
        }

        if let Some(remaining) = self.lifetime.as_mut() {
            *remaining -= dt;
        }
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.lifetime.is_some_and(|remaining| remaining <= 0.0)
    }

    fn rebuild_world(&mut self) {
        for (world, local) in self.world.vertices_mut().iter_mut().zip(self.local.vertices()) {
            *world = local.rotated(self.angle) + self.centroid;
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("kind", &self.kind)
            .field("centroid", &self.centroid)
            .field("velocity", &self.velocity)
            .field("angle", &self.angle)
            .field("mass", &self.mass)
            .field("vertices", &self.world.len())
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const EPSILON: f64 = 1e-12;

    fn unit_square() -> Body {
        Body::new(Polygon::rectangle(2.0, 2.0), 10.0, Color::BLACK)
    }

    #[test]
    fn test_new_body_centroid_from_shape() {
        let body = Body::new(
            Polygon::rectangle(2.0, 2.0).translated(Vec2::new(3.0, 4.0)),
            1.0,
            Color::BLACK,
        );
        assert_relative_eq!(body.centroid(), Vec2::new(3.0, 4.0), epsilon = EPSILON);
        assert_abs_diff_eq!(body.local_shape().centroid(), Vec2::zeros(), epsilon = EPSILON);
        assert_eq!(body.shape(), *body.world_shape());
        assert_relative_eq!(body.radius_hint(), 2.0_f64.sqrt(), epsilon = EPSILON);
    }

    #[test]
    #[should_panic(expected = "mass must be finite and positive")]
    fn test_zero_mass_panics() {
        let _ = Body::new(Polygon::rectangle(1.0, 1.0), 0.0, Color::BLACK);
    }

    #[test]
    fn test_set_centroid_moves_world_shape() {
        let mut body = unit_square();
        body.set_centroid(Vec2::new(10.0, -5.0));

        assert_relative_eq!(body.world_shape().centroid(), Vec2::new(10.0, -5.0), epsilon = 1e-9);
        let (min, max) = body.world_shape().bounds();
        assert_relative_eq!(min, Vec2::new(9.0, -6.0), epsilon = EPSILON);
        assert_relative_eq!(max, Vec2::new(11.0, -4.0), epsilon = EPSILON);
    }

    #[test]
    fn test_set_angle_rotates_about_centroid() {
        let mut body = Body::new(Polygon::rectangle(4.0, 2.0), 1.0, Color::BLACK);
        body.set_centroid(Vec2::new(1.0, 1.0));
        body.set_angle(HALF_PI);

        let (min, max) = body.world_shape().bounds();
        assert_abs_diff_eq!(min, Vec2::new(0.0, -1.0), epsilon = 1e-9);
        assert_abs_diff_eq!(max, Vec2::new(2.0, 3.0), epsilon = 1e-9);
        assert_abs_diff_eq!(body.world_shape().centroid(), Vec2::new(1.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_set_initial_angle_keeps_world_shape() {
        let mut body = Body::new(Polygon::rectangle(4.0, 2.0), 1.0, Color::BLACK);
        let before = body.shape();
        body.set_initial_angle(0.7);

        for (a, b) in body.world_shape().vertices().iter().zip(before.vertices()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }

        // Rotating back to zero undoes the declared orientation
        body.set_angle(0.0);
        let expected = before.rotated(-0.7, Vec2::zeros());
        for (a, b) in body.world_shape().vertices().iter().zip(expected.vertices()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_integrate_is_semi_implicit() {
        let mut body = unit_square();
        body.add_force(Vec2::new(20.0, 0.0));
        body.integrate(0.5);

        // v = F/m * dt = 1.0, then x = v * dt = 0.5
        assert_relative_eq!(body.velocity(), Vec2::new(1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(body.centroid(), Vec2::new(0.5, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_impulse_is_consumed_once() {
        let mut body = unit_square();
        body.add_impulse(Vec2::new(0.0, 5.0));
        body.integrate(0.1);
        assert_relative_eq!(body.velocity(), Vec2::new(0.0, 0.5), epsilon = EPSILON);
        assert_eq!(body.impulse(), Vec2::zeros());

        body.integrate(0.1);
        assert_relative_eq!(body.velocity(), Vec2::new(0.0, 0.5), epsilon = EPSILON);
    }

    #[test]
    fn test_anchor_ignores_forces() {
        let mut anchor = unit_square().with_kind(BodyKind::Anchor);
        anchor.set_velocity(Vec2::new(1.0, 0.0));
        anchor.add_force(Vec2::new(1e9, 0.0));
        anchor.integrate(1.0);

        assert_eq!(anchor.centroid(), Vec2::zeros());
        assert_eq!(anchor.velocity(), Vec2::new(1.0, 0.0));
        assert_eq!(anchor.inverse_mass(), 0.0);
    }

    #[test]
    fn test_player_moves_but_ignores_forces() {
        let mut player = unit_square().with_kind(BodyKind::Player);
        player.set_velocity(Vec2::new(2.0, 0.0));
        player.add_force(Vec2::new(0.0, -100.0));
        player.integrate(0.5);

        assert_relative_eq!(player.centroid(), Vec2::new(1.0, 0.0), epsilon = EPSILON);
        assert!(player.kind().traits().contains(KindTraits::EXTERNALLY_DRIVEN));
    }

    #[test]
    fn test_angular_velocity_advances_angle() {
        let mut body = unit_square().with_angular_velocity(2.0);
        body.integrate(0.25);
        assert_relative_eq!(body.angle(), 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(body.world_shape().centroid(), Vec2::zeros(), epsilon = 1e-9);
    }

    #[test]
    fn test_lifetime_expires() {
        let mut effect = unit_square().with_kind(BodyKind::Effect).with_lifetime(0.3);
        assert_eq!(unit_square().lifetime(), None);
        effect.integrate(0.2);
        assert_relative_eq!(effect.lifetime().unwrap(), 0.1, epsilon = EPSILON);
        assert!(!effect.is_expired());
        effect.integrate(0.2);
        assert!(effect.is_expired());
    }

    #[test]
    fn test_info_downcast() {
        #[derive(Debug, PartialEq)]
        struct Score(u32);

        let mut body = unit_square().with_info(Score(3));
        assert_eq!(body.info::<Score>(), Some(&Score(3)));
        assert!(body.info::<String>().is_none());

        body.info_mut::<Score>().unwrap().0 += 1;
        assert_eq!(body.info::<Score>(), Some(&Score(4)));
    }

    #[test]
    fn test_kind_decision_table() {
        assert_eq!(
            BodyKind::Ordinary.traits(),
            KindTraits::DYNAMIC | KindTraits::MOVING | KindTraits::CULLED
        );
        assert!(BodyKind::Anchor.traits().is_empty());
        assert!(!BodyKind::Effect.is_dynamic());
        assert!(!BodyKind::Player.traits().contains(KindTraits::CULLED));
    }

    #[test]
    fn test_remove_only_flags() {
        let mut body = unit_square();
        body.remove();
        assert!(body.is_removed());
        assert_eq!(body.centroid(), Vec2::zeros());
    }
}
