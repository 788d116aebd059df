//! Separating Axis Theorem collision detection
//!
//! Two convex polygons are disjoint exactly when some edge normal of one of
//! them separates their projections. [`find_collision`] tests every edge
//! normal of both shapes and, when none separates them, reports the axis of
//! minimum overlap as the collision axis.

use crate::foundation::math::{Vec2, Vec2Ext};
use crate::physics::polygon::{Polygon, MIN_VERTICES};

/// Result of a collision test between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Whether the two shapes are colliding
    pub collided: bool,
    /// Unit axis of minimum overlap, pointing from the first shape towards
    /// the second. Zero when the shapes do not collide.
    pub axis: Vec2,
    /// Overlap of the projections along `axis` (0 when not colliding)
    pub depth: f64,
}

impl CollisionInfo {
    /// A negative result
    pub fn none() -> Self {
        Self {
            collided: false,
            axis: Vec2::zeros(),
            depth: 0.0,
        }
    }
}

// Project every vertex onto `axis` and return the covered interval
fn project(shape: &Polygon, axis: &Vec2) -> (f64, f64) {
    shape.vertices().iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        let p = v.dot(axis);
        (min.min(p), max.max(p))
    })
}

// Length of the intersection of two intervals; zero or negative when disjoint
fn overlap((min1, max1): (f64, f64), (min2, max2): (f64, f64)) -> f64 {
    max1.min(max2) - min1.max(min2)
}

/// Computes the collision status of two convex polygons
///
/// Candidate axes are the normalized edge normals of `shape1` followed by
/// those of `shape2`, each in vertex order starting with the edge from the
/// first to the second vertex. The test stops at the first axis whose
/// projections overlap by zero or less; touching shapes do not collide.
///
/// When every axis overlaps, the reported axis is the one with the smallest
/// overlap. Ties keep the earliest axis in enumeration order. The axis is
/// flipped if needed so it points from `shape1`'s centroid towards
/// `shape2`'s, ready to be used as an impulse direction.
///
/// Winding does not matter; clockwise shapes are accepted.
///
/// # Panics
///
/// Panics if either shape has fewer than three vertices.
pub fn find_collision(shape1: &Polygon, shape2: &Polygon) -> CollisionInfo {
    assert!(
        shape1.len() >= MIN_VERTICES && shape2.len() >= MIN_VERTICES,
        "collision shapes need at least {MIN_VERTICES} vertices"
    );

    let mut best: Option<(f64, Vec2)> = None;

    for (start, end) in shape1.edges().chain(shape2.edges()) {
        let axis = (end - start).perpendicular().unit_or_zero();
        if axis == Vec2::zeros() {
            // Repeated vertex, no edge to test
            continue;
        }

        let depth = overlap(project(shape1, &axis), project(shape2, &axis));
        if depth <= 0.0 {
            return CollisionInfo::none();
        }

        if best.map_or(true, |(min_depth, _)| depth < min_depth) {
            best = Some((depth, axis));
        }
    }

    let Some((depth, mut axis)) = best else {
        return CollisionInfo::none();
    };

    let towards_second = shape2.centroid() - shape1.centroid();
    if axis.dot(&towards_second) < 0.0 {
        axis = -axis;
    }

    CollisionInfo {
        collided: true,
        axis,
        depth,
    }
}

/// Convenience wrapper returning only whether the shapes overlap
pub fn shapes_collide(shape1: &Polygon, shape2: &Polygon) -> bool {
    find_collision(shape1, shape2).collided
}
