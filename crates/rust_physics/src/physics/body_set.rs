//! Body storage with stable handles and insertion order

use crate::foundation::collections::{BodyHandle, HandleMap};
use crate::physics::body::Body;

/// Owns every body in a scene
///
/// Handles stay valid until the body is pruned; a pruned handle is never
/// reused for another body. Iteration follows insertion order.
#[derive(Debug, Default)]
pub struct BodySet {
    bodies: HandleMap<Body>,
    order: Vec<BodyHandle>,
}

impl BodySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body at the end of the iteration order
    pub fn insert(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.insert(body);
        self.order.push(handle);
        handle
    }

    /// Body behind `handle`, including bodies flagged for removal
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Mutable body behind `handle`
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Mutable access to two distinct bodies at once
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<[&mut Body; 2]> {
        self.bodies.get_disjoint_mut([a, b])
    }

    /// Whether `handle` refers to a stored body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    /// Whether `handle` refers to a stored body that is not flagged for removal
    pub fn is_active(&self, handle: BodyHandle) -> bool {
        self.bodies.get(handle).is_some_and(|body| !body.is_removed())
    }

    /// Number of stored bodies
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set holds no bodies
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in insertion order
    pub fn handles(&self) -> &[BodyHandle] {
        &self.order
    }

    /// Handle of the `index`-th body in insertion order
    pub fn handle_at(&self, index: usize) -> Option<BodyHandle> {
        self.order.get(index).copied()
    }

    /// Bodies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.order.iter().map(|&handle| (handle, &self.bodies[handle]))
    }

    /// Mutable bodies in storage order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> + '_ {
        self.bodies.iter_mut()
    }

    /// Drop every flagged body and return how many were removed
    pub fn prune(&mut self) -> usize {
        let before = self.order.len();
        let bodies = &mut self.bodies;
        self.order.retain(|&handle| {
            let keep = !bodies[handle].is_removed();
            if !keep {
                bodies.remove(handle);
            }
            keep
        });
        before - self.order.len()
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::color::Color;
    use crate::foundation::math::Vec2;
    use crate::physics::polygon::Polygon;

    fn body_at(x: f64) -> Body {
        Body::new(
            Polygon::rectangle(1.0, 1.0).translated(Vec2::new(x, 0.0)),
            1.0,
            Color::BLACK,
        )
    }

    #[test]
    fn test_insertion_order_survives_prune() {
        let mut set = BodySet::new();
        let handles: Vec<_> = (0..5).map(|i| set.insert(body_at(f64::from(i)))).collect();

        set.get_mut(handles[1]).unwrap().remove();
        set.get_mut(handles[3]).unwrap().remove();
        assert!(!set.is_active(handles[1]));
        assert!(set.contains(handles[1]));

        assert_eq!(set.prune(), 2);
        assert_eq!(set.handles(), &[handles[0], handles[2], handles[4]]);
        assert!(set.get(handles[1]).is_none());

        let xs: Vec<f64> = set.iter().map(|(_, body)| body.centroid().x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_stale_handle_is_not_reused() {
        let mut set = BodySet::new();
        let first = set.insert(body_at(0.0));
        set.get_mut(first).unwrap().remove();
        set.prune();

        let second = set.insert(body_at(1.0));
        assert_ne!(first, second);
        assert!(set.get(first).is_none());
        assert_eq!(set.handle_at(0), Some(second));
    }

    #[test]
    fn test_pair_access() {
        let mut set = BodySet::new();
        let a = set.insert(body_at(0.0));
        let b = set.insert(body_at(3.0));

        let [first, second] = set.get_pair_mut(a, b).unwrap();
        first.add_force(Vec2::new(1.0, 0.0));
        second.add_force(Vec2::new(-1.0, 0.0));

        assert!(set.get_pair_mut(a, a).is_none());
        assert_eq!(set.get(b).unwrap().force(), Vec2::new(-1.0, 0.0));
    }
}
