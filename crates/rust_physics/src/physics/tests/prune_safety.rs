use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::body_at;
use crate::foundation::collections::BodyHandle;
use crate::foundation::color::Color;
use crate::foundation::math::Vec2;
use crate::physics::body::{Body, BodyKind};
use crate::physics::handlers::{CollisionHandler, Contact};
use crate::physics::polygon::Polygon;
use crate::physics::scene::Scene;

#[test]
fn test_handler_removes_own_body() {
    let mut scene = Scene::new();
    let a = scene.add_body(body_at(1.0, Vec2::zeros()));
    let b = scene.add_body(body_at(1.0, Vec2::new(1.5, 0.0)));
    let c = scene.add_body(body_at(1.0, Vec2::new(-1.5, 0.0)));
    let far = scene.add_body(body_at(1.0, Vec2::new(40.0, 0.0)));

    scene
        .create_collision(a, b, |scene: &mut Scene, contact: &Contact| {
            scene.remove_body(contact.a);
        })
        .unwrap();

    // Later binding on the removed body must not fire in the same tick
    let late_hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&late_hits);
    scene
        .create_collision(a, c, move |_: &mut Scene, _: &Contact| {
            counter.set(counter.get() + 1);
        })
        .unwrap();

    scene.create_newtonian_gravity(1.0, a, far).unwrap();
    scene.create_spring(1.0, b, c).unwrap();
    scene.create_drag(0.5, a).unwrap();

    let stats = scene.tick(1e-3);

    assert_eq!(stats.collisions, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(late_hits.get(), 0);
    assert!(scene.body(a).is_none());
    assert_eq!(scene.handles(), &[b, c, far]);
    assert_eq!(scene.force_count(), 1);
    assert_eq!(scene.collision_count(), 0);

    // The scene keeps running normally afterwards
    for _ in 0..10 {
        scene.tick(1e-3);
    }
    assert_eq!(scene.body_count(), 3);
}

#[test]
fn test_mutual_removal_in_one_tick() {
    let mut scene = Scene::new();
    let a = scene.add_body(body_at(1.0, Vec2::zeros()));
    let b = scene.add_body(body_at(1.0, Vec2::new(1.0, 1.0)));
    let c = scene.add_body(body_at(1.0, Vec2::new(-0.5, 1.0)));

    scene.create_destructive_collision(a, b).unwrap();
    scene.create_destructive_collision(b, c).unwrap();
    scene.create_destructive_collision(a, c).unwrap();

    let stats = scene.tick(0.0);

    // Only the first binding fires; the others reference flagged bodies
    assert_eq!(stats.collisions, 1);
    assert_eq!(stats.removed, 2);
    assert_eq!(scene.handles(), &[c]);
    assert_eq!(scene.collision_count(), 0);
}

/// Splits the struck body into fragments the way an asteroid breaks apart
struct Splitter {
    fragments: Rc<RefCell<Vec<BodyHandle>>>,
}

impl CollisionHandler for Splitter {
    fn on_collision(&mut self, scene: &mut Scene, contact: &Contact) {
        let Some(target) = scene.body(contact.b) else {
            return;
        };
        let origin = target.centroid();
        scene.remove_body(contact.a);
        scene.remove_body(contact.b);

        for i in 0..3 {
            let offset = Vec2::new(f64::from(i) * 3.0 - 3.0, 10.0);
            let fragment = Body::new(
                Polygon::regular(5, 0.5).translated(origin + offset),
                0.5,
                Color::GRAY,
            );
            let handle = scene.add_body(fragment);
            scene.create_drag(0.1, handle).expect("fragment exists");
            self.fragments.borrow_mut().push(handle);
        }

        // Spark that expires on its own
        let spark = Body::new(Polygon::regular(4, 0.1).translated(origin), 0.01, Color::WHITE)
            .with_kind(BodyKind::Effect)
            .with_lifetime(0.05);
        scene.add_body(spark);
    }
}

#[test]
fn test_handler_spawns_bodies_and_bindings() {
    let mut scene = Scene::new();
    let bullet = scene.add_body(body_at(0.1, Vec2::zeros()));
    let rock = scene.add_body(body_at(5.0, Vec2::new(1.0, 0.0)));
    let fragments = Rc::new(RefCell::new(Vec::new()));
    scene
        .create_collision(
            bullet,
            rock,
            Splitter {
                fragments: Rc::clone(&fragments),
            },
        )
        .unwrap();

    let stats = scene.tick(0.01);
    assert_eq!(stats.collisions, 1);
    assert_eq!(stats.removed, 2);
    assert_eq!(scene.body_count(), 4);
    assert_eq!(scene.collision_count(), 0);
    assert_eq!(scene.force_count(), 3);

    // Fragments are integrated and receive forces from the next tick on
    let spawned = fragments.borrow().clone();
    let before = scene.body(spawned[0]).unwrap().centroid();
    scene.body_mut(spawned[0]).unwrap().set_velocity(Vec2::new(1.0, 0.0));
    let stats = scene.tick(0.01);
    assert_eq!(stats.forces_applied, 3);
    assert!(scene.body(spawned[0]).unwrap().centroid().x > before.x);

    // The spark expires a few ticks later
    for _ in 0..10 {
        scene.tick(0.01);
    }
    assert_eq!(scene.body_count(), 3);
}

#[test]
fn test_handler_creates_collision_binding() {
    let mut scene = Scene::new();
    let a = scene.add_body(body_at(1.0, Vec2::zeros()));
    let b = scene.add_body(body_at(1.0, Vec2::new(1.0, 0.0)));
    let c = scene.add_body(body_at(1.0, Vec2::new(0.0, 1.0)));

    let armed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&armed);
    scene
        .create_collision(a, b, move |scene: &mut Scene, contact: &Contact| {
            if !flag.replace(true) {
                scene.create_destructive_collision(contact.a, c).unwrap();
            }
        })
        .unwrap();

    // The new binding is registered but not evaluated during the tick that created it
    let first = scene.tick(0.0);
    assert_eq!(first.collisions, 1);
    assert_eq!(first.removed, 0);
    assert_eq!(scene.collision_count(), 2);

    let second = scene.tick(0.0);
    assert_eq!(second.collisions, 2);
    assert_eq!(second.removed, 2);
    assert_eq!(scene.handles(), &[b]);
    assert_eq!(scene.collision_count(), 0);
}
