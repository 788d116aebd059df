use super::{body_at, EARTH_MASS, EARTH_RADIUS, G};
use crate::foundation::math::Vec2;
use crate::physics::body::{Body, BodyKind};
use crate::physics::scene::Scene;
use approx::{assert_abs_diff_eq, assert_relative_eq};

const DT: f64 = 1e-6;
const STEPS: u32 = 1_000_000;

#[test]
fn test_falling_gravity() {
    const MASS: f64 = 10.0;
    const ELEVATION: f64 = 20.0;
    const SURFACE_GRAVITY: f64 = -9.806_65;

    let mut scene = Scene::new();
    let body = scene.add_body(body_at(MASS, Vec2::new(0.0, EARTH_RADIUS + ELEVATION)));
    let earth = scene.add_body(body_at(EARTH_MASS, Vec2::zeros()));
    scene.create_newtonian_gravity(G, body, earth).unwrap();

    for i in 0..STEPS {
        let height = scene.body(body).unwrap().centroid().y - EARTH_RADIUS;
        let t = f64::from(i) * DT;
        let predicted = ELEVATION + 0.5 * SURFACE_GRAVITY * t * t;
        assert_abs_diff_eq!(height, predicted, epsilon = 1e-2);

        scene.tick(DT);
    }
}

#[test]
fn test_drag_force() {
    const MASS: f64 = 10.0;
    const GAMMA: f64 = 1.0;
    let v0 = Vec2::new(10.0, 0.0);

    let mut scene = Scene::new();
    let body = scene.add_body(body_at(MASS, Vec2::zeros()));
    scene.body_mut(body).unwrap().set_velocity(v0);
    scene.create_drag(GAMMA, body).unwrap();

    scene.tick(DT);
    for i in 1..STEPS {
        let t = f64::from(i) * DT;
        let predicted = v0.x * (-GAMMA * t / MASS).exp();
        assert_abs_diff_eq!(scene.body(body).unwrap().velocity().x, predicted, epsilon = 1e-5);

        scene.tick(DT);
    }
}

fn spring_potential(k: f64, a: &Body, b: &Body) -> f64 {
    0.5 * k * (b.centroid() - a.centroid()).magnitude_squared()
}

#[test]
fn test_spring_energy_conservation() {
    const M1: f64 = 4.5;
    const M2: f64 = 1000.0;
    const K: f64 = 0.5;

    let mut scene = Scene::new();
    let light = scene.add_body(body_at(M1, Vec2::new(10.0, 20.0)));
    let heavy = scene.add_body(body_at(M2, Vec2::zeros()));
    scene.create_spring(K, light, heavy).unwrap();

    let energy = |scene: &Scene| {
        let (a, b) = (scene.body(light).unwrap(), scene.body(heavy).unwrap());
        spring_potential(K, a, b) + a.kinetic_energy() + b.kinetic_energy()
    };

    let initial = energy(&scene);
    for _ in 0..STEPS {
        assert_relative_eq!(energy(&scene) / initial, 1.0, epsilon = 1e-4);
        scene.tick(DT);
    }
}

#[test]
fn test_spring_oscillation_period() {
    // Light mass against an anchored one: period 2π·sqrt(m/k)
    const MASS: f64 = 2.0;
    const K: f64 = 8.0;
    const DT: f64 = 1e-4;

    let mut scene = Scene::new();
    let bob = scene.add_body(body_at(MASS, Vec2::new(3.0, 0.0)));
    let anchor = scene.add_body(body_at(1.0, Vec2::zeros()).with_kind(BodyKind::Anchor));
    scene.create_spring(K, bob, anchor).unwrap();

    let period = std::f64::consts::TAU * (MASS / K).sqrt();
    let steps = (period / DT).round() as u32;
    for _ in 0..steps {
        scene.tick(DT);
    }

    assert_abs_diff_eq!(scene.body(bob).unwrap().centroid(), Vec2::new(3.0, 0.0), epsilon = 1e-3);
    assert_eq!(scene.body(anchor).unwrap().centroid(), Vec2::zeros());
}
