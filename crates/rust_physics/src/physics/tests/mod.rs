//! Scenario tests that drive whole scenes through many ticks

mod force_laws;
mod prune_safety;

use crate::foundation::color::Color;
use crate::foundation::math::Vec2;
use crate::physics::body::Body;
use crate::physics::polygon::Polygon;

const G: f64 = 6.674_301_5e-11;
const EARTH_MASS: f64 = 5.972_19e24;
const EARTH_RADIUS: f64 = 6_378_137.0;

/// The ±1 square used by every scenario
fn make_shape() -> Polygon {
    Polygon::new(vec![
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-1.0, 1.0),
    ])
}

fn body_at(mass: f64, centroid: Vec2) -> Body {
    let mut body = Body::new(make_shape(), mass, Color::BLACK);
    body.set_centroid(centroid);
    body
}
