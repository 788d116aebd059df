//! Ordered-vertex polygons
//!
//! A [`Polygon`] is a closed ring of vertices: consecutive vertices form an
//! edge and the last vertex connects back to the first. Constructors produce
//! counter-clockwise rings, so [`Polygon::area`] is positive for them under
//! the y-up convention used throughout the kernel.
//!
//! A polygon does not know which frame it lives in. Bodies keep a local
//! (centroid-relative) copy and a world copy; callers must not mix the two
//! without translating.

use crate::foundation::math::{Vec2, Vec2Ext};
use thiserror::Error;

/// Minimum vertex count for any polygon
pub const MIN_VERTICES: usize = 3;

/// Geometry construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Fewer than three vertices were supplied
    #[error("polygon needs at least {MIN_VERTICES} vertices, got {0}")]
    TooFewVertices(usize),

    /// The vertices enclose no area, so there is no centroid
    #[error("polygon has zero area")]
    ZeroArea,
}

/// A closed polygon stored as an ordered list of vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    /// Create a polygon from its vertices
    ///
    /// # Panics
    ///
    /// Panics if fewer than three vertices are given. Use
    /// [`Polygon::try_from`] for untrusted input.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        match Self::try_from(vertices) {
            Ok(polygon) => polygon,
            Err(e) => panic!("degenerate polygon: {e}"),
        }
    }

    /// Axis-aligned rectangle centered on the origin
    pub fn rectangle(width: f64, height: f64) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`
    ///
    /// The first vertex sits on the positive x axis. With enough sides this
    /// is the kernel's stand-in for a circle.
    pub fn regular(sides: usize, radius: f64) -> Self {
        let step = std::f64::consts::TAU / sides as f64;
        Self::new(
            (0..sides)
                .map(|i| Vec2::from_polar(radius, step * i as f64))
                .collect(),
        )
    }

    /// Circular arc of `points` vertices sweeping `sweep` radians from the
    /// positive x axis, closed by the chord back to the first vertex
    ///
    /// `arc(r, PI, n)` is a half-disc whose flat side lies on the x axis.
    pub fn arc(radius: f64, sweep: f64, points: usize) -> Self {
        let step = sweep / points.saturating_sub(1).max(1) as f64;
        Self::new(
            (0..points)
                .map(|i| Vec2::from_polar(radius, step * i as f64))
                .collect(),
        )
    }

    /// The vertices in ring order
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Mutable access to the vertices; the count cannot change
    pub fn vertices_mut(&mut self) -> &mut [Vec2] {
        &mut self.vertices
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; a polygon has at least three vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Consume the polygon and return its vertices
    pub fn into_vertices(self) -> Vec<Vec2> {
        self.vertices
    }

    /// Iterate edges as `(start, end)` pairs, closing the ring last → first
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Signed shoelace area; positive for counter-clockwise winding
    pub fn area(&self) -> f64 {
        0.5 * self.edges().map(|(a, b)| a.cross_z(&b)).sum::<f64>()
    }

    /// Area centroid via the signed shoelace formula
    ///
    /// # Panics
    ///
    /// Panics when the polygon has zero area (collinear or repeated
    /// vertices). Use [`Polygon::try_centroid`] for untrusted input.
    pub fn centroid(&self) -> Vec2 {
        match self.try_centroid() {
            Ok(centroid) => centroid,
            Err(_) => panic!("centroid of a zero-area polygon is undefined: {:?}", self.vertices),
        }
    }

    /// Area centroid, or [`GeometryError::ZeroArea`] when the polygon is too
    /// thin relative to its extent to have one
    ///
    /// Non-finite vertices also count as zero area.
    pub fn try_centroid(&self) -> Result<Vec2, GeometryError> {
        // Accumulate relative to the first vertex to keep precision far from the origin
        let origin = self.vertices[0];
        let mut twice_area = 0.0;
        let mut sum = Vec2::zeros();
        for (a, b) in self.edges() {
            let (a, b) = (a - origin, b - origin);
            let cross = a.cross_z(&b);
            twice_area += cross;
            sum += (a + b) * cross;
        }
        if twice_area.abs() > f64::EPSILON * self.scale_hint() {
            Ok(origin + sum / (3.0 * twice_area))
        } else {
            Err(GeometryError::ZeroArea)
        }
    }

    /// True when [`Polygon::try_centroid`] would fail
    pub fn is_degenerate(&self) -> bool {
        self.try_centroid().is_err()
    }

    /// Shift every vertex by `offset`
    pub fn translate(&mut self, offset: Vec2) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// A copy shifted by `offset`
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        let mut copy = self.clone();
        copy.translate(offset);
        copy
    }

    /// Rotate every vertex about `pivot` by `angle` radians (counter-clockwise positive)
    pub fn rotate(&mut self, angle: f64, pivot: Vec2) {
        let (sin, cos) = angle.sin_cos();
        for vertex in &mut self.vertices {
            let d = *vertex - pivot;
            *vertex = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + pivot;
        }
    }

    /// A copy rotated about `pivot`
    #[must_use]
    pub fn rotated(&self, angle: f64, pivot: Vec2) -> Self {
        let mut copy = self.clone();
        copy.rotate(angle, pivot);
        copy
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let first = self.vertices[0];
        self.vertices.iter().skip(1).fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        })
    }

    /// Largest distance from `origin` to any vertex
    pub fn radius_about(&self, origin: Vec2) -> f64 {
        self.vertices
            .iter()
            .map(|v| (v - origin).magnitude())
            .fold(0.0, f64::max)
    }

    // Squared extent used to make the degeneracy check scale-aware
    fn scale_hint(&self) -> f64 {
        let (min, max) = self.bounds();
        (max - min).magnitude_squared().max(1.0)
    }
}

impl TryFrom<Vec<Vec2>> for Polygon {
    type Error = GeometryError;

    fn try_from(vertices: Vec<Vec2>) -> Result<Self, Self::Error> {
        if vertices.len() < MIN_VERTICES {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        Ok(Self { vertices })
    }
}

impl AsRef<[Vec2]> for Polygon {
    fn as_ref(&self) -> &[Vec2] {
        &self.vertices
    }
}
