//! Math utilities and types
//!
//! Provides the 2D vector type used throughout the kernel. Arithmetic
//! (add, subtract, negate, scalar multiply, dot, magnitude) comes straight
//! from nalgebra; [`Vec2Ext`] adds the planar operations nalgebra leaves out.
//!
//! Positive x is towards the right, positive y is towards the top, and
//! positive angles are counter-clockwise.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// Magnitudes below this are treated as zero when normalizing
pub const ZERO_MAGNITUDE: f64 = f64::EPSILON;

/// Extension trait for [`Vec2`] with planar geometry helpers
pub trait Vec2Ext: Sized {
    /// Create a vector from a magnitude and a direction angle (radians)
    fn from_polar(magnitude: f64, direction: f64) -> Self;

    /// The z-component of the 3D cross product `self × other`
    fn cross_z(&self, other: &Self) -> f64;

    /// Signed area of the parallelogram spanned by `self` and `other`
    ///
    /// Identical to [`cross_z`](Self::cross_z); positive when `other` lies
    /// counter-clockwise of `self`.
    fn determinant(&self, other: &Self) -> f64;

    /// Rotate about the origin by `angle` radians (counter-clockwise positive)
    fn rotated(&self, angle: f64) -> Self;

    /// Rotate about `pivot` by `angle` radians
    fn rotated_about(&self, angle: f64, pivot: &Self) -> Self;

    /// Unit vector in the same direction, or the zero vector when the
    /// magnitude is below [`ZERO_MAGNITUDE`]
    fn unit_or_zero(&self) -> Self;

    /// Length of the projection of `self` onto `onto` (0 when `onto` is zero)
    fn scalar_projection(&self, onto: &Self) -> f64;

    /// Vector projection of `self` onto `onto` (zero when `onto` is zero)
    fn projected_onto(&self, onto: &Self) -> Self;

    /// Signed angle from `self` to `other` in `[-π, π]`
    ///
    /// Counter-clockwise turns are positive. Returns 0 if either vector is zero.
    fn angle_to(&self, other: &Self) -> f64;

    /// The vector rotated by -90°, i.e. `(y, -x)`
    ///
    /// For an edge of a counter-clockwise polygon this is the outward normal.
    fn perpendicular(&self) -> Self;
}

impl Vec2Ext for Vec2 {
    fn from_polar(magnitude: f64, direction: f64) -> Self {
        let (sin, cos) = direction.sin_cos();
        Self::new(magnitude * cos, magnitude * sin)
    }

    fn cross_z(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn determinant(&self, other: &Self) -> f64 {
        self.cross_z(other)
    }

    fn rotated(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    fn rotated_about(&self, angle: f64, pivot: &Self) -> Self {
        (self - pivot).rotated(angle) + pivot
    }

    fn unit_or_zero(&self) -> Self {
        let magnitude = self.magnitude();
        if magnitude < ZERO_MAGNITUDE {
            Self::zeros()
        } else {
            self / magnitude
        }
    }

    fn scalar_projection(&self, onto: &Self) -> f64 {
        let length = onto.magnitude();
        if length < ZERO_MAGNITUDE {
            0.0
        } else {
            self.dot(onto) / length
        }
    }

    fn projected_onto(&self, onto: &Self) -> Self {
        let length_squared = onto.magnitude_squared();
        if length_squared < ZERO_MAGNITUDE * ZERO_MAGNITUDE {
            Self::zeros()
        } else {
            onto * (self.dot(onto) / length_squared)
        }
    }

    fn angle_to(&self, other: &Self) -> f64 {
        if self.magnitude() < ZERO_MAGNITUDE || other.magnitude() < ZERO_MAGNITUDE {
            return 0.0;
        }
        self.cross_z(other).atan2(self.dot(other))
    }

    fn perpendicular(&self) -> Self {
        Self::new(self.y, -self.x)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// 2 * Pi
    pub const TAU: f64 = std::f64::consts::TAU;

    /// Pi / 2
    pub const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;
}
