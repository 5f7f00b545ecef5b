use serde::{Deserialize, Serialize};

/// Colinearity / "almost equal" tolerance: the diagonal of a unit pixel cell.
pub const COLINEAR_EPS: f32 = std::f32::consts::SQRT_2 / 2.0;

/// A world-space 2D point. Kept distinct from a bare `glam::Vec2` so call
/// sites can't silently mix up points and direction vectors, which this crate
/// does a lot of (ray directions, shadow projection deltas, translations).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2(pub glam::Vec2);

impl Point2 {
    pub const ZERO: Self = Self(glam::Vec2::ZERO);

    pub fn new(x: f32, y: f32) -> Self {
        Self(glam::vec2(x, y))
    }

    pub fn distance(self, other: Self) -> f32 {
        self.0.distance(other.0)
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        self.0.distance_squared(other.0)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self(self.0.lerp(other.0, t))
    }

    /// True if the two points are within [`COLINEAR_EPS`] of each other.
    pub fn almost_eq(self, other: Self) -> bool {
        self.distance(other) <= COLINEAR_EPS
    }

    pub fn x(self) -> f32 {
        self.0.x
    }

    pub fn y(self) -> f32 {
        self.0.y
    }
}

impl std::ops::Sub for Point2 {
    type Output = glam::Vec2;
    fn sub(self, rhs: Self) -> glam::Vec2 {
        self.0 - rhs.0
    }
}

impl std::ops::Add<glam::Vec2> for Point2 {
    type Output = Point2;
    fn add(self, rhs: glam::Vec2) -> Point2 {
        Point2(self.0 + rhs)
    }
}

impl From<glam::Vec2> for Point2 {
    fn from(v: glam::Vec2) -> Self {
        Self(v)
    }
}

/// A world-space 3D point; `z` shares linear units with `x`/`y` (grid
/// elevation is converted once at ingress, per the data model contract).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3(pub glam::Vec3);

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(glam::vec3(x, y, z))
    }

    pub fn xy(self) -> Point2 {
        Point2(self.0.truncate())
    }

    pub fn distance(self, other: Self) -> f32 {
        self.0.distance(other.0)
    }
}

impl std::ops::Sub for Point3 {
    type Output = glam::Vec3;
    fn sub(self, rhs: Self) -> glam::Vec3 {
        self.0 - rhs.0
    }
}

impl From<glam::Vec3> for Point3 {
    fn from(v: glam::Vec3) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn almost_eq_respects_pixel_diagonal_tolerance() {
        let a = Point2::new(0.0, 0.0);
        let just_inside = Point2::new(COLINEAR_EPS * 0.99, 0.0);
        let just_outside = Point2::new(COLINEAR_EPS * 1.5, 0.0);
        assert!(a.almost_eq(just_inside));
        assert!(!a.almost_eq(just_outside));
    }
}
