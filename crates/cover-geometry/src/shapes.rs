use crate::point::Point2;
use crate::polygon::Polygon;
use serde::{Deserialize, Serialize};

/// A regular N-gon footprint (used for hex-grid tokens), stored in its
/// Platonic form centered at the origin so rotation is just a matrix
/// multiply, plus a separate world transform. Spec §4.1: "Each
/// regular/rectangle shape exposes both a Platonic form centered at origin
/// (for rotation) and an affine translation to world coordinates."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegularPolygonShape {
    pub sides: u32,
    pub circumradius: f32,
}

impl RegularPolygonShape {
    pub fn new(sides: u32, circumradius: f32) -> Self {
        assert!(sides >= 3, "a regular polygon needs at least 3 sides");
        Self { sides, circumradius }
    }

    /// The Platonic vertex list, centered at the origin, first vertex
    /// pointing along +Y (matching the usual hex-grid "pointy top"
    /// convention).
    pub fn platonic(&self) -> Vec<glam::Vec2> {
        (0..self.sides)
            .map(|i| {
                let theta = std::f32::consts::FRAC_PI_2
                    + std::f32::consts::TAU * i as f32 / self.sides as f32;
                glam::vec2(theta.cos(), theta.sin()) * self.circumradius
            })
            .collect()
    }

    /// Affine transform of the Platonic form into world coordinates.
    pub fn to_world(&self, center: Point2, rotation_radians: f32) -> Polygon {
        let rot = glam::Mat2::from_angle(rotation_radians);
        let points = self
            .platonic()
            .into_iter()
            .map(|v| Point2(center.0 + rot * v))
            .collect();
        Polygon::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexagon_has_six_vertices_at_circumradius() {
        let shape = RegularPolygonShape::new(6, 2.0);
        let verts = shape.platonic();
        assert_eq!(verts.len(), 6);
        for v in verts {
            assert!((v.length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn to_world_translates_center() {
        let shape = RegularPolygonShape::new(4, 1.0);
        let poly = shape.to_world(Point2::new(5.0, 5.0), 0.0);
        let centroid = poly
            .points
            .iter()
            .fold(glam::Vec2::ZERO, |acc, p| acc + p.0)
            / poly.points.len() as f32;
        assert!((centroid - glam::vec2(5.0, 5.0)).length() < 1e-4);
    }
}
