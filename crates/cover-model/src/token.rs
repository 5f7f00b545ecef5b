use crate::ids::TokenId;
use cover_geometry::{Point2, Polygon, RegularPolygonShape, Rect};
use serde::{Deserialize, Serialize};

/// A token's 2D footprint: an axis-aligned rectangle, or a regular polygon
/// for hex-grid tokens (spec §3 `Token`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Footprint {
    Rect(Rect),
    RegularPolygon {
        shape: RegularPolygonShape,
        center: Point2,
        rotation_radians: f32,
    },
}

impl Footprint {
    pub fn to_polygon(&self) -> Polygon {
        match self {
            Footprint::Rect(rect) => Polygon::new(rect.corners().to_vec()),
            Footprint::RegularPolygon {
                shape,
                center,
                rotation_radians,
            } => shape.to_world(*center, *rotation_radians),
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        match self {
            Footprint::Rect(rect) => *rect,
            Footprint::RegularPolygon { .. } => self.to_polygon().bounding_rect(),
        }
    }

    pub fn center(&self) -> Point2 {
        match self {
            Footprint::Rect(rect) => rect.center(),
            Footprint::RegularPolygon { center, .. } => *center,
        }
    }

    pub fn area(&self) -> f64 {
        self.to_polygon().area()
    }
}

/// Disposition flags relevant to cover blocking (spec §3: "live/dead/prone"
/// are part of a `CoverEffect`'s blocker-inclusion flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disposition {
    pub alive: bool,
    pub prone: bool,
}

impl Disposition {
    pub fn standing_alive() -> Self {
        Self {
            alive: true,
            prone: false,
        }
    }
}

/// A placeable combatant/object on the map (spec §3 `Token`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub footprint: Footprint,
    pub z_bottom: f32,
    pub z_top: f32,
    pub disposition: Disposition,
    pub orientation_radians: f32,
    /// Upper bound on the cover fraction this token alone may contribute
    /// when acting as a blocker (spec §3, §4.5). Defaults to 1.0 (no cap).
    pub maximum_cover_grant: f32,
    /// Bumped by the engine on every `PlaceableEvent::Moved/Resized/Flagged`
    /// affecting this token; compared against cached versions (spec §9).
    pub version: u64,
}

impl Token {
    pub fn new(id: TokenId, footprint: Footprint, z_bottom: f32, z_top: f32) -> Self {
        assert!(z_top >= z_bottom, "token top elevation below bottom");
        Self {
            id,
            footprint,
            z_bottom,
            z_top,
            disposition: Disposition::standing_alive(),
            orientation_radians: 0.0,
            maximum_cover_grant: 1.0,
            version: 0,
        }
    }

    pub fn is_flat(&self) -> bool {
        (self.z_top - self.z_bottom).abs() <= f32::EPSILON
    }

    pub fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_footprint_has_positive_area() {
        let footprint = Footprint::Rect(Rect::from_min_max(Point2::ZERO, Point2::new(1.0, 1.0)));
        assert!(footprint.area() > 0.0);
    }

    #[test]
    #[should_panic(expected = "token top elevation below bottom")]
    fn token_rejects_inverted_elevation_band() {
        let footprint = Footprint::Rect(Rect::from_min_max(Point2::ZERO, Point2::new(1.0, 1.0)));
        Token::new(TokenId::new(1), footprint, 5.0, 0.0);
    }
}
