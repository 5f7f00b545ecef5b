use crate::ids::{RegionId, TileId, TokenId, WallId};
use crate::region::Region;
use crate::tile::Tile;
use crate::token::Token;
use crate::wall::Wall;
use cover_geometry::{Point2, Polygon, Rect};

/// A tagged variant standing in for the inheritance ladder over drawable
/// kinds: the obstacle index and GPU uploader dispatch on this rather than
/// on a `dyn` trait object, keeping a per-variant tracker as engine state
/// instead of a global.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeable {
    Wall(Wall),
    Tile(Tile),
    Token(Token),
    Region(Region),
}

/// Discriminant-only tag, used where callers filter by kind without needing
/// the payload (spec §4.2 `query_ray(..., kinds)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceableKind {
    Wall,
    Tile,
    Token,
    Region,
}

impl Placeable {
    pub fn kind(&self) -> PlaceableKind {
        match self {
            Placeable::Wall(_) => PlaceableKind::Wall,
            Placeable::Tile(_) => PlaceableKind::Tile,
            Placeable::Token(_) => PlaceableKind::Token,
            Placeable::Region(_) => PlaceableKind::Region,
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        match self {
            Placeable::Wall(wall) => {
                Rect::from_min_max(wall.segment.a, wall.segment.b).normalized()
            }
            Placeable::Tile(tile) => tile.shape.bounding_rect(),
            Placeable::Token(token) => token.footprint.bounding_rect(),
            Placeable::Region(region) => region
                .shapes
                .iter()
                .map(Polygon::bounding_rect)
                .reduce(|a, b| a.union(&b))
                .unwrap_or(Rect::from_min_max(Point2::ZERO, Point2::ZERO)),
        }
    }
}

/// Stable identifier for a placeable, independent of its kind (spec §4.2,
/// §6 placeable events reference walls/tiles/tokens/regions by id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceableId {
    Wall(WallId),
    Tile(TileId),
    Token(TokenId),
    Region(RegionId),
}
