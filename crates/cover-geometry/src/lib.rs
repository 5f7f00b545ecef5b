//! 2D/3D geometry primitives shared by the rest of the cover engine: points,
//! segments, rectangles, regular-polygon shapes, rays/planes, and a
//! fixed-point-stabilized polygon clipper. Spec §4.1.

mod error;
mod fixed_point;
mod point;
mod polygon;
mod ray;
mod rect;
mod segment;
mod shapes;

pub use error::{GeomResult, GeometryError};
pub use point::{COLINEAR_EPS, Point2, Point3};
pub use polygon::{Polygon, covered_area};
pub use ray::{HorizontalPlane, Ray3, VerticalPlane};
pub use rect::Rect;
pub use segment::{Segment, line_intersection_point, line_segment_intersects};
pub use shapes::RegularPolygonShape;
