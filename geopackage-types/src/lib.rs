//! Geometry model used by the `geopackage` crate.
//!
//! * [`Geometry`] is a closed set of owned geometry values (points, lines, polygons, their multi-variants and
//!   collections) built of [`Coord`] tuples with 2 to 4 values.
//! * [`GeometryType`] names the types a geometry column can be declared with, including abstract supertypes and
//!   curve types, and knows which concrete types each of them accepts.
//! * [`BoundingRect`] and [`Envelope`] describe the extent of a geometry.
//!
//! With the `geojson` and `geo-types` features geometries can be converted to and from the respective crates.

mod bounding_rect;
pub use bounding_rect::BoundingRect;

mod coord;
pub use coord::{CartesianPoint2d, Coord, Dimensions};

mod envelope;
pub use envelope::Envelope;

pub mod error;

pub mod geometry;
pub use geometry::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon,
};

mod geometry_type;
pub use geometry_type::GeometryType;

#[cfg(feature = "geo-types")]
mod geo_types;

#[cfg(feature = "geojson")]
mod geojson;
