//! Owned geometry values that can be stored in a feature table.

use serde::{Deserialize, Serialize};

use crate::bounding_rect::BoundingRect;
use crate::coord::{Coord, Dimensions};
use crate::envelope::Envelope;
use crate::error::GeoPackageTypesError;
use crate::geometry_type::GeometryType;

macro_rules! vec_wrapper {
    ($(#[$meta:meta])* $name:ident($item:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
        pub struct $name(Vec<$item>);

        impl $name {
            /// Creates a new instance from the list of members.
            pub fn new(items: Vec<$item>) -> Self {
                Self(items)
            }

            /// Consumes self returning the list of members.
            pub fn into_inner(self) -> Vec<$item> {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = Vec<$item>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(value: Vec<$item>) -> Self {
                Self(value)
            }
        }

        impl FromIterator<$item> for $name {
            fn from_iter<T: IntoIterator<Item = $item>>(iter: T) -> Self {
                Self(iter.into_iter().collect())
            }
        }
    };
}

vec_wrapper!(
    /// Sequence of positions connected by straight segments. Also used for polygon rings.
    LineString(Coord)
);
vec_wrapper!(
    /// Polygon as a list of rings: the first one is the exterior, the rest are holes.
    Polygon(LineString)
);
vec_wrapper!(
    /// Set of points.
    MultiPoint(Coord)
);
vec_wrapper!(
    /// Set of line strings.
    MultiLineString(LineString)
);
vec_wrapper!(
    /// Set of polygons.
    MultiPolygon(Polygon)
);
vec_wrapper!(
    /// Ordered set of arbitrary geometries.
    GeometryCollection(Geometry)
);

impl Polygon {
    /// Exterior ring of the polygon.
    pub fn exterior(&self) -> Option<&LineString> {
        self.0.first()
    }

    /// Interior rings (holes) of the polygon.
    pub fn interiors(&self) -> &[LineString] {
        self.0.get(1..).unwrap_or(&[])
    }
}

/// Geometry value.
///
/// Geometry values are immutable once built: all operations take `&self`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Geometry {
    /// Single position.
    Point(Coord),
    /// Line string.
    LineString(LineString),
    /// Polygon.
    Polygon(Polygon),
    /// Multipoint.
    MultiPoint(MultiPoint),
    /// Multi line string.
    MultiLineString(MultiLineString),
    /// Multipolygon.
    MultiPolygon(MultiPolygon),
    /// Geometry collection.
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// Runtime type of the geometry.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// Iterates over all coordinate tuples of the geometry in storage order.
    pub fn iter_coords(&self) -> Box<dyn Iterator<Item = &Coord> + '_> {
        match self {
            Geometry::Point(c) => Box::new(std::iter::once(c)),
            Geometry::LineString(l) => Box::new(l.iter()),
            Geometry::Polygon(p) => Box::new(p.iter().flat_map(|ring| ring.iter())),
            Geometry::MultiPoint(mp) => Box::new(mp.iter()),
            Geometry::MultiLineString(ml) => Box::new(ml.iter().flat_map(|l| l.iter())),
            Geometry::MultiPolygon(mp) => Box::new(
                mp.iter()
                    .flat_map(|p| p.iter())
                    .flat_map(|ring| ring.iter()),
            ),
            Geometry::GeometryCollection(gc) => Box::new(gc.iter().flat_map(|g| g.iter_coords())),
        }
    }

    /// First coordinate tuple of the geometry, if there is any.
    pub fn first_coord(&self) -> Option<&Coord> {
        self.iter_coords().next()
    }

    /// Returns true if the geometry has no coordinates at all.
    pub fn is_empty(&self) -> bool {
        self.first_coord().is_none()
    }

    /// Dimensions of the geometry, decided by the length of the first coordinate tuple.
    pub fn dimensions(&self) -> Dimensions {
        self.first_coord()
            .map(Coord::dimensions)
            .unwrap_or_default()
    }

    /// Checks that all coordinate tuples have the same length as the first one.
    pub fn check_uniform_dimensions(&self) -> Result<(), GeoPackageTypesError> {
        let mut coords = self.iter_coords();
        let Some(first) = coords.next() else {
            return Ok(());
        };

        let len = first.len();
        match coords.find(|c| c.len() != len) {
            Some(c) => Err(GeoPackageTypesError::Conversion(format!(
                "mixed coordinate dimensions: expected {len} values, found {}",
                c.len()
            ))),
            None => Ok(()),
        }
    }

    /// 2d bounding rectangle of the geometry, or `None` for an empty geometry.
    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        BoundingRect::from_points(self.iter_coords())
    }

    /// Full envelope of the geometry, including Z and M ranges if the geometry has them.
    pub fn envelope(&self) -> Option<Envelope> {
        Envelope::from_coords(self.iter_coords(), self.dimensions())
    }
}

impl From<Coord> for Geometry {
    fn from(value: Coord) -> Self {
        Self::Point(value)
    }
}

impl From<LineString> for Geometry {
    fn from(value: LineString) -> Self {
        Self::LineString(value)
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(value: MultiPoint) -> Self {
        Self::MultiPoint(value)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(value: MultiLineString) -> Self {
        Self::MultiLineString(value)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(value: MultiPolygon) -> Self {
        Self::MultiPolygon(value)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(value: GeometryCollection) -> Self {
        Self::GeometryCollection(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::new(vec![LineString::new(vec![
            Coord::xy(x0, y0),
            Coord::xy(x0 + size, y0),
            Coord::xy(x0 + size, y0 + size),
            Coord::xy(x0, y0 + size),
            Coord::xy(x0, y0),
        ])])
    }

    #[test]
    fn coordinates_of_nested_geometries() {
        let geometry = Geometry::GeometryCollection(GeometryCollection::new(vec![
            Geometry::Point(Coord::xy(-5.0, 1.0)),
            Geometry::MultiPolygon(MultiPolygon::new(vec![square(0.0, 0.0, 1.0), square(3.0, 3.0, 2.0)])),
        ]));

        assert_eq!(geometry.iter_coords().count(), 11);
        assert_eq!(
            geometry.bounding_rect(),
            Some(BoundingRect::new(-5.0, 0.0, 5.0, 5.0))
        );
        assert_eq!(geometry.geometry_type(), GeometryType::GeometryCollection);
    }

    #[test]
    fn empty_geometry() {
        let geometry = Geometry::MultiPoint(MultiPoint::default());
        assert!(geometry.is_empty());
        assert_eq!(geometry.dimensions(), Dimensions::XY);
        assert_eq!(geometry.bounding_rect(), None);
        assert_eq!(geometry.envelope(), None);
    }

    #[test]
    fn mixed_dimensions_are_detected() {
        let line = Geometry::LineString(LineString::new(vec![
            Coord::xyz(0.0, 0.0, 1.0),
            Coord::xy(1.0, 1.0),
        ]));
        assert!(line.check_uniform_dimensions().is_err());
        assert_eq!(line.dimensions(), Dimensions::XYZ);

        let polygon = Geometry::Polygon(square(0.0, 0.0, 1.0));
        assert!(polygon.check_uniform_dimensions().is_ok());
    }

    #[test]
    fn polygon_rings() {
        let mut rings = square(0.0, 0.0, 10.0).into_inner();
        rings.extend(square(1.0, 1.0, 1.0).into_inner());
        let polygon = Polygon::new(rings);

        assert_eq!(polygon.exterior().map(|r| r.len()), Some(5));
        assert_eq!(polygon.interiors().len(), 1);
        assert!(Polygon::default().interiors().is_empty());
    }
}
