//! See documentation for [`GeometryType`].
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeoPackageTypesError;

/// Geometry type names that can be declared for a geometry column, together with their numeric codes.
///
/// Concrete types (`Point` through `GeometryCollection`) can be stored. Curve types (`CircularString` and
/// later) are known only by their codes: they can be declared for a column and recognized in encoded data, but
/// there is no in-memory representation for them. `Geometry`, `Curve` and `Surface` are abstract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum GeometryType {
    /// Any geometry.
    Geometry = 0,
    /// Single position.
    Point = 1,
    /// Sequence of positions connected by straight segments.
    LineString = 2,
    /// Exterior ring with optional interior rings.
    Polygon = 3,
    /// Set of points.
    MultiPoint = 4,
    /// Set of line strings.
    MultiLineString = 5,
    /// Set of polygons.
    MultiPolygon = 6,
    /// Heterogeneous set of geometries.
    GeometryCollection = 7,
    /// Arc sequence.
    CircularString = 8,
    /// Sequence of connected curves.
    CompoundCurve = 9,
    /// Polygon with curved rings.
    CurvePolygon = 10,
    /// Set of curves.
    MultiCurve = 11,
    /// Set of surfaces.
    MultiSurface = 12,
    /// Any one-dimensional geometry.
    Curve = 13,
    /// Any two-dimensional geometry.
    Surface = 14,
}

const ALL_TYPES: [GeometryType; 15] = [
    GeometryType::Geometry,
    GeometryType::Point,
    GeometryType::LineString,
    GeometryType::Polygon,
    GeometryType::MultiPoint,
    GeometryType::MultiLineString,
    GeometryType::MultiPolygon,
    GeometryType::GeometryCollection,
    GeometryType::CircularString,
    GeometryType::CompoundCurve,
    GeometryType::CurvePolygon,
    GeometryType::MultiCurve,
    GeometryType::MultiSurface,
    GeometryType::Curve,
    GeometryType::Surface,
];

/// Concrete types accepted by the abstract supertypes (besides the type itself). `Geometry` is handled
/// separately since it accepts everything.
const SUBTYPES: &[(GeometryType, &[GeometryType])] = &[
    (
        GeometryType::Curve,
        &[
            GeometryType::LineString,
            GeometryType::CircularString,
            GeometryType::CompoundCurve,
        ],
    ),
    (
        GeometryType::Surface,
        &[GeometryType::Polygon, GeometryType::CurvePolygon],
    ),
    (GeometryType::MultiCurve, &[GeometryType::MultiLineString]),
    (GeometryType::MultiSurface, &[GeometryType::MultiPolygon]),
];

impl GeometryType {
    /// Numeric code of the type as used in the binary encoding (without dimension flags).
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Returns the type with the given code, or `None` if the code is not in the `0..=14` range.
    pub fn from_code(code: u32) -> Option<Self> {
        ALL_TYPES.get(code as usize).copied()
    }

    /// Upper-case name of the type, e.g. `MULTIPOLYGON`.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Geometry => "GEOMETRY",
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
            GeometryType::CircularString => "CIRCULARSTRING",
            GeometryType::CompoundCurve => "COMPOUNDCURVE",
            GeometryType::CurvePolygon => "CURVEPOLYGON",
            GeometryType::MultiCurve => "MULTICURVE",
            GeometryType::MultiSurface => "MULTISURFACE",
            GeometryType::Curve => "CURVE",
            GeometryType::Surface => "SURFACE",
        }
    }

    /// Returns true if a column declared with `self` type can store a geometry of the `other` type.
    pub fn accepts(&self, other: GeometryType) -> bool {
        if *self == other || *self == GeometryType::Geometry {
            return true;
        }

        SUBTYPES
            .iter()
            .find(|(supertype, _)| supertype == self)
            .is_some_and(|(_, subtypes)| subtypes.contains(&other))
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryType {
    type Err = GeoPackageTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_TYPES
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| GeoPackageTypesError::Conversion(format!("unknown geometry type: {s}")))
    }
}

impl TryFrom<String> for GeometryType {
    type Error = GeoPackageTypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeometryType> for &'static str {
    fn from(value: GeometryType) -> Self {
        value.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_names() {
        for t in ALL_TYPES {
            assert_eq!(GeometryType::from_code(t.code()), Some(t));
            assert_eq!(t.name().parse::<GeometryType>().ok(), Some(t));
        }

        assert_eq!(GeometryType::from_code(15), None);
        assert_eq!(
            "multiPolygon".parse::<GeometryType>().ok(),
            Some(GeometryType::MultiPolygon)
        );
        assert!("triangle".parse::<GeometryType>().is_err());
    }

    #[test]
    fn compatibility_table() {
        use GeometryType::*;

        for t in ALL_TYPES {
            assert!(Geometry.accepts(t));
            assert!(t.accepts(t));
        }

        assert!(Curve.accepts(LineString));
        assert!(Curve.accepts(CompoundCurve));
        assert!(!Curve.accepts(Polygon));
        assert!(Surface.accepts(Polygon));
        assert!(!Surface.accepts(MultiPolygon));
        assert!(MultiCurve.accepts(MultiLineString));
        assert!(MultiSurface.accepts(MultiPolygon));
        assert!(!MultiSurface.accepts(Polygon));
        assert!(!Point.accepts(MultiPoint));
        assert!(!LineString.accepts(Geometry));
    }
}
