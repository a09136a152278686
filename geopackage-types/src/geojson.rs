//! Conversions between [`Geometry`] and GeoJSON geometries.

use geojson::{LineStringType, PolygonType, Position, Value};

use crate::error::GeoPackageTypesError;
use crate::geometry::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon,
};
use crate::Coord;

impl TryFrom<&geojson::Geometry> for Geometry {
    type Error = GeoPackageTypesError;

    fn try_from(value: &geojson::Geometry) -> Result<Self, Self::Error> {
        let geometry = match &value.value {
            Value::Point(p) => Geometry::Point(convert_position(p)?),
            Value::MultiPoint(points) => Geometry::MultiPoint(
                points
                    .iter()
                    .map(convert_position)
                    .collect::<Result<MultiPoint, _>>()?,
            ),
            Value::LineString(points) => Geometry::LineString(convert_line(points)?),
            Value::MultiLineString(lines) => Geometry::MultiLineString(
                lines
                    .iter()
                    .map(|l| convert_line(l))
                    .collect::<Result<MultiLineString, _>>()?,
            ),
            Value::Polygon(polygon) => Geometry::Polygon(convert_polygon(polygon)?),
            Value::MultiPolygon(mp) => Geometry::MultiPolygon(
                mp.iter()
                    .map(|p| convert_polygon(p))
                    .collect::<Result<MultiPolygon, _>>()?,
            ),
            Value::GeometryCollection(geometries) => Geometry::GeometryCollection(
                geometries
                    .iter()
                    .map(Geometry::try_from)
                    .collect::<Result<GeometryCollection, _>>()?,
            ),
        };

        geometry.check_uniform_dimensions()?;
        Ok(geometry)
    }
}

impl From<&Geometry> for geojson::Geometry {
    fn from(value: &Geometry) -> Self {
        geojson::Geometry::new(to_value(value))
    }
}

fn to_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(c) => Value::Point(to_position(c)),
        Geometry::LineString(l) => Value::LineString(to_line(l)),
        Geometry::Polygon(p) => Value::Polygon(to_polygon(p)),
        Geometry::MultiPoint(mp) => Value::MultiPoint(mp.iter().map(to_position).collect()),
        Geometry::MultiLineString(ml) => Value::MultiLineString(ml.iter().map(to_line).collect()),
        Geometry::MultiPolygon(mp) => Value::MultiPolygon(mp.iter().map(to_polygon).collect()),
        Geometry::GeometryCollection(gc) => Value::GeometryCollection(
            gc.iter().map(geojson::Geometry::from).collect(),
        ),
    }
}

fn convert_position(position: &Position) -> Result<Coord, GeoPackageTypesError> {
    Coord::try_from(position.as_slice())
}

fn convert_line(line: &LineStringType) -> Result<LineString, GeoPackageTypesError> {
    line.iter().map(convert_position).collect()
}

fn convert_polygon(polygon: &PolygonType) -> Result<Polygon, GeoPackageTypesError> {
    polygon.iter().map(|ring| convert_line(ring)).collect()
}

fn to_position(coord: &Coord) -> Position {
    coord.values().to_vec()
}

fn to_line(line: &LineString) -> LineStringType {
    line.iter().map(to_position).collect()
}

fn to_polygon(polygon: &Polygon) -> PolygonType {
    polygon.iter().map(to_line).collect()
}
