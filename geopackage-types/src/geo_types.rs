//! Conversions between [`Geometry`] and `geo-types` geometries.
//!
//! `geo-types` geometries are two-dimensional, so Z and M values are dropped when converting into them.

use crate::geometry::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon,
};
use crate::{CartesianPoint2d, Coord};

impl From<geo_types::Geometry<f64>> for Geometry {
    fn from(value: geo_types::Geometry<f64>) -> Self {
        match value {
            geo_types::Geometry::Point(p) => Geometry::Point(Coord::xy(p.x(), p.y())),
            geo_types::Geometry::Line(l) => Geometry::LineString(LineString::new(vec![
                Coord::xy(l.start.x, l.start.y),
                Coord::xy(l.end.x, l.end.y),
            ])),
            geo_types::Geometry::LineString(l) => Geometry::LineString(from_line(&l)),
            geo_types::Geometry::Polygon(p) => Geometry::Polygon(from_polygon(&p)),
            geo_types::Geometry::MultiPoint(mp) => Geometry::MultiPoint(
                mp.iter()
                    .map(|p| Coord::xy(p.x(), p.y()))
                    .collect::<MultiPoint>(),
            ),
            geo_types::Geometry::MultiLineString(ml) => {
                Geometry::MultiLineString(ml.iter().map(from_line).collect::<MultiLineString>())
            }
            geo_types::Geometry::MultiPolygon(mp) => {
                Geometry::MultiPolygon(mp.iter().map(from_polygon).collect::<MultiPolygon>())
            }
            geo_types::Geometry::GeometryCollection(gc) => Geometry::GeometryCollection(
                gc.into_iter().map(Geometry::from).collect::<GeometryCollection>(),
            ),
            geo_types::Geometry::Rect(r) => Geometry::Polygon(from_polygon(&r.to_polygon())),
            geo_types::Geometry::Triangle(t) => Geometry::Polygon(from_polygon(&t.to_polygon())),
        }
    }
}

impl From<&Geometry> for geo_types::Geometry<f64> {
    fn from(value: &Geometry) -> Self {
        match value {
            Geometry::Point(c) => geo_types::Geometry::Point(geo_types::Point::new(c.x(), c.y())),
            Geometry::LineString(l) => geo_types::Geometry::LineString(to_line(l)),
            Geometry::Polygon(p) => geo_types::Geometry::Polygon(to_polygon(p)),
            Geometry::MultiPoint(mp) => geo_types::Geometry::MultiPoint(geo_types::MultiPoint(
                mp.iter()
                    .map(|c| geo_types::Point::new(c.x(), c.y()))
                    .collect(),
            )),
            Geometry::MultiLineString(ml) => geo_types::Geometry::MultiLineString(
                geo_types::MultiLineString(ml.iter().map(to_line).collect()),
            ),
            Geometry::MultiPolygon(mp) => geo_types::Geometry::MultiPolygon(
                geo_types::MultiPolygon(mp.iter().map(to_polygon).collect()),
            ),
            Geometry::GeometryCollection(gc) => geo_types::Geometry::GeometryCollection(
                geo_types::GeometryCollection(gc.iter().map(geo_types::Geometry::from).collect()),
            ),
        }
    }
}

fn from_line(line: &geo_types::LineString<f64>) -> LineString {
    line.coords().map(|c| Coord::xy(c.x, c.y)).collect()
}

fn from_polygon(polygon: &geo_types::Polygon<f64>) -> Polygon {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(from_line)
        .collect()
}

fn to_line(line: &LineString) -> geo_types::LineString<f64> {
    geo_types::LineString(
        line.iter()
            .map(|c| geo_types::Coord { x: c.x(), y: c.y() })
            .collect(),
    )
}

fn to_polygon(polygon: &Polygon) -> geo_types::Polygon<f64> {
    let exterior = polygon
        .exterior()
        .map(to_line)
        .unwrap_or_else(|| geo_types::LineString(vec![]));
    geo_types::Polygon::new(exterior, polygon.interiors().iter().map(to_line).collect())
}
