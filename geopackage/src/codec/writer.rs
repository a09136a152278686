use bytes::BufMut;
use geopackage_types::{Coord, Dimensions, Geometry, GeometryType, LineString, Polygon};

use crate::codec::reader::{ByteOrder, TypeCode};

/// Writes the body of a geometry. `dimensions` are decided once for the whole geometry and applied to all nested
/// members.
pub(crate) fn write_geometry(buf: &mut impl BufMut, geometry: &Geometry, dimensions: Dimensions) {
    write_body_header(buf, geometry.geometry_type(), dimensions);

    match geometry {
        Geometry::Point(c) => write_coord(buf, c),
        Geometry::LineString(l) => write_points(buf, l),
        Geometry::Polygon(p) => write_rings(buf, p),
        Geometry::MultiPoint(mp) => {
            write_count(buf, mp.len());
            for c in mp.iter() {
                write_body_header(buf, GeometryType::Point, dimensions);
                write_coord(buf, c);
            }
        }
        Geometry::MultiLineString(ml) => {
            write_count(buf, ml.len());
            for l in ml.iter() {
                write_points(buf, l);
            }
        }
        Geometry::MultiPolygon(mp) => {
            write_count(buf, mp.len());
            for p in mp.iter() {
                write_body_header(buf, GeometryType::Polygon, dimensions);
                write_rings(buf, p);
            }
        }
        Geometry::GeometryCollection(gc) => {
            write_count(buf, gc.len());
            for g in gc.iter() {
                write_geometry(buf, g, dimensions);
            }
        }
    }
}

/// Body written for an absent geometry: a point type code with no coordinates.
pub(crate) fn write_absent(buf: &mut impl BufMut) {
    write_body_header(buf, GeometryType::Point, Dimensions::XY);
}

fn write_body_header(buf: &mut impl BufMut, geometry_type: GeometryType, dimensions: Dimensions) {
    buf.put_u8(ByteOrder::LittleEndian.marker());
    buf.put_u32_le(TypeCode::new(geometry_type, dimensions).to_u32());
}

fn write_count(buf: &mut impl BufMut, count: usize) {
    buf.put_u32_le(count as u32);
}

fn write_coord(buf: &mut impl BufMut, coord: &Coord) {
    for v in coord.values() {
        buf.put_f64_le(*v);
    }
}

fn write_points(buf: &mut impl BufMut, line: &LineString) {
    write_count(buf, line.len());
    for c in line.iter() {
        write_coord(buf, c);
    }
}

fn write_rings(buf: &mut impl BufMut, polygon: &Polygon) {
    write_count(buf, polygon.len());
    for ring in polygon.iter() {
        write_points(buf, ring);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_body_bytes() {
        let mut buf = vec![];
        write_geometry(&mut buf, &Geometry::Point(Coord::xy(1.0, 2.0)), Dimensions::XY);

        let mut expected = vec![0x01, 0x01, 0x00, 0x00, 0x00];
        expected.extend_from_slice(&1.0f64.to_le_bytes());
        expected.extend_from_slice(&2.0f64.to_le_bytes());
        assert_eq!(buf, expected);
    }

    #[test]
    fn multipoint_members_are_nested_geometries() {
        let geometry = Geometry::MultiPoint(vec![Coord::xyz(1.0, 2.0, 3.0)].into());
        let mut buf = vec![];
        write_geometry(&mut buf, &geometry, Dimensions::XYZ);

        // MultiPoint Z = 1004, one member, then a full Point Z = 1001 body.
        assert_eq!(&buf[..5], &[0x01, 0xec, 0x03, 0x00, 0x00]);
        assert_eq!(&buf[5..9], &[0x01, 0x00, 0x00, 0x00]);
        assert_eq!(&buf[9..14], &[0x01, 0xe9, 0x03, 0x00, 0x00]);
        assert_eq!(buf.len(), 14 + 24);
    }

    #[test]
    fn absent_geometry_body() {
        let mut buf = vec![];
        write_absent(&mut buf);
        assert_eq!(buf, vec![0x01, 0x01, 0x00, 0x00, 0x00]);
    }
}
