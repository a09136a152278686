//! Binary geometry encoding.
//!
//! An encoded geometry consists of
//!
//! | Offset | Size          | Field                                                                  |
//! |--------|---------------|------------------------------------------------------------------------|
//! | 0      | 2             | magic `GP`                                                             |
//! | 2      | 1             | version, always 0                                                      |
//! | 3      | 1             | flags: bit 5 binary type, bit 4 empty, bits 1-3 envelope type, bit 0 byte order |
//! | 4      | 4             | srid, big-endian                                                       |
//! | 8      | 0/32/48/48/64 | envelope, little-endian `f64` values                                   |
//! | 8 + N  | variable      | WKB-like body                                                          |
//!
//! The body starts with a byte order marker and a little-endian `u32` type code, which is the base code of the
//! geometry type plus 1000 if the geometry has Z and 2000 if it has M. The payload depends on the type:
//!
//! * `Point` - the coordinate values;
//! * `LineString` - point count and the coordinates;
//! * `Polygon` and `MultiLineString` - ring (line) count, then for each ring a point count and the coordinates;
//! * `MultiPoint`, `MultiPolygon` and `GeometryCollection` - member count, then every member as a full nested
//!   body with its own byte order marker and type code.

use geopackage_types::{Coord, Dimensions, Geometry, GeometryType, LineString, Polygon};

use crate::error::{GeoPackageError, Result};

mod header;
pub use header::{BinaryHeader, EnvelopeMode, MAGIC, VERSION};

mod reader;
pub use reader::ByteOrder;
pub(crate) use reader::WkbReader;

mod writer;

/// Maximum nesting of geometry collections accepted by [`decode`].
pub const MAX_NESTING_DEPTH: usize = 32;

/// Result of decoding a binary geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedGeometry {
    /// Spatial reference id from the header.
    pub srid: i32,
    /// Geometry value, `None` if the empty flag was set.
    pub geometry: Option<Geometry>,
}

/// Encodes a geometry with the given srid and header envelope.
///
/// `None` encodes an absent geometry: the empty flag is set, no envelope is written and the body consists of a
/// `Point` type code without coordinates. A geometry without any coordinates is encoded as usual, but without an
/// envelope since there is nothing to bound.
///
/// Dimensions of the geometry are taken from its first coordinate tuple. Fails if other tuples have a different
/// length.
pub fn encode(geometry: Option<&Geometry>, srid: i32, envelope_mode: EnvelopeMode) -> Result<Vec<u8>> {
    let Some(geometry) = geometry else {
        let mut buf = Vec::with_capacity(BinaryHeader::SIZE + 5);
        BinaryHeader::new(srid, EnvelopeMode::None, true).write(&mut buf);
        writer::write_absent(&mut buf);
        return Ok(buf);
    };

    geometry.check_uniform_dimensions()?;

    let dimensions = geometry.dimensions();
    let envelope = match envelope_mode {
        EnvelopeMode::None => None,
        _ => geometry.envelope(),
    };
    let envelope_mode = if envelope.is_some() {
        envelope_mode
    } else {
        EnvelopeMode::None
    };

    let mut buf = Vec::with_capacity(
        BinaryHeader::SIZE
            + envelope_mode.byte_len()
            + 9
            + geometry.iter_coords().count() * dimensions.tuple_len() * 8,
    );
    BinaryHeader::new(srid, envelope_mode, false).write(&mut buf);
    if let Some(envelope) = &envelope {
        header::write_envelope(&mut buf, envelope, envelope_mode);
    }
    writer::write_geometry(&mut buf, geometry, dimensions);

    Ok(buf)
}

/// Decodes a binary geometry.
///
/// The envelope is skipped: it is not needed to restore the geometry.
pub fn decode(bytes: &[u8]) -> Result<DecodedGeometry> {
    let header = BinaryHeader::read(bytes)?;
    if header.empty {
        return Ok(DecodedGeometry {
            srid: header.srid,
            geometry: None,
        });
    }

    let mut reader = WkbReader::new(&bytes[header.body_offset()..]);
    let geometry = read_geometry(&mut reader, 0)?;

    Ok(DecodedGeometry {
        srid: header.srid,
        geometry: Some(geometry),
    })
}

fn read_geometry(reader: &mut WkbReader, depth: usize) -> Result<Geometry> {
    if depth > MAX_NESTING_DEPTH {
        return Err(GeoPackageError::Format(format!(
            "geometry collections are nested deeper than {MAX_NESTING_DEPTH} levels"
        )));
    }

    let (order, code) = reader.read_body_header()?;
    let dims = code.dimensions;
    let coord_size = dims.tuple_len() * 8;

    Ok(match code.geometry_type {
        GeometryType::Point => Geometry::Point(reader.read_coord(order, dims)?),
        GeometryType::LineString => Geometry::LineString(read_points(reader, order, dims)?),
        GeometryType::Polygon => Geometry::Polygon(read_rings(reader, order, dims)?),
        GeometryType::MultiPoint => {
            let count = reader.read_count(order, 5 + coord_size)?;
            let mut points = Vec::with_capacity(count);
            for _ in 0..count {
                let (order, member_dims) = reader.read_member_header(GeometryType::Point)?;
                points.push(reader.read_coord(order, member_dims)?);
            }
            Geometry::MultiPoint(points.into())
        }
        GeometryType::MultiLineString => {
            let count = reader.read_count(order, 4)?;
            let mut lines = Vec::with_capacity(count);
            for _ in 0..count {
                lines.push(read_points(reader, order, dims)?);
            }
            Geometry::MultiLineString(lines.into())
        }
        GeometryType::MultiPolygon => {
            let count = reader.read_count(order, 9)?;
            let mut polygons = Vec::with_capacity(count);
            for _ in 0..count {
                let (order, member_dims) = reader.read_member_header(GeometryType::Polygon)?;
                polygons.push(read_rings(reader, order, member_dims)?);
            }
            Geometry::MultiPolygon(polygons.into())
        }
        GeometryType::GeometryCollection => {
            let count = reader.read_count(order, 5)?;
            let mut members = Vec::with_capacity(count);
            for _ in 0..count {
                members.push(read_geometry(reader, depth + 1)?);
            }
            Geometry::GeometryCollection(members.into())
        }
        other => {
            return Err(GeoPackageError::Format(format!(
                "decoding of {other} geometries is not supported"
            )))
        }
    })
}

fn read_points(reader: &mut WkbReader, order: ByteOrder, dims: Dimensions) -> Result<LineString> {
    let count = reader.read_count(order, dims.tuple_len() * 8)?;
    (0..count)
        .map(|_| reader.read_coord(order, dims))
        .collect::<Result<Vec<Coord>>>()
        .map(LineString::from)
}

fn read_rings(reader: &mut WkbReader, order: ByteOrder, dims: Dimensions) -> Result<Polygon> {
    let count = reader.read_count(order, 4)?;
    (0..count)
        .map(|_| read_points(reader, order, dims))
        .collect::<Result<Vec<LineString>>>()
        .map(Polygon::from)
}
