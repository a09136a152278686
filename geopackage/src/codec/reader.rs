use bytes::Buf;
use geopackage_types::{Coord, Dimensions, GeometryType};

use crate::error::{GeoPackageError, Result};

/// Byte order of multi-byte values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first.
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// WKB byte order marker.
    pub fn marker(&self) -> u8 {
        match self {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
        }
    }
}

/// Type code of a geometry body together with the dimension flags packed into it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct TypeCode {
    pub geometry_type: GeometryType,
    pub dimensions: Dimensions,
}

impl TypeCode {
    pub fn new(geometry_type: GeometryType, dimensions: Dimensions) -> Self {
        Self {
            geometry_type,
            dimensions,
        }
    }

    /// Base type code plus 1000 for Z and 2000 for M.
    pub fn to_u32(self) -> u32 {
        self.geometry_type.code()
            + 1000 * self.dimensions.has_z as u32
            + 2000 * self.dimensions.has_m as u32
    }

    pub fn from_u32(code: u32) -> Result<Self> {
        let dimensions = match code / 1000 {
            0 => Dimensions::XY,
            1 => Dimensions::XYZ,
            2 => Dimensions::XYM,
            3 => Dimensions::XYZM,
            _ => return Err(unknown_type_code(code)),
        };

        match GeometryType::from_code(code % 1000) {
            Some(GeometryType::Geometry) | None => Err(unknown_type_code(code)),
            Some(geometry_type) => Ok(Self::new(geometry_type, dimensions)),
        }
    }
}

fn unknown_type_code(code: u32) -> GeoPackageError {
    GeoPackageError::Format(format!("unrecognized geometry type code {code}"))
}

/// Bounds-checked reader over encoded geometry bytes.
///
/// All reads fail with [`GeoPackageError::Format`] instead of panicking when the data ends prematurely.
pub(crate) struct WkbReader<'a> {
    buf: &'a [u8],
}

impl<'a> WkbReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn ensure(&self, len: usize) -> Result<()> {
        if self.buf.remaining() < len {
            Err(GeoPackageError::Format(format!(
                "unexpected end of geometry data: need {len} bytes, {} left",
                self.buf.remaining()
            )))
        } else {
            Ok(())
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u32(&mut self, order: ByteOrder) -> Result<u32> {
        self.ensure(4)?;
        Ok(match order {
            ByteOrder::BigEndian => self.buf.get_u32(),
            ByteOrder::LittleEndian => self.buf.get_u32_le(),
        })
    }

    pub fn read_i32(&mut self, order: ByteOrder) -> Result<i32> {
        self.ensure(4)?;
        Ok(match order {
            ByteOrder::BigEndian => self.buf.get_i32(),
            ByteOrder::LittleEndian => self.buf.get_i32_le(),
        })
    }

    pub fn read_f64(&mut self, order: ByteOrder) -> Result<f64> {
        self.ensure(8)?;
        Ok(match order {
            ByteOrder::BigEndian => self.buf.get_f64(),
            ByteOrder::LittleEndian => self.buf.get_f64_le(),
        })
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.ensure(len)?;
        self.buf.advance(len);
        Ok(())
    }

    /// Reads a count prefix. The count is checked against the remaining data so that a corrupted count cannot
    /// trigger a huge allocation.
    pub fn read_count(&mut self, order: ByteOrder, min_item_size: usize) -> Result<usize> {
        let count = self.read_u32(order)? as usize;
        self.ensure(count.saturating_mul(min_item_size))?;
        Ok(count)
    }

    /// Reads the byte order marker and the type code that start every geometry body.
    pub fn read_body_header(&mut self) -> Result<(ByteOrder, TypeCode)> {
        let order = match self.read_u8()? {
            0 => ByteOrder::BigEndian,
            1 => ByteOrder::LittleEndian,
            v => {
                return Err(GeoPackageError::Format(format!(
                    "invalid byte order marker {v}"
                )))
            }
        };

        let code = TypeCode::from_u32(self.read_u32(order)?)?;
        Ok((order, code))
    }

    /// Reads the body header of a member of a multi-geometry and checks that it has the expected type.
    pub fn read_member_header(&mut self, expected: GeometryType) -> Result<(ByteOrder, Dimensions)> {
        let (order, code) = self.read_body_header()?;
        if code.geometry_type != expected {
            return Err(GeoPackageError::Format(format!(
                "expected {expected} member, found {}",
                code.geometry_type
            )));
        }

        Ok((order, code.dimensions))
    }

    /// Reads a full coordinate tuple.
    pub fn read_coord(&mut self, order: ByteOrder, dimensions: Dimensions) -> Result<Coord> {
        let mut values = Vec::with_capacity(dimensions.tuple_len());
        for _ in 0..dimensions.tuple_len() {
            values.push(self.read_f64(order)?);
        }

        Ok(Coord::try_from(values)?)
    }

    /// Reads X and Y of a coordinate tuple and skips the rest of it.
    pub fn read_xy(&mut self, order: ByteOrder, dimensions: Dimensions) -> Result<(f64, f64)> {
        let x = self.read_f64(order)?;
        let y = self.read_f64(order)?;
        self.skip((dimensions.tuple_len() - 2) * 8)?;
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn type_code_arithmetic() {
        let code = TypeCode::new(GeometryType::MultiPolygon, Dimensions::XYZM);
        assert_eq!(code.to_u32(), 3006);
        assert_eq!(TypeCode::from_u32(3006).ok(), Some(code));

        assert_eq!(
            TypeCode::from_u32(2001).ok(),
            Some(TypeCode::new(GeometryType::Point, Dimensions::XYM))
        );
        assert_eq!(
            TypeCode::from_u32(1014).ok(),
            Some(TypeCode::new(GeometryType::Surface, Dimensions::XYZ))
        );

        assert_matches!(TypeCode::from_u32(0), Err(GeoPackageError::Format(_)));
        assert_matches!(TypeCode::from_u32(15), Err(GeoPackageError::Format(_)));
        assert_matches!(TypeCode::from_u32(4001), Err(GeoPackageError::Format(_)));
    }

    #[test]
    fn truncated_data() {
        let mut reader = WkbReader::new(&[1, 2, 3]);
        assert_matches!(
            reader.read_f64(ByteOrder::LittleEndian),
            Err(GeoPackageError::Format(_))
        );
        assert_eq!(reader.read_u8().ok(), Some(1));
    }

    #[test]
    fn huge_count_is_rejected() {
        let mut reader = WkbReader::new(&[0xff, 0xff, 0xff, 0x7f, 0, 0]);
        assert_matches!(
            reader.read_count(ByteOrder::LittleEndian, 16),
            Err(GeoPackageError::Format(_))
        );
    }
}
