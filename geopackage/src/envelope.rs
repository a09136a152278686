//! 2d envelope extraction from encoded geometries.
//!
//! The envelope is read from the header when the header has one. Otherwise the geometry body is scanned for
//! X/Y coordinates without building geometry values. The body scan does not support geometry collections: for
//! them no envelope is returned.

use geopackage_types::{BoundingRect, Dimensions, GeometryType};

use crate::codec::{BinaryHeader, ByteOrder, EnvelopeMode, WkbReader};
use crate::error::{GeoPackageError, Result};

/// Where the envelope of an encoded geometry is taken from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EnvelopeSource {
    /// Envelope stored after the binary header.
    Header,
    /// Coordinates of the geometry body.
    Body,
}

impl EnvelopeSource {
    /// Source to use for the geometry with the given header: the header envelope if there is one, body
    /// otherwise.
    pub fn for_header(header: &BinaryHeader) -> Self {
        match header.envelope_mode {
            EnvelopeMode::None => Self::Body,
            _ => Self::Header,
        }
    }

    /// Extracts the envelope from `bytes`, which must start with the given `header`.
    ///
    /// Returns `None` for absent and empty geometries, for the `Header` source if the header has no envelope and
    /// for the `Body` source if the body is a geometry collection.
    pub fn extract(&self, header: &BinaryHeader, bytes: &[u8]) -> Result<Option<BoundingRect>> {
        if header.empty {
            return Ok(None);
        }

        match self {
            Self::Header => header.read_rect(bytes),
            Self::Body => {
                let mut reader = WkbReader::new(bytes.get(header.body_offset()..).unwrap_or_default());
                let mut scanner = BodyScanner::default();
                match scanner.scan_geometry(&mut reader)? {
                    ScanResult::Complete => Ok(scanner.rect),
                    ScanResult::Unsupported => Ok(None),
                }
            }
        }
    }
}

/// Extracts the 2d envelope of an encoded geometry, from the header if possible or from the body.
///
/// Returns `None` if the geometry is absent or empty, or if it is a geometry collection without a header
/// envelope.
pub fn extract_envelope(bytes: &[u8]) -> Result<Option<BoundingRect>> {
    let header = BinaryHeader::read(bytes)?;
    EnvelopeSource::for_header(&header).extract(&header, bytes)
}

enum ScanResult {
    Complete,
    Unsupported,
}

#[derive(Default)]
struct BodyScanner {
    rect: Option<BoundingRect>,
}

impl BodyScanner {
    fn add(&mut self, x: f64, y: f64) {
        match &mut self.rect {
            Some(rect) => rect.expand(x, y),
            None => self.rect = Some(BoundingRect::new(x, y, x, y)),
        }
    }

    fn scan_geometry(&mut self, reader: &mut WkbReader) -> Result<ScanResult> {
        let (order, code) = reader.read_body_header()?;
        let dims = code.dimensions;

        match code.geometry_type {
            GeometryType::Point => self.scan_coords(reader, order, dims, 1)?,
            GeometryType::LineString => self.scan_points(reader, order, dims)?,
            GeometryType::Polygon => self.scan_rings(reader, order, dims)?,
            GeometryType::MultiPoint => {
                let count = reader.read_count(order, 5 + dims.tuple_len() * 8)?;
                for _ in 0..count {
                    let (order, dims) = reader.read_member_header(GeometryType::Point)?;
                    self.scan_coords(reader, order, dims, 1)?;
                }
            }
            GeometryType::MultiLineString => {
                let count = reader.read_count(order, 4)?;
                for _ in 0..count {
                    self.scan_points(reader, order, dims)?;
                }
            }
            GeometryType::MultiPolygon => {
                let count = reader.read_count(order, 9)?;
                for _ in 0..count {
                    let (order, dims) = reader.read_member_header(GeometryType::Polygon)?;
                    self.scan_rings(reader, order, dims)?;
                }
            }
            GeometryType::GeometryCollection => {
                log::warn!("Envelope of a geometry collection cannot be computed from its body");
                return Ok(ScanResult::Unsupported);
            }
            other => {
                return Err(GeoPackageError::Format(format!(
                    "envelope of {other} geometries cannot be computed"
                )))
            }
        }

        Ok(ScanResult::Complete)
    }

    fn scan_coords(
        &mut self,
        reader: &mut WkbReader,
        order: ByteOrder,
        dims: Dimensions,
        count: usize,
    ) -> Result<()> {
        for _ in 0..count {
            let (x, y) = reader.read_xy(order, dims)?;
            self.add(x, y);
        }

        Ok(())
    }

    fn scan_points(&mut self, reader: &mut WkbReader, order: ByteOrder, dims: Dimensions) -> Result<()> {
        let count = reader.read_count(order, dims.tuple_len() * 8)?;
        self.scan_coords(reader, order, dims, count)
    }

    fn scan_rings(&mut self, reader: &mut WkbReader, order: ByteOrder, dims: Dimensions) -> Result<()> {
        let count = reader.read_count(order, 4)?;
        for _ in 0..count {
            self.scan_points(reader, order, dims)?;
        }

        Ok(())
    }
}
