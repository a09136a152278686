//! Fixed 8 byte header that precedes every encoded geometry, and the optional envelope that follows it.

use bytes::BufMut;
use geopackage_types::{BoundingRect, Envelope};
use serde::{Deserialize, Serialize};

use crate::codec::reader::{ByteOrder, WkbReader};
use crate::error::{GeoPackageError, Result};

/// Magic bytes at the start of every encoded geometry (`GP`).
pub const MAGIC: [u8; 2] = [0x47, 0x50];

/// The only supported version of the binary format.
pub const VERSION: u8 = 0;

const BINARY_TYPE_BIT: u8 = 0b0010_0000;
const EMPTY_BIT: u8 = 0b0001_0000;
const ENVELOPE_MASK: u8 = 0b0000_1110;
const BYTE_ORDER_BIT: u8 = 0b0000_0001;

/// Which envelope is written into the header.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeMode {
    /// No envelope.
    None = 0,
    /// `[min_x, max_x, min_y, max_y]`.
    #[default]
    Xy = 1,
    /// `[min_x, max_x, min_y, max_y, min_z, max_z]`.
    Xyz = 2,
    /// `[min_x, max_x, min_y, max_y, min_m, max_m]`.
    Xym = 3,
    /// `[min_x, max_x, min_y, max_y, min_z, max_z, min_m, max_m]`.
    Xyzm = 4,
}

impl EnvelopeMode {
    /// Envelope type code stored in the header flags.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Mode for the envelope type code, or `None` for codes above 4.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Xy),
            2 => Some(Self::Xyz),
            3 => Some(Self::Xym),
            4 => Some(Self::Xyzm),
            _ => None,
        }
    }

    /// Number of `f64` values in the envelope.
    pub fn value_count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Xy => 4,
            Self::Xyz | Self::Xym => 6,
            Self::Xyzm => 8,
        }
    }

    /// Size of the envelope in bytes.
    pub fn byte_len(&self) -> usize {
        self.value_count() * 8
    }

    fn has_z(&self) -> bool {
        matches!(self, Self::Xyz | Self::Xyzm)
    }

    fn has_m(&self) -> bool {
        matches!(self, Self::Xym | Self::Xyzm)
    }
}

/// Decoded header of a binary geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BinaryHeader {
    /// Set for the extended binary type, which is not supported by this crate.
    pub extended: bool,
    /// Set when the encoded value is an absent geometry.
    pub empty: bool,
    /// Envelope written after the header.
    pub envelope_mode: EnvelopeMode,
    /// Byte order of the envelope values.
    pub byte_order: ByteOrder,
    /// Spatial reference id.
    pub srid: i32,
}

impl BinaryHeader {
    /// Size of the fixed part of the header in bytes.
    pub const SIZE: usize = 8;

    /// Header for a standard little-endian geometry.
    pub fn new(srid: i32, envelope_mode: EnvelopeMode, empty: bool) -> Self {
        Self {
            extended: false,
            empty,
            envelope_mode,
            byte_order: ByteOrder::LittleEndian,
            srid,
        }
    }

    /// Flags byte of the header.
    pub fn flags(&self) -> u8 {
        let mut flags = self.envelope_mode.code() << 1;
        if self.extended {
            flags |= BINARY_TYPE_BIT;
        }
        if self.empty {
            flags |= EMPTY_BIT;
        }
        if self.byte_order == ByteOrder::LittleEndian {
            flags |= BYTE_ORDER_BIT;
        }

        flags
    }

    /// Offset of the geometry body from the start of the data.
    pub fn body_offset(&self) -> usize {
        Self::SIZE + self.envelope_mode.byte_len()
    }

    /// Reads and validates the header at the start of `bytes`.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let mut reader = WkbReader::new(bytes);
        let magic = [reader.read_u8()?, reader.read_u8()?];
        if magic != MAGIC {
            return Err(GeoPackageError::Format(format!(
                "invalid magic bytes {magic:02x?}, expected {MAGIC:02x?}"
            )));
        }

        let version = reader.read_u8()?;
        if version != VERSION {
            return Err(GeoPackageError::Format(format!(
                "unsupported binary format version {version}"
            )));
        }

        let flags = reader.read_u8()?;
        let extended = flags & BINARY_TYPE_BIT != 0;
        if extended {
            return Err(GeoPackageError::Format(
                "extended geometry binary type is not supported".into(),
            ));
        }

        let envelope_code = (flags & ENVELOPE_MASK) >> 1;
        let envelope_mode = EnvelopeMode::from_code(envelope_code).ok_or_else(|| {
            GeoPackageError::Format(format!("invalid envelope type {envelope_code}"))
        })?;

        let byte_order = if flags & BYTE_ORDER_BIT != 0 {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        };

        // The srid is always big-endian, independent of the byte order flag.
        let srid = reader.read_i32(ByteOrder::BigEndian)?;

        let header = Self {
            extended,
            empty: flags & EMPTY_BIT != 0,
            envelope_mode,
            byte_order,
            srid,
        };

        if bytes.len() < header.body_offset() {
            return Err(GeoPackageError::Format(format!(
                "unexpected end of geometry data: envelope needs {} bytes, got {}",
                envelope_mode.byte_len(),
                bytes.len() - Self::SIZE
            )));
        }

        Ok(header)
    }

    /// Writes the header without the envelope.
    pub fn write(&self, buf: &mut impl BufMut) {
        buf.put_slice(&MAGIC);
        buf.put_u8(VERSION);
        buf.put_u8(self.flags());
        buf.put_i32(self.srid);
    }

    /// Reads the X/Y part of the envelope that follows the header, if the header has one.
    pub fn read_rect(&self, bytes: &[u8]) -> Result<Option<BoundingRect>> {
        if self.envelope_mode == EnvelopeMode::None {
            return Ok(None);
        }

        let mut reader = WkbReader::new(bytes.get(Self::SIZE..).unwrap_or_default());
        let x_min = reader.read_f64(self.byte_order)?;
        let x_max = reader.read_f64(self.byte_order)?;
        let y_min = reader.read_f64(self.byte_order)?;
        let y_max = reader.read_f64(self.byte_order)?;

        Ok(Some(BoundingRect::new(x_min, y_min, x_max, y_max)))
    }
}

/// Writes the envelope values for `mode` in little-endian order. Z or M ranges the envelope does not have are
/// written as `NaN`.
pub(crate) fn write_envelope(buf: &mut impl BufMut, envelope: &Envelope, mode: EnvelopeMode) {
    if mode == EnvelopeMode::None {
        return;
    }

    buf.put_f64_le(envelope.rect.x_min);
    buf.put_f64_le(envelope.rect.x_max);
    buf.put_f64_le(envelope.rect.y_min);
    buf.put_f64_le(envelope.rect.y_max);

    if mode.has_z() {
        let (min, max) = envelope.z_range.unwrap_or((f64::NAN, f64::NAN));
        buf.put_f64_le(min);
        buf.put_f64_le(max);
    }

    if mode.has_m() {
        let (min, max) = envelope.m_range.unwrap_or((f64::NAN, f64::NAN));
        buf.put_f64_le(min);
        buf.put_f64_le(max);
    }
}
