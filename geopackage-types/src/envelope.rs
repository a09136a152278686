use serde::{Deserialize, Serialize};

use crate::bounding_rect::BoundingRect;
use crate::coord::{Coord, Dimensions};
use crate::CartesianPoint2d;

/// Bounding box of a geometry with optional elevation and measure ranges.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// X and Y extent.
    pub rect: BoundingRect,
    /// `(min, max)` of Z values.
    pub z_range: Option<(f64, f64)>,
    /// `(min, max)` of M values.
    pub m_range: Option<(f64, f64)>,
}

impl Envelope {
    /// Computes the envelope of the coordinates. Z and M ranges are collected only if `dimensions` say the
    /// geometry has them. Returns `None` if there are no coordinates.
    pub fn from_coords<'a>(
        mut coords: impl Iterator<Item = &'a Coord>,
        dimensions: Dimensions,
    ) -> Option<Self> {
        let first = coords.next()?;
        let mut rect = BoundingRect::from_point(first);
        let mut z_range = dimensions.has_z.then(|| first.z().map(|z| (z, z))).flatten();
        let mut m_range = dimensions.has_m.then(|| first.m().map(|m| (m, m))).flatten();

        for coord in coords {
            rect.expand(coord.x(), coord.y());
            if let (Some((min, max)), Some(z)) = (z_range.as_mut(), coord.z()) {
                *min = min.min(z);
                *max = max.max(z);
            }
            if let (Some((min, max)), Some(m)) = (m_range.as_mut(), coord.m()) {
                *min = min.min(m);
                *max = max.max(m);
            }
        }

        Some(Self {
            rect,
            z_range,
            m_range,
        })
    }
}
