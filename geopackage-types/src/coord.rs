use num_traits::{Bounded, Num};
use serde::{Deserialize, Serialize};

use crate::error::GeoPackageTypesError;

/// A point in 2d cartesian space.
pub trait CartesianPoint2d {
    /// Numeric type of the coordinates.
    type Num: Num + Copy + PartialOrd + Bounded;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;
}

/// Which optional axes a geometry carries in addition to X and Y.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Dimensions {
    /// Elevation is present.
    pub has_z: bool,
    /// Measure is present.
    pub has_m: bool,
}

impl Dimensions {
    /// Two-dimensional geometry.
    pub const XY: Self = Self {
        has_z: false,
        has_m: false,
    };
    /// Geometry with elevation.
    pub const XYZ: Self = Self {
        has_z: true,
        has_m: false,
    };
    /// Geometry with measure.
    pub const XYM: Self = Self {
        has_z: false,
        has_m: true,
    };
    /// Geometry with elevation and measure.
    pub const XYZM: Self = Self {
        has_z: true,
        has_m: true,
    };

    /// Infers the dimensions from the length of a coordinate tuple.
    ///
    /// A tuple of 3 values is always taken as XYZ and a tuple of 4 values as XYZM. XYM data therefore cannot be
    /// told apart from XYZ data by its length.
    pub fn from_tuple_len(len: usize) -> Self {
        Self {
            has_z: len >= 3,
            has_m: len >= 4,
        }
    }

    /// Number of values in a coordinate tuple with these dimensions.
    pub fn tuple_len(&self) -> usize {
        2 + self.has_z as usize + self.has_m as usize
    }
}

/// A coordinate tuple with 2, 3 or 4 values.
///
/// The first two values are X and Y. A third value is treated as Z and the fourth as M.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Coord(Vec<f64>);

impl Coord {
    /// Creates a 2d coordinate.
    pub fn xy(x: f64, y: f64) -> Self {
        Self(vec![x, y])
    }

    /// Creates a coordinate with elevation.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self(vec![x, y, z])
    }

    /// Creates a coordinate with elevation and measure.
    pub fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self(vec![x, y, z, m])
    }

    /// Z value, if the tuple has at least 3 values.
    pub fn z(&self) -> Option<f64> {
        self.0.get(2).copied()
    }

    /// M value, if the tuple has 4 values.
    pub fn m(&self) -> Option<f64> {
        self.0.get(3).copied()
    }

    /// Number of values in the tuple.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Dimensions implied by the tuple length.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from_tuple_len(self.0.len())
    }

    /// All values of the tuple.
    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl CartesianPoint2d for Coord {
    type Num = f64;

    fn x(&self) -> f64 {
        self.0[0]
    }

    fn y(&self) -> f64 {
        self.0[1]
    }
}

impl TryFrom<Vec<f64>> for Coord {
    type Error = GeoPackageTypesError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        if !(2..=4).contains(&value.len()) {
            Err(GeoPackageTypesError::Conversion(format!(
                "coordinate must contain 2 to 4 values, got {}",
                value.len()
            )))
        } else {
            Ok(Coord(value))
        }
    }
}

impl TryFrom<&[f64]> for Coord {
    type Error = GeoPackageTypesError;

    fn try_from(value: &[f64]) -> Result<Self, Self::Error> {
        Self::try_from(value.to_vec())
    }
}

impl From<Coord> for Vec<f64> {
    fn from(value: Coord) -> Self {
        value.0
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self::xy(x, y)
    }
}

impl From<[f64; 2]> for Coord {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::xy(x, y)
    }
}

impl From<[f64; 3]> for Coord {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::xyz(x, y, z)
    }
}

impl From<[f64; 4]> for Coord {
    fn from([x, y, z, m]: [f64; 4]) -> Self {
        Self::xyzm(x, y, z, m)
    }
}
