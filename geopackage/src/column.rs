//! Geometry column metadata.

use geopackage_types::error::GeoPackageTypesError;
use geopackage_types::GeometryType;
use serde::{Deserialize, Serialize};

use crate::error::{GeoPackageError, Result};

/// Rule for the presence of Z or M values in the geometries of a column.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionPolicy {
    /// Values must not be present.
    #[default]
    Prohibited = 0,
    /// Values must be present.
    Mandatory = 1,
    /// Values may be present.
    Optional = 2,
}

impl DimensionPolicy {
    /// Returns true if a geometry with (`present = true`) or without the values is allowed.
    pub fn allows(&self, present: bool) -> bool {
        match self {
            DimensionPolicy::Prohibited => !present,
            DimensionPolicy::Mandatory => present,
            DimensionPolicy::Optional => true,
        }
    }
}

impl TryFrom<u8> for DimensionPolicy {
    type Error = GeoPackageError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Prohibited),
            1 => Ok(Self::Mandatory),
            2 => Ok(Self::Optional),
            v => Err(GeoPackageTypesError::Conversion(format!(
                "invalid dimension policy value {v}"
            ))
            .into()),
        }
    }
}

/// Geometry column of a feature table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeometryColumn {
    /// Name of the feature table.
    pub table_name: String,
    /// Name of the geometry column.
    pub column_name: String,
    /// Declared geometry type.
    pub geometry_type: GeometryType,
    /// Spatial reference id of the stored geometries.
    pub srid: i32,
    /// Z values policy.
    pub z: DimensionPolicy,
    /// M values policy.
    pub m: DimensionPolicy,
}

impl GeometryColumn {
    /// Creates a new 2d column description: Z and M are prohibited.
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        geometry_type: GeometryType,
        srid: i32,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            geometry_type,
            srid,
            z: DimensionPolicy::Prohibited,
            m: DimensionPolicy::Prohibited,
        }
    }

    /// Sets the Z policy.
    pub fn with_z(mut self, z: DimensionPolicy) -> Self {
        self.z = z;
        self
    }

    /// Sets the M policy.
    pub fn with_m(mut self, m: DimensionPolicy) -> Self {
        self.m = m;
        self
    }
}
