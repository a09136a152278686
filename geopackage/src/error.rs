//! Error types used by the crate.

use geopackage_types::error::GeoPackageTypesError;
use thiserror::Error;

/// GeoPackage error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoPackageError {
    /// Encoded geometry data is malformed: bad magic, unsupported version, unknown type code or truncated data.
    #[error("invalid geometry data: {0}")]
    Format(String),
    /// Runtime type of a geometry is not compatible with the declared type of the column.
    #[error("geometry type mismatch: {0}")]
    TypeMismatch(String),
    /// Z or M presence of a geometry violates the column policy.
    #[error("invalid geometry dimensions: {0}")]
    Dimension(String),
    /// Spatial index operation is not valid in the current index state.
    #[error("spatial index error: {0}")]
    IndexState(String),
    /// Table or feature does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Feature table with this name is already registered.
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// Geometry value cannot be built or converted.
    #[error(transparent)]
    Conversion(#[from] GeoPackageTypesError),
}

/// Result type of the crate operations.
pub type Result<T> = std::result::Result<T, GeoPackageError>;
