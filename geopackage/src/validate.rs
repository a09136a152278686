//! Checks of geometry values against the geometry column they are written to.

use geopackage_types::Geometry;

use crate::column::{DimensionPolicy, GeometryColumn};
use crate::error::{GeoPackageError, Result};

/// Checks that the geometry can be stored in the column.
///
/// The runtime type of the geometry must be accepted by the declared column type (see
/// [`GeometryType::accepts`](geopackage_types::GeometryType::accepts)). Presence of Z and M is decided by the
/// length of the first coordinate tuple: 3 or more values mean Z, 4 values mean M. A 3-value tuple is always
/// counted as Z, even if the data is meant to be XYM.
pub fn validate(geometry: &Geometry, column: &GeometryColumn) -> Result<()> {
    let geometry_type = geometry.geometry_type();
    if !column.geometry_type.accepts(geometry_type) {
        return Err(GeoPackageError::TypeMismatch(format!(
            "column {}.{} of type {} cannot store {geometry_type} geometry",
            column.table_name, column.column_name, column.geometry_type
        )));
    }

    let dimensions = geometry.dimensions();
    check_dimension(column, "Z", column.z, dimensions.has_z)?;
    check_dimension(column, "M", column.m, dimensions.has_m)?;

    Ok(())
}

fn check_dimension(
    column: &GeometryColumn,
    axis: &str,
    policy: DimensionPolicy,
    present: bool,
) -> Result<()> {
    if policy.allows(present) {
        return Ok(());
    }

    let rule = match policy {
        DimensionPolicy::Prohibited => "prohibits",
        _ => "requires",
    };

    Err(GeoPackageError::Dimension(format!(
        "column {}.{} {rule} {axis} values",
        column.table_name, column.column_name
    )))
}
