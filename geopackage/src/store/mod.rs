//! In-memory feature tables with spatial index maintenance.
//!
//! [`FeatureStore`] is the single place where geometries are written. Every write validates the geometry against
//! the column, encodes it and updates the spatial index of the table in one step: if the index cannot be updated,
//! the write is undone.

use std::collections::BTreeSet;

use geopackage_types::{BoundingRect, Geometry};

use crate::codec::{decode, encode};
use crate::column::GeometryColumn;
use crate::envelope::extract_envelope;
use crate::error::Result;
use crate::index::{FeatureId, FeatureSource, SpatialIndex};
use crate::validate::validate;

mod extension;
pub use extension::{Extension, ExtensionRegistry, ExtensionScope, RTREE_INDEX_EXTENSION};

#[cfg(feature = "geojson")]
mod geojson;

mod options;
pub use options::{FeatureStoreBuilder, StoreOptions};

mod table;
use table::{FeatureTables, Row};

/// Non-geometry attributes of a feature.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Decoded feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Row id.
    pub id: FeatureId,
    /// Geometry, `None` if not set.
    pub geometry: Option<Geometry>,
    /// Attributes.
    pub properties: Properties,
}

/// Feature tables together with their spatial indices and the extension records.
///
/// ```
/// use geopackage::{FeatureStore, GeometryColumn};
/// use geopackage::geopackage_types::{BoundingRect, Coord, Geometry, GeometryType};
///
/// let mut store = FeatureStore::new();
/// store.create_feature_table(GeometryColumn::new("places", "geom", GeometryType::Point, 4326))?;
/// store.create_spatial_index("places")?;
///
/// let id = store.insert("places", Some(&Geometry::Point(Coord::xy(-122.4, 37.8))), Default::default())?;
///
/// let found = store.query_bounds("places", &BoundingRect::new(-123.0, 37.0, -122.0, 38.0))?;
/// assert!(found.contains(&id));
/// # Ok::<(), geopackage::GeoPackageError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    options: StoreOptions,
    tables: FeatureTables,
    index: SpatialIndex,
    extensions: ExtensionRegistry,
}

impl FeatureStore {
    /// Creates an empty store with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given options. See also [`FeatureStoreBuilder`].
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Options of the store.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Registered extensions.
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Spatial index of the store tables.
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Creates an empty feature table described by the column.
    ///
    /// If [`StoreOptions::auto_index`] is set, the table is spatially indexed right away.
    pub fn create_feature_table(&mut self, column: GeometryColumn) -> Result<()> {
        let table = column.table_name.clone();
        self.tables.create(column)?;
        log::debug!("Created feature table {table}");

        if self.options.auto_index {
            self.create_spatial_index(&table)?;
        }

        Ok(())
    }

    /// Geometry column of the table.
    pub fn geometry_column(&self, table: &str) -> Option<&GeometryColumn> {
        self.tables.geometry_column(table)
    }

    /// Names of the feature tables.
    pub fn tables(&self) -> impl Iterator<Item = &str> + '_ {
        self.tables.iter().map(|t| t.column.table_name.as_str())
    }

    /// Number of features in the table.
    pub fn count(&self, table: &str) -> Result<usize> {
        Ok(self.tables.get(table)?.rows.len())
    }

    /// Adds a feature to the table and returns its id.
    ///
    /// The geometry is checked against the column declaration and encoded with the column srid.
    pub fn insert(
        &mut self,
        table: &str,
        geometry: Option<&Geometry>,
        properties: Properties,
    ) -> Result<FeatureId> {
        let geometry = self.prepare(table, geometry)?;
        let id = self.tables.get_mut(table)?.push(Row {
            geometry,
            properties,
        });

        let maintenance = match self.tables.get(table)?.row(id)?.geometry.as_deref() {
            Some(bytes) => self.index.insert_entry(table, id, bytes),
            None => Ok(()),
        };

        if let Err(err) = maintenance {
            self.tables.get_mut(table)?.rows.remove(&id);
            return Err(err);
        }

        Ok(id)
    }

    /// Replaces the geometry of a feature.
    pub fn update(&mut self, table: &str, id: FeatureId, geometry: Option<&Geometry>) -> Result<()> {
        self.tables.get(table)?.row(id)?;
        let geometry = self.prepare(table, geometry)?;

        let row = self.tables.get_mut(table)?.row_mut(id)?;
        let previous = std::mem::replace(&mut row.geometry, geometry);

        let maintenance = self.index.update_entry(
            table,
            id,
            self.tables.get(table)?.row(id)?.geometry.as_deref(),
        );

        if let Err(err) = maintenance {
            self.tables.get_mut(table)?.row_mut(id)?.geometry = previous;
            return Err(err);
        }

        Ok(())
    }

    /// Replaces the attributes of a feature.
    pub fn update_properties(&mut self, table: &str, id: FeatureId, properties: Properties) -> Result<()> {
        self.tables.get_mut(table)?.row_mut(id)?.properties = properties;
        Ok(())
    }

    /// Removes a feature from the table.
    pub fn delete(&mut self, table: &str, id: FeatureId) -> Result<()> {
        let feature_table = self.tables.get_mut(table)?;
        feature_table.row(id)?;
        feature_table.rows.remove(&id);

        self.index.delete_entry(table, id);
        Ok(())
    }

    /// Returns the decoded feature.
    pub fn get(&self, table: &str, id: FeatureId) -> Result<Feature> {
        let row = self.tables.get(table)?.row(id)?;
        Self::decode_row(id, row)
    }

    /// Returns all features of the table, ordered by id.
    pub fn features(&self, table: &str) -> Result<Vec<Feature>> {
        self.tables
            .get(table)?
            .rows
            .iter()
            .map(|(id, row)| Self::decode_row(*id, row))
            .collect()
    }

    /// Returns the encoded geometry of a feature, `None` if the geometry is not set.
    pub fn raw_geometry(&self, table: &str, id: FeatureId) -> Result<Option<&[u8]>> {
        Ok(self.tables.get(table)?.row(id)?.geometry.as_deref())
    }

    /// Ids of the features of the table whose envelopes overlap `bounds`.
    ///
    /// Uses the spatial index if the table has one. Otherwise envelopes of all features are extracted, which gives
    /// the same result.
    pub fn query_bounds(&self, table: &str, bounds: &BoundingRect) -> Result<BTreeSet<FeatureId>> {
        let feature_table = self.tables.get(table)?;
        if self.index.has_index(table) {
            return self.index.query(table, bounds);
        }

        log::trace!(
            "Table {table} has no spatial index, scanning {} features",
            feature_table.rows.len()
        );

        let mut ids = BTreeSet::new();
        for (id, geometry) in self.tables.geometries(table) {
            let Some(bytes) = geometry else {
                continue;
            };

            if extract_envelope(bytes)?.is_some_and(|rect| rect.intersects(bounds)) {
                ids.insert(id);
            }
        }

        Ok(ids)
    }

    /// Creates the spatial index of the table and registers the index extension for its geometry column.
    ///
    /// Returns the number of indexed features.
    pub fn create_spatial_index(&mut self, table: &str) -> Result<usize> {
        self.tables.get(table)?;
        let count = self.index.create_index(&self.tables, table)?;
        let column = &self.tables.get(table)?.column;
        self.extensions.register(Extension::rtree_index(column));

        Ok(count)
    }

    /// Removes the spatial index of the table and the index extension record.
    pub fn drop_spatial_index(&mut self, table: &str) -> Result<()> {
        self.index.drop_index(table)?;
        if let Some(column) = self.tables.geometry_column(table) {
            self.extensions
                .remove(table, &column.column_name, RTREE_INDEX_EXTENSION);
        }

        Ok(())
    }

    /// Rebuilds the spatial index of the table from the stored geometries. Returns the number of indexed
    /// features.
    pub fn rebuild_spatial_index(&mut self, table: &str) -> Result<usize> {
        self.tables.get(table)?;
        self.index.rebuild_index(&self.tables, table)
    }

    /// Returns true if the table has a spatial index.
    pub fn has_spatial_index(&self, table: &str) -> bool {
        self.index.has_index(table)
    }

    fn prepare(&self, table: &str, geometry: Option<&Geometry>) -> Result<Option<Vec<u8>>> {
        let column = &self.tables.get(table)?.column;
        let Some(geometry) = geometry else {
            return Ok(None);
        };

        validate(geometry, column)?;
        encode(Some(geometry), column.srid, self.options.envelope_mode).map(Some)
    }

    fn decode_row(id: FeatureId, row: &Row) -> Result<Feature> {
        let geometry = match &row.geometry {
            Some(bytes) => decode(bytes)?.geometry,
            None => None,
        };

        Ok(Feature {
            id,
            geometry,
            properties: row.properties.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geopackage_types::{Coord, GeometryType, LineString};
    use serde_json::json;

    use super::*;
    use crate::codec::{BinaryHeader, EnvelopeMode};
    use crate::column::DimensionPolicy;
    use crate::error::GeoPackageError;

    fn properties(value: serde_json::Value) -> Properties {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Properties::new(),
        }
    }

    fn point(x: f64, y: f64) -> Geometry {
        Geometry::Point(Coord::xy(x, y))
    }

    fn places() -> FeatureStore {
        let mut store = FeatureStore::new();
        store
            .create_feature_table(GeometryColumn::new(
                "places",
                "geom",
                GeometryType::Point,
                4326,
            ))
            .expect("new table");
        store
    }

    #[test]
    fn insert_and_get() {
        let mut store = places();
        let id = store
            .insert("places", Some(&point(-122.4, 37.8)), properties(json!({"name": "SF"})))
            .expect("inserted");

        let feature = store.get("places", id).expect("exists");
        assert_eq!(feature.geometry, Some(point(-122.4, 37.8)));
        assert_eq!(feature.properties["name"], json!("SF"));

        let raw = store.raw_geometry("places", id).expect("exists").expect("set");
        let header = BinaryHeader::read(raw).expect("valid header");
        assert_eq!(header.srid, 4326);
        assert_eq!(header.envelope_mode, EnvelopeMode::Xy);
        assert_eq!(raw.len(), 61);
    }

    #[test]
    fn invalid_geometry_is_not_stored() {
        let mut store = places();
        let line = Geometry::LineString(LineString::new(vec![Coord::xy(0.0, 0.0), Coord::xy(1.0, 1.0)]));

        assert_matches!(
            store.insert("places", Some(&line), Properties::new()),
            Err(GeoPackageError::TypeMismatch(_))
        );
        assert_matches!(
            store.insert("places", Some(&Geometry::Point(Coord::xyz(0.0, 0.0, 1.0))), Properties::new()),
            Err(GeoPackageError::Dimension(_))
        );
        assert_eq!(store.count("places"), Ok(0));

        let id = store.insert("places", Some(&point(1.0, 1.0)), Properties::new()).expect("inserted");
        assert_matches!(
            store.update("places", id, Some(&line)),
            Err(GeoPackageError::TypeMismatch(_))
        );
        assert_eq!(store.get("places", id).map(|f| f.geometry), Ok(Some(point(1.0, 1.0))));
    }

    #[test]
    fn unknown_table_and_feature() {
        let mut store = places();
        assert_matches!(
            store.insert("roads", None, Properties::new()),
            Err(GeoPackageError::NotFound(_))
        );
        assert_matches!(store.get("places", 42), Err(GeoPackageError::NotFound(_)));
        assert_matches!(store.delete("places", 42), Err(GeoPackageError::NotFound(_)));
        assert_matches!(
            store.update("places", 42, None),
            Err(GeoPackageError::NotFound(_))
        );
        assert_matches!(
            store.create_feature_table(GeometryColumn::new("places", "geom", GeometryType::Point, 0)),
            Err(GeoPackageError::AlreadyExists(_))
        );
        assert_matches!(
            store.create_spatial_index("roads"),
            Err(GeoPackageError::NotFound(_))
        );
        assert_matches!(
            store.rebuild_spatial_index("roads"),
            Err(GeoPackageError::NotFound(_))
        );
    }

    #[test]
    fn index_follows_writes() {
        let mut store = places();
        store.create_spatial_index("places").expect("created");
        let bounds = BoundingRect::new(5.0, 5.0, 15.0, 15.0);

        let a = store.insert("places", Some(&point(0.0, 0.0)), Properties::new()).expect("inserted");
        let b = store.insert("places", Some(&point(10.0, 10.0)), Properties::new()).expect("inserted");
        let c = store.insert("places", None, Properties::new()).expect("inserted");
        assert_eq!(store.query_bounds("places", &bounds), Ok(BTreeSet::from([b])));

        store.update("places", a, Some(&point(6.0, 6.0))).expect("updated");
        store.update("places", c, Some(&point(7.0, 7.0))).expect("updated");
        store.update("places", b, None).expect("updated");
        assert_eq!(store.query_bounds("places", &bounds), Ok(BTreeSet::from([a, c])));

        store.delete("places", a).expect("deleted");
        assert_eq!(store.query_bounds("places", &bounds), Ok(BTreeSet::from([c])));
        assert_eq!(store.spatial_index().entry_count("places"), Some(1));
    }

    #[test]
    fn spatial_index_registers_extension() {
        let mut store = places();
        store.insert("places", Some(&point(1.0, 2.0)), Properties::new()).expect("inserted");

        assert_eq!(store.create_spatial_index("places"), Ok(1));
        assert!(store.has_spatial_index("places"));
        assert!(store
            .extensions()
            .has_extension("places", "geom", RTREE_INDEX_EXTENSION));

        store.drop_spatial_index("places").expect("dropped");
        assert!(!store.has_spatial_index("places"));
        assert!(!store
            .extensions()
            .has_extension("places", "geom", RTREE_INDEX_EXTENSION));
        assert_matches!(store.drop_spatial_index("places"), Err(GeoPackageError::IndexState(_)));
    }

    #[test]
    fn auto_index() {
        let mut store = FeatureStoreBuilder::new()
            .with_auto_index(true)
            .with_envelope_mode(EnvelopeMode::None)
            .build();
        let column = GeometryColumn::new("tracks", "geom", GeometryType::Geometry, 0)
            .with_z(DimensionPolicy::Optional);
        store.create_feature_table(column).expect("created");
        assert!(store.has_spatial_index("tracks"));

        let id = store
            .insert("tracks", Some(&Geometry::Point(Coord::xyz(1.0, 1.0, 5.0))), Properties::new())
            .expect("inserted");
        let raw = store.raw_geometry("tracks", id).expect("exists").expect("set");
        assert_eq!(BinaryHeader::read(raw).map(|h| h.envelope_mode), Ok(EnvelopeMode::None));
        assert_eq!(
            store.spatial_index().entry("tracks", id),
            Some(BoundingRect::new(1.0, 1.0, 1.0, 1.0))
        );
    }

    #[test]
    fn update_properties() {
        let mut store = places();
        let id = store.insert("places", None, properties(json!({"a": 1}))).expect("inserted");
        store
            .update_properties("places", id, properties(json!({"b": 2})))
            .expect("updated");

        let feature = store.get("places", id).expect("exists");
        assert_eq!(feature.geometry, None);
        assert_eq!(serde_json::Value::Object(feature.properties), json!({"b": 2}));
        assert_eq!(store.tables().collect::<Vec<_>>(), vec!["places"]);
    }
}
