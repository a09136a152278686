use std::collections::BTreeMap;

use crate::column::GeometryColumn;
use crate::error::{GeoPackageError, Result};
use crate::index::{FeatureId, FeatureSource};
use crate::store::Properties;

#[derive(Debug, Clone)]
pub(super) struct Row {
    pub geometry: Option<Vec<u8>>,
    pub properties: Properties,
}

#[derive(Debug, Clone)]
pub(super) struct FeatureTable {
    pub column: GeometryColumn,
    pub rows: BTreeMap<FeatureId, Row>,
    next_id: FeatureId,
}

impl FeatureTable {
    fn new(column: GeometryColumn) -> Self {
        Self {
            column,
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Adds the row with the next free id.
    pub fn push(&mut self, row: Row) -> FeatureId {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, row);
        id
    }

    pub fn row(&self, id: FeatureId) -> Result<&Row> {
        self.rows
            .get(&id)
            .ok_or_else(|| not_found(&self.column.table_name, id))
    }

    pub fn row_mut(&mut self, id: FeatureId) -> Result<&mut Row> {
        self.rows
            .get_mut(&id)
            .ok_or_else(|| not_found(&self.column.table_name, id))
    }
}

fn not_found(table: &str, id: FeatureId) -> GeoPackageError {
    GeoPackageError::NotFound(format!("feature {id} in table {table}"))
}

/// Feature tables of a store, by name.
#[derive(Debug, Clone, Default)]
pub(super) struct FeatureTables {
    tables: BTreeMap<String, FeatureTable>,
}

impl FeatureTables {
    pub fn create(&mut self, column: GeometryColumn) -> Result<()> {
        if self.tables.contains_key(&column.table_name) {
            return Err(GeoPackageError::AlreadyExists(format!(
                "feature table {}",
                column.table_name
            )));
        }

        self.tables
            .insert(column.table_name.clone(), FeatureTable::new(column));
        Ok(())
    }

    pub fn get(&self, table: &str) -> Result<&FeatureTable> {
        self.tables
            .get(table)
            .ok_or_else(|| GeoPackageError::NotFound(format!("feature table {table}")))
    }

    pub fn get_mut(&mut self, table: &str) -> Result<&mut FeatureTable> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| GeoPackageError::NotFound(format!("feature table {table}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureTable> + '_ {
        self.tables.values()
    }
}

impl FeatureSource for FeatureTables {
    fn geometry_column(&self, table: &str) -> Option<&GeometryColumn> {
        self.tables.get(table).map(|t| &t.column)
    }

    fn geometries(&self, table: &str) -> impl Iterator<Item = (FeatureId, Option<&[u8]>)> {
        self.tables
            .get(table)
            .into_iter()
            .flat_map(|t| t.rows.iter())
            .map(|(id, row)| (*id, row.geometry.as_deref()))
    }
}
