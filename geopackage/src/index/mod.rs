//! Spatial index of feature tables.
//!
//! [`SpatialIndex`] keeps one [`BoxIndex`] per indexed table, mapping feature ids to the 2d envelopes of their
//! geometries. The owner of the feature data must call the maintenance methods
//! ([`SpatialIndex::insert_entry`], [`SpatialIndex::update_entry`], [`SpatialIndex::delete_entry`]) after every
//! geometry change, so that the index always matches the data (see [`FeatureStore`](crate::FeatureStore) which
//! does this).

use std::collections::{BTreeSet, HashMap};

use geopackage_types::BoundingRect;

use crate::column::GeometryColumn;
use crate::envelope::extract_envelope;
use crate::error::{GeoPackageError, Result};

mod box_index;
pub use box_index::{BoxIndex, MemoryBoxIndex};

/// Row id of a feature.
pub type FeatureId = i64;

/// Read access to the encoded geometries of feature tables, used to build indices.
pub trait FeatureSource {
    /// Geometry column of the table, or `None` if the table does not exist or has no geometry column.
    fn geometry_column(&self, table: &str) -> Option<&GeometryColumn>;

    /// Iterates over the features of the table with their encoded geometries. `None` means that the geometry
    /// column of the feature is not set.
    fn geometries(&self, table: &str) -> impl Iterator<Item = (FeatureId, Option<&[u8]>)>;
}

/// Spatial index of feature tables.
#[derive(Debug, Clone)]
pub struct SpatialIndex<I = MemoryBoxIndex> {
    tables: HashMap<String, I>,
}

impl<I> Default for SpatialIndex<I> {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }
}

impl<I: BoxIndex + Default> SpatialIndex<I> {
    /// Creates an index without any indexed tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the table is indexed.
    pub fn has_index(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Number of entries in the index of the table, `None` if the table is not indexed.
    pub fn entry_count(&self, table: &str) -> Option<usize> {
        self.tables.get(table).map(BoxIndex::len)
    }

    /// Envelope stored for the feature, `None` if the feature has no entry or the table is not indexed.
    pub fn entry(&self, table: &str, id: FeatureId) -> Option<BoundingRect> {
        self.tables.get(table).and_then(|index| index.get(id))
    }

    /// Creates an index for the table and fills it with the current features of the table.
    ///
    /// Fails if the table is already indexed, if it has no geometry column or if one of the stored geometries
    /// cannot be read. On failure no index is created. Returns the number of indexed features.
    pub fn create_index(&mut self, source: &impl FeatureSource, table: &str) -> Result<usize> {
        if self.has_index(table) {
            return Err(GeoPackageError::IndexState(format!(
                "spatial index for table {table} already exists"
            )));
        }

        let entries = Self::collect_entries(source, table)?;
        let mut index = I::default();
        let count = Self::fill(&mut index, entries);
        self.tables.insert(table.to_string(), index);

        log::debug!("Created spatial index for table {table} with {count} entries");
        Ok(count)
    }

    /// Removes the index of the table. Fails if the table is not indexed.
    pub fn drop_index(&mut self, table: &str) -> Result<()> {
        if self.tables.remove(table).is_none() {
            return Err(Self::missing(table));
        }

        log::debug!("Dropped spatial index for table {table}");
        Ok(())
    }

    /// Replaces the content of the table index with the envelopes of the current features.
    ///
    /// Fails if the table is not indexed or one of the geometries cannot be read. On failure the previous content
    /// of the index is kept. Returns the number of indexed features.
    pub fn rebuild_index(&mut self, source: &impl FeatureSource, table: &str) -> Result<usize> {
        let index = self
            .tables
            .get_mut(table)
            .ok_or_else(|| Self::missing(table))?;
        let entries = Self::collect_entries(source, table)?;
        index.clear();
        let count = Self::fill(index, entries);

        log::debug!("Rebuilt spatial index for table {table}: {count} entries");
        Ok(count)
    }

    /// Adds the entry for a new feature. Does nothing if the table is not indexed.
    ///
    /// If no envelope can be extracted from the geometry (it is empty, or a collection without a header envelope),
    /// the feature is left without an entry.
    pub fn insert_entry(&mut self, table: &str, id: FeatureId, geometry: &[u8]) -> Result<()> {
        self.update_entry(table, id, Some(geometry))
    }

    /// Replaces the entry of a feature after its geometry was changed. Does nothing if the table is not indexed.
    ///
    /// `None` means the geometry was unset, in which case the entry is removed.
    pub fn update_entry(&mut self, table: &str, id: FeatureId, geometry: Option<&[u8]>) -> Result<()> {
        let Some(index) = self.tables.get_mut(table) else {
            return Ok(());
        };

        let Some(bytes) = geometry else {
            log::trace!("Index entry {table}:{id} removed: geometry is not set");
            index.remove(id);
            return Ok(());
        };

        match extract_envelope(bytes)? {
            Some(rect) => {
                log::trace!("Index entry {table}:{id} set to {rect:?}");
                index.insert(id, rect);
            }
            None => {
                log::warn!("Feature {table}:{id} is left unindexed: its envelope cannot be computed");
                index.remove(id);
            }
        }

        Ok(())
    }

    /// Removes the entry of a deleted feature. Does nothing if the table is not indexed.
    pub fn delete_entry(&mut self, table: &str, id: FeatureId) {
        if let Some(index) = self.tables.get_mut(table) {
            if index.remove(id) {
                log::trace!("Index entry {table}:{id} deleted");
            }
        }
    }

    /// Ids of the features whose envelopes overlap the given rectangle.
    ///
    /// Touching rectangles overlap. Since the entries are envelopes, the result can contain features whose
    /// geometries do not actually intersect `bounds`. Fails if the table is not indexed.
    pub fn query(&self, table: &str, bounds: &BoundingRect) -> Result<BTreeSet<FeatureId>> {
        let index = self.tables.get(table).ok_or_else(|| Self::missing(table))?;
        Ok(index.search(bounds).into_iter().collect())
    }

    /// Envelopes of all features of the table. Nothing is written to the index until all geometries are read.
    fn collect_entries(
        source: &impl FeatureSource,
        table: &str,
    ) -> Result<Vec<(FeatureId, BoundingRect)>> {
        if source.geometry_column(table).is_none() {
            return Err(GeoPackageError::IndexState(format!(
                "table {table} has no geometry column"
            )));
        }

        let mut entries = vec![];
        for (id, geometry) in source.geometries(table) {
            let Some(bytes) = geometry else {
                continue;
            };

            match extract_envelope(bytes)? {
                Some(rect) => entries.push((id, rect)),
                None => log::warn!("Feature {table}:{id} is left unindexed: its envelope cannot be computed"),
            }
        }

        Ok(entries)
    }

    fn fill(index: &mut I, entries: Vec<(FeatureId, BoundingRect)>) -> usize {
        for (id, rect) in entries {
            index.insert(id, rect);
        }

        index.len()
    }

    fn missing(table: &str) -> GeoPackageError {
        GeoPackageError::IndexState(format!("table {table} has no spatial index"))
    }
}
