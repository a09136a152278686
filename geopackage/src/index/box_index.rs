use std::collections::BTreeMap;

use geopackage_types::BoundingRect;

use crate::FeatureId;

/// Storage primitive for the spatial index: a set of feature ids with their bounding rectangles.
///
/// A storage engine can provide its own implementation (e.g. an R-tree virtual table). [`MemoryBoxIndex`] is the
/// in-memory one.
pub trait BoxIndex {
    /// Inserts the rectangle for the id, replacing the previous one if there was any.
    fn insert(&mut self, id: FeatureId, rect: BoundingRect);
    /// Removes the entry for the id. Returns false if there was no entry.
    fn remove(&mut self, id: FeatureId) -> bool;
    /// Removes all entries.
    fn clear(&mut self);
    /// Number of entries.
    fn len(&self) -> usize;
    /// Returns true if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Rectangle stored for the id.
    fn get(&self, id: FeatureId) -> Option<BoundingRect>;
    /// Ids of all entries whose rectangle overlaps `rect`, touching borders included.
    fn search(&self, rect: &BoundingRect) -> Vec<FeatureId>;
}

/// In-memory [`BoxIndex`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBoxIndex {
    entries: BTreeMap<FeatureId, BoundingRect>,
}

impl BoxIndex for MemoryBoxIndex {
    fn insert(&mut self, id: FeatureId, rect: BoundingRect) {
        self.entries.insert(id, rect);
    }

    fn remove(&mut self, id: FeatureId) -> bool {
        self.entries.remove(&id).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, id: FeatureId) -> Option<BoundingRect> {
        self.entries.get(&id).copied()
    }

    fn search(&self, rect: &BoundingRect) -> Vec<FeatureId> {
        self.entries
            .iter()
            .filter(|(_, stored)| stored.intersects(rect))
            .map(|(id, _)| *id)
            .collect()
    }
}
