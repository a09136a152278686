use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::column::GeometryColumn;

/// Name of the extension registered for spatially indexed geometry columns.
pub const RTREE_INDEX_EXTENSION: &str = "gpkg_rtree_index";

const RTREE_INDEX_DEFINITION: &str = "http://www.geopackage.org/spec120/#extension_rtree";

/// Operations affected by an extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionScope {
    /// Readers and writers must support the extension.
    ReadWrite,
    /// Only writers must support the extension.
    WriteOnly,
}

impl Display for ExtensionScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExtensionScope::ReadWrite => "read-write",
            ExtensionScope::WriteOnly => "write-only",
        })
    }
}

/// Record about an extension used by a table column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Extension {
    /// Table the extension applies to.
    pub table_name: String,
    /// Column the extension applies to.
    pub column_name: String,
    /// Extension name, e.g. [`RTREE_INDEX_EXTENSION`].
    pub extension_name: String,
    /// Reference to the extension definition.
    pub definition: String,
    /// Affected operations.
    pub scope: ExtensionScope,
}

impl Extension {
    /// Spatial index record for the column.
    pub fn rtree_index(column: &GeometryColumn) -> Self {
        Self {
            table_name: column.table_name.clone(),
            column_name: column.column_name.clone(),
            extension_name: RTREE_INDEX_EXTENSION.to_string(),
            definition: RTREE_INDEX_DEFINITION.to_string(),
            scope: ExtensionScope::WriteOnly,
        }
    }

    fn is(&self, table: &str, column: &str, name: &str) -> bool {
        self.table_name == table && self.column_name == column && self.extension_name == name
    }
}

/// List of the extensions in use.
///
/// There is at most one record for each table, column and extension name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtensionRegistry {
    extensions: Vec<Extension>,
}

impl ExtensionRegistry {
    /// Adds the record, replacing the existing one for the same table, column and extension.
    pub fn register(&mut self, extension: Extension) {
        match self.extensions.iter_mut().find(|e| {
            e.is(
                &extension.table_name,
                &extension.column_name,
                &extension.extension_name,
            )
        }) {
            Some(existing) => *existing = extension,
            None => self.extensions.push(extension),
        }
    }

    /// Removes the record. Returns false if there was none.
    pub fn remove(&mut self, table: &str, column: &str, name: &str) -> bool {
        let len = self.extensions.len();
        self.extensions.retain(|e| !e.is(table, column, name));
        self.extensions.len() != len
    }

    /// Returns true if the extension is registered for the column.
    pub fn has_extension(&self, table: &str, column: &str, name: &str) -> bool {
        self.get(table, column, name).is_some()
    }

    /// Record of the extension for the column.
    pub fn get(&self, table: &str, column: &str, name: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.is(table, column, name))
    }

    /// Iterates over all records.
    pub fn iter(&self) -> impl Iterator<Item = &Extension> + '_ {
        self.extensions.iter()
    }
}
