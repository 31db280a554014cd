use std::collections::HashMap;
use std::sync::Arc;

use crate::buffer::BufferPoolManager;
use crate::common::{DbError, Result};
use crate::index::RidIndex;
use crate::storage::TableHeap;
use crate::tuple::Schema;

/// Per-table state: the schema used for every encode and decode, the heap
/// holding tuple bytes, and the key index mapping integer keys to RIDs.
pub struct TableMeta {
    schema: Schema,
    heap: TableHeap,
    index: RidIndex,
}

impl TableMeta {
    /// Returns the table's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the table's heap.
    pub fn heap(&self) -> &TableHeap {
        &self.heap
    }

    /// Returns the table's key index.
    pub fn index(&self) -> &RidIndex {
        &self.index
    }

    /// Returns the table's key index for mutation.
    pub fn index_mut(&mut self) -> &mut RidIndex {
        &mut self.index
    }
}

/// Registry mapping table names to their per-table state. The catalog is
/// the single owner of every table's schema, heap, and index; callers
/// borrow a table only for the scope of one operation.
pub struct Catalog {
    buffer_pool: Arc<BufferPoolManager>,
    tables: HashMap<String, TableMeta>,
}

impl Catalog {
    /// Creates an empty catalog backed by the given buffer pool.
    pub fn new(buffer_pool: Arc<BufferPoolManager>) -> Self {
        Self {
            buffer_pool,
            tables: HashMap::new(),
        }
    }

    /// Registers a new table under the given name, creating a fresh heap
    /// and an empty index bound to the schema.
    /// Fails with TableAlreadyExists if the name is taken.
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(DbError::TableAlreadyExists(name.to_string()));
        }

        let heap = TableHeap::create(Arc::clone(&self.buffer_pool))?;
        let index = RidIndex::new();
        self.tables.insert(
            name.to_string(),
            TableMeta {
                schema,
                heap,
                index,
            },
        );
        Ok(())
    }

    /// Looks up a table by name.
    /// Fails with TableNotFound if the name is unregistered.
    pub fn table(&self, name: &str) -> Result<&TableMeta> {
        self.tables
            .get(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Looks up a table by name for mutation.
    /// Fails with TableNotFound if the name is unregistered.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut TableMeta> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Returns true if a table with the given name is registered.
    pub fn exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::disk::DiskManager;
    use crate::tuple::{Column, DataType};
    use tempfile::NamedTempFile;

    fn create_catalog() -> (Catalog, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let dm = Arc::new(DiskManager::new(temp_file.path()).unwrap());
        let bpm = Arc::new(BufferPoolManager::new(8, dm));
        (Catalog::new(bpm), temp_file)
    }

    fn test_schema() -> Schema {
        Schema::new(vec![
            Column::new("id", DataType::Integer),
            Column::new("name", DataType::Char(8)),
        ])
    }

    #[test]
    fn test_create_and_lookup() {
        let (mut catalog, _file) = create_catalog();

        assert!(!catalog.exists("users"));
        catalog.create_table("users", test_schema()).unwrap();
        assert!(catalog.exists("users"));

        let meta = catalog.table("users").unwrap();
        assert_eq!(meta.schema().column_count(), 2);
        assert!(meta.index().is_empty());
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let (mut catalog, _file) = create_catalog();

        catalog.create_table("users", test_schema()).unwrap();
        assert!(matches!(
            catalog.create_table("users", test_schema()),
            Err(DbError::TableAlreadyExists(_))
        ));
    }

    #[test]
    fn test_missing_table() {
        let (catalog, _file) = create_catalog();

        assert!(matches!(
            catalog.table("ghost"),
            Err(DbError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_tables_get_distinct_heaps() {
        let (mut catalog, _file) = create_catalog();

        catalog.create_table("a", test_schema()).unwrap();
        catalog.create_table("b", test_schema()).unwrap();

        let first = catalog.table("a").unwrap().heap().first_page_id();
        let second = catalog.table("b").unwrap().heap().first_page_id();
        assert_ne!(first, second);
    }
}
