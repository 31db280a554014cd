use crate::catalog::Catalog;
use crate::common::{DbError, Result};
use crate::tuple::{Schema, Value};

use super::Statement;

/// Dispatches parsed statements against the catalog and formats results
/// as text. Every [`Statement`] variant maps to one call sequence into the
/// catalog, heap, and index; failures surface as [`DbError`] and are never
/// retried here.
pub struct ExecutionEngine {
    catalog: Catalog,
}

impl ExecutionEngine {
    /// Creates an engine over the given catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Executes one statement, returning its human-readable result.
    pub fn execute(&mut self, statement: Statement) -> Result<String> {
        match statement {
            Statement::CreateTable { table, columns } => {
                self.catalog.create_table(&table, Schema::new(columns))?;
                Ok("Table created".to_string())
            }
            Statement::Insert { table, values } => self.insert(&table, &values),
            Statement::SelectAll { table } => self.select_all(&table),
            Statement::SelectByKey { table, key } => self.select_by_key(&table, &key),
            Statement::DeleteByKey { table, key } => self.delete_by_key(&table, &key),
        }
    }

    fn insert(&mut self, table: &str, values: &[String]) -> Result<String> {
        let meta = self.catalog.table_mut(table)?;

        // Encode validates the column count and every literal before any
        // page is touched, so a bad row leaves no residue.
        let tuple = meta.schema().encode(values)?;
        let key = parse_key(values.first().ok_or(DbError::ColumnCountMismatch {
            expected: 1,
            got: 0,
        })?)?;
        if meta.index().search(key).is_some() {
            return Err(DbError::DuplicateKey(key));
        }

        let rid = meta.heap().insert(tuple.data())?;
        meta.index_mut().insert(key, rid);
        Ok("Inserted".to_string())
    }

    fn select_all(&self, table: &str) -> Result<String> {
        let meta = self.catalog.table(table)?;

        let mut lines = Vec::new();
        for (_rid, tuple) in meta.heap().scan()? {
            let values = meta.schema().decode(tuple.data())?;
            lines.push(format_row(&values));
        }
        Ok(lines.join("\n"))
    }

    fn select_by_key(&self, table: &str, key: &str) -> Result<String> {
        let meta = self.catalog.table(table)?;

        let key = parse_key(key)?;
        match meta.index().search(key) {
            Some(&rid) => {
                let tuple = meta.heap().get(rid)?;
                let values = meta.schema().decode(tuple.data())?;
                Ok(format_row(&values))
            }
            None => Ok("NOT FOUND".to_string()),
        }
    }

    fn delete_by_key(&mut self, table: &str, key: &str) -> Result<String> {
        let meta = self.catalog.table_mut(table)?;

        let key = parse_key(key)?;
        match meta.index().search(key).copied() {
            Some(rid) => {
                meta.heap().delete(rid)?;
                meta.index_mut().remove(key);
                Ok("Deleted".to_string())
            }
            None => Ok("NOT FOUND".to_string()),
        }
    }
}

fn parse_key(literal: &str) -> Result<i32> {
    literal
        .parse()
        .map_err(|_| DbError::InvalidLiteral(literal.to_string()))
}

fn format_row(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferPoolManager;
    use crate::execution::parse;
    use crate::storage::disk::DiskManager;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn create_engine() -> (ExecutionEngine, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let dm = Arc::new(DiskManager::new(temp_file.path()).unwrap());
        let bpm = Arc::new(BufferPoolManager::new(8, dm));
        (ExecutionEngine::new(Catalog::new(bpm)), temp_file)
    }

    fn run(engine: &mut ExecutionEngine, sql: &str) -> Result<String> {
        engine.execute(parse(sql).unwrap())
    }

    #[test]
    fn test_create_insert_select() {
        let (mut engine, _file) = create_engine();

        assert_eq!(
            run(&mut engine, "CREATE TABLE t (id int, name char(8))").unwrap(),
            "Table created"
        );
        assert_eq!(
            run(&mut engine, "INSERT INTO t VALUES (1, 'alice')").unwrap(),
            "Inserted"
        );
        assert_eq!(
            run(&mut engine, "SELECT * FROM t WHERE id = 1").unwrap(),
            "1 alice"
        );
    }

    #[test]
    fn test_select_all_lists_rows_in_insert_order() {
        let (mut engine, _file) = create_engine();

        run(&mut engine, "CREATE TABLE t (id int, name char(8))").unwrap();
        run(&mut engine, "INSERT INTO t VALUES (2, 'bob')").unwrap();
        run(&mut engine, "INSERT INTO t VALUES (1, 'alice')").unwrap();

        assert_eq!(
            run(&mut engine, "SELECT * FROM t").unwrap(),
            "2 bob\n1 alice"
        );
    }

    #[test]
    fn test_select_all_empty_table() {
        let (mut engine, _file) = create_engine();

        run(&mut engine, "CREATE TABLE t (id int)").unwrap();
        assert_eq!(run(&mut engine, "SELECT * FROM t").unwrap(), "");
    }

    #[test]
    fn test_select_missing_key() {
        let (mut engine, _file) = create_engine();

        run(&mut engine, "CREATE TABLE t (id int)").unwrap();
        assert_eq!(
            run(&mut engine, "SELECT * FROM t WHERE id = 9").unwrap(),
            "NOT FOUND"
        );
    }

    #[test]
    fn test_delete_then_select() {
        let (mut engine, _file) = create_engine();

        run(&mut engine, "CREATE TABLE t (id int, name char(8))").unwrap();
        run(&mut engine, "INSERT INTO t VALUES (1, 'alice')").unwrap();

        assert_eq!(
            run(&mut engine, "DELETE FROM t WHERE id = 1").unwrap(),
            "Deleted"
        );
        assert_eq!(
            run(&mut engine, "SELECT * FROM t WHERE id = 1").unwrap(),
            "NOT FOUND"
        );
        assert_eq!(
            run(&mut engine, "DELETE FROM t WHERE id = 1").unwrap(),
            "NOT FOUND"
        );
    }

    #[test]
    fn test_duplicate_key_rejected_without_residue() {
        let (mut engine, _file) = create_engine();

        run(&mut engine, "CREATE TABLE t (id int, name char(8))").unwrap();
        run(&mut engine, "INSERT INTO t VALUES (1, 'alice')").unwrap();

        assert!(matches!(
            run(&mut engine, "INSERT INTO t VALUES (1, 'mallory')"),
            Err(DbError::DuplicateKey(1))
        ));
        assert_eq!(run(&mut engine, "SELECT * FROM t").unwrap(), "1 alice");
    }

    #[test]
    fn test_insert_into_missing_table() {
        let (mut engine, _file) = create_engine();

        assert!(matches!(
            run(&mut engine, "INSERT INTO ghost VALUES (1)"),
            Err(DbError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_insert_bad_literal_leaves_table_unchanged() {
        let (mut engine, _file) = create_engine();

        run(&mut engine, "CREATE TABLE t (id int, name char(8))").unwrap();
        assert!(matches!(
            run(&mut engine, "INSERT INTO t VALUES (abc, 'alice')"),
            Err(DbError::InvalidLiteral(_))
        ));
        assert_eq!(run(&mut engine, "SELECT * FROM t").unwrap(), "");
    }

    #[test]
    fn test_column_count_mismatch() {
        let (mut engine, _file) = create_engine();

        run(&mut engine, "CREATE TABLE t (id int, name char(8))").unwrap();
        assert!(matches!(
            run(&mut engine, "INSERT INTO t VALUES (1)"),
            Err(DbError::ColumnCountMismatch {
                expected: 2,
                got: 1
            })
        ));
    }
}
