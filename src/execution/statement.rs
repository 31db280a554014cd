use crate::tuple::Column;

/// A parsed text command, ready for execution.
///
/// Key lookups and deletes go through the table's key index, so the
/// filtered column is always the table's first (integer key) column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable { table: String, columns: Vec<Column> },
    Insert { table: String, values: Vec<String> },
    SelectAll { table: String },
    SelectByKey { table: String, key: String },
    DeleteByKey { table: String, key: String },
}
