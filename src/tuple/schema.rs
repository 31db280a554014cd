use crate::common::{DbError, Result};

use super::{DataType, Tuple, Value};

/// A single column definition: name and logical type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    data_type: DataType,
}

impl Column {
    /// Creates a new column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column data type.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }
}

/// The schema of a table: an ordered list of columns, where column order is
/// the wire order. Every encode and decode of one table's tuples must go
/// through the same schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
    tuple_size: usize,
}

impl Schema {
    /// Creates a new schema from a list of columns.
    pub fn new(columns: Vec<Column>) -> Self {
        let tuple_size = columns.iter().map(|c| c.data_type().fixed_size()).sum();
        Self {
            columns,
            tuple_size,
        }
    }

    /// Returns the number of columns in the schema.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column at the given index.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns an iterator over all columns.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns the total payload width in bytes of a tuple under this schema.
    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    /// Encodes one literal per column into a tuple payload.
    /// Fails with ColumnCountMismatch if the literal count is wrong, and
    /// with InvalidLiteral if an integer literal does not parse; no bytes
    /// are produced unless every literal parses.
    pub fn encode<S: AsRef<str>>(&self, literals: &[S]) -> Result<Tuple> {
        if literals.len() != self.columns.len() {
            return Err(DbError::ColumnCountMismatch {
                expected: self.columns.len(),
                got: literals.len(),
            });
        }

        // Parse everything before serializing anything
        let values = self
            .columns
            .iter()
            .zip(literals)
            .map(|(col, lit)| Value::parse(col.data_type(), lit.as_ref()))
            .collect::<Result<Vec<Value>>>()?;

        let mut buf = Vec::with_capacity(self.tuple_size);
        for (col, value) in self.columns.iter().zip(&values) {
            value.serialize_into(col.data_type(), &mut buf);
        }

        Ok(Tuple::from_bytes(buf))
    }

    /// Decodes a tuple payload into one value per column.
    /// Fails with TruncatedPayload if the payload is shorter than the
    /// schema's total width.
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<Value>> {
        if payload.len() < self.tuple_size {
            return Err(DbError::TruncatedPayload {
                expected: self.tuple_size,
                got: payload.len(),
            });
        }

        let mut values = Vec::with_capacity(self.columns.len());
        let mut offset = 0;
        for col in &self.columns {
            let width = col.data_type().fixed_size();
            values.push(Value::deserialize(
                col.data_type(),
                &payload[offset..offset + width],
            ));
            offset += width;
        }
        Ok(values)
    }
}
