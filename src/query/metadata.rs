//! Column metadata for result sets.
//!
//! Columns are addressed with 1-based indices, as in SQL client APIs.

use crate::error::QueryError;
use crate::transport::messages::ColumnDescriptor;
use crate::types::{LogicalType, SqlType, TargetKind, TypeMapper};

/// Whether a column admits NULL values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    NoNulls,
    Nullable,
}

/// Random-access view over a result's column descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSetMetadata {
    columns: Vec<ColumnDescriptor>,
}

impl ResultSetMetadata {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Descriptor of a column.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ColumnIndexOutOfBounds` unless `1 <= index <= column_count()`.
    pub fn column(&self, index: usize) -> Result<&ColumnDescriptor, QueryError> {
        index
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .ok_or(QueryError::ColumnIndexOutOfBounds {
                index,
                count: self.columns.len(),
            })
    }

    /// 1-based index of the first column with this name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.column_name.as_deref() == Some(name))
            .map(|i| i + 1)
    }

    /// Logical type of a column looked up by name, falling back to its
    /// 0-based position in the row when no descriptor carries the name.
    pub(crate) fn logical_type_for(&self, name: &str, position: usize) -> Option<&LogicalType> {
        self.columns
            .iter()
            .find(|c| c.column_name.as_deref() == Some(name))
            .or_else(|| self.columns.get(position))
            .map(|c| &c.data_type)
    }

    pub fn column_name(&self, index: usize) -> Result<&str, QueryError> {
        Ok(self.column(index)?.column_name.as_deref().unwrap_or_default())
    }

    /// Same as [`column_name`](Self::column_name); the service has no aliases.
    pub fn column_label(&self, index: usize) -> Result<&str, QueryError> {
        self.column_name(index)
    }

    pub fn logical_type(&self, index: usize) -> Result<&LogicalType, QueryError> {
        Ok(&self.column(index)?.data_type)
    }

    pub fn sql_type(&self, index: usize) -> Result<SqlType, QueryError> {
        let column = self.column(index)?;
        Ok(TypeMapper::sql_type(&column.data_type, column.is_long))
    }

    /// Numeric SQL type code of a column.
    pub fn column_type(&self, index: usize) -> Result<i32, QueryError> {
        Ok(self.sql_type(index)?.code())
    }

    /// The logical type tag exactly as the service sent it.
    pub fn column_type_name(&self, index: usize) -> Result<&str, QueryError> {
        Ok(self.column(index)?.data_type.as_str())
    }

    /// Backend runtime type name, when the service reports one.
    pub fn runtime_type_name(&self, index: usize) -> Result<Option<&str>, QueryError> {
        Ok(self.column(index)?.runtime_type.as_deref())
    }

    /// Kind of value the generic getter produces for a column.
    pub fn column_value_kind(&self, index: usize) -> Result<TargetKind, QueryError> {
        Ok(TypeMapper::target_kind(&self.column(index)?.data_type))
    }

    pub fn is_signed(&self, index: usize) -> Result<bool, QueryError> {
        Ok(TypeMapper::is_signed(&self.column(index)?.data_type))
    }

    pub fn is_auto_increment(&self, index: usize) -> Result<bool, QueryError> {
        Ok(self.column(index)?.is_auto_increment)
    }

    pub fn is_long(&self, index: usize) -> Result<bool, QueryError> {
        Ok(self.column(index)?.is_long)
    }

    pub fn is_nullable(&self, index: usize) -> Result<Nullability, QueryError> {
        Ok(if self.column(index)?.allow_db_null {
            Nullability::Nullable
        } else {
            Nullability::NoNulls
        })
    }

    pub fn is_case_sensitive(&self, index: usize) -> Result<bool, QueryError> {
        self.column(index).map(|_| false)
    }

    pub fn is_searchable(&self, index: usize) -> Result<bool, QueryError> {
        self.column(index).map(|_| true)
    }

    pub fn is_currency(&self, index: usize) -> Result<bool, QueryError> {
        self.column(index).map(|_| false)
    }

    pub fn is_read_only(&self, index: usize) -> Result<bool, QueryError> {
        Ok(self.column(index)?.is_read_only)
    }

    pub fn is_writable(&self, index: usize) -> Result<bool, QueryError> {
        Ok(!self.is_read_only(index)?)
    }

    pub fn is_definitely_writable(&self, index: usize) -> Result<bool, QueryError> {
        self.is_writable(index)
    }

    pub fn column_display_size(&self, index: usize) -> Result<i32, QueryError> {
        Ok(self.column(index)?.column_size)
    }

    pub fn precision(&self, index: usize) -> Result<i32, QueryError> {
        Ok(self.column(index)?.numeric_precision)
    }

    pub fn scale(&self, index: usize) -> Result<i32, QueryError> {
        Ok(self.column(index)?.numeric_scale)
    }

    pub fn table_name(&self, index: usize) -> Result<Option<&str>, QueryError> {
        Ok(self.column(index)?.base_table_name.as_deref())
    }

    pub fn schema_name(&self, index: usize) -> Result<Option<&str>, QueryError> {
        Ok(self.column(index)?.base_schema_name.as_deref())
    }

    pub fn catalog_name(&self, index: usize) -> Result<Option<&str>, QueryError> {
        Ok(self.column(index)?.base_catalog_name.as_deref())
    }
}
