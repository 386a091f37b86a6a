//! JSON message types for the query service.
//!
//! Requests carry a command and an optional positional parameter array;
//! responses carry either a schema plus result rows or an affected-row count.

use crate::types::LogicalType;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One result row: column name to raw JSON value, in source field order.
pub type Row = serde_json::Map<String, Value>;

/// Request body for the query and mutate routes.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope<'a> {
    /// SQL text
    pub command: &'a str,
    /// Encoded positional parameters; omitted when there are none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<&'a [Value]>,
}

impl<'a> RequestEnvelope<'a> {
    /// Create a request, dropping an empty parameter list.
    pub fn new(command: &'a str, parameters: &'a [Value]) -> Self {
        Self {
            command,
            parameters: (!parameters.is_empty()).then_some(parameters),
        }
    }
}

/// Response body of the query route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// Column descriptors
    #[serde(default, deserialize_with = "null_as_default")]
    pub schema: Vec<ColumnDescriptor>,
    /// Result rows
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Row>,
}

/// Response body of the mutate route.
///
/// `rows_affected` stays a raw value so that a missing or non-integer count
/// can be reported as a malformed response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResponse {
    #[serde(default)]
    pub rows_affected: Option<Value>,
}

impl MutateResponse {
    /// The affected-row count, if present and integral.
    pub fn count(&self) -> Option<i64> {
        self.rows_affected.as_ref().and_then(Value::as_i64)
    }
}

/// Column descriptor from the `schema` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_type: LogicalType,
    /// Backend runtime type name
    #[serde(default, rename = "type")]
    pub runtime_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_long: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_auto_increment: bool,
    #[serde(default, rename = "allowDBNull", deserialize_with = "null_as_default")]
    pub allow_db_null: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read_only: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub column_size: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub numeric_precision: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub numeric_scale: i32,
    #[serde(default)]
    pub base_table_name: Option<String>,
    #[serde(default)]
    pub base_schema_name: Option<String>,
    #[serde(default)]
    pub base_catalog_name: Option<String>,
}

impl ColumnDescriptor {
    /// Create a descriptor with a name and logical type, all flags cleared.
    pub fn new(name: impl Into<String>, data_type: LogicalType) -> Self {
        Self {
            column_name: Some(name.into()),
            data_type,
            ..Self::default()
        }
    }
}

/// Read JSON `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
