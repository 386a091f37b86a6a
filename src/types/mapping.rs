//! Type mapping between backend logical types and SQL type codes.

use crate::types::TargetKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical column type declared by the backend in a result schema.
///
/// Unrecognized tags are kept verbatim in [`LogicalType::Other`] so that
/// every mapping over this type stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogicalType {
    String,
    Int,
    Short,
    Byte,
    Boolean,
    Decimal,
    DateTime,
    Date,
    Time,
    Other(String),
}

impl LogicalType {
    /// The wire tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            LogicalType::String => "string",
            LogicalType::Int => "int",
            LogicalType::Short => "short",
            LogicalType::Byte => "byte",
            LogicalType::Boolean => "boolean",
            LogicalType::Decimal => "decimal",
            LogicalType::DateTime => "dateTime",
            LogicalType::Date => "date",
            LogicalType::Time => "time",
            LogicalType::Other(tag) => tag,
        }
    }
}

impl Default for LogicalType {
    fn default() -> Self {
        LogicalType::Other(String::new())
    }
}

impl From<&str> for LogicalType {
    fn from(tag: &str) -> Self {
        match tag {
            "string" => LogicalType::String,
            "int" => LogicalType::Int,
            "short" => LogicalType::Short,
            "byte" => LogicalType::Byte,
            "boolean" => LogicalType::Boolean,
            "decimal" => LogicalType::Decimal,
            "dateTime" => LogicalType::DateTime,
            "date" => LogicalType::Date,
            "time" => LogicalType::Time,
            other => LogicalType::Other(other.to_string()),
        }
    }
}

impl From<String> for LogicalType {
    fn from(tag: String) -> Self {
        LogicalType::from(tag.as_str())
    }
}

impl From<LogicalType> for String {
    fn from(value: LogicalType) -> Self {
        match value {
            LogicalType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic SQL type, with the conventional numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Varchar,
    LongVarchar,
    BigInt,
    Integer,
    TinyInt,
    Boolean,
    Decimal,
    Timestamp,
    Other,
}

impl SqlType {
    /// Numeric type code as used by SQL client APIs.
    pub fn code(&self) -> i32 {
        match self {
            SqlType::Varchar => 12,
            SqlType::LongVarchar => -1,
            SqlType::BigInt => -5,
            SqlType::Integer => 4,
            SqlType::TinyInt => -6,
            SqlType::Boolean => 16,
            SqlType::Decimal => 3,
            SqlType::Timestamp => 93,
            SqlType::Other => 1111,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Varchar => "VARCHAR",
            SqlType::LongVarchar => "LONGVARCHAR",
            SqlType::BigInt => "BIGINT",
            SqlType::Integer => "INTEGER",
            SqlType::TinyInt => "TINYINT",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Decimal => "DECIMAL",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Other => "OTHER",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type mapper for logical column types.
pub struct TypeMapper;

impl TypeMapper {
    /// Map a logical type to its SQL type.
    ///
    /// `is_long` selects LONGVARCHAR over VARCHAR for string columns. Types
    /// without a dedicated code (including date and time) map to OTHER.
    pub fn sql_type(logical: &LogicalType, is_long: bool) -> SqlType {
        match logical {
            LogicalType::String if is_long => SqlType::LongVarchar,
            LogicalType::String => SqlType::Varchar,
            LogicalType::Int => SqlType::BigInt,
            LogicalType::Short => SqlType::Integer,
            LogicalType::Byte => SqlType::TinyInt,
            LogicalType::Boolean => SqlType::Boolean,
            LogicalType::Decimal => SqlType::Decimal,
            LogicalType::DateTime => SqlType::Timestamp,
            LogicalType::Date | LogicalType::Time | LogicalType::Other(_) => SqlType::Other,
        }
    }

    pub fn is_signed(logical: &LogicalType) -> bool {
        matches!(
            logical,
            LogicalType::Int | LogicalType::Decimal | LogicalType::Short | LogicalType::Byte
        )
    }

    /// The value kind the generic getter produces for a column of this type.
    pub fn target_kind(logical: &LogicalType) -> TargetKind {
        match logical {
            LogicalType::String | LogicalType::Other(_) => TargetKind::String,
            LogicalType::Int => TargetKind::Int,
            LogicalType::Short => TargetKind::Short,
            LogicalType::Byte => TargetKind::Byte,
            LogicalType::Boolean => TargetKind::Boolean,
            LogicalType::Decimal => TargetKind::Decimal,
            LogicalType::DateTime => TargetKind::Timestamp,
            LogicalType::Date => TargetKind::Date,
            LogicalType::Time => TargetKind::Time,
        }
    }
}
