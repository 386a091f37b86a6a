//! Typed values produced by the coercion engine.

use crate::types::Decimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::fmt;

/// A typed SQL value read from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    String(String),
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// The kind of this value, or `None` for NULL.
    pub fn kind(&self) -> Option<TargetKind> {
        let kind = match self {
            SqlValue::Null => return None,
            SqlValue::String(_) => TargetKind::String,
            SqlValue::Boolean(_) => TargetKind::Boolean,
            SqlValue::Byte(_) => TargetKind::Byte,
            SqlValue::Short(_) => TargetKind::Short,
            SqlValue::Int(_) => TargetKind::Int,
            SqlValue::Long(_) => TargetKind::Long,
            SqlValue::Float(_) => TargetKind::Float,
            SqlValue::Double(_) => TargetKind::Double,
            SqlValue::Decimal(_) => TargetKind::Decimal,
            SqlValue::Bytes(_) => TargetKind::Bytes,
            SqlValue::Date(_) => TargetKind::Date,
            SqlValue::Time(_) => TargetKind::Time,
            SqlValue::Timestamp(_) => TargetKind::Timestamp,
        };
        Some(kind)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::String(v) => f.write_str(v),
            SqlValue::Boolean(v) => write!(f, "{}", v),
            SqlValue::Byte(v) => write!(f, "{}", v),
            SqlValue::Short(v) => write!(f, "{}", v),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Long(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Double(v) => write!(f, "{}", v),
            SqlValue::Decimal(v) => write!(f, "{}", v),
            SqlValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            SqlValue::Date(v) => write!(f, "{}", v),
            SqlValue::Time(v) => write!(f, "{}", v),
            SqlValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// Target of a generic read: the kind of [`SqlValue`] to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    String,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Bytes,
    Date,
    Time,
    Timestamp,
}

impl TargetKind {
    /// Name of the value kind, as reported by column metadata.
    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::String => "String",
            TargetKind::Boolean => "Boolean",
            TargetKind::Byte => "Byte",
            TargetKind::Short => "Short",
            TargetKind::Int => "Int",
            TargetKind::Long => "Long",
            TargetKind::Float => "Float",
            TargetKind::Double => "Double",
            TargetKind::Decimal => "Decimal",
            TargetKind::Bytes => "Bytes",
            TargetKind::Date => "Date",
            TargetKind::Time => "Time",
            TargetKind::Timestamp => "Timestamp",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value bound to a statement parameter.
///
/// `Null` is a bound SQL NULL, distinct from a parameter that was never bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(DateTime<Utc>),
    /// A parameter kind the service cannot receive; rejected at bind time
    Unsupported(UnsupportedKind),
}

/// Parameter kinds with no wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedKind {
    Stream,
    Blob,
    Clob,
    Array,
    Ref,
    RowId,
    Xml,
    Struct,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnsupportedKind::Stream => "Stream",
            UnsupportedKind::Blob => "Blob",
            UnsupportedKind::Clob => "Clob",
            UnsupportedKind::Array => "Array",
            UnsupportedKind::Ref => "Ref",
            UnsupportedKind::RowId => "RowId",
            UnsupportedKind::Xml => "SQLXML",
            UnsupportedKind::Struct => "Struct",
        };
        f.write_str(name)
    }
}

macro_rules! parameter_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Parameter {
                fn from(value: $source) -> Self {
                    Parameter::$variant(value)
                }
            }
        )*
    };
}

parameter_from! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
    String => String,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveTime => Time,
    DateTime<Utc> => Timestamp,
    UnsupportedKind => Unsupported,
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::String(value.to_string())
    }
}

impl From<&[u8]> for Parameter {
    fn from(value: &[u8]) -> Self {
        Parameter::Bytes(value.to_vec())
    }
}

impl<T: Into<Parameter>> From<Option<T>> for Parameter {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Parameter::Null)
    }
}

/// How malformed date/time literals are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemporalParsing {
    /// Substitute the epoch-zero value
    #[default]
    Lenient,
    /// Fail with a conversion error
    Strict,
}

impl TemporalParsing {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            TemporalParsing::Strict
        } else {
            TemporalParsing::Lenient
        }
    }
}
