//! Logical column types, typed values and the coercions between them and JSON.

pub mod coercion;
mod decimal;
mod mapping;
mod value;

pub use decimal::Decimal;
pub use mapping::{LogicalType, SqlType, TypeMapper};
pub use value::{Parameter, SqlValue, TargetKind, TemporalParsing, UnsupportedKind};
