//! Coercions between raw JSON values and typed SQL values.
//!
//! Reads are lenient: numeric text parses as a number (integer first, then
//! floating point truncated), anything unparseable reads as zero, and
//! numbers read as booleans by comparing against zero. Date and time literals
//! are ISO-8601; under [`TemporalParsing::Lenient`] a malformed literal reads
//! as the epoch-zero value instead of failing.
//!
//! Writes ([`encode_parameter`]) turn bound parameters into the JSON values
//! sent in a request's `parameters` array.

use crate::error::ConversionError;
use crate::types::{Decimal, Parameter, SqlValue, TargetKind, TemporalParsing};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde_json::{Number, Value};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Text form of a value; `None` for NULL.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

pub fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => s.trim() == "true",
        _ => false,
    }
}

pub fn as_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| u as i64))
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_integer(s),
        Value::Bool(b) => *b as i64,
        _ => 0,
    }
}

/// Integer coercion narrowed to 32 bits (wrapping, like a cast).
pub fn as_i32(value: &Value) -> i32 {
    as_i64(value) as i32
}

pub fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn parse_integer(text: &str) -> i64 {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        .unwrap_or(0)
}

/// Exact decimal from a number's text; `None` for NULL.
///
/// Non-numeric values read as zero.
///
/// # Errors
///
/// Returns `ConversionError::NumericOverflow` when the number has more digits
/// than a 128-bit mantissa holds.
pub fn as_decimal(value: &Value) -> Result<Option<Decimal>, ConversionError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Decimal::from_str(&n.to_string()).map(Some),
        Value::String(s) => Ok(Some(Decimal::from_str(s).unwrap_or(Decimal::ZERO))),
        _ => Ok(Some(Decimal::ZERO)),
    }
}

/// Byte sequence of a value; `None` for NULL.
///
/// Binary values (arrays of integers in `0..=255`) are returned directly,
/// text as its UTF-8 bytes, floating-point numbers as an 8-byte big-endian
/// double and everything else as the 4-byte big-endian integer coercion.
pub fn as_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.as_bytes().to_vec()),
        Value::Number(n) if n.is_f64() => Some(as_f64(value).to_be_bytes().to_vec()),
        Value::Array(items) => Some(
            binary(items).unwrap_or_else(|| as_i32(value).to_be_bytes().to_vec()),
        ),
        other => Some(as_i32(other).to_be_bytes().to_vec()),
    }
}

fn binary(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
        .collect()
}

pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Parse an RFC 3339 instant. Literals without an offset are read as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Parse a time of day: `HH:MM`, `HH:MM:SS` or `HH:MM:SS.fff`.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

fn temporal<T>(
    value: &Value,
    kind: &'static str,
    policy: TemporalParsing,
    parse: impl Fn(&str) -> Option<T>,
    fallback: T,
) -> Result<Option<T>, ConversionError> {
    let Some(text) = as_text(value) else {
        return Ok(None);
    };

    match (parse(&text), policy) {
        (Some(parsed), _) => Ok(Some(parsed)),
        (None, TemporalParsing::Lenient) => Ok(Some(fallback)),
        (None, TemporalParsing::Strict) => Err(ConversionError::InvalidTemporal { kind, value: text }),
    }
}

pub fn as_timestamp(
    value: &Value,
    policy: TemporalParsing,
) -> Result<Option<DateTime<Utc>>, ConversionError> {
    temporal(value, "timestamp", policy, parse_timestamp, epoch())
}

pub fn as_date(value: &Value, policy: TemporalParsing) -> Result<Option<NaiveDate>, ConversionError> {
    temporal(value, "date", policy, parse_date, epoch().date_naive())
}

pub fn as_time(value: &Value, policy: TemporalParsing) -> Result<Option<NaiveTime>, ConversionError> {
    temporal(value, "time", policy, parse_time, NaiveTime::MIN)
}

/// Coerce a raw value to the requested kind. NULL always yields [`SqlValue::Null`].
pub fn convert(
    value: &Value,
    target: TargetKind,
    policy: TemporalParsing,
) -> Result<SqlValue, ConversionError> {
    if value.is_null() {
        return Ok(SqlValue::Null);
    }

    let converted = match target {
        TargetKind::String => as_text(value).map(SqlValue::String),
        TargetKind::Boolean => Some(SqlValue::Boolean(as_bool(value))),
        TargetKind::Byte => Some(SqlValue::Byte(as_i32(value) as i8)),
        TargetKind::Short => Some(SqlValue::Short(as_i32(value) as i16)),
        TargetKind::Int => Some(SqlValue::Int(as_i32(value))),
        TargetKind::Long => Some(SqlValue::Long(as_i64(value))),
        TargetKind::Float => Some(SqlValue::Float(as_f64(value) as f32)),
        TargetKind::Double => Some(SqlValue::Double(as_f64(value))),
        TargetKind::Decimal => as_decimal(value)?.map(SqlValue::Decimal),
        TargetKind::Bytes => as_bytes(value).map(SqlValue::Bytes),
        TargetKind::Date => as_date(value, policy)?.map(SqlValue::Date),
        TargetKind::Time => as_time(value, policy)?.map(SqlValue::Time),
        TargetKind::Timestamp => as_timestamp(value, policy)?.map(SqlValue::Timestamp),
    };

    Ok(converted.unwrap_or(SqlValue::Null))
}

fn float_number(value: f64, text: String) -> Result<Value, ConversionError> {
    if !value.is_finite() {
        return Err(ConversionError::InvalidFormat(format!(
            "{} cannot be sent as a JSON number",
            value
        )));
    }
    Number::from_str(&text)
        .map(Value::Number)
        .map_err(|e| ConversionError::InvalidFormat(e.to_string()))
}

/// Encode a bound parameter as a request JSON value.
///
/// # Errors
///
/// Returns `ConversionError::InvalidFormat` for NaN or infinite floats and for
/// parameter kinds that have no wire encoding.
pub fn encode_parameter(parameter: &Parameter) -> Result<Value, ConversionError> {
    let encoded = match parameter {
        Parameter::Null => Value::Null,
        Parameter::Boolean(v) => Value::Bool(*v),
        Parameter::Byte(v) => Value::from(*v),
        Parameter::Short(v) => Value::from(*v),
        Parameter::Int(v) => Value::from(*v),
        Parameter::Long(v) => Value::from(*v),
        Parameter::Float(v) => float_number(*v as f64, v.to_string())?,
        Parameter::Double(v) => float_number(*v, v.to_string())?,
        Parameter::Decimal(v) => Number::from_str(&v.to_string())
            .map(Value::Number)
            .map_err(|e| ConversionError::InvalidFormat(e.to_string()))?,
        Parameter::String(v) => Value::String(v.clone()),
        Parameter::Bytes(v) => Value::String(STANDARD.encode(v)),
        Parameter::Date(v) => Value::String(v.format(DATE_FORMAT).to_string()),
        Parameter::Time(v) => Value::String(v.format(TIME_FORMAT).to_string()),
        Parameter::Timestamp(v) => Value::String(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Parameter::Unsupported(kind) => {
            return Err(ConversionError::InvalidFormat(format!(
                "{} parameters have no wire encoding",
                kind
            )))
        }
    };
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnsupportedKind;
    use chrono::{FixedOffset, TimeZone};
    use serde_json::json;

    #[test]
    fn test_as_text() {
        assert_eq!(as_text(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(as_text(&json!(12)).as_deref(), Some("12"));
        assert_eq!(as_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(as_text(&Value::Null), None);
    }

    #[test]
    fn test_as_bool() {
        assert!(as_bool(&json!(true)));
        assert!(as_bool(&json!(1)));
        assert!(as_bool(&json!(-3)));
        assert!(as_bool(&json!("true")));
        assert!(!as_bool(&json!(0)));
        assert!(!as_bool(&json!("yes")));
        assert!(!as_bool(&json!("TRUE ")));
        assert!(!as_bool(&Value::Null));
    }

    #[test]
    fn test_as_integer_coercions() {
        assert_eq!(as_i32(&json!(42)), 42);
        assert_eq!(as_i32(&json!(42.9)), 42);
        assert_eq!(as_i32(&json!(-42.9)), -42);
        assert_eq!(as_i32(&json!("17")), 17);
        assert_eq!(as_i32(&json!("17.8")), 17);
        assert_eq!(as_i32(&json!("abc")), 0);
        assert_eq!(as_i32(&json!(true)), 1);
        assert_eq!(as_i32(&Value::Null), 0);
        assert_eq!(as_i64(&json!(9_000_000_000_i64)), 9_000_000_000);
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(as_f64(&json!(1.5)), 1.5);
        assert_eq!(as_f64(&json!(2)), 2.0);
        assert_eq!(as_f64(&json!("3.25")), 3.25);
        assert_eq!(as_f64(&json!("x")), 0.0);
    }

    #[test]
    fn test_as_decimal_keeps_exact_text() {
        let value: Value = serde_json::from_str("12345678901234567.891").unwrap();
        let decimal = as_decimal(&value).unwrap().unwrap();
        assert_eq!(decimal.to_string(), "12345678901234567.891");
    }

    #[test]
    fn test_as_decimal_extreme_exponents() {
        let zero: Value = serde_json::from_str("0e2000000000").unwrap();
        assert_eq!(as_decimal(&zero).unwrap().map(|d| d.is_zero()), Some(true));

        let tiny: Value = serde_json::from_str("1e-2000000000").unwrap();
        assert!(matches!(
            as_decimal(&tiny),
            Err(ConversionError::NumericOverflow(_))
        ));
    }

    #[test]
    fn test_as_decimal_non_numeric() {
        assert_eq!(as_decimal(&json!("abc")).unwrap(), Some(Decimal::ZERO));
        assert_eq!(as_decimal(&json!(true)).unwrap(), Some(Decimal::ZERO));
        assert_eq!(
            as_decimal(&json!("2.5")).unwrap(),
            Some(Decimal::new(25, 1))
        );
        assert_eq!(as_decimal(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_as_bytes() {
        assert_eq!(as_bytes(&json!([1, 2, 255])), Some(vec![1, 2, 255]));
        assert_eq!(as_bytes(&json!("AB")), Some(vec![0x41, 0x42]));
        assert_eq!(as_bytes(&json!(1.5)), Some(1.5f64.to_be_bytes().to_vec()));
        assert_eq!(as_bytes(&json!(258)), Some(vec![0, 0, 1, 2]));
        assert_eq!(as_bytes(&json!(true)), Some(vec![0, 0, 0, 1]));
        assert_eq!(as_bytes(&json!([1, 300])), Some(vec![0, 0, 0, 0]));
        assert_eq!(as_bytes(&Value::Null), None);
    }

    #[test]
    fn test_timestamp_parsing() {
        let ts = as_timestamp(&json!("2021-03-04T05:06:07Z"), TemporalParsing::Lenient)
            .unwrap()
            .unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap());

        let ts = as_timestamp(&json!("2021-03-04T07:06:07+02:00"), TemporalParsing::Lenient)
            .unwrap()
            .unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap());

        let ts = as_timestamp(&json!("2021-03-04T05:06:07.5"), TemporalParsing::Lenient)
            .unwrap()
            .unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_malformed_timestamp_falls_back_to_epoch() {
        let ts = as_timestamp(&json!("not-a-date"), TemporalParsing::Lenient)
            .unwrap()
            .unwrap();
        assert_eq!(ts, epoch());
        assert_eq!(ts.timestamp(), 0);
    }

    #[test]
    fn test_malformed_timestamp_strict() {
        let err = as_timestamp(&json!("not-a-date"), TemporalParsing::Strict).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::InvalidTemporal { kind: "timestamp", .. }
        ));
    }

    #[test]
    fn test_date_and_time_parsing() {
        assert_eq!(
            as_date(&json!("2020-02-29"), TemporalParsing::Lenient).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 29)
        );
        assert_eq!(
            as_date(&json!("2020-02-30"), TemporalParsing::Lenient).unwrap(),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert!(as_date(&json!("2020-02-30"), TemporalParsing::Strict).is_err());

        assert_eq!(
            as_time(&json!("13:45"), TemporalParsing::Lenient).unwrap(),
            NaiveTime::from_hms_opt(13, 45, 0)
        );
        assert_eq!(
            as_time(&json!("13:45:10.250"), TemporalParsing::Lenient).unwrap(),
            NaiveTime::from_hms_milli_opt(13, 45, 10, 250)
        );
        assert_eq!(
            as_time(&json!("noon"), TemporalParsing::Lenient).unwrap(),
            Some(NaiveTime::MIN)
        );
        assert_eq!(as_time(&Value::Null, TemporalParsing::Strict).unwrap(), None);
    }

    #[test]
    fn test_convert() {
        let policy = TemporalParsing::Lenient;
        assert_eq!(
            convert(&json!("7"), TargetKind::Long, policy).unwrap(),
            SqlValue::Long(7)
        );
        assert_eq!(
            convert(&json!(300), TargetKind::Byte, policy).unwrap(),
            SqlValue::Byte(44)
        );
        assert_eq!(
            convert(&Value::Null, TargetKind::Int, policy).unwrap(),
            SqlValue::Null
        );
        assert_eq!(
            convert(&json!("2020-01-02"), TargetKind::Date, policy).unwrap(),
            SqlValue::Date(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap())
        );
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode_parameter(&Parameter::Null).unwrap(), Value::Null);
        assert_eq!(encode_parameter(&Parameter::Int(5)).unwrap(), json!(5));
        assert_eq!(encode_parameter(&Parameter::Boolean(true)).unwrap(), json!(true));
        assert_eq!(
            encode_parameter(&Parameter::String("x".into())).unwrap(),
            json!("x")
        );
        assert_eq!(
            serde_json::to_string(&encode_parameter(&Parameter::Float(0.1)).unwrap()).unwrap(),
            "0.1"
        );
    }

    #[test]
    fn test_encode_rejects_non_finite() {
        assert!(encode_parameter(&Parameter::Double(f64::NAN)).is_err());
        assert!(encode_parameter(&Parameter::Float(f32::INFINITY)).is_err());
    }

    #[test]
    fn test_encode_decimal_exact() {
        let decimal: Decimal = "12345678901234567890.12".parse().unwrap();
        let encoded = encode_parameter(&Parameter::Decimal(decimal)).unwrap();
        assert_eq!(
            serde_json::to_string(&encoded).unwrap(),
            "12345678901234567890.12"
        );
    }

    #[test]
    fn test_encode_bytes_and_temporal() {
        assert_eq!(
            encode_parameter(&Parameter::Bytes(vec![0, 1, 2])).unwrap(),
            json!("AAEC")
        );
        assert_eq!(
            encode_parameter(&Parameter::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()))
                .unwrap(),
            json!("2024-01-31")
        );
        assert_eq!(
            encode_parameter(&Parameter::Time(NaiveTime::from_hms_opt(8, 5, 0).unwrap())).unwrap(),
            json!("08:05:00")
        );

        let ts = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 31, 13, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            encode_parameter(&Parameter::Timestamp(ts)).unwrap(),
            json!("2024-01-31T12:00:00Z")
        );
    }

    #[test]
    fn test_encode_unsupported() {
        assert!(encode_parameter(&Parameter::Unsupported(UnsupportedKind::Blob)).is_err());
    }
}
