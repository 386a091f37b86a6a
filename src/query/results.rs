//! Result set cursor and typed field access.
//!
//! A [`ResultSet`] holds the fully materialized rows of one query together
//! with their column metadata. The cursor starts before the first row and can
//! be moved in both directions; positions outside `[0, row_count)` are allowed
//! and simply leave the cursor off any row.

use crate::error::{DriverError, QueryError};
use crate::query::metadata::ResultSetMetadata;
use crate::transport::messages::{QueryResponse, Row};
use crate::types::coercion;
use crate::types::{Decimal, SqlValue, TargetKind, TemporalParsing, TypeMapper};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Column reference: a field name or a 1-based position in the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for Column<'a> {
    fn from(name: &'a str) -> Self {
        Column::Name(name)
    }
}

impl<'a> From<&'a String> for Column<'a> {
    fn from(name: &'a String) -> Self {
        Column::Name(name)
    }
}

impl From<usize> for Column<'_> {
    fn from(index: usize) -> Self {
        Column::Index(index)
    }
}

/// Scrollable, read-only cursor over a query result.
#[derive(Debug)]
pub struct ResultSet {
    rows: Vec<Row>,
    metadata: ResultSetMetadata,
    /// -1 before the first row, `rows.len()` after the last
    position: i64,
    /// Field names of the most recently visited row, in source order
    field_names: Vec<String>,
    was_null: bool,
    closed: bool,
    /// Close flags of the statement and connection that produced this cursor
    owners: Vec<Arc<AtomicBool>>,
    temporal: TemporalParsing,
}

impl ResultSet {
    pub(crate) fn new(
        response: QueryResponse,
        owners: Vec<Arc<AtomicBool>>,
        temporal: TemporalParsing,
    ) -> Self {
        Self {
            rows: response.results,
            metadata: ResultSetMetadata::new(response.schema),
            position: -1,
            field_names: Vec::new(),
            was_null: false,
            closed: false,
            owners,
            temporal,
        }
    }

    /// A result with no rows and no columns.
    pub fn empty() -> Self {
        Self::new(QueryResponse::default(), Vec::new(), TemporalParsing::default())
    }

    /// Number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn metadata(&self) -> &ResultSetMetadata {
        &self.metadata
    }

    /// Closed directly, or through the statement or connection that produced it.
    pub fn is_closed(&self) -> bool {
        self.closed || self.owners.iter().any(|flag| flag.load(Ordering::Acquire))
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    fn check_open(&self) -> Result<(), QueryError> {
        if self.is_closed() {
            return Err(QueryError::CursorClosed);
        }
        Ok(())
    }

    fn len(&self) -> i64 {
        self.rows.len() as i64
    }

    fn on_row(&self) -> bool {
        self.position >= 0 && self.position < self.len()
    }

    fn move_to(&mut self, position: i64) -> bool {
        self.position = position;
        let on_row = self.on_row();
        if on_row {
            self.field_names = self.rows[position as usize].keys().cloned().collect();
        }
        trace!(position, on_row, "Cursor moved");
        on_row
    }

    // ----- Movement -----

    /// Advance to the next row.
    ///
    /// # Returns
    ///
    /// `true` if the cursor is now on a row.
    pub fn next(&mut self) -> Result<bool, QueryError> {
        self.relative(1)
    }

    pub fn previous(&mut self) -> Result<bool, QueryError> {
        self.relative(-1)
    }

    /// Move by `rows` relative to the current position, without clamping.
    pub fn relative(&mut self, rows: i64) -> Result<bool, QueryError> {
        self.check_open()?;
        Ok(self.move_to(self.position.saturating_add(rows)))
    }

    /// Move to a 1-based row number.
    ///
    /// `0` moves before the first row and returns `false`. Any negative number
    /// moves to the last row.
    pub fn absolute(&mut self, row: i64) -> Result<bool, QueryError> {
        self.check_open()?;
        let position = match row {
            0 => -1,
            r if r > 0 => r - 1,
            _ => self.len() - 1,
        };
        Ok(self.move_to(position) && row != 0)
    }

    /// Move to the first row. Returns `true` if the result has any rows.
    pub fn first(&mut self) -> Result<bool, QueryError> {
        self.check_open()?;
        self.move_to(0);
        Ok(!self.rows.is_empty())
    }

    /// Move to the last row. Returns `true` if the result has any rows.
    pub fn last(&mut self) -> Result<bool, QueryError> {
        self.check_open()?;
        self.move_to(self.len() - 1);
        Ok(!self.rows.is_empty())
    }

    pub fn before_first(&mut self) -> Result<(), QueryError> {
        self.check_open()?;
        self.move_to(-1);
        Ok(())
    }

    pub fn after_last(&mut self) -> Result<(), QueryError> {
        self.check_open()?;
        self.move_to(self.len());
        Ok(())
    }

    // ----- Position queries -----

    /// 1-based number of the current row, or 0 when not on a row.
    pub fn get_row(&self) -> Result<usize, QueryError> {
        self.check_open()?;
        Ok(if self.on_row() {
            self.position as usize + 1
        } else {
            0
        })
    }

    pub fn is_before_first(&self) -> Result<bool, QueryError> {
        self.check_open()?;
        Ok(self.position < 0)
    }

    pub fn is_after_last(&self) -> Result<bool, QueryError> {
        self.check_open()?;
        Ok(self.position >= self.len())
    }

    pub fn is_first(&self) -> Result<bool, QueryError> {
        self.check_open()?;
        Ok(self.on_row() && self.position == 0)
    }

    pub fn is_last(&self) -> Result<bool, QueryError> {
        self.check_open()?;
        Ok(self.on_row() && self.position == self.len() - 1)
    }

    // ----- Field access -----

    /// Whether the last field read was NULL.
    pub fn was_null(&self) -> Result<bool, QueryError> {
        self.check_open()?;
        Ok(self.was_null)
    }

    /// 1-based position of a field in the current row.
    pub fn find_column(&self, name: &str) -> Result<usize, QueryError> {
        self.check_open()?;
        self.current_row()?;
        self.field_names
            .iter()
            .position(|field| field == name)
            .map(|i| i + 1)
            .ok_or_else(|| QueryError::NoSuchColumn(name.to_string()))
    }

    fn current_row(&self) -> Result<&Row, QueryError> {
        if !self.on_row() {
            return Err(QueryError::InvalidState(
                "Cursor is not positioned on a row".to_string(),
            ));
        }
        Ok(&self.rows[self.position as usize])
    }

    /// Resolve a column in the current row to its name and 0-based position.
    fn locate(&self, column: Column<'_>) -> Result<(String, usize), QueryError> {
        let row = self.current_row()?;
        match column {
            Column::Name(name) => {
                if !row.contains_key(name) {
                    return Err(QueryError::NoSuchColumn(name.to_string()));
                }
                let position = self
                    .field_names
                    .iter()
                    .position(|field| field == name)
                    .unwrap_or_default();
                Ok((name.to_string(), position))
            }
            Column::Index(index) => index
                .checked_sub(1)
                .and_then(|i| self.field_names.get(i).map(|name| (name.clone(), i)))
                .ok_or_else(|| QueryError::NoSuchColumn(index.to_string())),
        }
    }

    /// Read a raw field, updating the was-null flag.
    fn read<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<(String, usize, Value), QueryError> {
        self.check_open()?;
        let (name, position) = self.locate(column.into())?;
        let value = self.current_row()?.get(&name).cloned().unwrap_or(Value::Null);
        self.was_null = value.is_null();
        Ok((name, position, value))
    }

    fn read_value<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<Value, QueryError> {
        self.read(column).map(|(_, _, value)| value)
    }

    pub fn get_string<'c>(
        &mut self,
        column: impl Into<Column<'c>>,
    ) -> Result<Option<String>, DriverError> {
        Ok(coercion::as_text(&self.read_value(column)?))
    }

    pub fn get_bool<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<bool, DriverError> {
        Ok(coercion::as_bool(&self.read_value(column)?))
    }

    pub fn get_byte<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<i8, DriverError> {
        Ok(coercion::as_i32(&self.read_value(column)?) as i8)
    }

    pub fn get_short<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<i16, DriverError> {
        Ok(coercion::as_i32(&self.read_value(column)?) as i16)
    }

    pub fn get_int<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<i32, DriverError> {
        Ok(coercion::as_i32(&self.read_value(column)?))
    }

    pub fn get_long<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<i64, DriverError> {
        Ok(coercion::as_i64(&self.read_value(column)?))
    }

    pub fn get_float<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<f32, DriverError> {
        Ok(coercion::as_f64(&self.read_value(column)?) as f32)
    }

    pub fn get_double<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<f64, DriverError> {
        Ok(coercion::as_f64(&self.read_value(column)?))
    }

    pub fn get_decimal<'c>(
        &mut self,
        column: impl Into<Column<'c>>,
    ) -> Result<Option<Decimal>, DriverError> {
        Ok(coercion::as_decimal(&self.read_value(column)?)?)
    }

    pub fn get_bytes<'c>(
        &mut self,
        column: impl Into<Column<'c>>,
    ) -> Result<Option<Vec<u8>>, DriverError> {
        Ok(coercion::as_bytes(&self.read_value(column)?))
    }

    pub fn get_date<'c>(
        &mut self,
        column: impl Into<Column<'c>>,
    ) -> Result<Option<NaiveDate>, DriverError> {
        let value = self.read_value(column)?;
        Ok(coercion::as_date(&value, self.temporal)?)
    }

    pub fn get_time<'c>(
        &mut self,
        column: impl Into<Column<'c>>,
    ) -> Result<Option<NaiveTime>, DriverError> {
        let value = self.read_value(column)?;
        Ok(coercion::as_time(&value, self.temporal)?)
    }

    pub fn get_timestamp<'c>(
        &mut self,
        column: impl Into<Column<'c>>,
    ) -> Result<Option<DateTime<Utc>>, DriverError> {
        let value = self.read_value(column)?;
        Ok(coercion::as_timestamp(&value, self.temporal)?)
    }

    /// Timestamp rendered as the local date-time at a fixed UTC offset.
    pub fn get_timestamp_in<'c>(
        &mut self,
        column: impl Into<Column<'c>>,
        offset: FixedOffset,
    ) -> Result<Option<NaiveDateTime>, DriverError> {
        Ok(self
            .get_timestamp(column)?
            .map(|ts| ts.with_timezone(&offset).naive_local()))
    }

    /// Read a field as the value kind its declared logical type maps to.
    ///
    /// The type is looked up by column name in the metadata, then by the
    /// field's position. Fields with no descriptor read as strings.
    pub fn get_object<'c>(&mut self, column: impl Into<Column<'c>>) -> Result<SqlValue, DriverError> {
        let (name, position, value) = self.read(column)?;
        let target = self
            .metadata
            .logical_type_for(&name, position)
            .map(TypeMapper::target_kind)
            .unwrap_or(TargetKind::String);
        Ok(coercion::convert(&value, target, self.temporal)?)
    }

    /// Read a field as a caller-chosen value kind. NULL reads as [`SqlValue::Null`].
    pub fn get_as<'c>(
        &mut self,
        column: impl Into<Column<'c>>,
        target: TargetKind,
    ) -> Result<SqlValue, DriverError> {
        let value = self.read_value(column)?;
        Ok(coercion::convert(&value, target, self.temporal)?)
    }

    // ----- Write-back (not supported) -----

    pub fn update_row(&mut self) -> Result<(), DriverError> {
        Err(DriverError::not_supported("ResultSet::update_row"))
    }

    pub fn insert_row(&mut self) -> Result<(), DriverError> {
        Err(DriverError::not_supported("ResultSet::insert_row"))
    }

    pub fn delete_row(&mut self) -> Result<(), DriverError> {
        Err(DriverError::not_supported("ResultSet::delete_row"))
    }
}
