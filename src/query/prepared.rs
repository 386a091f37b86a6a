//! Prepared statement handling for parameterized queries.
//!
//! Parameters are bound by 1-based position and encoded immediately, so
//! values the service cannot receive are rejected at bind time rather than at
//! execution.

use crate::error::{DriverError, QueryError};
use crate::query::results::ResultSet;
use crate::query::statement::StatementCore;
use crate::types::coercion::encode_parameter;
use crate::types::Parameter;
use serde_json::Value;
use std::fmt;

/// Highest position a parameter can be bound at.
const MAX_PARAMETER_INDEX: usize = u16::MAX as usize;

/// A SQL statement with positional `?` parameters.
///
/// # Example
///
/// ```no_run
/// # use odbcbridge_rs::Driver;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let connection = Driver::new()
///     .connect("jdbc:odbcbridge://localhost:5000;databaseName=sales;useSsl=false;")?;
///
/// let mut prepared = connection.prepare_statement("SELECT * FROM Customers WHERE Age > ?")?;
/// prepared.bind(1, 18)?;
/// let mut results = prepared.execute_query()?;
/// while results.next()? {
///     println!("{:?}", results.get_string("LastName")?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PreparedStatement {
    core: StatementCore,
    sql: String,
    /// Encoded parameter values; `None` marks a position never bound
    parameters: Vec<Option<Value>>,
}

impl fmt::Debug for PreparedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("sql", &self.sql)
            .field("parameters", &self.parameters)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl PreparedStatement {
    pub(crate) fn new(core: StatementCore, sql: impl Into<String>) -> Self {
        Self {
            core,
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Highest bound parameter position.
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Bind a parameter value at the given position.
    ///
    /// # Arguments
    /// * `index` - One-based parameter position
    /// * `value` - Value to bind (must implement Into<Parameter>)
    ///
    /// # Errors
    /// Returns `QueryError::ParameterBindingError` if the index is 0 or above
    /// 65535, or the value cannot be encoded (NaN, infinities), and
    /// `DriverError::NotSupported` for streams, LOBs and other kinds with no
    /// wire encoding.
    pub fn bind(&mut self, index: usize, value: impl Into<Parameter>) -> Result<(), DriverError> {
        self.core.check_open()?;

        if index == 0 || index > MAX_PARAMETER_INDEX {
            return Err(QueryError::ParameterBindingError {
                index,
                message: format!("Parameter positions range from 1 to {}", MAX_PARAMETER_INDEX),
            }
            .into());
        }

        let parameter = value.into();
        if let Parameter::Unsupported(kind) = &parameter {
            return Err(DriverError::not_supported(format!("{} parameters", kind)));
        }

        let encoded = encode_parameter(&parameter).map_err(|e| QueryError::ParameterBindingError {
            index,
            message: e.to_string(),
        })?;

        if self.parameters.len() < index {
            self.parameters.resize(index, None);
        }
        self.parameters[index - 1] = Some(encoded);
        Ok(())
    }

    /// Bind SQL NULL at the given position.
    pub fn bind_null(&mut self, index: usize) -> Result<(), DriverError> {
        self.bind(index, Parameter::Null)
    }

    /// Clear all bound parameters.
    pub fn clear_parameters(&mut self) {
        self.parameters.clear();
    }

    fn encoded_parameters(&self) -> Result<Vec<Value>, QueryError> {
        self.parameters
            .iter()
            .enumerate()
            .map(|(i, param)| {
                param.clone().ok_or_else(|| QueryError::ParameterBindingError {
                    index: i + 1,
                    message: format!("Parameter {} is not bound", i + 1),
                })
            })
            .collect()
    }

    /// Execute the statement and return its rows as a cursor.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A position below the highest bound one was never bound
    /// - The statement has been closed
    /// - The service request fails
    pub fn execute_query(&self) -> Result<ResultSet, DriverError> {
        self.core.check_open()?;
        let parameters = self.encoded_parameters()?;
        self.core.query(&self.sql, &parameters)
    }

    /// Execute the statement and return the number of affected rows.
    pub fn execute_update(&self) -> Result<i64, DriverError> {
        self.core.check_open()?;
        let parameters = self.encoded_parameters()?;
        self.core.mutate(&self.sql, &parameters)
    }

    pub fn close(&self) {
        self.core.close();
    }

    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    pub fn add_batch(&mut self) -> Result<(), DriverError> {
        Err(DriverError::not_supported("PreparedStatement::add_batch"))
    }
}
