//! Query execution and result handling.
//!
//! # Overview
//!
//! The query module is organized into:
//! - `statement` - SQL statement execution
//! - `prepared` - Parameter binding and execution of prepared statements
//! - `results` - The scrollable result cursor and typed getters
//! - `metadata` - Column metadata of a result
//!
//! # Example
//!
//! ```no_run
//! use odbcbridge_rs::Driver;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = Driver::new()
//!     .connect("jdbc:odbcbridge://localhost:5000;databaseName=sales;useSsl=false;")?;
//! let statement = connection.create_statement()?;
//!
//! let mut results = statement.execute_query("SELECT * FROM Customers")?;
//! let metadata = results.metadata().clone();
//!
//! while results.next()? {
//!     for column in 1..=metadata.column_count() {
//!         print!("{} = {} ", metadata.column_name(column)?, results.get_object(column)?);
//!     }
//!     println!();
//! }
//! # Ok(())
//! # }
//! ```

pub mod metadata;
pub mod prepared;
pub mod results;
pub mod statement;

// Re-export commonly used types
pub use metadata::{Nullability, ResultSetMetadata};
pub use prepared::PreparedStatement;
pub use results::{Column, ResultSet};
pub use statement::Statement;
