//! Driver and connection surface.
//!
//! [`Driver`] decides which URLs it handles and opens [`Connection`]s; a
//! connection creates the statements in [`crate::query`].

pub mod connection;
pub mod driver;

pub use connection::Connection;
pub use driver::Driver;
