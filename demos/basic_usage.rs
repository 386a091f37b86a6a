//! Basic usage example for the odbcbridge-rs driver.
//!
//! Expects a query service listening on `HOST:PORT`. Set `RUST_LOG=debug`
//! to see each request the driver sends.

use odbcbridge_rs::{Connection, Driver};
use std::error::Error;

const HOST: &str = "localhost";
const PORT: u16 = 5000;
const DATABASE: &str = "sales";
const USER: &str = "sys";
const PASSWORD: &str = "secret";

/// Opens a connection after the service's health check passes.
fn example_connection() -> Result<Connection, Box<dyn Error>> {
    let driver = Driver::new();
    let url = format!(
        "jdbc:odbcbridge://{}:{};databaseName={};user={};password={};useSsl=false;",
        HOST, PORT, DATABASE, USER, PASSWORD
    );
    Ok(driver.connect(&url)?)
}

/// Prints every customer and returns the row count.
fn example_select(conn: &Connection) -> Result<usize, Box<dyn Error>> {
    let statement = conn.create_statement()?;
    let mut results = statement.execute_query("SELECT LastName, FirstName FROM Customers")?;
    let metadata = results.metadata().clone();

    while results.next()? {
        let fields: Vec<String> = (1..=metadata.column_count())
            .map(|i| -> Result<String, Box<dyn Error>> {
                Ok(format!("{}={}", metadata.column_name(i)?, results.get_object(i)?))
            })
            .collect::<Result<_, _>>()?;
        println!("{}", fields.join(", "));
    }

    Ok(results.row_count())
}

/// Renames one customer through a prepared statement.
fn example_update(conn: &Connection) -> Result<i64, Box<dyn Error>> {
    let mut prepared =
        conn.prepare_statement("UPDATE Customers SET LastName = ? WHERE LastName = ?")?;
    prepared.bind(1, "Smith")?;
    prepared.bind(2, "LName0")?;
    Ok(prepared.execute_update()?)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let conn = example_connection()?;
    println!("Connected: {}", conn.descriptor());

    let rows = example_select(&conn)?;
    println!("Select: {} row(s)", rows);

    let updated = example_update(&conn)?;
    println!("Update: {} row(s) affected", updated);

    conn.close();
    println!("Done");

    Ok(())
}
