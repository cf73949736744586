//! Database operations for completed purchases and their line items.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    database_id::{ProductId, TransactionId},
    user::UserID,
};

/// One product and quantity bought in a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// The transaction the line belongs to.
    pub transaction_id: TransactionId,
    /// The product that was bought.
    pub product_id: ProductId,
    /// The name of the product at the time of checkout.
    ///
    /// `None` if the product did not exist when the transaction was created.
    pub product_name: Option<String>,
    /// How many of the product were bought.
    pub quantity: i64,
}

/// A completed purchase with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the checkout happened, in UTC.
    pub created_at: OffsetDateTime,
    /// The products bought, in the order they were added to the cart.
    pub lines: Vec<TransactionLine>,
}

/// Create the transaction table.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id);",
    )?;

    Ok(())
}

/// Create the line item table.
pub fn create_line_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS line_item (
            id INTEGER PRIMARY KEY,
            transaction_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            product_name TEXT,
            quantity INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_line_item_transaction_id ON line_item(transaction_id);",
    )?;

    Ok(())
}

/// Insert a transaction for `user_id` stamped with `created_at` and return its ID.
///
/// # Errors
/// Returns [Error::SqlError] if the time could not be formatted or the insert failed.
pub(crate) fn create_transaction(
    user_id: UserID,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    let created_at = created_at
        .format(&Rfc3339)
        .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))?;

    connection.execute(
        "INSERT INTO \"transaction\" (user_id, created_at) VALUES (?1, ?2)",
        (user_id.as_i64(), created_at),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Get the purchases made by `user_id`, newest first.
///
/// Line items keep the product name from checkout time even if the product was renamed or
/// removed since.
///
/// # Errors
/// Returns [Error::SqlError] if a query failed or a stored timestamp is not valid RFC 3339.
pub fn get_transaction_history(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<TransactionSummary>, Error> {
    let transactions: Vec<(TransactionId, OffsetDateTime)> = connection
        .prepare(
            "SELECT id, created_at FROM \"transaction\"
            WHERE user_id = :user_id
            ORDER BY id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .collect::<Result<_, rusqlite::Error>>()?;

    let mut line_query = connection.prepare(
        "SELECT transaction_id, product_id, product_name, quantity FROM line_item
        WHERE transaction_id = :transaction_id
        ORDER BY id ASC",
    )?;

    transactions
        .into_iter()
        .map(|(id, created_at)| -> Result<TransactionSummary, Error> {
            let lines = line_query
                .query_map(&[(":transaction_id", &id)], map_line_row)?
                .collect::<Result<Vec<_>, rusqlite::Error>>()?;

            Ok(TransactionSummary {
                id,
                created_at,
                lines,
            })
        })
        .collect()
}

fn map_transaction_row(row: &Row) -> Result<(TransactionId, OffsetDateTime), rusqlite::Error> {
    let id = row.get(0)?;
    let raw_created_at: String = row.get(1)?;
    let created_at = OffsetDateTime::parse(&raw_created_at, &Rfc3339).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
    })?;

    Ok((id, created_at))
}

fn map_line_row(row: &Row) -> Result<TransactionLine, rusqlite::Error> {
    Ok(TransactionLine {
        transaction_id: row.get(0)?,
        product_id: row.get(1)?,
        product_name: row.get(2)?,
        quantity: row.get(3)?,
    })
}
