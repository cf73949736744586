//! Creates the database schema and inserts the seed data.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    cart::create_cart_item_table,
    product::{create_product_table, seed_products},
    session::create_session_table,
    transaction::{create_line_item_table, create_transaction_table},
    user::{create_user_table, seed_users},
};

/// Create the tables for the domain models and seed the users and products.
///
/// Safe to call on an existing database: tables are only created if missing and seed rows are
/// only inserted into empty tables.
///
/// # Errors
/// Returns [Error::SqlError] if any table could not be created or seeded. Nothing is written in
/// that case.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_product_table(&transaction)?;
    create_session_table(&transaction)?;
    create_cart_item_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_line_item_table(&transaction)?;

    let users_inserted = seed_users(&transaction)?;
    let products_inserted = seed_products(&transaction)?;

    transaction.commit()?;

    if users_inserted > 0 || products_inserted > 0 {
        tracing::info!("Seeded {users_inserted} users and {products_inserted} products");
    }

    Ok(())
}
