//! Database operations for the product catalog.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::ProductId};

/// An item on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// The ID of the product.
    pub id: ProductId,
    /// The name shown on the menu.
    pub name: String,
    /// The price in cents.
    pub price: i64,
    /// A short description of the product.
    pub description: String,
}

/// The products inserted into an empty database as `(name, price, description)`.
pub(crate) const SEED_PRODUCTS: [(&str, i64, &str); 4] = [
    (
        "Americano",
        100,
        "Espresso, diluted for a lighter experience",
    ),
    ("Cappuccino", 110, "Espresso with steamed milk"),
    ("Espresso", 90, "A strong shot of coffee"),
    ("Macchiato", 120, "Espresso with a small amount of milk"),
];

/// Create the product table.
pub fn create_product_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            price INTEGER NOT NULL,
            description TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Create a product and return it with its generated ID.
pub fn create_product(
    name: &str,
    price: i64,
    description: &str,
    connection: &Connection,
) -> Result<Product, Error> {
    connection.execute(
        "INSERT INTO product (name, price, description) VALUES (?1, ?2, ?3)",
        (name, price, description),
    )?;

    Ok(Product {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
        price,
        description: description.to_owned(),
    })
}

/// Insert the default menu if the product table is empty.
///
/// Returns the number of products inserted.
pub fn seed_products(connection: &Connection) -> Result<usize, Error> {
    if count_products(connection)? > 0 {
        return Ok(0);
    }

    for (name, price, description) in SEED_PRODUCTS {
        create_product(name, price, description, connection)?;
    }

    Ok(SEED_PRODUCTS.len())
}

/// Retrieve a single product by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no product with `product_id`.
pub fn get_product(product_id: ProductId, connection: &Connection) -> Result<Product, Error> {
    connection
        .prepare("SELECT id, name, price, description FROM product WHERE id = :id")?
        .query_row(&[(":id", &product_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all products in database iteration order.
pub fn get_all_products(connection: &Connection) -> Result<Vec<Product>, Error> {
    connection
        .prepare("SELECT id, name, price, description FROM product")?
        .query_map([], map_row)?
        .map(|maybe_product| maybe_product.map_err(|error| error.into()))
        .collect()
}

/// Get the number of products in the catalog.
pub fn count_products(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM product;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Product, rusqlite::Error> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
    })
}
