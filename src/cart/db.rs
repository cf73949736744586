//! Database operations for shopping carts.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{CartItemId, ProductId},
    user::UserID,
};

/// A product and quantity waiting in a user's cart.
///
/// Carts are append-only: adding the same product twice creates two items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The ID of the cart item.
    pub id: CartItemId,
    /// The user that owns the cart.
    pub user_id: UserID,
    /// The product that was added.
    pub product_id: ProductId,
    /// How many of the product to buy.
    pub quantity: i64,
    /// The current name of the product, or `None` if the product no longer exists.
    pub product_name: Option<String>,
}

/// Create the cart item table.
pub fn create_cart_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS cart_item (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            quantity INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_cart_item_user_id ON cart_item(user_id);",
    )?;

    Ok(())
}

/// Add `quantity` of the product `product_id` to the cart of `user_id`.
///
/// The quantity and product are not checked, callers must validate them first.
///
/// # Errors
/// Returns [Error::SqlError] if the insert failed.
pub fn add_cart_item(
    user_id: UserID,
    product_id: ProductId,
    quantity: i64,
    connection: &Connection,
) -> Result<CartItemId, Error> {
    connection.execute(
        "INSERT INTO cart_item (user_id, product_id, quantity) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), product_id, quantity),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Get the items in the cart of `user_id` in the order they were added.
///
/// # Errors
/// Returns [Error::SqlError] if the query failed.
pub fn get_cart_items_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CartItem>, Error> {
    connection
        .prepare(
            "SELECT cart_item.id, cart_item.user_id, cart_item.product_id, cart_item.quantity,
                product.name
            FROM cart_item
            LEFT JOIN product ON cart_item.product_id = product.id
            WHERE cart_item.user_id = :user_id
            ORDER BY cart_item.id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Remove every item from the cart of `user_id`.
///
/// Returns the number of items removed.
pub(crate) fn clear_cart(user_id: UserID, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM cart_item WHERE user_id = ?1",
            [user_id.as_i64()],
        )
        .map_err(Error::from)
}

fn map_row(row: &Row) -> Result<CartItem, rusqlite::Error> {
    Ok(CartItem {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        product_id: row.get(2)?,
        quantity: row.get(3)?,
        product_name: row.get(4)?,
    })
}

#[cfg(test)]
mod cart_query_tests {
    use crate::{test_utils::get_test_connection, user::UserID};

    use super::{CartItem, add_cart_item, clear_cart, get_cart_items_for_user};

    const ZAGREUS: UserID = UserID::new(1);
    const MELINOE: UserID = UserID::new(2);

    #[test]
    fn new_user_has_empty_cart() {
        let connection = get_test_connection();

        assert_eq!(get_cart_items_for_user(ZAGREUS, &connection), Ok(vec![]));
    }

    #[test]
    fn items_come_back_in_insertion_order_with_names() {
        let connection = get_test_connection();
        let first = add_cart_item(ZAGREUS, 3, 2, &connection).unwrap();
        let second = add_cart_item(ZAGREUS, 1, 1, &connection).unwrap();

        let got = get_cart_items_for_user(ZAGREUS, &connection).unwrap();

        assert_eq!(
            got,
            vec![
                CartItem {
                    id: first,
                    user_id: ZAGREUS,
                    product_id: 3,
                    quantity: 2,
                    product_name: Some("Espresso".to_owned()),
                },
                CartItem {
                    id: second,
                    user_id: ZAGREUS,
                    product_id: 1,
                    quantity: 1,
                    product_name: Some("Americano".to_owned()),
                },
            ]
        );
    }

    #[test]
    fn adding_same_product_twice_creates_two_items() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 2, 1, &connection).unwrap();
        add_cart_item(ZAGREUS, 2, 1, &connection).unwrap();

        let got = get_cart_items_for_user(ZAGREUS, &connection).unwrap();

        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|item| item.product_id == 2 && item.quantity == 1));
    }

    #[test]
    fn carts_are_separate_per_user() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 1, 1, &connection).unwrap();
        add_cart_item(MELINOE, 4, 3, &connection).unwrap();

        let got = get_cart_items_for_user(MELINOE, &connection).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].product_id, 4);
        assert_eq!(got[0].quantity, 3);
    }

    #[test]
    fn item_for_missing_product_has_no_name() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 999, 1, &connection).unwrap();

        let got = get_cart_items_for_user(ZAGREUS, &connection).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].product_name, None);
    }

    #[test]
    fn clear_cart_only_removes_that_users_items() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 1, 1, &connection).unwrap();
        add_cart_item(ZAGREUS, 2, 1, &connection).unwrap();
        add_cart_item(MELINOE, 3, 1, &connection).unwrap();

        assert_eq!(clear_cart(ZAGREUS, &connection), Ok(2));

        assert_eq!(get_cart_items_for_user(ZAGREUS, &connection), Ok(vec![]));
        assert_eq!(get_cart_items_for_user(MELINOE, &connection).unwrap().len(), 1);
    }
}
