//! Turns a user's cart into a completed transaction.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use time::OffsetDateTime;

use crate::{
    Error,
    cart::{clear_cart, get_cart_items_for_user},
    database_id::TransactionId,
    transaction::create_transaction,
    user::UserID,
};

/// Move every item in the cart of `user_id` into a new transaction and empty the cart.
///
/// Each cart item becomes one line item that keeps the product name it had at this moment.
/// An empty cart still creates a transaction, just without any line items.
///
/// The write lock is taken before the cart is read, so two checkouts for the same user run one
/// after the other and the second sees an empty cart.
///
/// # Errors
/// Returns [Error::SqlError] if any step failed. Nothing is written in that case and the cart is
/// left as it was.
pub fn checkout(user_id: UserID, connection: &Connection) -> Result<TransactionId, Error> {
    let tx = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let transaction_id = create_transaction(user_id, OffsetDateTime::now_utc(), &tx)?;
    let cart_items = get_cart_items_for_user(user_id, &tx)?;

    let mut stmt = tx.prepare(
        "INSERT INTO line_item (transaction_id, product_id, product_name, quantity)
        VALUES (?1, ?2, ?3, ?4)",
    )?;

    for item in &cart_items {
        stmt.execute((
            transaction_id,
            item.product_id,
            item.product_name.as_deref(),
            item.quantity,
        ))?;
    }

    drop(stmt);
    clear_cart(user_id, &tx)?;
    tx.commit()?;

    tracing::info!(
        "User {user_id} checked out {} items as transaction {transaction_id}",
        cart_items.len()
    );

    Ok(transaction_id)
}

#[cfg(test)]
mod checkout_tests {
    use crate::{
        cart::{add_cart_item, get_cart_items_for_user},
        test_utils::get_test_connection,
        transaction::get_transaction_history,
        user::UserID,
    };

    use super::checkout;

    const ZAGREUS: UserID = UserID::new(1);
    const MELINOE: UserID = UserID::new(2);

    fn count_rows(table: &str, connection: &rusqlite::Connection) -> i64 {
        connection
            .query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn checkout_moves_cart_into_transaction() {
        let connection = get_test_connection();
        let cart = [(1, 2), (3, 1), (1, 4)];
        for (product_id, quantity) in cart {
            add_cart_item(ZAGREUS, product_id, quantity, &connection).unwrap();
        }

        let transaction_id = checkout(ZAGREUS, &connection).expect("checkout failed");

        let history = get_transaction_history(ZAGREUS, &connection).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, transaction_id);
        let got = history[0]
            .lines
            .iter()
            .map(|line| (line.product_id, line.quantity))
            .collect::<Vec<_>>();
        assert_eq!(got, cart);
        assert_eq!(
            history[0]
                .lines
                .iter()
                .map(|line| line.product_name.as_deref())
                .collect::<Vec<_>>(),
            [Some("Americano"), Some("Espresso"), Some("Americano")]
        );
        assert_eq!(get_cart_items_for_user(ZAGREUS, &connection), Ok(vec![]));
    }

    #[test]
    fn checkout_with_empty_cart_creates_empty_transaction() {
        let connection = get_test_connection();

        let transaction_id = checkout(ZAGREUS, &connection).expect("checkout failed");

        let history = get_transaction_history(ZAGREUS, &connection).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, transaction_id);
        assert!(history[0].lines.is_empty());
    }

    #[test]
    fn checkout_leaves_other_carts_alone() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 1, 1, &connection).unwrap();
        add_cart_item(MELINOE, 2, 3, &connection).unwrap();

        checkout(ZAGREUS, &connection).expect("checkout failed");

        assert_eq!(
            get_cart_items_for_user(MELINOE, &connection).unwrap().len(),
            1
        );
        assert_eq!(get_transaction_history(MELINOE, &connection), Ok(vec![]));
    }

    #[test]
    fn second_checkout_is_listed_first() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 1, 1, &connection).unwrap();
        let first = checkout(ZAGREUS, &connection).unwrap();
        add_cart_item(ZAGREUS, 2, 1, &connection).unwrap();
        let second = checkout(ZAGREUS, &connection).unwrap();

        let history = get_transaction_history(ZAGREUS, &connection).unwrap();

        assert_eq!(
            history.iter().map(|summary| summary.id).collect::<Vec<_>>(),
            vec![second, first]
        );
        assert_eq!(history[0].lines[0].product_id, 2);
        assert_eq!(history[1].lines[0].product_id, 1);
    }

    #[test]
    fn repeated_checkout_does_not_duplicate_lines() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 1, 1, &connection).unwrap();

        checkout(ZAGREUS, &connection).unwrap();
        checkout(ZAGREUS, &connection).unwrap();

        assert_eq!(count_rows("line_item", &connection), 1);
        let history = get_transaction_history(ZAGREUS, &connection).unwrap();
        assert!(history[0].lines.is_empty());
        assert_eq!(history[1].lines.len(), 1);
    }

    #[test]
    fn failed_checkout_rolls_back() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 1, 2, &connection).unwrap();
        add_cart_item(ZAGREUS, 4, 1, &connection).unwrap();
        connection.execute("DROP TABLE line_item", ()).unwrap();

        let result = checkout(ZAGREUS, &connection);

        assert!(result.is_err(), "want checkout to fail, got {result:?}");
        assert_eq!(count_rows("transaction", &connection), 0);
        assert_eq!(
            get_cart_items_for_user(ZAGREUS, &connection).unwrap().len(),
            2
        );
    }

    #[test]
    fn line_items_keep_product_name_after_rename() {
        let connection = get_test_connection();
        add_cart_item(ZAGREUS, 3, 1, &connection).unwrap();
        checkout(ZAGREUS, &connection).unwrap();

        connection
            .execute("UPDATE product SET name = 'Ristretto' WHERE id = 3", ())
            .unwrap();

        let history = get_transaction_history(ZAGREUS, &connection).unwrap();
        assert_eq!(history[0].lines[0].product_name.as_deref(), Some("Espresso"));
    }
}
