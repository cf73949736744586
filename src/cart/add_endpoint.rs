//! The endpoint for adding a product to the cart.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    cart::add_cart_item,
    database_id::ProductId,
    endpoints,
    product::get_product,
    user::User,
};

/// The state needed for adding items to a cart.
#[derive(Debug, Clone)]
pub struct AddCartItemState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddCartItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data submitted by the add-to-cart form.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemForm {
    /// The product to add.
    pub product_id: ProductId,
    /// How many to add, must be at least one.
    pub quantity: i64,
}

/// Handle the add-to-cart form and redirect to the cart.
///
/// Responds with 400 if the quantity is less than one and 404 if the product does not exist.
pub async fn add_cart_item_endpoint(
    State(state): State<AddCartItemState>,
    Extension(user): Extension<User>,
    Form(form): Form<CartItemForm>,
) -> Result<Response, Error> {
    if form.quantity <= 0 {
        return Err(Error::InvalidQuantity(form.quantity));
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let product = get_product(form.product_id, &connection).inspect_err(|error| {
        tracing::warn!(
            "Could not add product {} to the cart of user {}: {error}",
            form.product_id,
            user.id
        )
    })?;

    add_cart_item(user.id, product.id, form.quantity, &connection)?;

    tracing::debug!(
        "Added {} x {} to the cart of user {}",
        form.quantity,
        product.name,
        user.id
    );

    Ok(Redirect::to(endpoints::CART_VIEW).into_response())
}
