//! The checkout form endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, checkout::checkout, endpoints, user::User};

/// The state needed for checking out.
#[derive(Debug, Clone)]
pub struct CheckoutState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CheckoutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Check out the logged-in user's cart and redirect to the confirmation page.
pub async fn post_checkout(
    State(state): State<CheckoutState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    checkout(user.id, &connection)
        .inspect_err(|error| tracing::error!("Checkout failed for user {}: {error}", user.id))?;

    Ok(Redirect::to(endpoints::CHECKOUT_CONFIRMATION_VIEW).into_response())
}
