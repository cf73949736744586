//! Cafe is a small web shop for ordering coffee.
//!
//! This library serves HTML pages for browsing the product catalog, logging
//! in, filling a shopping cart, checking out, and viewing past purchases.
//! All state lives in a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod cart;
mod checkout;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod product;
mod routing;
mod session;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use cart::{CartItem, add_cart_item, get_cart_items_for_user};
pub use checkout::checkout;
pub use database_id::{CartItemId, DatabaseId, ProductId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use product::{Product, get_all_products, get_product};
pub use routing::build_router;
pub use session::{SessionToken, get_user_by_session_token, log_in};
pub use transaction::{TransactionLine, TransactionSummary, get_transaction_history};
pub use user::{User, UserID, get_all_users};

use crate::{
    html::{ErrorPage, render_error_page},
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username and password did not match a user.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// A cart item was submitted with a quantity of zero or less.
    #[error("{0} is not a valid quantity, the quantity must be at least one")]
    InvalidQuantity(i64),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidQuantity(quantity) => {
                let fix = format!("{quantity} is not a valid quantity, choose at least one.");

                render_error_page(
                    StatusCode::BAD_REQUEST,
                    ErrorPage {
                        title: "Bad Request",
                        description: "Invalid quantity",
                        fix: &fix,
                    },
                )
            }
            Error::InvalidCredentials => render_error_page(
                StatusCode::UNAUTHORIZED,
                ErrorPage {
                    title: "Unauthorized",
                    description: "Invalid username or password",
                    fix: "Check your details and log in again.",
                },
            ),
            Error::InvalidTimezoneError(timezone) => {
                let fix = format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                );

                InternalServerError {
                    description: "Invalid Timezone Settings",
                    fix: &fix,
                }
                .into_response()
            }
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
