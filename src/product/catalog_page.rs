//! The menu page listing every product.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_price},
    navigation::NavBar,
    product::{Product, get_all_products},
    session::get_user_from_cookies,
    user::User,
};

/// The state needed for the catalog page.
#[derive(Debug, Clone)]
pub struct CatalogPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CatalogPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the menu, greeting the user if they are logged in.
pub async fn get_catalog_page(
    State(state): State<CatalogPageState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let user = get_user_from_cookies(&jar, &state.db_connection)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let products = get_all_products(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve products: {error}"))?;

    Ok(catalog_view(user.as_ref(), &products).into_response())
}

fn catalog_view(user: Option<&User>, products: &[Product]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT, user.is_some()).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-4"
            {
                header class="space-y-1"
                {
                    h1 class="text-2xl font-bold" { "Menu" }

                    @if let Some(user) = user {
                        p id="greeting" { "Welcome back, " (user.username) "!" }
                    }
                }

                ul class="grid gap-4 sm:grid-cols-2"
                {
                    @for product in products {
                        li
                            class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                            data-product-id=(product.id)
                        {
                            div class="flex justify-between items-baseline"
                            {
                                a
                                    href=(endpoints::format_endpoint(endpoints::PRODUCT_VIEW, product.id))
                                    class=(LINK_STYLE)
                                {
                                    h2 class="text-lg font-semibold" { (product.name) }
                                }

                                span class="font-mono" { (format_price(product.price)) }
                            }

                            p class="text-sm text-gray-600 dark:text-gray-400"
                            {
                                (product.description)
                            }
                        }
                    }
                }

                @if products.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "Nothing on the menu right now."
                    }
                }
            }
        }
    );

    base("Menu", &content)
}
