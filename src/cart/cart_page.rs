//! The page showing the contents of the user's cart.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    cart::{CartItem, get_cart_items_for_user},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, link,
    },
    navigation::NavBar,
    user::User,
};

/// The state needed for the cart page.
#[derive(Debug, Clone)]
pub struct CartPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CartPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the cart for the logged-in user.
pub async fn get_cart_page(
    State(state): State<CartPageState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let items = get_cart_items_for_user(user.id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve cart for {}: {error}", user.id))?;

    Ok(cart_view(&items).into_response())
}

fn checkout_form() -> Markup {
    html! {
        form method="post" action=(endpoints::CHECKOUT_API) class="w-full"
        {
            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Check out" }
        }
    }
}

fn cart_view(items: &[CartItem]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CART_VIEW, true).into_html();

    let table_row = |item: &CartItem| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    @match &item.product_name {
                        Some(name) => { (name) }
                        None => { span class="italic" { "Unavailable product" } }
                    }
                }

                td class=(TABLE_CELL_STYLE) { (item.quantity) }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Your Cart" }

                @if items.is_empty() {
                    p
                    {
                        "Your cart is empty. "
                        (link(endpoints::ROOT, "Browse the menu"))
                    }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Product" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Quantity" }
                            }
                        }

                        tbody
                        {
                            @for item in items {
                                (table_row(item))
                            }
                        }
                    }

                    (checkout_form())
                }
            }
        }
    );

    base("Cart", &content)
}
