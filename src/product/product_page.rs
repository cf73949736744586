//! The product detail page with the add-to-cart form.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ProductId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        format_price, link,
    },
    navigation::NavBar,
    product::{Product, get_product},
    session::get_user_from_cookies,
};

/// The state needed for the product page.
#[derive(Debug, Clone)]
pub struct ProductPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProductPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the details for a single product.
///
/// Responds with the 404 page if there is no product with `product_id`.
pub async fn get_product_page(
    State(state): State<ProductPageState>,
    jar: PrivateCookieJar,
    Path(product_id): Path<ProductId>,
) -> Result<Response, Error> {
    let user = get_user_from_cookies(&jar, &state.db_connection)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let product = get_product(product_id, &connection).inspect_err(|error| match error {
        Error::NotFound => {}
        error => tracing::error!("Failed to retrieve product {product_id}: {error}"),
    })?;

    Ok(product_view(&product, user.is_some()).into_response())
}

fn add_to_cart_form(product_id: ProductId) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::CART_ITEMS_API)
            class="space-y-4"
        {
            input type="hidden" name="product_id" value=(product_id);

            div
            {
                label for="quantity" class=(FORM_LABEL_STYLE) { "Quantity" }

                input
                    type="number"
                    name="quantity"
                    id="quantity"
                    min="1"
                    step="1"
                    value="1"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add to cart" }
        }
    }
}

fn product_view(product: &Product, is_logged_in: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::PRODUCT_VIEW, is_logged_in).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            article class="w-full max-w-md space-y-4"
            {
                header class="flex justify-between items-baseline"
                {
                    h1 class="text-2xl font-bold" { (product.name) }
                    span id="price" class="text-xl font-mono" { (format_price(product.price)) }
                }

                p { (product.description) }

                (add_to_cart_form(product.id))

                p { (link(endpoints::ROOT, "Back to the menu")) }
            }
        }
    );

    base(&product.name, &content)
}
