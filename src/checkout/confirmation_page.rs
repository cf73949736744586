//! The page shown after a successful checkout.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
};

/// Render the checkout confirmation page.
pub async fn get_confirmation_page() -> Response {
    confirmation_view().into_response()
}

fn confirmation_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::CHECKOUT_CONFIRMATION_VIEW, true).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md space-y-4 text-center"
            {
                h1 class="text-2xl font-bold" { "Thank you for your order!" }

                p { "Your order has been placed." }

                p
                {
                    (link(endpoints::TRANSACTIONS_VIEW, "View your purchases"))
                    " or "
                    (link(endpoints::ROOT, "keep browsing the menu"))
                    "."
                }
            }
        }
    );

    base("Order Confirmed", &content)
}
