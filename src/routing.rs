//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    cart::{add_cart_item_endpoint, get_cart_page},
    checkout::{get_confirmation_page, post_checkout},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    product::{get_catalog_page, get_product_page},
    session::{auth_guard, get_log_in_page, post_log_in},
    transaction::get_transactions_page,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_catalog_page))
        .route(endpoints::PRODUCT_VIEW, get(get_product_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::CART_VIEW, get(get_cart_page))
        .route(endpoints::CART_ITEMS_API, post(add_cart_item_endpoint))
        .route(endpoints::CHECKOUT_API, post(post_checkout))
        .route(
            endpoints::CHECKOUT_CONFIRMATION_VIEW,
            get(get_confirmation_page),
        )
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
