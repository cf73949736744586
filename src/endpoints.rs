//! The URIs for the pages and form endpoints.
//!
//! For endpoints that take a parameter, e.g., '/products/{product_id}', use [format_endpoint].

/// The menu page listing all products.
pub const ROOT: &str = "/";
/// The page for a single product with the add-to-cart form.
pub const PRODUCT_VIEW: &str = "/products/{product_id}";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page listing the items in the user's cart.
pub const CART_VIEW: &str = "/cart";
/// The page shown after a successful checkout.
pub const CHECKOUT_CONFIRMATION_VIEW: &str = "/cart/confirmation";
/// The page for displaying a user's past purchases.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for adding a product to the user's cart.
pub const CART_ITEMS_API: &str = "/api/cart/items";
/// The route for turning the user's cart into a transaction.
pub const CHECKOUT_API: &str = "/api/checkout";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/products/{product_id}', '{product_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
