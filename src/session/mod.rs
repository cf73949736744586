//! Session log-in and the middleware that protects pages which need a logged-in user.

mod cookie;
mod db;
mod log_in;
mod middleware;
mod redirect;
mod token;

pub use db::{create_session_table, get_user_by_session_token};
pub use log_in::{get_log_in_page, log_in, post_log_in};
pub use middleware::auth_guard;
pub(crate) use middleware::get_user_from_cookies;
pub use token::SessionToken;
