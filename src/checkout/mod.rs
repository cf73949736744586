//! Checking out a cart and the confirmation page.

mod confirmation_page;
mod core;
mod endpoint;

pub use confirmation_page::get_confirmation_page;
pub use core::checkout;
pub use endpoint::post_checkout;
