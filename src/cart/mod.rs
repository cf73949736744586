//! The shopping cart: adding products and showing the cart contents.

mod add_endpoint;
mod cart_page;
mod db;

pub use add_endpoint::add_cart_item_endpoint;
pub use cart_page::get_cart_page;
pub(crate) use db::clear_cart;
pub use db::{CartItem, add_cart_item, create_cart_item_table, get_cart_items_for_user};
