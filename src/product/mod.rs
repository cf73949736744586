//! The product catalog: the menu page and the product detail page.

mod catalog_page;
mod db;
mod product_page;

pub use catalog_page::get_catalog_page;
pub use db::{Product, create_product_table, get_all_products, get_product, seed_products};
pub use product_page::get_product_page;

#[cfg(test)]
pub(crate) use db::{SEED_PRODUCTS, count_products};
