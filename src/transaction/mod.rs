//! Completed purchases and the purchase history page.

mod db;
mod history_page;

pub(crate) use db::create_transaction;
pub use db::{
    TransactionLine, TransactionSummary, create_line_item_table, create_transaction_table,
    get_transaction_history,
};
pub use history_page::get_transactions_page;
