//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a product in the catalog.
pub type ProductId = DatabaseId;
/// The ID of a row in a user's cart.
pub type CartItemId = DatabaseId;
/// The ID of a completed purchase.
pub type TransactionId = DatabaseId;
