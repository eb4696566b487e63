pub mod filter;
pub mod handlers;
pub mod models;
pub mod service;
pub mod summary;

// Re-export handlers for registration in main.rs
pub use handlers::{
    create_transaction, delete_all_transactions, delete_by_category, delete_transaction,
    get_stats, get_transaction, list_categories, list_transactions, update_transaction,
};
