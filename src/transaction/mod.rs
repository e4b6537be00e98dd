//! Transactions: money spent or earned, filed under a category.

mod core;
mod draft;
mod view;

pub use core::Transaction;
pub use draft::TransactionDraft;
