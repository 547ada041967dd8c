//! Typed REST API

pub mod credit_memos;
pub mod orders;

pub use credit_memos::CreditMemoApi;
pub use orders::OrderApi;
