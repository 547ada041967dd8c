//! Shared types for OrderDesk
//!
//! Domain model, error codes and the pure order-financial logic used by
//! the client crate. Nothing in here performs I/O.

pub mod credit_memo;
pub mod de;
pub mod document;
pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode, RejectionReport};
pub use http;
pub use order::money::Money;
pub use serde::{Deserialize, Serialize};
