//! OrderDesk Client - order back-office client
//!
//! Typed REST access to the order backend plus the interactive workflows
//! built on it: payments, voids, credit memos and statements.

pub mod api;
pub mod config;
pub mod confirm;
pub mod desk;
pub mod error;
pub mod guard;
pub mod http;
pub mod logger;
pub mod notify;
pub mod session;
pub mod sink;
pub mod workflow;

pub use config::{ClientConfig, Endpoints};
pub use desk::{OrderDesk, OrderDeskBuilder};
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::Session;

// Re-export shared types for convenience
pub use shared;
