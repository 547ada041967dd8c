//! Order financial logic
//!
//! - [`financial`]: payment badge, permitted actions and display figures
//! - [`payment`]: payment form validation
//! - [`summary`]: reconciled totals over a set of orders
//! - [`money`]: decimal helpers

pub mod financial;
pub mod money;
pub mod payment;
pub mod summary;

pub use financial::{
    FinancialView, LineView, OrderActions, PaymentAction, PaymentBadge, StatusControl, actions,
    derive, display_amount,
};
pub use money::{Money, PricedLine, compute_total};
pub use payment::{PaymentForm, PaymentTarget};
pub use summary::OrderSummary;
