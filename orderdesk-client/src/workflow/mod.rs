//! Interactive workflows
//!
//! Each workflow handles its own failures: it logs, raises a notice and
//! leaves previously held state untouched before returning the error.

pub mod credit_memo;
pub mod order_board;
pub mod payment;
pub mod statement;

pub use credit_memo::{CreditMemoService, ManagementView, SubmitOutcome};
pub use order_board::OrderBoard;
pub use payment::{DialogState, PaymentDialog, PaymentService};
pub use statement::{StatementOutcome, StatementService};
