//! Data models
//!
//! Documents exchanged with the order backend. Field names follow the
//! backend's camelCase JSON; monetary values are [`Money`](crate::order::money::Money).

pub mod credit_memo;
pub mod listing;
pub mod order;
pub mod payment;
pub mod statement;

pub use credit_memo::{
    CreditMemo, CreditMemoItem, CreditMemoList, CreditMemoResponse, CreditMemoStatus,
    CreditReason, EvidenceKind, RefundMethod, UploadedFile,
};
pub use listing::{OrderListPage, OrderListQuery, Pagination};
pub use order::{
    CreditMemoRefs, CustomerRef, Order, OrderItem, OrderMutationResponse, OrderStatus,
    OrderUpdate, VoidRecord, VoidRequest,
};
pub use payment::{PaymentDetails, PaymentMethod, PaymentStatus, PaymentUpdate};
pub use statement::{StatementPayload, StatementQuery};
