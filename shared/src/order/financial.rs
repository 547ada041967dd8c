//! Order financial state
//!
//! Pure derivation of what an order looks like financially and which
//! payment/status actions it allows. No I/O. Anything missing or
//! unrecognized resolves to the least-privileged outcome.

use super::money::{Money, line_total, round_money};
use crate::models::{Order, OrderItem, OrderStatus, PaymentStatus};
use rust_decimal::Decimal;
use serde::Serialize;

/// Payment badge shown in tables and documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentBadge {
    Unpaid,
    Partial,
    Paid,
    Unknown,
}

impl PaymentBadge {
    /// `pending` is shown to users as "unpaid"; the stored value is unchanged
    pub fn from_status(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => Self::Unpaid,
            PaymentStatus::Partial => Self::Partial,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Unknown => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Unknown => "unknown",
        }
    }
}

/// The payment button offered for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentAction {
    PayNow,
    EditPayment,
}

impl PaymentAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PayNow => "Pay Now",
            Self::EditPayment => "Edit Payment",
        }
    }

    /// Compact label used in narrow table cells
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::PayNow => "Pay Now",
            Self::EditPayment => "Edit",
        }
    }
}

/// Visibility of the "Change Status" control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusControl {
    Available,
    /// Fulfillment is terminal
    Hidden,
    /// Voided or unreadable order
    Disabled,
}

/// Actions permitted on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderActions {
    /// `None` when payment actions are disabled
    pub payment: Option<PaymentAction>,
    pub change_status: StatusControl,
    pub mark_unpaid: bool,
}

impl OrderActions {
    const LOCKED: Self = Self {
        payment: None,
        change_status: StatusControl::Disabled,
        mark_unpaid: false,
    };

    pub fn can_pay(&self) -> bool {
        self.payment.is_some()
    }

    pub fn can_change_status(&self) -> bool {
        self.change_status == StatusControl::Available
    }
}

/// Line as it must be displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    pub product_id: String,
    pub product_name: String,
    pub quantity: Money,
    pub unit_price: Money,
    pub total: Money,
    /// Pre-void `(quantity, total)`, kept for the struck-through audit display
    pub voided_original: Option<(Money, Money)>,
}

/// Derived financial view of one order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialView {
    pub order_id: String,
    pub storage_id: String,
    pub badge: PaymentBadge,
    pub actions: OrderActions,
    /// Amount to display (adjusted amount for voided orders)
    pub amount: Money,
    /// Pre-void gross total, only for voided orders
    pub voided_original_amount: Option<Money>,
    pub shipping_cost: Money,
    pub lines: Vec<LineView>,
    pub voided: bool,
    pub void_reason: Option<String>,
    /// `false` when the order claims `paid` without usable payment evidence
    pub payment_evidence_ok: bool,
}

impl FinancialView {
    pub fn payment_button_label(&self) -> Option<&'static str> {
        self.actions.payment.map(|a| a.label())
    }
}

/// Amount a summary or document must use for this order
pub fn display_amount(order: &Order) -> Money {
    if !order.is_voided() {
        return order.total;
    }
    match order.deleted.as_ref().and_then(|d| d.amount) {
        Some(amount) => amount,
        None => round_money(order.items.iter().map(|i| voided_line(i).2).sum()),
    }
}

/// `(quantity, unit_price, total)` of a line after voiding
fn voided_line(item: &OrderItem) -> (Money, Money, Money) {
    let quantity = item.deleted_quantity.unwrap_or(Decimal::ZERO);
    let total = item
        .deleted_total
        .unwrap_or_else(|| line_total(quantity, item.unit_price));
    (quantity, item.unit_price, total)
}

/// Permitted actions for an order
pub fn actions(order: &Order) -> OrderActions {
    if order.is_voided() {
        return OrderActions::LOCKED;
    }

    let payment = match order.payment_status {
        PaymentStatus::Pending => Some(PaymentAction::PayNow),
        PaymentStatus::Partial | PaymentStatus::Paid => Some(PaymentAction::EditPayment),
        PaymentStatus::Unknown => None,
    };

    let change_status = if order.status.is_terminal() {
        StatusControl::Hidden
    } else if order.status == OrderStatus::Unknown {
        StatusControl::Disabled
    } else {
        StatusControl::Available
    };

    let mark_unpaid = matches!(
        order.payment_status,
        PaymentStatus::Partial | PaymentStatus::Paid
    );

    OrderActions {
        payment,
        change_status,
        mark_unpaid,
    }
}

/// Derive the full financial view of an order
pub fn derive(order: &Order) -> FinancialView {
    let voided = order.is_voided();

    let lines = order
        .items
        .iter()
        .map(|item| {
            if voided {
                let (quantity, unit_price, total) = voided_line(item);
                LineView {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    quantity,
                    unit_price,
                    total,
                    voided_original: Some((item.quantity, item.total)),
                }
            } else {
                LineView {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total: item.total,
                    voided_original: None,
                }
            }
        })
        .collect();

    let payment_evidence_ok = order.payment_status != PaymentStatus::Paid
        || order
            .payment_details
            .as_ref()
            .is_some_and(|d| d.has_evidence());

    FinancialView {
        order_id: order.id.clone(),
        storage_id: order.storage_id.clone(),
        badge: PaymentBadge::from_status(order.payment_status),
        actions: actions(order),
        amount: display_amount(order),
        voided_original_amount: voided.then_some(order.total),
        shipping_cost: order.shipping_cost,
        lines,
        voided,
        void_reason: if voided {
            order.void_reason().map(str::to_string)
        } else {
            None
        },
        payment_evidence_ok,
    }
}
