//! Fleet-wide order summary
//!
//! Voided orders contribute their adjusted amount (`deleted.amount`).
//! `paid` orders count as received; `pending`, `partial` and unreadable
//! statuses count as pending, so `received + pending = amount` holds by
//! construction for locally derived summaries.

use super::financial::display_amount;
use super::money::{Money, approx_eq, round_money};
use crate::models::{Order, PaymentStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default, with = "crate::de::money")]
    pub total_amount: Money,
    #[serde(default, with = "crate::de::money")]
    pub total_received: Money,
    #[serde(default, with = "crate::de::money")]
    pub total_pending: Money,
}

impl OrderSummary {
    /// Derive a summary from already-fetched orders
    pub fn from_orders<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut summary = Self::default();
        for order in orders {
            let amount = display_amount(order);
            summary.total_orders += 1;
            summary.total_amount += amount;
            match order.payment_status {
                PaymentStatus::Paid => summary.total_received += amount,
                PaymentStatus::Pending | PaymentStatus::Partial | PaymentStatus::Unknown => {
                    summary.total_pending += amount
                }
            }
        }
        summary.total_amount = round_money(summary.total_amount);
        summary.total_received = round_money(summary.total_received);
        summary.total_pending = round_money(summary.total_pending);
        summary
    }

    /// `received + pending = amount` within one cent
    pub fn is_reconciled(&self) -> bool {
        approx_eq(self.total_received + self.total_pending, self.total_amount)
    }

    /// Amount by which the summary fails to reconcile
    pub fn discrepancy(&self) -> Money {
        self.total_amount - self.total_received - self.total_pending
    }

    pub fn is_empty(&self) -> bool {
        self.total_orders == 0 && self.total_amount == Decimal::ZERO
    }
}
