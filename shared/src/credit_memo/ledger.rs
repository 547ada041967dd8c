//! Credits already issued against an order
//!
//! Quantities are summed per product across every memo of the order except
//! cancelled ones and the memo being edited. What remains bounds the next
//! memo, and the credited total nets the order's amount on documents.

use crate::models::{CreditMemo, CreditMemoStatus, Order, OrderItem};
use crate::order::financial::display_amount;
use crate::order::money::{Money, compute_total, round_money};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// One memo as it counts against the order
#[derive(Debug, Clone, PartialEq)]
pub struct CreditEntry {
    pub credit_memo_number: String,
    pub status: CreditMemoStatus,
    pub amount: Money,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreditLedger {
    quantities: HashMap<String, Money>,
    entries: Vec<CreditEntry>,
}

/// Whether `memo` was issued against `order`
pub fn belongs_to(memo: &CreditMemo, order: &Order) -> bool {
    if !memo.order_id.is_empty() {
        return memo.order_id == order.storage_id;
    }
    !memo.order_number.is_empty() && memo.order_number == order.id
}

impl CreditLedger {
    /// Sum `memos`, skipping cancelled ones and the one stored as `excluding`
    pub fn from_memos<'a, I>(memos: I, excluding: Option<&str>) -> Self
    where
        I: IntoIterator<Item = &'a CreditMemo>,
    {
        let mut ledger = Self::default();
        for memo in memos {
            if memo.status == CreditMemoStatus::Cancelled
                || excluding.is_some_and(|id| id == memo.storage_id)
            {
                continue;
            }
            for item in &memo.items {
                *ledger
                    .quantities
                    .entry(item.product_id.clone())
                    .or_insert(Decimal::ZERO) += item.quantity;
            }
            let amount = if memo.items.is_empty() {
                memo.total_amount
            } else {
                compute_total(&memo.items)
            };
            ledger.entries.push(CreditEntry {
                credit_memo_number: memo.credit_memo_number.clone(),
                status: memo.status,
                amount,
            });
        }
        ledger
    }

    /// Same as [`CreditLedger::from_memos`] restricted to memos of `order`
    pub fn for_order<'a, I>(order: &Order, memos: I, excluding: Option<&str>) -> Self
    where
        I: IntoIterator<Item = &'a CreditMemo>,
    {
        Self::from_memos(
            memos.into_iter().filter(|m| belongs_to(m, order)),
            excluding,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CreditEntry] {
        &self.entries
    }

    pub fn credited_quantity(&self, product_id: &str) -> Money {
        self.quantities
            .get(product_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Ordered minus already credited, never below zero
    pub fn remaining(&self, item: &OrderItem) -> Money {
        (item.quantity - self.credited_quantity(&item.product_id)).max(Decimal::ZERO)
    }

    pub fn credited_total(&self) -> Money {
        round_money(self.entries.iter().map(|e| e.amount).sum())
    }

    /// Order amount after credits
    pub fn net_amount(&self, order: &Order) -> Money {
        round_money(display_amount(order) - self.credited_total())
    }
}
