//! Customer statement rendering
//!
//! The server's filters are applied again locally so a statement never
//! lists orders outside the requested months or payment status. Credits come
//! from the payload's memo list and from memos populated on the orders.

use super::{DEFAULT_WIDTH, Document, DocumentKind, TextBuilder, file_stem};
use crate::credit_memo::CreditLedger;
use crate::credit_memo::ledger::belongs_to;
use crate::models::{CreditMemo, Order, StatementPayload, StatementQuery};
use crate::order::financial::{PaymentBadge, display_amount};
use crate::order::money::{Money, format_money, round_money};
use crate::order::summary::OrderSummary;
use rust_decimal::Decimal;

/// Credits of one order, payload memos deduplicated against populated ones
fn credits_for(order: &Order, listed: &[CreditMemo]) -> CreditLedger {
    let mut memos = order.credit_memos.documents();
    for memo in listed.iter().filter(|m| belongs_to(m, order)) {
        if !memos.iter().any(|m| m.storage_id == memo.storage_id) {
            memos.push(memo.clone());
        }
    }
    CreditLedger::from_memos(&memos, None)
}

pub fn render_statement(payload: &StatementPayload, query: &StatementQuery) -> Document {
    let orders: Vec<&Order> = payload.orders.iter().filter(|o| query.matches(o)).collect();
    let summary = OrderSummary::from_orders(orders.iter().copied());

    let customer_name = payload
        .customer
        .as_ref()
        .and_then(|c| c.name.clone().or_else(|| Some(c.id.clone())))
        .filter(|n| !n.is_empty());

    let mut b = TextBuilder::new(DEFAULT_WIDTH);
    b.title("STATEMENT").sep_double();
    if let Some(name) = &customer_name {
        b.line(&format!("Customer: {}", name));
    }
    match (&query.start_month, &query.end_month) {
        (Some(s), Some(e)) => {
            b.line(&format!("Period: {} to {}", s, e));
        }
        (Some(s), None) => {
            b.line(&format!("Period: from {}", s));
        }
        (None, Some(e)) => {
            b.line(&format!("Period: until {}", e));
        }
        (None, None) => {}
    }
    if let Some(status) = query.payment_status {
        b.line(&format!(
            "Showing: {} orders",
            PaymentBadge::from_status(status).label()
        ));
    }
    b.sep_single();

    if orders.is_empty() {
        b.line("No orders in this period.");
    }
    let mut credited = Decimal::ZERO;
    let mut any_credit = false;
    for order in &orders {
        let date = order
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        let mut left = format!(
            "{}  #{}  {}",
            date,
            order.id,
            PaymentBadge::from_status(order.payment_status).label()
        );
        if order.is_voided() {
            left.push_str("  (voided)");
        }
        b.line_lr(&left, &format_money(display_amount(order)));

        let credits = credits_for(order, &payload.credit_memos);
        for entry in credits.entries() {
            b.line_lr(
                &format!("    credit {}", entry.credit_memo_number),
                &format!("-{}", format_money(entry.amount)),
            );
        }
        any_credit |= !credits.is_empty();
        credited += credits.credited_total();
    }
    let credited: Money = round_money(credited);

    b.sep_single();
    b.line_lr("Orders", &summary.total_orders.to_string());
    b.line_lr("Total", &format_money(summary.total_amount));
    b.line_lr("Received", &format_money(summary.total_received));
    b.line_lr("Outstanding", &format_money(summary.total_pending));
    if any_credit {
        b.line_lr("Credited", &format!("-{}", format_money(credited)));
        b.line_lr("Net", &format_money(summary.total_amount - credited));
    }

    let stem = customer_name.as_deref().map(file_stem).unwrap_or_else(|| "customer".into());
    Document {
        kind: DocumentKind::Statement,
        file_name: format!("statement-{}.txt", stem),
        title: match &customer_name {
            Some(name) => format!("Statement for {}", name),
            None => "Statement".to_string(),
        },
        content: b.build(),
    }
}
