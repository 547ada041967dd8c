//! Invoice rendering
//!
//! Credits issued against the order are listed under the totals and net the
//! amount due. Cancelled memos are left out.

use super::{DEFAULT_WIDTH, Document, DocumentKind, TextBuilder, file_stem, struck};
use crate::credit_memo::CreditLedger;
use crate::models::{CreditMemo, Order};
use crate::order::financial::derive;
use crate::order::money::format_money;

pub fn render_invoice(order: &Order, credit_memos: &[CreditMemo]) -> Document {
    let view = derive(order);
    let mut b = TextBuilder::new(DEFAULT_WIDTH);

    b.title("INVOICE").sep_double();
    b.line_lr(&format!("Order #{}", order.id), order.status.as_str());
    if let Some(created) = order.created_at {
        b.line(&format!("Date: {}", created.format("%Y-%m-%d")));
    }
    if let Some(customer) = &order.customer {
        b.line(&format!(
            "Bill to: {}",
            customer.name.as_deref().unwrap_or(&customer.id)
        ));
        if let Some(email) = &customer.email {
            b.line(email);
        }
    }
    b.line(&format!("Payment: {}", view.badge.label()));
    if view.voided {
        b.line(&format!(
            "VOIDED: {}",
            view.void_reason.as_deref().unwrap_or("no reason recorded")
        ));
    }
    b.sep_single();

    for line in &view.lines {
        let (qty, total) = match line.voided_original {
            Some((orig_qty, orig_total)) => (
                format!("~~{}~~ {}", orig_qty.normalize(), line.quantity.normalize()),
                struck(orig_total, line.total),
            ),
            None => (line.quantity.normalize().to_string(), format_money(line.total)),
        };
        b.line_lr(
            &format!(
                "{}  {} x {}",
                line.product_name,
                qty,
                format_money(line.unit_price)
            ),
            &total,
        );
    }
    b.sep_single();

    match view.voided_original_amount {
        Some(original) => {
            b.line_lr("Adjusted total", &struck(original, view.amount));
        }
        None => {
            b.line_lr("Subtotal", &format_money(order.subtotal()));
            b.line_lr("Shipping", &format_money(view.shipping_cost));
            b.line_lr("Total", &format_money(view.amount));
        }
    }

    let credits = CreditLedger::for_order(order, credit_memos, None);
    if !credits.is_empty() {
        b.sep_single();
        b.line("CREDITS");
        for entry in credits.entries() {
            b.line_lr(
                &format!("{} ({})", entry.credit_memo_number, entry.status.as_str()),
                &format!("-{}", format_money(entry.amount)),
            );
        }
        b.line_lr(
            "Credited",
            &format!("-{}", format_money(credits.credited_total())),
        );
        b.line_lr("Net amount", &format_money(credits.net_amount(order)));
    }

    if let Some(details) = &order.payment_details
        && let Some(method) = details.method
    {
        b.newline();
        b.line(&format!("Paid by {}", method.as_str()));
        if let Some(tx) = &details.transaction_id {
            b.line(&format!("Transaction: {}", tx));
        }
        if let Some(notes) = &details.notes {
            b.line(&format!("Notes: {}", notes));
        }
    }

    Document {
        kind: DocumentKind::Invoice,
        file_name: format!("invoice-{}.txt", file_stem(&order.id)),
        title: format!("Invoice #{}", order.id),
        content: b.build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreditMemoItem, CreditMemoStatus, OrderItem, OrderStatus, PaymentStatus, VoidRecord,
    };
    use rust_decimal::Decimal;

    fn order() -> Order {
        Order {
            storage_id: "s1".into(),
            id: "O-1".into(),
            total: Decimal::from(100),
            shipping_cost: Decimal::from(10),
            status: OrderStatus::Processing,
            payment_status: PaymentStatus::Pending,
            items: vec![OrderItem {
                product_id: "p1".into(),
                product_name: "Apples".into(),
                quantity: Decimal::from(3),
                unit_price: Decimal::from(30),
                total: Decimal::from(90),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_invoice_shows_unpaid_and_totals() {
        let doc = render_invoice(&order(), &[]);
        assert_eq!(doc.file_name, "invoice-O-1.txt");
        assert!(doc.content.contains("Payment: unpaid"));
        assert!(!doc.content.contains("pending"));
        assert!(doc.content.contains("Subtotal"));
        assert!(doc.content.contains("90.00"));
        assert!(doc.content.contains("100.00"));
    }

    #[test]
    fn test_voided_invoice_uses_adjusted_figures() {
        let mut o = order();
        o.is_delete = true;
        o.deleted = Some(VoidRecord {
            reason: "short shipped".into(),
            amount: Some(Decimal::from(40)),
        });
        o.items[0].deleted_quantity = Some(Decimal::ONE);
        o.items[0].deleted_total = Some(Decimal::from(30));

        let doc = render_invoice(&o, &[]);
        assert!(doc.content.contains("VOIDED: short shipped"));
        assert!(doc.content.contains("~~3~~ 1 x 30.00"));
        assert!(doc.content.contains("~~90.00~~ 30.00"));
        assert!(doc.content.contains("~~100.00~~ 40.00"));
        // original figures only appear struck through
        assert!(!doc.content.contains("Subtotal"));
        assert_eq!(doc.content.matches("100.00").count(), 1);
    }

    fn memo(id: &str, quantity: i64, status: CreditMemoStatus) -> CreditMemo {
        CreditMemo {
            storage_id: id.into(),
            credit_memo_number: format!("CM-{}", id),
            order_id: "s1".into(),
            items: vec![CreditMemoItem {
                product_id: "p1".into(),
                product_name: "Apples".into(),
                quantity: Decimal::from(quantity),
                unit_price: Decimal::from(30),
                total: Decimal::from(30 * quantity),
                ..Default::default()
            }],
            total_amount: Decimal::from(30 * quantity),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_invoice_lists_credits_and_net_amount() {
        let memos = vec![
            memo("a", 1, CreditMemoStatus::Approved),
            memo("b", 2, CreditMemoStatus::Cancelled),
        ];
        let doc = render_invoice(&order(), &memos);
        assert!(doc.content.contains("CREDITS"));
        assert!(doc.content.contains("CM-a (approved)"));
        assert!(!doc.content.contains("CM-b"));
        assert!(doc.content.contains("-30.00"));
        let net = doc
            .content
            .lines()
            .find(|l| l.starts_with("Net amount"))
            .unwrap();
        assert!(net.ends_with("70.00"));
    }

    #[test]
    fn test_invoice_without_credits_has_no_credit_section() {
        let mut foreign = memo("x", 1, CreditMemoStatus::Approved);
        foreign.order_id = "other".into();
        let doc = render_invoice(&order(), &[foreign]);
        assert!(!doc.content.contains("CREDITS"));
        assert!(!doc.content.contains("Net amount"));
    }
}
