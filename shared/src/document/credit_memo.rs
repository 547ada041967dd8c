//! Credit memo rendering

use super::{DEFAULT_WIDTH, Document, DocumentKind, TextBuilder, file_stem};
use crate::models::CreditMemo;
use crate::order::money::{PricedLine, compute_total, format_money};

pub fn render_credit_memo(memo: &CreditMemo) -> Document {
    let mut b = TextBuilder::new(DEFAULT_WIDTH);
    b.title("CREDIT MEMO").sep_double();
    b.line_lr(&memo.credit_memo_number, memo.status.as_str());
    b.line(&format!("Order #{}", memo.order_number));
    if let Some(created) = memo.created_at {
        b.line(&format!("Date: {}", created.format("%Y-%m-%d")));
    }
    b.line(&format!("Refund: {}", memo.refund_method.label()));
    if let Some(reason) = memo.reason.as_deref().filter(|r| !r.trim().is_empty()) {
        b.line(&format!("Reason: {}", reason));
    }
    b.sep_single();

    for item in &memo.items {
        b.line_lr(
            &format!(
                "{}  {} x {}",
                item.product_name,
                item.quantity.normalize(),
                format_money(item.unit_price)
            ),
            &format_money(item.line_total()),
        );
        let mut detail = format!("  {}", item.reason.label());
        if !item.uploaded_files.is_empty() {
            detail.push_str(&format!(" ({} attachment(s))", item.uploaded_files.len()));
        }
        b.line(&detail);
    }
    b.sep_single();
    b.line_lr("Total credit", &format_money(compute_total(&memo.items)));

    if let Some(notes) = memo.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        b.newline();
        b.line(&format!("Notes: {}", notes));
    }

    Document {
        kind: DocumentKind::CreditMemo,
        file_name: format!("{}.txt", file_stem(&memo.credit_memo_number)),
        title: format!("Credit Memo {}", memo.credit_memo_number),
        content: b.build(),
    }
}
