//! Order report
//!
//! Fetches one page of orders, prints the payment summary and writes the
//! page as CSV into the document directory.
//!
//! Usage: `orderdesk [page] [pending|partial|paid]`

use orderdesk_client::confirm::ScriptedGate;
use orderdesk_client::logger::init_logger;
use orderdesk_client::{ClientConfig, OrderDesk};
use shared::models::{OrderListQuery, PaymentStatus};
use shared::order::money::format_money;
use std::sync::Arc;

fn parse_status(value: &str) -> Option<PaymentStatus> {
    match value.to_ascii_lowercase().as_str() {
        "pending" | "unpaid" => Some(PaymentStatus::Pending),
        "partial" => Some(PaymentStatus::Partial),
        "paid" => Some(PaymentStatus::Paid),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = ClientConfig::from_env();
    init_logger(&config.log_level, false)?;

    let mut args = std::env::args().skip(1);
    let mut query = OrderListQuery::default();
    if let Some(page) = args.next().and_then(|p| p.parse().ok()) {
        query = query.with_page(page);
    }
    if let Some(status) = args.next().as_deref().and_then(parse_status) {
        query = query.with_payment_status(status);
    }

    tracing::info!(base_url = %config.base_url, page = query.page, "OrderDesk report starting");

    // Reporting never mutates, so every destructive prompt is declined
    let desk = OrderDesk::builder(config)
        .gate(Arc::new(ScriptedGate::decline()))
        .build()?;
    let mut board = desk.order_board();
    board.load(desk.session(), query).await?;

    let local = board.page_summary();
    let pagination = board.pagination();
    println!(
        "Page {}/{} ({} orders in total)",
        pagination.page, pagination.total_pages, pagination.total
    );
    for view in board.views() {
        println!(
            "  #{:<10} {:>12} {:<8}{}",
            view.order_id,
            format_money(view.amount),
            view.badge.label(),
            if view.voided { " voided" } else { "" }
        );
    }
    println!("Page amount:   {}", format_money(local.total_amount));
    println!("Page received: {}", format_money(local.total_received));
    println!("Page pending:  {}", format_money(local.total_pending));

    if let Some(summary) = board.server_summary() {
        println!(
            "All orders:    {} amount, {} received, {} pending{}",
            format_money(summary.total_amount),
            format_money(summary.total_received),
            format_money(summary.total_pending),
            if summary.is_reconciled() { "" } else { " (does not reconcile)" }
        );
    }

    let path = board.export_csv(desk.sink()).await?;
    println!("CSV written to {}", path.display());
    Ok(())
}
