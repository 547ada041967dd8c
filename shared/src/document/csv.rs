//! Order list CSV export

use super::{Document, DocumentKind};
use crate::error::{AppError, AppResult};
use crate::models::Order;
use crate::order::financial::{PaymentBadge, display_amount};
use crate::order::money::format_money;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct OrderRow<'a> {
    #[serde(rename = "Order")]
    order: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Customer")]
    customer: &'a str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Payment")]
    payment: &'static str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Voided")]
    voided: bool,
    #[serde(rename = "Void Reason")]
    void_reason: &'a str,
}

impl<'a> From<&'a Order> for OrderRow<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            order: &order.id,
            date: order
                .created_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            customer: order
                .customer
                .as_ref()
                .and_then(|c| c.name.as_deref())
                .unwrap_or(""),
            status: order.status.as_str(),
            payment: PaymentBadge::from_status(order.payment_status).label(),
            amount: format_money(display_amount(order)),
            voided: order.is_voided(),
            void_reason: if order.is_voided() {
                order.void_reason().unwrap_or("")
            } else {
                ""
            },
        }
    }
}

/// Export orders with their display amounts
pub fn export_orders_csv(orders: &[Order], file_name: &str) -> AppResult<Document> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    for order in orders {
        writer
            .serialize(OrderRow::from(order))
            .map_err(|e| AppError::document(format!("CSV row for order {}: {}", order.id, e)))?;
    }
    if orders.is_empty() {
        writer
            .write_record([
                "Order", "Date", "Customer", "Status", "Payment", "Amount", "Voided", "Void Reason",
            ])
            .map_err(|e| AppError::document(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::document(e.to_string()))?;
    let content = String::from_utf8(bytes).map_err(|e| AppError::document(e.to_string()))?;

    Ok(Document {
        kind: DocumentKind::OrderExport,
        file_name: file_name.to_string(),
        title: "Orders".to_string(),
        content,
    })
}
