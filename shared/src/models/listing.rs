//! Order listing query and page

use super::order::Order;
use super::payment::PaymentStatus;
use crate::de::{lenient_option, null_as_default};
use crate::order::summary::OrderSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default page size of the order table
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Filters for `GET /order/getAll`
///
/// Absent filters are left out of the query string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
}

impl Default for OrderListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            payment_status: None,
            search: None,
            start_date: None,
            end_date: None,
            order_type: None,
        }
    }
}

impl OrderListQuery {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let s = search.into();
        self.search = if s.trim().is_empty() { None } else { Some(s) };
        self
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }
}

/// One page of orders with the server-side summary
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<Order>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_orders: u64,
    #[serde(default, deserialize_with = "lenient_option")]
    pub summary: Option<OrderSummary>,
}

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page as u64) as u32
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_omits_absent_filters() {
        let q = OrderListQuery::default()
            .with_page(2)
            .with_payment_status(PaymentStatus::Pending)
            .with_search("  ");
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"page": 2, "limit": 20, "paymentStatus": "pending"})
        );
    }

    #[test]
    fn test_page_decoding() {
        let page: OrderListPage = serde_json::from_str(
            r#"{"orders": [{"_id": "a"}], "totalOrders": 41,
                "summary": {"totalOrders": 41, "totalAmount": 100,
                            "totalReceived": 60, "totalPending": 40}}"#,
        )
        .unwrap();
        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.total_orders, 41);
        assert!(page.summary.unwrap().is_reconciled());
    }

    #[test]
    fn test_null_money_keeps_page_intact() {
        let page: OrderListPage = serde_json::from_str(
            r#"{"orders":[{"_id":"a","total":10,"shippingCost":null},{"_id":"b","total":5}]}"#,
        )
        .unwrap();
        assert_eq!(page.orders.len(), 2);
        assert_eq!(page.orders[0].total, rust_decimal::Decimal::from(10));
        assert_eq!(page.orders[0].shipping_cost, rust_decimal::Decimal::ZERO);
        assert_eq!(page.orders[1].total, rust_decimal::Decimal::from(5));
    }

    #[test]
    fn test_blank_payment_method_keeps_page_intact() {
        let page: OrderListPage = serde_json::from_str(
            r#"{"orders":[
                {"_id":"a","total":"12.5","paymentDetails":{"method":""}},
                {"_id":"b","paymentDetails":{"method":"creditcard","transactionId":"tx"}},
                {"_id":"c","customer":"665f1c","deleted":{"reason":null,"amount":""}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(page.orders.len(), 3);
        let a = &page.orders[0];
        assert_eq!(a.total, rust_decimal::Decimal::new(125, 1));
        assert_eq!(a.payment_details.as_ref().and_then(|d| d.method), None);
        assert!(!a.payment_details.as_ref().is_some_and(|d| d.has_evidence()));
        assert!(page.orders[1].payment_details.as_ref().is_some_and(|d| d.has_evidence()));
        let c = &page.orders[2];
        assert!(c.customer.is_none());
        assert_eq!(c.deleted.as_ref().and_then(|d| d.amount), None);
    }

    #[test]
    fn test_pagination() {
        let p = Pagination::new(1, 20, 41);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next());
        assert_eq!(Pagination::new(1, 0, 41).total_pages, 0);
        assert!(!Pagination::new(3, 20, 41).has_next());
    }
}
