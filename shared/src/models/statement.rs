//! Statement request and payload

use super::credit_memo::CreditMemo;
use super::order::{CustomerRef, Order};
use super::payment::PaymentStatus;
use crate::de::{lenient_option, null_as_default};
use crate::error::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Parameters of `GET /order/statement/:id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    /// First month included, `YYYY-MM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_month: Option<String>,
    /// Last month included, `YYYY-MM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<String>,
    /// Ask the server to email the statement as well
    #[serde(rename = "send")]
    pub send_by_email: bool,
}

fn parse_month(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("{} must be formatted as YYYY-MM, got '{}'", field, value),
        )
        .with_detail("field", field)
    })
}

impl StatementQuery {
    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    /// Restrict to a month range; both ends are validated and ordered
    pub fn with_months(mut self, start: &str, end: &str) -> AppResult<Self> {
        let s = parse_month(start, "startMonth")?;
        let e = parse_month(end, "endMonth")?;
        if s > e {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "startMonth must not be after endMonth",
            )
            .with_detail("field", "startMonth"));
        }
        self.start_month = Some(start.trim().to_string());
        self.end_month = Some(end.trim().to_string());
        Ok(self)
    }

    pub fn sending_email(mut self) -> Self {
        self.send_by_email = true;
        self
    }

    /// Whether an order falls inside the filters
    ///
    /// Orders without a creation date only pass when no month range is set.
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.payment_status
            && order.payment_status != status
        {
            return false;
        }
        if self.start_month.is_none() && self.end_month.is_none() {
            return true;
        }
        let Some(created) = order.created_at else {
            return false;
        };
        let month = month_key(&created);
        let start = self
            .start_month
            .as_deref()
            .and_then(|m| parse_month(m, "startMonth").ok())
            .map(|d| (d.year(), d.month()));
        let end = self
            .end_month
            .as_deref()
            .and_then(|m| parse_month(m, "endMonth").ok())
            .map(|d| (d.year(), d.month()));
        start.is_none_or(|s| month >= s) && end.is_none_or(|e| month <= e)
    }
}

fn month_key(at: &DateTime<Utc>) -> (i32, u32) {
    (at.year(), at.month())
}

/// Statement payload returned by the server
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<Order>,
    #[serde(default, alias = "user", deserialize_with = "lenient_option")]
    pub customer: Option<CustomerRef>,
    /// Memos issued against the listed orders, when the server includes them
    #[serde(default, deserialize_with = "null_as_default")]
    pub credit_memos: Vec<CreditMemo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order_at(y: i32, m: u32, status: PaymentStatus) -> Order {
        Order {
            storage_id: format!("{}-{}", y, m),
            payment_status: status,
            created_at: Some(Utc.with_ymd_and_hms(y, m, 15, 12, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_query_string_fields() {
        let q = StatementQuery::default()
            .with_payment_status(PaymentStatus::Paid)
            .with_months("2024-01", "2024-03")
            .unwrap()
            .sending_email();
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            serde_json::json!({
                "paymentStatus": "paid",
                "startMonth": "2024-01",
                "endMonth": "2024-03",
                "send": true
            })
        );
    }

    #[test]
    fn test_invalid_months_rejected() {
        let err = StatementQuery::default().with_months("2024-13", "2024-12").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.field(), Some("startMonth"));

        let err = StatementQuery::default().with_months("2024-05", "2024-02").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_payload_decodes_credit_memos() {
        let payload: StatementPayload = serde_json::from_str(
            r#"{"orders": [{"_id": "o1"}], "user": {"_id": "u1", "storeName": "Green Grocer"},
                "creditMemos": [{"_id": "c1", "creditMemoNumber": "CM-1", "orderId": "o1"}],
                "emailSent": null}"#,
        )
        .unwrap();
        assert_eq!(payload.credit_memos.len(), 1);
        assert_eq!(payload.customer.unwrap().name.as_deref(), Some("Green Grocer"));
        assert!(!payload.email_sent);

        let bare: StatementPayload = serde_json::from_str(r#"{"creditMemos": null}"#).unwrap();
        assert!(bare.credit_memos.is_empty());
    }

    #[test]
    fn test_matches_month_range_and_status() {
        let q = StatementQuery::default()
            .with_payment_status(PaymentStatus::Pending)
            .with_months("2024-02", "2024-03")
            .unwrap();
        assert!(q.matches(&order_at(2024, 2, PaymentStatus::Pending)));
        assert!(q.matches(&order_at(2024, 3, PaymentStatus::Pending)));
        assert!(!q.matches(&order_at(2024, 4, PaymentStatus::Pending)));
        assert!(!q.matches(&order_at(2024, 2, PaymentStatus::Paid)));

        let undated = Order::default();
        assert!(!q.matches(&undated));
        assert!(StatementQuery::default().matches(&undated));
    }
}
