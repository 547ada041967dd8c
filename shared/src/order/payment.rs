//! Payment form validation
//!
//! Turns user input into exactly one [`PaymentUpdate`], or a field-level
//! [`AppError`] that blocks submission.

use super::financial::actions;
use super::money::Money;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{Order, PaymentMethod, PaymentUpdate};

/// Order the payment dialog was opened for
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTarget {
    /// Display number
    pub order_id: String,
    /// Storage identity
    pub id: String,
    pub total_amount: Money,
}

impl PaymentTarget {
    /// Refuses orders whose payment action is disabled (voided, unreadable)
    pub fn for_order(order: &Order) -> AppResult<Self> {
        if order.is_voided() {
            return Err(AppError::order_voided(&order.id));
        }
        if !actions(order).can_pay() {
            return Err(AppError::new(ErrorCode::PaymentActionUnavailable)
                .with_detail("order_id", order.id.clone()));
        }
        Ok(Self {
            order_id: order.id.clone(),
            id: order.storage_id.clone(),
            total_amount: order.total,
        })
    }
}

/// Raw payment form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub method: Option<PaymentMethod>,
    pub transaction_id: String,
    pub notes: String,
}

impl PaymentForm {
    pub fn cash(notes: impl Into<String>) -> Self {
        Self {
            method: Some(PaymentMethod::Cash),
            notes: notes.into(),
            ..Default::default()
        }
    }

    pub fn cheque(notes: impl Into<String>) -> Self {
        Self {
            method: Some(PaymentMethod::Cheque),
            notes: notes.into(),
            ..Default::default()
        }
    }

    pub fn credit_card(transaction_id: impl Into<String>) -> Self {
        Self {
            method: Some(PaymentMethod::CreditCard),
            transaction_id: transaction_id.into(),
            ..Default::default()
        }
    }

    /// Validate and build the request body
    ///
    /// Evidence fields that don't belong to the selected method are dropped.
    pub fn validate(&self) -> AppResult<PaymentUpdate> {
        let method = self
            .method
            .ok_or_else(|| AppError::required_field("method", "Select a payment method"))?;

        let transaction_id = non_empty(&self.transaction_id);
        let notes = non_empty(&self.notes);

        match method {
            PaymentMethod::CreditCard => {
                let transaction_id = transaction_id.ok_or_else(|| {
                    AppError::required_field(
                        "transactionId",
                        "Transaction ID is required for credit card payments",
                    )
                })?;
                Ok(PaymentUpdate {
                    method,
                    transaction_id: Some(transaction_id),
                    notes,
                })
            }
            PaymentMethod::Cash | PaymentMethod::Cheque => {
                let notes = notes.ok_or_else(|| {
                    AppError::required_field(
                        "notes",
                        format!("Notes are required for {} payments", method.as_str()),
                    )
                })?;
                Ok(PaymentUpdate {
                    method,
                    transaction_id: None,
                    notes: Some(notes),
                })
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, PaymentStatus};
    use rust_decimal::Decimal;

    #[test]
    fn test_credit_card_requires_transaction_id() {
        let err = PaymentForm::credit_card("  ").validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.field(), Some("transactionId"));

        let ok = PaymentForm::credit_card("ch_991").validate().unwrap();
        assert_eq!(ok.transaction_id.as_deref(), Some("ch_991"));
        assert_eq!(ok.notes, None);
    }

    #[test]
    fn test_cash_and_cheque_require_notes() {
        assert_eq!(PaymentForm::cash("").validate().unwrap_err().field(), Some("notes"));
        assert_eq!(PaymentForm::cheque(" ").validate().unwrap_err().field(), Some("notes"));
        assert!(PaymentForm::cheque("cheque #12").validate().is_ok());
    }

    #[test]
    fn test_cash_drops_stray_transaction_id() {
        let form = PaymentForm {
            method: Some(PaymentMethod::Cash),
            transaction_id: "left over from card tab".into(),
            notes: "paid in office".into(),
        };
        let update = form.validate().unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"method": "cash", "notes": "paid in office"})
        );
    }

    #[test]
    fn test_missing_method() {
        let err = PaymentForm::default().validate().unwrap_err();
        assert_eq!(err.field(), Some("method"));
    }

    #[test]
    fn test_target_for_order() {
        let mut order = Order {
            storage_id: "s1".into(),
            id: "O-1".into(),
            total: Decimal::from(100),
            status: OrderStatus::Processing,
            payment_status: PaymentStatus::Pending,
            ..Default::default()
        };
        let target = PaymentTarget::for_order(&order).unwrap();
        assert_eq!(target.id, "s1");
        assert_eq!(target.total_amount, Decimal::from(100));

        order.payment_status = PaymentStatus::Unknown;
        assert_eq!(
            PaymentTarget::for_order(&order).unwrap_err().code,
            ErrorCode::PaymentActionUnavailable
        );

        order.is_delete = true;
        assert_eq!(
            PaymentTarget::for_order(&order).unwrap_err().code,
            ErrorCode::OrderAlreadyVoided
        );
    }
}
