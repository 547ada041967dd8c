//! Payment Model

use crate::de::lenient_option;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Financial status of an order
///
/// Missing or unrecognized values decode to `Unknown`, which the state
/// machine treats as the least-privileged state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Wire value used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Unknown => "unknown",
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "creditcard")]
    CreditCard,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CreditCard => "creditcard",
            Self::Cheque => "cheque",
        }
    }

    /// Credit card payments are evidenced by a transaction id,
    /// cash and cheque payments by free-text notes
    pub fn requires_transaction_id(&self) -> bool {
        matches!(self, Self::CreditCard)
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "creditcard" | "credit_card" | "card" => Ok(Self::CreditCard),
            "cheque" | "check" => Ok(Self::Cheque),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

/// Recorded payment evidence on an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(default, deserialize_with = "lenient_option")]
    pub method: Option<PaymentMethod>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_date: Option<DateTime<Utc>>,
}

impl PaymentDetails {
    /// Whether the details carry the evidence their method requires
    pub fn has_evidence(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        match self.method {
            Some(PaymentMethod::CreditCard) => filled(&self.transaction_id),
            Some(PaymentMethod::Cash) | Some(PaymentMethod::Cheque) => filled(&self.notes),
            None => false,
        }
    }
}

/// Payment update request body
///
/// Only the evidence field(s) belonging to the method are serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
