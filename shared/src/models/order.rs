//! Order Model

use super::credit_memo::CreditMemo;
use super::payment::{PaymentDetails, PaymentStatus};
use crate::de::{lenient_option, null_as_default, string_or_number};
use crate::order::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fulfillment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Delivered orders no longer change fulfillment status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Void audit record (`deleted` on the wire)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoidRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    /// Amount retained after voiding
    #[serde(
        default,
        with = "crate::de::money_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Money>,
}

/// Order line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub product_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, with = "crate::de::money")]
    pub quantity: Money,
    #[serde(default, with = "crate::de::money")]
    pub unit_price: Money,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pricing_type: Option<String>,
    #[serde(default, with = "crate::de::money")]
    pub total: Money,
    /// Post-void quantity, present on voided orders
    #[serde(
        default,
        with = "crate::de::money_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_quantity: Option<Money>,
    /// Post-void line total, present on voided orders
    #[serde(
        default,
        with = "crate::de::money_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_total: Option<Money>,
}

/// Customer reference carried on orders and statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRef {
    #[serde(rename = "_id", default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "storeName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Back-reference to credit memos
///
/// The backend sends either a presence flag or a list of memo ids
/// (sometimes populated documents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreditMemoRefs {
    Flag(bool),
    Refs(Vec<serde_json::Value>),
}

impl Default for CreditMemoRefs {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl CreditMemoRefs {
    pub fn any(&self) -> bool {
        match self {
            Self::Flag(f) => *f,
            Self::Refs(refs) => !refs.is_empty(),
        }
    }

    /// Populated memo documents; bare ids are skipped
    pub fn documents(&self) -> Vec<CreditMemo> {
        match self {
            Self::Flag(_) => Vec::new(),
            Self::Refs(refs) => refs
                .iter()
                .filter(|v| v.is_object())
                .filter_map(|v| CreditMemo::deserialize(v).ok())
                .collect(),
        }
    }
}

/// Order document as served by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Storage identity
    #[serde(rename = "_id")]
    pub storage_id: String,
    /// Display number
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, with = "crate::de::money")]
    pub total: Money,
    #[serde(default, with = "crate::de::money")]
    pub shipping_cost: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_status: PaymentStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_delete: bool,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted: Option<VoidRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_details: Option<PaymentDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub credit_memos: CreditMemoRefs,
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
    pub order_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer: Option<CustomerRef>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Gross total minus shipping
    pub fn subtotal(&self) -> Money {
        self.total - self.shipping_cost
    }

    /// Soft-voided (not hard-deleted)
    pub fn is_voided(&self) -> bool {
        self.is_delete
    }

    pub fn void_reason(&self) -> Option<&str> {
        self.deleted
            .as_ref()
            .map(|d| d.reason.as_str())
            .filter(|r| !r.trim().is_empty())
    }

    pub fn find_item(&self, product_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }
}

/// Generic partial update (`PUT /order/update/:id`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Void request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoidRequest {
    pub reason: String,
}

/// Response of single-order mutations
///
/// The backend may or may not echo the updated order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderMutationResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "data", alias = "updatedOrder")]
    pub order: Option<Order>,
}
