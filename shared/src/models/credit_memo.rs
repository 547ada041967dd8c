//! Credit Memo Model

use crate::de::{lenient_option, null_as_default, string_or_number};
use crate::order::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why an item is being credited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditReason {
    Defective,
    Damaged,
    WrongItem,
    CustomerComplaint,
    QualityIssue,
    #[default]
    #[serde(other)]
    Other,
}

impl CreditReason {
    /// Reasons that must be backed by at least one photo or video
    pub const EVIDENCE_REQUIRED: [CreditReason; 3] =
        [Self::Damaged, Self::Defective, Self::QualityIssue];

    pub fn requires_evidence(&self) -> bool {
        Self::EVIDENCE_REQUIRED.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Defective => "defective",
            Self::Damaged => "damaged",
            Self::WrongItem => "wrong_item",
            Self::CustomerComplaint => "customer_complaint",
            Self::QualityIssue => "quality_issue",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Defective => "Defective",
            Self::Damaged => "Damaged",
            Self::WrongItem => "Wrong item",
            Self::CustomerComplaint => "Customer complaint",
            Self::QualityIssue => "Quality issue",
            Self::Other => "Other",
        }
    }
}

/// Kind of evidence attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    Image,
    Video,
}

impl EvidenceKind {
    /// Infer the kind from a file name, `None` for anything but images and videos
    pub fn from_file_name(name: &str) -> Option<Self> {
        let mime = mime_guess::from_path(name).first()?;
        match mime.type_().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Evidence file already persisted on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: EvidenceKind,
}

/// Lifecycle of the refund itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditMemoStatus {
    #[default]
    Pending,
    Approved,
    Processed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl CreditMemoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Processed => "processed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

/// How the credit is paid back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundMethod {
    #[default]
    StoreCredit,
    CashRefund,
    BankTransfer,
    OriginalPayment,
    #[serde(other)]
    Other,
}

impl RefundMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::StoreCredit => "Store credit",
            Self::CashRefund => "Cash refund",
            Self::BankTransfer => "Bank transfer",
            Self::OriginalPayment => "Original payment method",
            Self::Other => "Other",
        }
    }
}

/// Credited line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditMemoItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub product_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, with = "crate::de::money")]
    pub quantity: Money,
    #[serde(default, with = "crate::de::money")]
    pub unit_price: Money,
    #[serde(default, with = "crate::de::money")]
    pub total: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: CreditReason,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uploaded_files: Vec<UploadedFile>,
}

/// Credit memo document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditMemo {
    #[serde(rename = "_id")]
    pub storage_id: String,
    pub credit_memo_number: String,
    /// Storage identity of the parent order
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_id: String,
    /// Display number of the parent order
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<CreditMemoItem>,
    #[serde(default, with = "crate::de::money")]
    pub total_amount: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CreditMemoStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub refund_method: RefundMethod,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub reason: Option<String>,
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
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Response of credit memo create/update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditMemoResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "data")]
    pub credit_memo: Option<CreditMemo>,
}

/// Response of the by-order listing
///
/// A bare array is the documented shape; a wrapped object is accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreditMemoList {
    Bare(Vec<CreditMemo>),
    Wrapped {
        #[serde(alias = "data", alias = "creditMemos")]
        credit_memos: Vec<CreditMemo>,
    },
}

impl CreditMemoList {
    pub fn into_vec(self) -> Vec<CreditMemo> {
        match self {
            Self::Bare(v) => v,
            Self::Wrapped { credit_memos } => credit_memos,
        }
    }
}
