//! Credit memo editor state
//!
//! A draft is opened either for a new memo on a live order or on an existing
//! memo. Both modes validate identically. In edit mode the memo number and
//! creation time are frozen and lines can't be removed.
//!
//! Each line is bounded by what the order still has to credit: the ordered
//! quantity minus what the order's other memos already credited.

use super::evidence::{EvidenceFile, StagedFile};
use super::ledger::CreditLedger;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{
    CreditMemo, CreditMemoItem, CreditMemoStatus, CreditReason, Order, OrderItem, RefundMethod,
    UploadedFile,
};
use crate::order::money::{Money, PricedLine, compute_total, line_total};
use crate::util::credit_memo_number;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    /// Editing the memo with this storage id
    Edit { storage_id: String },
}

/// Line being credited
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: Money,
    pub unit_price: Money,
    pub reason: CreditReason,
    pub evidence: Vec<EvidenceFile>,
    /// Ordered minus credited by other memos, when the order is known
    pub max_quantity: Option<Money>,
}

impl PricedLine for DraftLine {
    fn quantity(&self) -> Money {
        self.quantity
    }

    fn unit_price(&self) -> Money {
        self.unit_price
    }
}

impl DraftLine {
    fn from_order_item(item: &OrderItem, ledger: &CreditLedger) -> Self {
        Self {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            quantity: Decimal::ONE,
            unit_price: item.unit_price,
            reason: CreditReason::default(),
            evidence: Vec::new(),
            max_quantity: Some(ledger.remaining(item)),
        }
    }

    fn from_memo_item(item: CreditMemoItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            reason: item.reason,
            evidence: item.uploaded_files.into_iter().map(EvidenceFile::from).collect(),
            max_quantity: None,
        }
    }

    fn check_quantity(&self, quantity: Money) -> AppResult<()> {
        if quantity <= Decimal::ZERO || self.max_quantity.is_some_and(|max| quantity > max) {
            let mut err = AppError::new(ErrorCode::CreditMemoInvalidQuantity)
                .with_detail("product_id", self.product_id.clone())
                .with_detail("quantity", quantity.to_string());
            if let Some(max) = self.max_quantity {
                err = err.with_detail("max_quantity", max.to_string());
            }
            return Err(err);
        }
        Ok(())
    }
}

/// Staged file together with the multipart field it is sent under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    /// `evidence[<line index>]`
    pub field: String,
    pub file: StagedFile,
}

/// JSON part of a credit memo submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditMemoPayload {
    pub credit_memo_number: String,
    pub order_id: String,
    pub order_number: String,
    pub items: Vec<CreditMemoItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Money,
    pub status: CreditMemoStatus,
    pub refund_method: RefundMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Validated submission ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub payload: CreditMemoPayload,
    pub uploads: Vec<StagedUpload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditMemoDraft {
    mode: DraftMode,
    credit_memo_number: String,
    created_at: Option<DateTime<Utc>>,
    /// Storage identity of the parent order
    pub order_id: String,
    /// Display number of the parent order
    pub order_number: String,
    lines: Vec<DraftLine>,
    ledger: CreditLedger,
    pub status: CreditMemoStatus,
    pub refund_method: RefundMethod,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl CreditMemoDraft {
    /// New memo for a live order; `existing` are the order's memos so far
    pub fn create(order: &Order, existing: &[CreditMemo]) -> AppResult<Self> {
        if order.is_voided() {
            return Err(AppError::order_voided(&order.id));
        }
        Ok(Self {
            mode: DraftMode::Create,
            credit_memo_number: credit_memo_number(),
            created_at: None,
            order_id: order.storage_id.clone(),
            order_number: order.id.clone(),
            lines: Vec::new(),
            ledger: CreditLedger::for_order(order, existing, None),
            status: CreditMemoStatus::Pending,
            refund_method: RefundMethod::default(),
            reason: None,
            notes: None,
        })
    }

    /// Open an existing memo
    ///
    /// With the order supplied, lines are bounded by the ordered quantity
    /// minus what `existing` memos other than this one credited.
    pub fn edit(memo: CreditMemo, order: Option<&Order>, existing: &[CreditMemo]) -> Self {
        let ledger = order
            .map(|o| CreditLedger::for_order(o, existing, Some(memo.storage_id.as_str())))
            .unwrap_or_default();
        let lines = memo
            .items
            .into_iter()
            .map(|item| {
                let mut line = DraftLine::from_memo_item(item);
                line.max_quantity = order
                    .and_then(|o| o.find_item(&line.product_id))
                    .map(|i| ledger.remaining(i));
                line
            })
            .collect();
        Self {
            mode: DraftMode::Edit {
                storage_id: memo.storage_id,
            },
            credit_memo_number: memo.credit_memo_number,
            created_at: memo.created_at,
            order_id: memo.order_id,
            order_number: memo.order_number,
            lines,
            ledger,
            status: memo.status,
            refund_method: memo.refund_method,
            reason: memo.reason,
            notes: memo.notes,
        }
    }

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DraftMode::Edit { .. })
    }

    pub fn credit_memo_number(&self) -> &str {
        &self.credit_memo_number
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Ignored in edit mode
    pub fn set_credit_memo_number(&mut self, number: impl Into<String>) {
        let number = number.into();
        if self.is_edit() {
            tracing::debug!(
                credit_memo = %self.credit_memo_number,
                attempted = %number,
                "Credit memo number is immutable in edit mode, ignoring"
            );
            return;
        }
        if !number.trim().is_empty() {
            self.credit_memo_number = number;
        }
    }

    /// Add an order line; adding it again bumps its quantity by one
    pub fn add_item(&mut self, item: &OrderItem) -> AppResult<()> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == item.product_id)
        {
            let quantity = line.quantity + Decimal::ONE;
            line.check_quantity(quantity)?;
            line.quantity = quantity;
            return Ok(());
        }
        let line = DraftLine::from_order_item(item, &self.ledger);
        line.check_quantity(line.quantity)?;
        self.lines.push(line);
        Ok(())
    }

    /// Create mode only
    pub fn remove_item(&mut self, product_id: &str) -> AppResult<DraftLine> {
        if self.is_edit() {
            return Err(AppError::new(ErrorCode::CreditMemoItemLocked)
                .with_detail("product_id", product_id.to_string()));
        }
        let index = self.position(product_id)?;
        Ok(self.lines.remove(index))
    }

    pub fn set_quantity(&mut self, product_id: &str, quantity: Money) -> AppResult<()> {
        let line = self.line_mut(product_id)?;
        line.check_quantity(quantity)?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn set_unit_price(&mut self, product_id: &str, unit_price: Money) -> AppResult<()> {
        if unit_price < Decimal::ZERO {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Unit price cannot be negative",
            )
            .with_detail("field", "unitPrice"));
        }
        self.line_mut(product_id)?.unit_price = unit_price;
        Ok(())
    }

    pub fn set_reason(&mut self, product_id: &str, reason: CreditReason) -> AppResult<()> {
        self.line_mut(product_id)?.reason = reason;
        Ok(())
    }

    pub fn attach(&mut self, product_id: &str, file: EvidenceFile) -> AppResult<()> {
        self.line_mut(product_id)?.evidence.push(file);
        Ok(())
    }

    /// Drop a staged file; persisted files stay attached
    pub fn detach_staged(&mut self, product_id: &str, name: &str) -> AppResult<bool> {
        let line = self.line_mut(product_id)?;
        let before = line.evidence.len();
        line.evidence
            .retain(|f| !(f.is_staged() && f.name() == name));
        Ok(line.evidence.len() != before)
    }

    /// `Σ(quantity × unit_price)` over the current lines
    pub fn total_amount(&self) -> Money {
        compute_total(&self.lines)
    }

    /// Check the draft can be submitted
    pub fn validate(&self) -> AppResult<()> {
        if self.lines.is_empty() {
            return Err(AppError::new(ErrorCode::CreditMemoEmpty));
        }
        for line in &self.lines {
            line.check_quantity(line.quantity)?;
        }

        let mut reasons: Vec<&'static str> = Vec::new();
        let mut products: Vec<String> = Vec::new();
        for line in &self.lines {
            if line.reason.requires_evidence() && line.evidence.is_empty() {
                if !reasons.contains(&line.reason.as_str()) {
                    reasons.push(line.reason.as_str());
                }
                products.push(line.product_name.clone());
            }
        }
        if !reasons.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::CreditMemoEvidenceRequired,
                format!(
                    "Upload at least one photo or video for items marked: {}",
                    reasons.join(", ")
                ),
            )
            .with_detail("reasons", reasons)
            .with_detail("products", products));
        }
        Ok(())
    }

    /// Validate and split into the JSON payload and the files to upload
    pub fn prepare(&self) -> AppResult<Submission> {
        self.validate()?;

        let mut uploads = Vec::new();
        let items = self
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let uploaded_files: Vec<UploadedFile> = line
                    .evidence
                    .iter()
                    .filter_map(|f| match f {
                        EvidenceFile::Persisted(p) => Some(p.clone()),
                        EvidenceFile::Staged(s) => {
                            uploads.push(StagedUpload {
                                field: format!("evidence[{}]", index),
                                file: s.clone(),
                            });
                            None
                        }
                    })
                    .collect();
                CreditMemoItem {
                    product_id: line.product_id.clone(),
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    total: line_total(line.quantity, line.unit_price),
                    reason: line.reason,
                    uploaded_files,
                }
            })
            .collect();

        Ok(Submission {
            payload: CreditMemoPayload {
                credit_memo_number: self.credit_memo_number.clone(),
                order_id: self.order_id.clone(),
                order_number: self.order_number.clone(),
                items,
                total_amount: self.total_amount(),
                status: self.status,
                refund_method: self.refund_method,
                reason: self.reason.clone(),
                notes: self.notes.clone(),
                created_at: self.created_at,
            },
            uploads,
        })
    }

    /// Free staged buffers after a committed submission; returns how many were released
    pub fn release_staged(&mut self) -> usize {
        let mut released = 0;
        for line in &mut self.lines {
            let before = line.evidence.len();
            line.evidence.retain(|f| !f.is_staged());
            released += before - line.evidence.len();
        }
        released
    }

    fn position(&self, product_id: &str) -> AppResult<usize> {
        self.lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderItemNotFound)
                    .with_detail("product_id", product_id.to_string())
            })
    }

    fn line_mut(&mut self, product_id: &str) -> AppResult<&mut DraftLine> {
        let index = self.position(product_id)?;
        Ok(&mut self.lines[index])
    }
}
