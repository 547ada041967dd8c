//! Credit memo workflow
//!
//! Opening management for an order lists its memos, or goes straight to a
//! new draft when there are none. Submitting validates locally, sends one
//! multipart request, frees staged files and then renders the memo
//! document. The document step never undoes a committed memo.

use super::payment::log_failure;
use crate::api::CreditMemoApi;
use crate::guard::{InFlightGuard, InFlightKey};
use crate::http::HttpClient;
use crate::notify::{Notice, Notifier};
use crate::sink::DocumentSink;
use crate::{ClientResult, Session};
use shared::credit_memo::{CreditMemoDraft, DraftMode, EvidenceFile, Submission};
use shared::document::render_credit_memo;
use shared::error::{AppError, ErrorCode};
use shared::models::{CreditMemo, EvidenceKind, Order};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What "open credit memo management" lands on
#[derive(Debug, Clone, PartialEq)]
pub enum ManagementView {
    List(Vec<CreditMemo>),
    Create(CreditMemoDraft),
}

/// Result of a committed submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub credit_memo: CreditMemo,
    /// Where the memo document was written, if that step succeeded
    pub document: Option<PathBuf>,
    /// Staged files freed after the commit
    pub released_files: usize,
}

pub struct CreditMemoService<H> {
    api: CreditMemoApi<H>,
    guard: InFlightGuard,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn DocumentSink>,
}

impl<H> Clone for CreditMemoService<H> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            guard: self.guard.clone(),
            notifier: Arc::clone(&self.notifier),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<H: HttpClient> CreditMemoService<H> {
    pub fn new(
        api: CreditMemoApi<H>,
        guard: InFlightGuard,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn DocumentSink>,
    ) -> Self {
        Self {
            api,
            guard,
            notifier,
            sink,
        }
    }

    pub async fn list(&self, session: &Session, order: &Order) -> ClientResult<Vec<CreditMemo>> {
        self.api
            .list_by_order(session, &order.storage_id)
            .await
            .inspect_err(|e| {
                log_failure(e, &order.id, "Failed to load credit memos");
                self.notifier.notify(Notice::from_error(e));
            })
    }

    /// List the order's memos; with none, start a new draft instead
    pub async fn open_management(
        &self,
        session: &Session,
        order: &Order,
    ) -> ClientResult<ManagementView> {
        let memos = self.list(session, order).await?;
        if !memos.is_empty() {
            return Ok(ManagementView::List(memos));
        }
        tracing::debug!(order_id = %order.id, "No credit memos yet, opening create mode");
        Ok(ManagementView::Create(CreditMemoDraft::create(order, &memos)?))
    }

    /// Draft for a new memo, bounded by what `existing` memos already credited
    pub fn start(&self, order: &Order, existing: &[CreditMemo]) -> ClientResult<CreditMemoDraft> {
        Ok(CreditMemoDraft::create(order, existing)?)
    }

    /// Draft for an existing memo
    pub fn edit(
        &self,
        memo: CreditMemo,
        order: Option<&Order>,
        existing: &[CreditMemo],
    ) -> CreditMemoDraft {
        CreditMemoDraft::edit(memo, order, existing)
    }

    /// Read a local file into a staged evidence attachment
    pub async fn stage_file(&self, path: &Path) -> ClientResult<EvidenceFile> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::invalid_request(format!("Not a file: {}", path.display())))?
            .to_string();
        // Reject by extension before reading
        if EvidenceKind::from_file_name(&name).is_none() {
            return Err(AppError::new(ErrorCode::UnsupportedFileFormat)
                .with_detail("file", name)
                .into());
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(EvidenceFile::staged(name, bytes)?)
    }

    /// Validate, commit, release staged files, then render the document
    pub async fn submit(
        &self,
        session: &Session,
        draft: &mut CreditMemoDraft,
    ) -> ClientResult<SubmitOutcome> {
        let submission = draft.prepare()?;
        let _permit = self
            .guard
            .acquire(InFlightKey::CreditMemo(draft.order_id.clone()), "credit_memo")?;

        let result = match draft.mode() {
            DraftMode::Create => self.api.create(session, &submission).await,
            DraftMode::Edit { storage_id } => {
                self.api.update(session, storage_id, &submission).await
            }
        };
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log_failure(&e, &draft.order_number, "Credit memo submission failed");
                self.notifier.notify(Notice::from_error(&e));
                return Err(e);
            }
        };

        let released_files = draft.release_staged();
        let credit_memo = response
            .credit_memo
            .unwrap_or_else(|| committed_from(draft, &submission));
        tracing::info!(
            credit_memo = %credit_memo.credit_memo_number,
            order_id = %draft.order_number,
            total = %credit_memo.total_amount,
            released_files,
            "Credit memo saved"
        );
        self.notifier.notify(Notice::success(format!(
            "Credit memo {} saved",
            credit_memo.credit_memo_number
        )));

        let document = self.save_document(&credit_memo).await;
        Ok(SubmitOutcome {
            credit_memo,
            document,
            released_files,
        })
    }

    async fn save_document(&self, memo: &CreditMemo) -> Option<PathBuf> {
        let document = render_credit_memo(memo);
        match self.sink.save(&document).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(
                    credit_memo = %memo.credit_memo_number,
                    error = %e,
                    "Credit memo document failed, memo itself is saved"
                );
                self.notifier.notify(Notice::warning(format!(
                    "Credit memo {} was saved but its document could not be generated",
                    memo.credit_memo_number
                )));
                None
            }
        }
    }
}

/// Memo as committed, for servers that don't echo it back
fn committed_from(draft: &CreditMemoDraft, submission: &Submission) -> CreditMemo {
    let payload = &submission.payload;
    CreditMemo {
        storage_id: match draft.mode() {
            DraftMode::Edit { storage_id } => storage_id.clone(),
            DraftMode::Create => String::new(),
        },
        credit_memo_number: payload.credit_memo_number.clone(),
        order_id: payload.order_id.clone(),
        order_number: payload.order_number.clone(),
        items: payload.items.clone(),
        total_amount: payload.total_amount,
        status: payload.status,
        refund_method: payload.refund_method,
        reason: payload.reason.clone(),
        notes: payload.notes.clone(),
        created_at: payload.created_at,
        updated_at: None,
    }
}
