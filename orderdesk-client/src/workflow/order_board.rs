//! Order board
//!
//! The list of orders a user is looking at. It is refreshed by re-fetching,
//! patched in place for status and notes changes, and never cleared by a
//! failed request.

use super::payment::{PaymentDialog, PaymentService, log_failure};
use crate::api::OrderApi;
use crate::confirm::{Confirmation, ConfirmationGate, Decision, DestructiveAction};
use crate::guard::{InFlightGuard, InFlightKey};
use crate::http::HttpClient;
use crate::notify::{Notice, Notifier};
use crate::sink::DocumentSink;
use crate::{ClientResult, Session};
use shared::document::{Document, export_orders_csv, render_invoice};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CreditMemo, Order, OrderListQuery, OrderMutationResponse, OrderStatus, OrderUpdate,
    Pagination,
};
use shared::order::{FinancialView, OrderSummary, actions, derive};
use std::path::PathBuf;
use std::sync::Arc;

pub struct OrderBoard<H> {
    orders_api: OrderApi<H>,
    payments: PaymentService<H>,
    guard: InFlightGuard,
    gate: Arc<dyn ConfirmationGate>,
    notifier: Arc<dyn Notifier>,
    query: OrderListQuery,
    orders: Vec<Order>,
    total_orders: u64,
    server_summary: Option<OrderSummary>,
}

impl<H: HttpClient> OrderBoard<H> {
    pub fn new(
        orders_api: OrderApi<H>,
        guard: InFlightGuard,
        gate: Arc<dyn ConfirmationGate>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let payments = PaymentService::new(
            orders_api.clone(),
            guard.clone(),
            Arc::clone(&gate),
            Arc::clone(&notifier),
        );
        Self {
            orders_api,
            payments,
            guard,
            gate,
            notifier,
            query: OrderListQuery::default(),
            orders: Vec::new(),
            total_orders: 0,
            server_summary: None,
        }
    }

    // ========== Read side ==========

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn query(&self) -> &OrderListQuery {
        &self.query
    }

    pub fn find(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.storage_id == id)
    }

    pub fn views(&self) -> Vec<FinancialView> {
        self.orders.iter().map(derive).collect()
    }

    pub fn view(&self, id: &str) -> Option<FinancialView> {
        self.find(id).map(derive)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.query.page, self.query.limit, self.total_orders)
    }

    /// Summary reported by the server with the last page
    pub fn server_summary(&self) -> Option<&OrderSummary> {
        self.server_summary.as_ref()
    }

    /// Summary derived from the orders on the board
    pub fn page_summary(&self) -> OrderSummary {
        OrderSummary::from_orders(&self.orders)
    }

    // ========== Fetching ==========

    /// Replace the query and fetch
    pub async fn load(&mut self, session: &Session, query: OrderListQuery) -> ClientResult<()> {
        let previous = std::mem::replace(&mut self.query, query);
        if let Err(e) = self.refresh(session).await {
            self.query = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Re-fetch the current page; on failure the board keeps what it had
    pub async fn refresh(&mut self, session: &Session) -> ClientResult<()> {
        match self.orders_api.list(session, &self.query).await {
            Ok(page) => {
                if let Some(summary) = &page.summary
                    && !summary.is_reconciled()
                {
                    tracing::warn!(
                        total_amount = %summary.total_amount,
                        total_received = %summary.total_received,
                        total_pending = %summary.total_pending,
                        discrepancy = %summary.discrepancy(),
                        "Server order summary does not reconcile"
                    );
                }
                self.total_orders = page.total_orders;
                self.server_summary = page.summary;
                self.orders = page.orders;
                tracing::debug!(
                    page = self.query.page,
                    count = self.orders.len(),
                    total = self.total_orders,
                    "Order board refreshed"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load orders");
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    // ========== Local patches ==========

    fn apply_response(&mut self, id: &str, response: &OrderMutationResponse) -> bool {
        let Some(updated) = &response.order else {
            return false;
        };
        match self.orders.iter_mut().find(|o| o.storage_id == id) {
            Some(slot) => {
                *slot = updated.clone();
                true
            }
            None => false,
        }
    }

    fn patch(&mut self, id: &str, f: impl FnOnce(&mut Order)) {
        if let Some(order) = self.orders.iter_mut().find(|o| o.storage_id == id) {
            f(order);
        }
    }

    fn require(&self, id: &str) -> ClientResult<Order> {
        self.find(id)
            .cloned()
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound)
                    .with_detail("order_id", id.to_string())
                    .into()
            })
    }

    /// Re-fetch after a committed mutation; a failed refetch was already notified
    async fn refetch_after(
        &mut self,
        session: &Session,
        id: &str,
        response: &OrderMutationResponse,
    ) {
        if self.refresh(session).await.is_err() {
            self.apply_response(id, response);
        }
    }

    // ========== Mutations ==========

    /// Fulfillment status change, patched locally on success
    pub async fn change_status(
        &mut self,
        session: &Session,
        id: &str,
        status: OrderStatus,
    ) -> ClientResult<()> {
        let order = self.require(id)?;
        if !actions(&order).can_change_status() {
            let err = if order.is_voided() {
                AppError::order_voided(&order.id)
            } else {
                AppError::new(ErrorCode::OrderStatusLocked)
                    .with_detail("order_id", order.id.clone())
            };
            return Err(err.into());
        }

        let update = OrderUpdate {
            status: Some(status),
            notes: None,
        };
        let _permit = self.guard.acquire(InFlightKey::Order(id.to_string()), "status")?;
        match self.orders_api.update(session, id, &update).await {
            Ok(response) => {
                if !self.apply_response(id, &response) {
                    self.patch(id, |o| o.status = status);
                }
                tracing::info!(
                    order_id = %order.id,
                    status = status.as_str(),
                    "Order status changed"
                );
                self.notifier.notify(Notice::success(format!(
                    "Order #{} is now {}",
                    order.id,
                    status.as_str()
                )));
                Ok(())
            }
            Err(e) => {
                log_failure(&e, &order.id, "Status change failed");
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    /// Notes update, patched locally on success
    pub async fn update_notes(
        &mut self,
        session: &Session,
        id: &str,
        notes: impl Into<String>,
    ) -> ClientResult<()> {
        let order = self.require(id)?;
        let notes = notes.into();
        let update = OrderUpdate {
            status: None,
            notes: Some(notes.clone()),
        };
        let _permit = self.guard.acquire(InFlightKey::Order(id.to_string()), "notes")?;
        match self.orders_api.update(session, id, &update).await {
            Ok(response) => {
                if !self.apply_response(id, &response) {
                    self.patch(id, |o| o.notes = Some(notes));
                }
                tracing::info!(order_id = %order.id, "Order notes updated");
                Ok(())
            }
            Err(e) => {
                log_failure(&e, &order.id, "Notes update failed");
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    /// Open the payment dialog for an order on the board
    pub fn open_payment(&self, id: &str) -> ClientResult<PaymentDialog> {
        PaymentDialog::open(&self.require(id)?)
    }

    /// Submit a payment, then re-fetch so the board shows what the server decided
    pub async fn submit_payment(
        &mut self,
        session: &Session,
        dialog: &mut PaymentDialog,
    ) -> ClientResult<()> {
        let response = self.payments.submit(session, dialog).await?;
        let id = dialog.target().id.clone();
        self.refetch_after(session, &id, &response).await;
        Ok(())
    }

    pub async fn mark_unpaid(&mut self, session: &Session, id: &str) -> ClientResult<Decision<()>> {
        let order = self.require(id)?;
        match self.payments.mark_unpaid(session, &order).await? {
            Decision::Declined => Ok(Decision::Declined),
            Decision::Done(response) => {
                self.refetch_after(session, id, &response).await;
                Ok(Decision::Done(()))
            }
        }
    }

    /// Soft delete; the confirmation must carry a non-empty reason
    pub async fn void(&mut self, session: &Session, id: &str) -> ClientResult<Decision<()>> {
        let order = self.require(id)?;
        if order.is_voided() {
            return Err(AppError::order_voided(&order.id).into());
        }

        let action = DestructiveAction::Void {
            order_id: order.id.clone(),
        };
        let reason = match self.gate.confirm(&action).await {
            Confirmation::Declined => return Ok(Decision::Declined),
            Confirmation::Confirmed { reason } => reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    AppError::new(ErrorCode::VoidReasonRequired).with_detail("field", "reason")
                })?,
        };

        let permit = self.guard.acquire(InFlightKey::Order(id.to_string()), "void")?;
        match self.orders_api.void(session, id, &reason).await {
            Ok(response) => {
                drop(permit);
                tracing::info!(order_id = %order.id, reason = %reason, "Order voided");
                self.notifier
                    .notify(Notice::success(format!("Order #{} voided", order.id)));
                self.refetch_after(session, id, &response).await;
                Ok(Decision::Done(()))
            }
            Err(e) => {
                log_failure(&e, &order.id, "Void failed");
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    /// Irreversible delete; the order leaves the board
    pub async fn hard_delete(&mut self, session: &Session, id: &str) -> ClientResult<Decision<()>> {
        let order = self.require(id)?;
        let action = DestructiveAction::HardDelete {
            order_id: order.id.clone(),
        };
        if self.gate.confirm(&action).await == Confirmation::Declined {
            return Ok(Decision::Declined);
        }

        let _permit = self
            .guard
            .acquire(InFlightKey::Order(id.to_string()), "hard_delete")?;
        match self.orders_api.hard_delete(session, id).await {
            Ok(_) => {
                tracing::info!(order_id = %order.id, "Order deleted");
                self.orders.retain(|o| o.storage_id != id);
                self.total_orders = self.total_orders.saturating_sub(1);
                self.notifier
                    .notify(Notice::success(format!("Order #{} deleted", order.id)));
                Ok(Decision::Done(()))
            }
            Err(e) => {
                log_failure(&e, &order.id, "Delete failed");
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    // ========== Documents ==========

    /// Invoice netted by the order's credit memos
    pub fn invoice(&self, id: &str, credit_memos: &[CreditMemo]) -> ClientResult<Document> {
        Ok(render_invoice(&self.require(id)?, credit_memos))
    }

    /// Write an invoice; failure is reported but never propagated into board state
    pub async fn save_invoice(
        &self,
        id: &str,
        credit_memos: &[CreditMemo],
        sink: &dyn DocumentSink,
    ) -> ClientResult<PathBuf> {
        let document = self.invoice(id, credit_memos)?;
        self.save_document(&document, sink).await
    }

    /// CSV of the orders currently on the board
    pub async fn export_csv(&self, sink: &dyn DocumentSink) -> ClientResult<PathBuf> {
        let file_name = format!("orders-page-{}.csv", self.query.page);
        let document = export_orders_csv(&self.orders, &file_name)?;
        self.save_document(&document, sink).await
    }

    async fn save_document(
        &self,
        document: &Document,
        sink: &dyn DocumentSink,
    ) -> ClientResult<PathBuf> {
        match sink.save(document).await {
            Ok(path) => Ok(path),
            Err(e) => {
                tracing::warn!(
                    file = %document.file_name,
                    error = %e,
                    "Document could not be saved"
                );
                self.notifier.notify(Notice::warning(format!(
                    "{} could not be saved: {}",
                    document.title, e
                )));
                Err(e)
            }
        }
    }
}

impl<H> std::fmt::Debug for OrderBoard<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBoard")
            .field("query", &self.query)
            .field("orders", &self.orders.len())
            .field("total_orders", &self.total_orders)
            .finish()
    }
}
