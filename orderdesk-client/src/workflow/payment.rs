//! Payment update workflow
//!
//! A dialog collects the method and its evidence, then submits exactly one
//! payment mutation. While that request is in flight the dialog refuses
//! further submits and the order is held by the in-flight guard. On failure
//! the dialog stays open for a retry.

use crate::api::OrderApi;
use crate::confirm::{Confirmation, ConfirmationGate, Decision, DestructiveAction};
use crate::guard::{InFlightGuard, InFlightKey};
use crate::http::HttpClient;
use crate::notify::{Notice, Notifier};
use crate::{ClientError, ClientResult, Session};
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderMutationResponse, PaymentMethod};
use shared::order::{PaymentForm, PaymentTarget, actions};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Editing,
    Submitting,
    Closed,
}

#[derive(Debug, Clone)]
pub struct PaymentDialog {
    target: PaymentTarget,
    pub form: PaymentForm,
    state: DialogState,
    error: Option<AppError>,
}

impl PaymentDialog {
    /// Open for an order whose payment action is enabled
    pub fn open(order: &Order) -> ClientResult<Self> {
        let target = PaymentTarget::for_order(order)?;
        let form = PaymentForm {
            method: order.payment_details.as_ref().and_then(|d| d.method),
            ..Default::default()
        };
        Ok(Self {
            target,
            form,
            state: DialogState::Editing,
            error: None,
        })
    }

    pub fn target(&self) -> &PaymentTarget {
        &self.target
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    /// Submit control enabled
    pub fn can_submit(&self) -> bool {
        self.state == DialogState::Editing
    }

    /// Last field-level validation error
    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn select_method(&mut self, method: PaymentMethod) {
        self.form.method = Some(method);
        self.error = None;
    }

    pub fn set_transaction_id(&mut self, value: impl Into<String>) {
        self.form.transaction_id = value.into();
        self.error = None;
    }

    pub fn set_notes(&mut self, value: impl Into<String>) {
        self.form.notes = value.into();
        self.error = None;
    }

    /// Dismiss without submitting; a request already sent still completes server-side
    pub fn close(&mut self) {
        self.state = DialogState::Closed;
    }
}

/// Payment mutations for one backend
pub struct PaymentService<H> {
    orders: OrderApi<H>,
    guard: InFlightGuard,
    gate: Arc<dyn ConfirmationGate>,
    notifier: Arc<dyn Notifier>,
}

impl<H> Clone for PaymentService<H> {
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
            guard: self.guard.clone(),
            gate: Arc::clone(&self.gate),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<H: HttpClient> PaymentService<H> {
    pub fn new(
        orders: OrderApi<H>,
        guard: InFlightGuard,
        gate: Arc<dyn ConfirmationGate>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orders,
            guard,
            gate,
            notifier,
        }
    }

    /// Validate and send the dialog's payment
    ///
    /// Validation failures are recorded on the dialog and nothing is sent.
    pub async fn submit(
        &self,
        session: &Session,
        dialog: &mut PaymentDialog,
    ) -> ClientResult<OrderMutationResponse> {
        if !dialog.can_submit() {
            return Err(ClientError::Busy(format!(
                "payment dialog for order {}",
                dialog.target.order_id
            )));
        }

        let update = match dialog.form.validate() {
            Ok(update) => update,
            Err(e) => {
                dialog.error = Some(e.clone());
                return Err(e.into());
            }
        };
        dialog.error = None;

        let _permit = self
            .guard
            .acquire(InFlightKey::Order(dialog.target.id.clone()), "payment")?;
        dialog.state = DialogState::Submitting;

        match self
            .orders
            .update_payment(session, &dialog.target.id, &update)
            .await
        {
            Ok(response) => {
                dialog.state = DialogState::Closed;
                tracing::info!(
                    order_id = %dialog.target.order_id,
                    method = update.method.as_str(),
                    "Payment updated"
                );
                self.notifier.notify(Notice::success(format!(
                    "Payment recorded for order #{}",
                    dialog.target.order_id
                )));
                Ok(response)
            }
            Err(e) => {
                dialog.state = DialogState::Editing;
                log_failure(&e, &dialog.target.order_id, "Payment update failed");
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    /// Reset an order's payment after confirmation
    pub async fn mark_unpaid(
        &self,
        session: &Session,
        order: &Order,
    ) -> ClientResult<Decision<OrderMutationResponse>> {
        if !actions(order).mark_unpaid {
            return Err(AppError::new(ErrorCode::PaymentActionUnavailable)
                .with_detail("order_id", order.id.clone())
                .into());
        }

        let action = DestructiveAction::MarkUnpaid {
            order_id: order.id.clone(),
        };
        if self.gate.confirm(&action).await == Confirmation::Declined {
            tracing::debug!(order_id = %order.id, "Mark unpaid declined");
            return Ok(Decision::Declined);
        }

        let _permit = self
            .guard
            .acquire(InFlightKey::Order(order.storage_id.clone()), "mark_unpaid")?;
        match self.orders.mark_unpaid(session, &order.storage_id).await {
            Ok(response) => {
                tracing::info!(order_id = %order.id, "Order marked unpaid");
                self.notifier
                    .notify(Notice::success(format!("Order #{} marked as unpaid", order.id)));
                Ok(Decision::Done(response))
            }
            Err(e) => {
                log_failure(&e, &order.id, "Mark unpaid failed");
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }
}

/// Rejections are expected business outcomes, the rest are faults
pub(crate) fn log_failure(err: &ClientError, order_id: &str, what: &str) {
    match err {
        ClientError::Rejected(report) => {
            tracing::warn!(order_id = %order_id, reason = %report.message, "{}", what)
        }
        ClientError::Domain(e) => {
            tracing::debug!(order_id = %order_id, code = %e.code, "{}", what)
        }
        other => tracing::error!(order_id = %order_id, error = %other, "{}", what),
    }
}
