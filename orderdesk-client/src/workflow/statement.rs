//! Statement generation
//!
//! Read-only: fetches a customer's statement payload, renders it locally and
//! optionally asks the server to email it. Failures only produce a warning.

use crate::api::OrderApi;
use crate::http::HttpClient;
use crate::notify::{Notice, Notifier};
use crate::sink::DocumentSink;
use crate::{ClientResult, Session};
use shared::document::{Document, render_statement};
use shared::models::StatementQuery;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct StatementOutcome {
    pub document: Document,
    pub path: PathBuf,
    /// Server confirmed the email went out
    pub email_sent: bool,
}

pub struct StatementService<H> {
    orders: OrderApi<H>,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn DocumentSink>,
}

impl<H: HttpClient> StatementService<H> {
    pub fn new(
        orders: OrderApi<H>,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn DocumentSink>,
    ) -> Self {
        Self {
            orders,
            notifier,
            sink,
        }
    }

    pub async fn generate(
        &self,
        session: &Session,
        customer_id: &str,
        query: &StatementQuery,
    ) -> ClientResult<StatementOutcome> {
        match self.try_generate(session, customer_id, query).await {
            Ok(outcome) => {
                tracing::info!(
                    customer_id = %customer_id,
                    path = %outcome.path.display(),
                    email_sent = outcome.email_sent,
                    "Statement generated"
                );
                if query.send_by_email && !outcome.email_sent {
                    self.notifier.notify(Notice::warning(
                        "Statement generated, but the server did not confirm the email",
                    ));
                } else {
                    self.notifier
                        .notify(Notice::success(format!("{} ready", outcome.document.title)));
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(
                    customer_id = %customer_id,
                    error = %e,
                    "Statement generation failed"
                );
                self.notifier.notify(Notice::warning(format!(
                    "Statement could not be generated: {}",
                    e.user_message()
                )));
                Err(e)
            }
        }
    }

    async fn try_generate(
        &self,
        session: &Session,
        customer_id: &str,
        query: &StatementQuery,
    ) -> ClientResult<StatementOutcome> {
        let payload = self.orders.statement(session, customer_id, query).await?;
        let document = render_statement(&payload, query);
        let path = self.sink.save(&document).await?;
        Ok(StatementOutcome {
            document,
            path,
            email_sent: payload.email_sent,
        })
    }
}
