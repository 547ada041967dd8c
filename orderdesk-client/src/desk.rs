//! Wiring of APIs, guard and collaborators into ready workflows.

use crate::api::{CreditMemoApi, OrderApi};
use crate::confirm::ConfirmationGate;
use crate::guard::InFlightGuard;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::notify::{Notifier, TracingNotifier};
use crate::sink::{DirectorySink, DocumentSink};
use crate::workflow::{CreditMemoService, OrderBoard, PaymentService, StatementService};
use crate::{ClientConfig, ClientResult, Session};
use std::sync::Arc;

/// Builder for [`OrderDesk`].
///
/// # Example
///
/// ```no_run
/// use orderdesk_client::{ClientConfig, OrderDesk};
/// use orderdesk_client::confirm::ScriptedGate;
/// use std::sync::Arc;
///
/// let desk = OrderDesk::builder(ClientConfig::from_env())
///     .gate(Arc::new(ScriptedGate::decline()))
///     .build()
///     .expect("Failed to build order desk");
/// ```
pub struct OrderDeskBuilder {
    config: ClientConfig,
    gate: Option<Arc<dyn ConfirmationGate>>,
    notifier: Option<Arc<dyn Notifier>>,
    sink: Option<Arc<dyn DocumentSink>>,
}

impl OrderDeskBuilder {
    /// Confirmation prompts for destructive actions (required)
    pub fn gate(mut self, gate: Arc<dyn ConfirmationGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Defaults to [`TracingNotifier`]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Defaults to a [`DirectorySink`] on the configured document directory
    pub fn sink(mut self, sink: Arc<dyn DocumentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> ClientResult<OrderDesk<NetworkHttpClient>> {
        let http = Arc::new(NetworkHttpClient::new(&self.config)?);
        self.build_with(http)
    }

    /// Build over a custom transport
    pub fn build_with<H: HttpClient>(self, http: Arc<H>) -> ClientResult<OrderDesk<H>> {
        let gate = self.gate.ok_or_else(|| {
            crate::ClientError::Internal("A confirmation gate is required".to_string())
        })?;
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingNotifier) as Arc<dyn Notifier>);
        let sink = self
            .sink
            .unwrap_or_else(|| {
                let dir = self.config.document_dir.clone();
                Arc::new(DirectorySink::new(dir)) as Arc<dyn DocumentSink>
            });
        Ok(OrderDesk {
            session: Session::from(&self.config),
            orders: OrderApi::new(Arc::clone(&http), self.config.endpoints.clone()),
            credit_memos: CreditMemoApi::new(http),
            guard: InFlightGuard::new(),
            gate,
            notifier,
            sink,
            config: self.config,
        })
    }
}

/// Everything a workstation needs to talk to the order backend
pub struct OrderDesk<H> {
    config: ClientConfig,
    session: Session,
    orders: OrderApi<H>,
    credit_memos: CreditMemoApi<H>,
    guard: InFlightGuard,
    gate: Arc<dyn ConfirmationGate>,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn DocumentSink>,
}

impl OrderDesk<NetworkHttpClient> {
    pub fn builder(config: ClientConfig) -> OrderDeskBuilder {
        OrderDeskBuilder {
            config,
            gate: None,
            notifier: None,
            sink: None,
        }
    }
}

impl<H: HttpClient> OrderDesk<H> {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session built from the configured token
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn orders(&self) -> &OrderApi<H> {
        &self.orders
    }

    pub fn guard(&self) -> &InFlightGuard {
        &self.guard
    }

    pub fn sink(&self) -> &dyn DocumentSink {
        self.sink.as_ref()
    }

    pub fn order_board(&self) -> OrderBoard<H> {
        OrderBoard::new(
            self.orders.clone(),
            self.guard.clone(),
            Arc::clone(&self.gate),
            Arc::clone(&self.notifier),
        )
    }

    pub fn payments(&self) -> PaymentService<H> {
        PaymentService::new(
            self.orders.clone(),
            self.guard.clone(),
            Arc::clone(&self.gate),
            Arc::clone(&self.notifier),
        )
    }

    pub fn credit_memo_service(&self) -> CreditMemoService<H> {
        CreditMemoService::new(
            self.credit_memos.clone(),
            self.guard.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.sink),
        )
    }

    pub fn statements(&self) -> StatementService<H> {
        StatementService::new(
            self.orders.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.sink),
        )
    }
}
