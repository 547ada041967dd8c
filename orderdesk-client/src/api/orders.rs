//! Order endpoints

use crate::config::Endpoints;
use crate::http::HttpClient;
use crate::{ClientResult, Session};
use shared::models::{
    OrderListPage, OrderListQuery, OrderMutationResponse, OrderUpdate, PaymentUpdate,
    StatementPayload, StatementQuery, VoidRequest,
};
use std::sync::Arc;

/// Typed access to `/order/*`
///
/// Mutations address orders by storage identity (`_id`).
#[derive(Debug)]
pub struct OrderApi<H> {
    http: Arc<H>,
    endpoints: Endpoints,
}

impl<H> Clone for OrderApi<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            endpoints: self.endpoints.clone(),
        }
    }
}

impl<H: HttpClient> OrderApi<H> {
    pub fn new(http: Arc<H>, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// `GET /order/getAll`
    pub async fn list(
        &self,
        session: &Session,
        query: &OrderListQuery,
    ) -> ClientResult<OrderListPage> {
        self.http.get(session, "order/getAll", query).await
    }

    /// `PUT /order/update/:id`
    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        update: &OrderUpdate,
    ) -> ClientResult<OrderMutationResponse> {
        self.http
            .put(session, &format!("order/update/{}", id), update)
            .await
    }

    pub async fn update_payment(
        &self,
        session: &Session,
        id: &str,
        payment: &PaymentUpdate,
    ) -> ClientResult<OrderMutationResponse> {
        self.http
            .put(session, &format!("order/{}/{}", self.endpoints.payment, id), payment)
            .await
    }

    /// Reset payment fields; no body
    pub async fn mark_unpaid(
        &self,
        session: &Session,
        id: &str,
    ) -> ClientResult<OrderMutationResponse> {
        self.http
            .put_empty(session, &format!("order/{}/{}", self.endpoints.unpaid, id))
            .await
    }

    /// Soft delete with an audit reason
    pub async fn void(
        &self,
        session: &Session,
        id: &str,
        reason: &str,
    ) -> ClientResult<OrderMutationResponse> {
        let body = VoidRequest {
            reason: reason.to_string(),
        };
        self.http
            .delete_with_body(session, &format!("order/delete/{}", id), &body)
            .await
    }

    /// Irreversible removal
    pub async fn hard_delete(
        &self,
        session: &Session,
        id: &str,
    ) -> ClientResult<OrderMutationResponse> {
        self.http
            .delete(session, &format!("order/{}/{}", self.endpoints.hard_delete, id))
            .await
    }

    /// Statement for one customer's order history
    pub async fn statement(
        &self,
        session: &Session,
        customer_id: &str,
        query: &StatementQuery,
    ) -> ClientResult<StatementPayload> {
        self.http
            .get(
                session,
                &format!("order/{}/{}", self.endpoints.statement, customer_id),
                query,
            )
            .await
    }
}
