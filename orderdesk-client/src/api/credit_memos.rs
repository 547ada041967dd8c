//! Credit memo endpoints
//!
//! Create and update are multipart: the memo as JSON under `data`, new
//! evidence files under `evidence[<line index>]`. There is no delete.

use crate::http::{FilePart, HttpClient, MultipartBody};
use crate::{ClientResult, Session};
use reqwest::Method;
use shared::credit_memo::Submission;
use shared::models::{CreditMemo, CreditMemoList, CreditMemoResponse};
use std::sync::Arc;

const JSON_FIELD: &str = "data";

#[derive(Debug)]
pub struct CreditMemoApi<H> {
    http: Arc<H>,
}

impl<H> Clone for CreditMemoApi<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

fn multipart(submission: &Submission) -> ClientResult<MultipartBody> {
    let mut body = MultipartBody::new(JSON_FIELD, &submission.payload)?;
    for upload in &submission.uploads {
        body = body.with_file(FilePart {
            field: upload.field.clone(),
            file_name: upload.file.name.clone(),
            bytes: upload.file.bytes.clone(),
        });
    }
    Ok(body)
}

impl<H: HttpClient> CreditMemoApi<H> {
    pub fn new(http: Arc<H>) -> Self {
        Self { http }
    }

    /// `POST /creditmemo/create`
    pub async fn create(
        &self,
        session: &Session,
        submission: &Submission,
    ) -> ClientResult<CreditMemoResponse> {
        self.http
            .send_multipart(session, Method::POST, "creditmemo/create", multipart(submission)?)
            .await
    }

    /// `PUT /creditmemo/update/:id`
    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        submission: &Submission,
    ) -> ClientResult<CreditMemoResponse> {
        self.http
            .send_multipart(
                session,
                Method::PUT,
                &format!("creditmemo/update/{}", id),
                multipart(submission)?,
            )
            .await
    }

    /// `GET /creditmemo/by-order/:id`
    pub async fn list_by_order(
        &self,
        session: &Session,
        order_id: &str,
    ) -> ClientResult<Vec<CreditMemo>> {
        let list: CreditMemoList = self
            .http
            .get(session, &format!("creditmemo/by-order/{}", order_id), &())
            .await?;
        Ok(list.into_vec())
    }
}
