//! HTTP transport
//!
//! [`HttpClient`] is the seam the API layer talks to; [`NetworkHttpClient`]
//! is the reqwest implementation. The bearer token comes from the
//! [`Session`] passed to each call.

use crate::{ClientConfig, ClientError, ClientResult, Session};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::RejectionReport;

/// File part of a multipart request
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    fn mime(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Multipart body: one JSON field plus files
#[derive(Debug, Clone)]
pub struct MultipartBody {
    /// Field the JSON document is sent under
    pub json_field: String,
    pub json: String,
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new<B: Serialize>(json_field: &str, body: &B) -> ClientResult<Self> {
        Ok(Self {
            json_field: json_field.to_string(),
            json: serde_json::to_string(body)?,
            files: Vec::new(),
        })
    }

    pub fn with_file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }
}

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned, Q: Serialize + Sync + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>;

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    async fn put_empty<T: DeserializeOwned>(&self, session: &Session, path: &str)
    -> ClientResult<T>;

    async fn delete<T: DeserializeOwned>(&self, session: &Session, path: &str) -> ClientResult<T>;

    async fn delete_with_body<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;

    /// POST or PUT a multipart form
    async fn send_multipart<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: MultipartBody,
    ) -> ClientResult<T>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, session: &Session, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = self.client.request(method, &url);
        if let Some(auth) = session.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        req
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(error_from_status(status, &text));
        }
        // Mutations may answer with an empty body
        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(error = %e, status = %status, "Failed to decode response body");
            ClientError::InvalidResponse(e.to_string())
        })
    }
}

fn error_from_status(status: StatusCode, text: &str) -> ClientError {
    let report = RejectionReport::from_body(text);
    let message = report
        .as_ref()
        .map(|r| r.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| text.to_string());
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Rejected(report.unwrap_or_else(|| {
                RejectionReport::new(if text.is_empty() {
                    status.canonical_reason().unwrap_or("Request rejected").to_string()
                } else {
                    text.to_string()
                })
            }))
        }
        _ => ClientError::Internal(format!("{}: {}", status, message)),
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned, Q: Serialize + Sync + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let response = self
            .request(session, Method::GET, path)
            .query(query)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .request(session, Method::PUT, path)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn put_empty<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> ClientResult<T> {
        let response = self.request(session, Method::PUT, path).send().await?;
        Self::handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, session: &Session, path: &str) -> ClientResult<T> {
        let response = self.request(session, Method::DELETE, path).send().await?;
        Self::handle_response(response).await
    }

    async fn delete_with_body<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .request(session, Method::DELETE, path)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn send_multipart<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: MultipartBody,
    ) -> ClientResult<T> {
        let mut form = multipart::Form::new().part(
            body.json_field.clone(),
            multipart::Part::text(body.json).mime_str("application/json")?,
        );
        for file in body.files {
            let mime = file.mime();
            let part = multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&mime)?;
            form = form.part(file.field, part);
        }
        let response = self
            .request(session, method, path)
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}
