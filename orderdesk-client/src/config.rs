//! Client configuration

use std::path::PathBuf;

/// Path segments the backend does not fix by convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// `PUT /order/{payment}/:id`
    pub payment: String,
    /// `PUT /order/{unpaid}/:id`
    pub unpaid: String,
    /// `DELETE /order/{hard_delete}/:id`
    pub hard_delete: String,
    /// `GET /order/{statement}/:id`
    pub statement: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            payment: "update-payment".to_string(),
            unpaid: "mark-unpaid".to_string(),
            hard_delete: "hard-delete".to_string(),
            statement: "statement".to_string(),
        }
    }
}

/// Client configuration for connecting to the order backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000/api")
    pub base_url: String,

    /// Bearer token, used to build the default [`Session`](crate::Session)
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub endpoints: Endpoints,

    /// Where generated documents are written
    pub document_dir: PathBuf,

    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: 30,
            endpoints: Endpoints::default(),
            document_dir: PathBuf::from("documents"),
            log_level: "info".to_string(),
        }
    }

    /// Load from `ORDERDESK_*` environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var("ORDERDESK_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".into());
        let mut config = Self::new(base_url);

        if let Ok(token) = std::env::var("ORDERDESK_TOKEN")
            && !token.trim().is_empty()
        {
            config.token = Some(token);
        }
        if let Some(secs) = std::env::var("ORDERDESK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_secs = secs;
        }
        if let Ok(dir) = std::env::var("ORDERDESK_DOCUMENT_DIR") {
            config.document_dir = PathBuf::from(dir);
        }
        if let Ok(level) = std::env::var("ORDERDESK_LOG_LEVEL") {
            config.log_level = level;
        }

        let segment = |key: &str, default: String| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().trim_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        let defaults = Endpoints::default();
        config.endpoints = Endpoints {
            payment: segment("ORDERDESK_PAYMENT_ENDPOINT", defaults.payment),
            unpaid: segment("ORDERDESK_UNPAID_ENDPOINT", defaults.unpaid),
            hard_delete: segment("ORDERDESK_HARD_DELETE_ENDPOINT", defaults.hard_delete),
            statement: segment("ORDERDESK_STATEMENT_ENDPOINT", defaults.statement),
        };
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_document_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.document_dir = dir.into();
        self
    }
}
