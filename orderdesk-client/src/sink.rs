//! Document output

use crate::ClientResult;
use async_trait::async_trait;
use shared::document::Document;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Persist a document, returning where it went
    async fn save(&self, document: &Document) -> ClientResult<PathBuf>;
}

/// Writes documents into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DocumentSink for DirectorySink {
    async fn save(&self, document: &Document) -> ClientResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&document.file_name);
        tokio::fs::write(&path, document.content.as_bytes()).await?;
        tracing::info!(path = %path.display(), bytes = document.len(), "Document written");
        Ok(path)
    }
}
