//! Evidence attachments
//!
//! Files already on the server are [`EvidenceFile::Persisted`]: they count
//! toward validation but are never uploaded again. New files are
//! [`EvidenceFile::Staged`] and hold their bytes until the memo is committed.

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{EvidenceKind, UploadedFile};

/// Local file waiting for upload
#[derive(Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub kind: EvidenceKind,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedFile")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceFile {
    Persisted(UploadedFile),
    Staged(StagedFile),
}

impl EvidenceFile {
    /// Stage a local file, rejecting anything that isn't an image or video
    pub fn staged(name: impl Into<String>, bytes: Vec<u8>) -> AppResult<Self> {
        let name = name.into();
        let kind = EvidenceKind::from_file_name(&name).ok_or_else(|| {
            AppError::new(ErrorCode::UnsupportedFileFormat)
                .with_detail("file", name.clone())
        })?;
        Ok(Self::Staged(StagedFile { name, kind, bytes }))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Persisted(f) => &f.name,
            Self::Staged(f) => &f.name,
        }
    }

    pub fn kind(&self) -> EvidenceKind {
        match self {
            Self::Persisted(f) => f.kind,
            Self::Staged(f) => f.kind,
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, Self::Staged(_))
    }

    pub fn as_persisted(&self) -> Option<&UploadedFile> {
        match self {
            Self::Persisted(f) => Some(f),
            Self::Staged(_) => None,
        }
    }
}

impl From<UploadedFile> for EvidenceFile {
    fn from(file: UploadedFile) -> Self {
        Self::Persisted(file)
    }
}
