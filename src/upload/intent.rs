//! The user's declared submission, after selection-time gating.

use thiserror::Error;

use crate::config::MAX_ARCHIVE_BYTES;

const ZIP_MIME: &str = "application/zip";

/// Selection-time rejection of a candidate archive. Neither variant ever
/// reaches the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Please select a ZIP file")]
    NotZip,

    #[error("File size must be less than 100MB")]
    TooLarge,
}

/// A gated source archive: ZIP by extension or MIME, at most 100 MiB.
#[derive(Debug, Clone)]
pub struct Archive {
    file_name: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl Archive {
    /// Gate a selected file. Rejection happens here, before any form state
    /// or network traffic exists.
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<Self, ArchiveError> {
        Self::with_limit(file_name, content_type, data, MAX_ARCHIVE_BYTES)
    }

    pub fn with_limit(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        data: Vec<u8>,
        max_bytes: u64,
    ) -> Result<Self, ArchiveError> {
        let file_name = file_name.into();
        if !looks_like_zip(&file_name, content_type) {
            return Err(ArchiveError::NotZip);
        }
        if data.len() as u64 > max_bytes {
            return Err(ArchiveError::TooLarge);
        }
        Ok(Self {
            file_name,
            content_type: content_type.map(str::to_owned),
            data,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type sent with the multipart part.
    pub fn mime(&self) -> &str {
        self.content_type.as_deref().unwrap_or(ZIP_MIME)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn looks_like_zip(file_name: &str, content_type: Option<&str>) -> bool {
    if content_type == Some(ZIP_MIME) {
        return true;
    }
    if file_name.ends_with(".zip") {
        return true;
    }
    mime_guess::from_path(file_name)
        .first()
        .is_some_and(|m| m.essence_str() == ZIP_MIME)
}

/// Which namespace the upload lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamTarget {
    /// The caller's personal namespace.
    Personal,
    /// An existing team, by id.
    Existing(String),
    /// Create this team first, then attach the upload to it.
    New {
        name: String,
        member_ids: Vec<String>,
    },
}

/// A validated submission, produced by the validation gate. Invariants the
/// gate enforces: `title` present iff this creates a new project;
/// `version_target` present iff it does not.
#[derive(Debug)]
pub struct UploadIntent {
    pub title: Option<String>,
    pub description: String,
    pub archive: Archive,
    pub team_target: TeamTarget,
    pub version_target: Option<String>,
}

impl UploadIntent {
    pub fn is_new_project(&self) -> bool {
        self.version_target.is_none()
    }
}
