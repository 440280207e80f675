use crate::error::ExtractionFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// One user's request to fetch a link. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    id: Uuid,
    url: String,
    user_id: i64,
    submitted_at: DateTime<Utc>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, user_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            user_id,
            submitted_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// What the extractor reports for a finished download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMedia {
    #[serde(rename = "filepath")]
    pub path: PathBuf,
    #[serde(default)]
    pub title: String,
}

/// A downloaded file on local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedMedia {
    pub path: PathBuf,
    pub title: String,
    pub size_bytes: u64,
}

impl DownloadedMedia {
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / (1_024.0 * 1_024.0)
    }
}

/// Outcome of exactly one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Completed(DownloadedMedia),
    Failed(ExtractionFailure),
}

impl DownloadResult {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Fixed extraction preferences shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub output_dir: PathBuf,
    pub format: String,
    pub no_playlist: bool,
    pub restrict_filenames: bool,
}

impl ExtractionOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: DEFAULT_FORMAT.to_string(),
            no_playlist: true,
            restrict_filenames: true,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output template: `<dir>/<title>.<ext>`.
    #[must_use]
    pub fn output_template(&self) -> String {
        self.output_dir
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .into_owned()
    }
}
