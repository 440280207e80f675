use std::path::PathBuf;
use thiserror::Error;

use crate::status::Stage;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `fetchbot`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide how to report; transport and config code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum FetchError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Request pipeline ────────────────────────────────────────────────
    #[error("pipeline: {0}")]
    Pipeline(#[from] PipelineError),

    // ── Status message ──────────────────────────────────────────────────
    #[error("status: {0}")]
    Status(#[from] StatusError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Pipeline errors ─────────────────────────────────────────────────────────

/// Every way a single link request can end without the media being delivered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("link is not from a supported provider")]
    UnsupportedLink,

    #[error("user {user_id} is not a member of the required channel")]
    Unauthorized { user_id: i64 },

    #[error("membership lookup failed: {0}")]
    MembershipLookup(String),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionFailure),

    #[error("upload of {} failed: {message}", .path.display())]
    Upload { path: PathBuf, message: String },
}

impl PipelineError {
    /// Whether the downloaded file still exists on local storage after this failure.
    #[must_use]
    pub fn file_retained(&self) -> bool {
        matches!(self, Self::Upload { .. })
    }
}

/// Reason an extraction produced no usable file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionFailure {
    #[error("link is invalid or not recognised by the extractor")]
    InvalidLink,

    #[error("content is private or requires sign-in")]
    PrivateContent,

    #[error("no downloadable format is available")]
    FormatUnavailable,

    #[error("network error: {0}")]
    Network(String),

    #[error("extractor reported success but no output file exists at {0}")]
    MissingOutput(String),

    #[error("extractor binary is unavailable: {0}")]
    ToolUnavailable(String),

    #[error("download worker crashed: {0}")]
    WorkerCrashed(String),

    #[error("{0}")]
    Other(String),
}

impl ExtractionFailure {
    /// Classify extractor diagnostics (stderr) into a failure kind.
    #[must_use]
    pub fn from_diagnostics(stderr: &str) -> Self {
        let lowered = stderr.to_ascii_lowercase();
        let last_line = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .trim()
            .to_string();

        if lowered.contains("private video")
            || lowered.contains("private account")
            || lowered.contains("sign in to confirm")
            || lowered.contains("login required")
            || lowered.contains("this video is private")
        {
            Self::PrivateContent
        } else if lowered.contains("unsupported url")
            || lowered.contains("is not a valid url")
            || lowered.contains("video unavailable")
            || lowered.contains("incomplete youtube id")
            || lowered.contains("http error 404")
        {
            Self::InvalidLink
        } else if lowered.contains("requested format is not available")
            || lowered.contains("no video formats found")
        {
            Self::FormatUnavailable
        } else if lowered.contains("unable to download")
            || lowered.contains("timed out")
            || lowered.contains("connection")
            || lowered.contains("name or service not known")
            || lowered.contains("http error")
        {
            Self::Network(last_line)
        } else if last_line.is_empty() {
            Self::Other("extractor exited without diagnostics".into())
        } else {
            Self::Other(last_line)
        }
    }
}

// ─── Status errors ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("illegal stage transition {from} -> {to}")]
    IllegalTransition { from: Stage, to: Stage },

    #[error("status message already finalized at {0}")]
    Finalized(Stage),
}

pub type Result<T> = std::result::Result<T, FetchError>;
