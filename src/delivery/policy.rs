use crate::download::DownloadedMedia;
use std::path::PathBuf;

/// Largest file sent inline: 49 MiB, one MiB under the transport's 50 MiB limit.
pub const INLINE_LIMIT_BYTES: u64 = 49 * 1_024 * 1_024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryDecision {
    /// Upload the file through the chat transport.
    Inline,
    /// Keep the file on local storage and report where it is.
    Retain { path: PathBuf },
}

/// Size-threshold choice between inline upload and local retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    inline_limit_bytes: u64,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::new(INLINE_LIMIT_BYTES)
    }
}

impl DeliveryPolicy {
    pub fn new(inline_limit_bytes: u64) -> Self {
        Self { inline_limit_bytes }
    }

    pub fn from_megabytes(limit_mb: u64) -> Self {
        Self::new(limit_mb.saturating_mul(1_024 * 1_024))
    }

    #[must_use]
    pub fn inline_limit_bytes(&self) -> u64 {
        self.inline_limit_bytes
    }

    /// Files strictly below the limit go inline; everything else is retained.
    #[must_use]
    pub fn decide(&self, media: &DownloadedMedia) -> DeliveryDecision {
        if media.size_bytes < self.inline_limit_bytes {
            DeliveryDecision::Inline
        } else {
            DeliveryDecision::Retain {
                path: media.path.clone(),
            }
        }
    }
}
