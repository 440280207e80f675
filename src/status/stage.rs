use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Progress stage of a single request's status message.
///
/// `Pending → Downloading → (Uploading → Delivered) | Retained | Failed`.
/// `Delivered`, `Retained` and `Failed` are absorbing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Pending,
    Downloading,
    Uploading,
    Delivered,
    Retained,
    Failed,
}

impl Stage {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Retained | Self::Failed)
    }

    /// Whether `next` is a legal forward step from `self`.
    #[must_use]
    pub fn can_advance_to(self, next: Stage) -> bool {
        match (self, next) {
            (Self::Pending, Self::Downloading | Self::Failed)
            | (Self::Downloading, Self::Uploading | Self::Retained | Self::Failed)
            | (Self::Uploading, Self::Delivered | Self::Failed) => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
