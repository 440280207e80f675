use crate::download::DEFAULT_FORMAT;
use crate::transport::telegram::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub membership: MembershipConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub reliability: ReliabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Bot API root; only changed for a local Bot API server or tests
    pub api_base: String,
    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: DEFAULT_API_BASE.into(),
            poll_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipConfig {
    /// Channel users must belong to, e.g. `@my_channel`
    pub required_channel: String,
    /// Operator user id; always authorized and allowed to see `/stats`
    pub admin_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Storage directory; `~` is expanded, relative paths resolve against the working dir
    pub dir: String,
    pub ytdlp_path: String,
    pub workers: usize,
    pub format: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: "downloads".into(),
            ytdlp_path: "yt-dlp".into(),
            workers: 2,
            format: DEFAULT_FORMAT.into(),
        }
    }
}

impl DownloadConfig {
    #[must_use]
    pub fn resolved_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Files at or above this size stay on disk instead of being uploaded
    pub inline_limit_mb: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            inline_limit_mb: 49,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityConfig {
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            initial_backoff_secs: 2,
            max_backoff_secs: 60,
        }
    }
}
