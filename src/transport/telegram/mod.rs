pub mod api;
pub mod updates;


use std::sync::atomic::{AtomicI64, Ordering};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram transport; long-polls the Bot API for updates
pub struct TelegramChannel {
    bot_token: String,
    api_base: String,
    poll_timeout_secs: u64,
    /// First `update_id` not yet forwarded; survives listener restarts.
    offset: AtomicI64,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        Self::with_api_base(bot_token, DEFAULT_API_BASE.to_string())
    }

    pub fn with_api_base(bot_token: String, api_base: String) -> Self {
        Self {
            bot_token,
            api_base: api_base.trim_end_matches('/').to_string(),
            poll_timeout_secs: 30,
            offset: AtomicI64::new(0),
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    /// Offset the next `getUpdates` call starts from.
    #[must_use]
    pub fn next_update_offset(&self) -> i64 {
        self.offset.load(Ordering::SeqCst)
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }
}
