use super::Config;

pub(super) const BOT_TOKEN_VAR: &str = "FETCHBOT_BOT_TOKEN";
pub(super) const LEGACY_BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub(super) const REQUIRED_CHANNEL_VAR: &str = "FETCHBOT_REQUIRED_CHANNEL";
pub(super) const ADMIN_ID_VAR: &str = "FETCHBOT_ADMIN_ID";
pub(super) const DOWNLOAD_DIR_VAR: &str = "FETCHBOT_DOWNLOAD_DIR";
pub(super) const YTDLP_VAR: &str = "FETCHBOT_YTDLP";

#[cfg(test)]
pub(super) const OVERRIDE_VARS: [&str; 6] = [
    BOT_TOKEN_VAR,
    LEGACY_BOT_TOKEN_VAR,
    REQUIRED_CHANNEL_VAR,
    ADMIN_ID_VAR,
    DOWNLOAD_DIR_VAR,
    YTDLP_VAR,
];

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Some(token) = non_empty(BOT_TOKEN_VAR).or_else(|| non_empty(LEGACY_BOT_TOKEN_VAR)) {
            self.telegram.bot_token = token;
        }

        if let Some(channel) = non_empty(REQUIRED_CHANNEL_VAR) {
            self.membership.required_channel = channel;
        }

        if let Some(admin) = non_empty(ADMIN_ID_VAR) {
            match admin.trim().parse::<i64>() {
                Ok(id) => self.membership.admin_id = Some(id),
                Err(error) => tracing::warn!(
                    value = %admin,
                    %error,
                    "ignoring {ADMIN_ID_VAR}: not a numeric user id"
                ),
            }
        }

        if let Some(dir) = non_empty(DOWNLOAD_DIR_VAR) {
            self.download.dir = dir;
        }

        if let Some(binary) = non_empty(YTDLP_VAR) {
            self.download.ytdlp_path = binary;
        }
    }
}
