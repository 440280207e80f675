use super::Config;
use crate::error::ConfigError;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| -> Result<(), ConfigError> {
            Err(ConfigError::Validation(msg))
        };

        if self.telegram.bot_token.trim().is_empty() {
            return fail(format!(
                "telegram.bot_token is empty; set it in {} or FETCHBOT_BOT_TOKEN",
                self.config_path.display()
            ));
        }
        if url::Url::parse(&self.telegram.api_base).is_err() {
            return fail(format!(
                "telegram.api_base is not a valid URL: {}",
                self.telegram.api_base
            ));
        }
        if self.membership.required_channel.trim().is_empty() {
            return fail(
                "membership.required_channel is empty; set it or FETCHBOT_REQUIRED_CHANNEL".into(),
            );
        }
        if self.download.workers == 0 {
            return fail("download.workers must be at least 1".into());
        }
        if self.download.dir.trim().is_empty() {
            return fail("download.dir is empty".into());
        }
        if !(1..=49).contains(&self.delivery.inline_limit_mb) {
            return fail(format!(
                "delivery.inline_limit_mb must be between 1 and 49, got {}",
                self.delivery.inline_limit_mb
            ));
        }
        Ok(())
    }
}
