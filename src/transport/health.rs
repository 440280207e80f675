use super::telegram::TelegramChannel;
use std::time::Duration;

/// Outcome of a deadline-bounded `getMe` against the Bot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportHealth {
    /// Token accepted; the API answered as `bot`.
    Healthy { bot: String },
    Unhealthy { reason: String },
    Timeout,
}

impl TransportHealth {
    pub(crate) fn classify(
        result: std::result::Result<anyhow::Result<String>, tokio::time::error::Elapsed>,
    ) -> Self {
        match result {
            Ok(Ok(bot)) => Self::Healthy { bot },
            Ok(Err(error)) => Self::Unhealthy {
                reason: format!("{error:#}"),
            },
            Err(_) => Self::Timeout,
        }
    }

    pub(crate) fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

pub(crate) async fn check_bot(telegram: &TelegramChannel, deadline: Duration) -> TransportHealth {
    TransportHealth::classify(tokio::time::timeout(deadline, telegram.get_me()).await)
}
