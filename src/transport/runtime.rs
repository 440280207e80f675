use super::traits::{ChatTransport, InboundEvent};
use crate::config::ReliabilityConfig;
use std::sync::Arc;
use std::time::Duration;

const MIN_INITIAL_BACKOFF_SECS: u64 = 2;
const MIN_MAX_BACKOFF_SECS: u64 = 60;

/// Restart delays for the update listener.
///
/// Consecutive failures double the delay up to `max`; a listener that
/// returned cleanly starts over from `initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListenerBackoff {
    initial: Duration,
    max: Duration,
    next: Duration,
    restarts: u32,
}

impl ListenerBackoff {
    pub(crate) fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.max(Duration::from_secs(1));
        Self {
            initial,
            max: max.max(initial),
            next: initial,
            restarts: 0,
        }
    }

    /// Backoff from config, never shorter than the built-in floors.
    pub(crate) fn from_config(reliability: &ReliabilityConfig) -> Self {
        Self::new(
            Duration::from_secs(reliability.initial_backoff_secs.max(MIN_INITIAL_BACKOFF_SECS)),
            Duration::from_secs(reliability.max_backoff_secs.max(MIN_MAX_BACKOFF_SECS)),
        )
    }

    /// Delay before restarting after an error.
    pub(crate) fn after_failure(&mut self) -> Duration {
        self.take_delay()
    }

    /// Delay before restarting after the listener returned on its own.
    pub(crate) fn after_clean_exit(&mut self) -> Duration {
        self.next = self.initial;
        self.take_delay()
    }

    fn take_delay(&mut self) -> Duration {
        self.restarts = self.restarts.saturating_add(1);
        let delay = self.next;
        self.next = self.next.saturating_mul(2).min(self.max);
        delay
    }

    pub(crate) fn restarts(&self) -> u32 {
        self.restarts
    }
}

/// Keep the update listener running until the receiving side of `tx` goes
/// away. Inbound events keep flowing to the same queue across restarts.
pub(crate) fn spawn_supervised_listener(
    transport: Arc<dyn ChatTransport>,
    tx: tokio::sync::mpsc::Sender<InboundEvent>,
    mut backoff: ListenerBackoff,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let transport_name = transport.name().to_string();

        loop {
            tracing::debug!(
                transport = %transport_name,
                restarts = backoff.restarts(),
                "update listener starting"
            );
            let result = transport.listen(tx.clone()).await;

            if tx.is_closed() {
                tracing::debug!(transport = %transport_name, "event queue closed; listener stopped");
                break;
            }

            let delay = match result {
                Ok(()) => {
                    let delay = backoff.after_clean_exit();
                    tracing::warn!(
                        transport = %transport_name,
                        restarts = backoff.restarts(),
                        delay_secs = delay.as_secs(),
                        "update listener returned; restarting"
                    );
                    delay
                }
                Err(error) => {
                    let delay = backoff.after_failure();
                    tracing::error!(
                        transport = %transport_name,
                        restarts = backoff.restarts(),
                        delay_secs = delay.as_secs(),
                        error = %format!("{error:#}"),
                        "update listener failed; restarting"
                    );
                    delay
                }
            };

            tokio::time::sleep(delay).await;
        }
    })
}
