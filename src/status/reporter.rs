use super::{Stage, UsageStats};
use crate::error::StatusError;
use crate::transport::{ChatTransport, MessageHandle};
use std::sync::Arc;

/// Owns the single progress message of one request and drives it forward
/// through its stages, replacing the visible text on every step.
///
/// Once a terminal stage is reached every further transition is refused.
pub struct StatusReporter {
    transport: Arc<dyn ChatTransport>,
    handle: MessageHandle,
    stage: Stage,
    history: Vec<Stage>,
    stats: Arc<UsageStats>,
}

impl StatusReporter {
    /// Send the initial message at `Pending`.
    pub async fn create(
        transport: Arc<dyn ChatTransport>,
        chat_id: i64,
        text: &str,
        stats: Arc<UsageStats>,
    ) -> anyhow::Result<Self> {
        let handle = transport.send_text(chat_id, text, None).await?;
        Ok(Self {
            transport,
            handle,
            stage: Stage::Pending,
            history: vec![Stage::Pending],
            stats,
        })
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every stage this message has been in, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    #[must_use]
    pub fn handle(&self) -> MessageHandle {
        self.handle
    }

    /// Move to `next` and show `text`.
    ///
    /// `Delivered` deletes the progress message instead of editing it: the
    /// media message that was just sent is the record from then on.
    pub async fn advance(&mut self, next: Stage, text: &str) -> Result<(), StatusError> {
        self.transition(next)?;

        let result = if next == Stage::Delivered {
            self.transport.delete_message(&self.handle).await
        } else {
            self.transport.edit_text(&self.handle, text).await
        };

        if let Err(error) = result {
            tracing::warn!(
                chat_id = self.handle.chat_id,
                message_id = self.handle.message_id,
                stage = %next,
                %error,
                "failed to update status message"
            );
        }
        Ok(())
    }

    pub async fn fail(&mut self, text: &str) -> Result<(), StatusError> {
        self.advance(Stage::Failed, text).await
    }

    fn transition(&mut self, next: Stage) -> Result<(), StatusError> {
        if self.stage.is_terminal() {
            return Err(StatusError::Finalized(self.stage));
        }
        if !self.stage.can_advance_to(next) {
            return Err(StatusError::IllegalTransition {
                from: self.stage,
                to: next,
            });
        }

        tracing::debug!(from = %self.stage, to = %next, "status stage advanced");
        self.stage = next;
        self.history.push(next);
        if next.is_terminal() {
            self.stats.record_terminal(next);
        }
        Ok(())
    }
}
