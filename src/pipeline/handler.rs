use super::actions::{
    BotCommand, CallbackAction, admin_keyboard, parse_command, verify_keyboard, welcome_keyboard,
};
use super::error_surface::{ErrorSurface, provider_list};
use crate::delivery::{DeliveryDecision, DeliveryPolicy};
use crate::download::{DownloadDispatcher, DownloadRequest, DownloadResult, DownloadedMedia};
use crate::error::{PipelineError, StatusError};
use crate::links::{LinkClass, LinkClassifier};
use crate::membership::MembershipGate;
use crate::status::{Stage, StatusReporter, UsageStats};
use crate::transport::{CallbackEvent, ChatTransport, InboundEvent, InlineKeyboard, TextEvent};
use std::sync::Arc;
use uuid::Uuid;

/// Collaborators the pipeline is assembled from.
pub struct PipelineParts {
    pub transport: Arc<dyn ChatTransport>,
    pub gate: MembershipGate,
    pub dispatcher: DownloadDispatcher,
    pub classifier: LinkClassifier,
    pub policy: DeliveryPolicy,
    pub stats: Arc<UsageStats>,
    pub admin_id: Option<i64>,
}

/// How one link request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub request_id: Uuid,
    pub stage: Stage,
    pub history: Vec<Stage>,
    pub error: Option<PipelineError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Refused before any status message or download was created.
    Rejected(PipelineError),
    /// Went through the status message lifecycle.
    Request(RequestOutcome),
    /// The status message could not be created; nothing was downloaded.
    Undeliverable,
    Command(BotCommand),
    Callback(CallbackAction),
}

/// Handles one inbound event at a time: classify, authorize, download,
/// deliver, and report through a single status message.
pub struct Pipeline {
    transport: Arc<dyn ChatTransport>,
    gate: MembershipGate,
    dispatcher: DownloadDispatcher,
    classifier: LinkClassifier,
    policy: DeliveryPolicy,
    surface: ErrorSurface,
    stats: Arc<UsageStats>,
    admin_id: Option<i64>,
}

impl Pipeline {
    pub fn new(parts: PipelineParts) -> Self {
        let surface = ErrorSurface::new(parts.classifier.providers(), parts.gate.required_channel());
        Self {
            transport: parts.transport,
            gate: parts.gate,
            dispatcher: parts.dispatcher,
            classifier: parts.classifier,
            policy: parts.policy,
            surface,
            stats: parts.stats,
            admin_id: parts.admin_id,
        }
    }

    #[must_use]
    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    pub async fn handle_event(&self, event: InboundEvent) -> Outcome {
        match event {
            InboundEvent::Text(text) => match parse_command(&text.text) {
                Some(command) => self.handle_command(command, &text).await,
                None => self.handle_link(&text).await,
            },
            InboundEvent::Callback(callback) => self.handle_callback(&callback).await,
        }
    }

    pub async fn handle_link(&self, event: &TextEvent) -> Outcome {
        let url = match self.classifier.classify(&event.text) {
            LinkClass::Supported { provider, url } => {
                tracing::debug!(user_id = event.user_id, %provider, "supported link received");
                url
            }
            LinkClass::Unsupported => {
                return self
                    .reject(event.chat_id, PipelineError::UnsupportedLink, None)
                    .await;
            }
        };

        if let Err(denial) = self.gate.verify(event.user_id).await {
            let keyboard = verify_keyboard();
            return self.reject(event.chat_id, denial, Some(&keyboard)).await;
        }

        self.stats.record_request();
        let request = DownloadRequest::new(url, event.user_id);
        tracing::info!(
            request_id = %request.id(),
            user_id = request.user_id(),
            chat_id = event.chat_id,
            url = %request.url(),
            "download request accepted"
        );

        let mut reporter = match StatusReporter::create(
            Arc::clone(&self.transport),
            event.chat_id,
            &t!("status.pending"),
            Arc::clone(&self.stats),
        )
        .await
        {
            Ok(reporter) => reporter,
            Err(error) => {
                tracing::error!(
                    request_id = %request.id(),
                    error = %format!("{error:#}"),
                    "could not create status message; dropping request"
                );
                self.stats.record_terminal(Stage::Failed);
                return Outcome::Undeliverable;
            }
        };

        let result = self.run_request(&mut reporter, &request, event.chat_id).await;
        if let Err(error) = &result {
            tracing::warn!(request_id = %request.id(), %error, "request failed");
            let message = self.surface.render(error);
            if let Err(status_error) = reporter.fail(&message).await {
                log_status_error(request.id(), &status_error);
            }
        }

        Outcome::Request(RequestOutcome {
            request_id: request.id(),
            stage: reporter.stage(),
            history: reporter.history().to_vec(),
            error: result.err(),
        })
    }

    async fn run_request(
        &self,
        reporter: &mut StatusReporter,
        request: &DownloadRequest,
        chat_id: i64,
    ) -> Result<(), PipelineError> {
        // Status stays Pending while queued behind busy workers.
        let slot = self.dispatcher.acquire().await?;
        step(reporter, request.id(), Stage::Downloading, &t!("status.downloading")).await;

        let media = match self.dispatcher.run(slot, request).await {
            DownloadResult::Completed(media) => media,
            DownloadResult::Failed(failure) => return Err(failure.into()),
        };

        match self.policy.decide(&media) {
            DeliveryDecision::Retain { path } => {
                let text = t!(
                    "status.retained",
                    path = path.display(),
                    size = format!("{:.2}", media.size_mib()),
                    limit = self.policy.inline_limit_bytes() / (1_024 * 1_024)
                );
                step(reporter, request.id(), Stage::Retained, &text).await;
                Ok(())
            }
            DeliveryDecision::Inline => self.deliver_inline(reporter, request, chat_id, &media).await,
        }
    }

    async fn deliver_inline(
        &self,
        reporter: &mut StatusReporter,
        request: &DownloadRequest,
        chat_id: i64,
        media: &DownloadedMedia,
    ) -> Result<(), PipelineError> {
        let text = t!("status.uploading", size = format!("{:.2}", media.size_mib()));
        step(reporter, request.id(), Stage::Uploading, &text).await;

        let caption = t!("status.caption", title = &media.title);
        self.transport
            .send_file(chat_id, &media.path, &caption)
            .await
            .map_err(|error| PipelineError::Upload {
                path: media.path.clone(),
                message: format!("{error:#}"),
            })?;

        step(reporter, request.id(), Stage::Delivered, "").await;
        Ok(())
    }

    async fn reject(
        &self,
        chat_id: i64,
        error: PipelineError,
        keyboard: Option<&InlineKeyboard>,
    ) -> Outcome {
        self.stats.record_rejection();
        tracing::info!(chat_id, %error, "request rejected");
        let message = self.surface.render(&error);
        self.reply(chat_id, &message, keyboard).await;
        Outcome::Rejected(error)
    }

    async fn handle_command(&self, command: BotCommand, event: &TextEvent) -> Outcome {
        tracing::debug!(user_id = event.user_id, ?command, "command received");
        match command {
            BotCommand::Start => {
                let keyboard = if self.is_admin(event.user_id) {
                    admin_keyboard()
                } else {
                    welcome_keyboard()
                };
                self.reply(event.chat_id, &t!("commands.start"), Some(&keyboard))
                    .await;
            }
            BotCommand::Help => self.send_help(event.chat_id).await,
            BotCommand::Stats => self.send_stats(event.chat_id, event.user_id).await,
        }
        Outcome::Command(command)
    }

    async fn handle_callback(&self, event: &CallbackEvent) -> Outcome {
        if let Err(error) = self.transport.answer_callback(&event.callback_id).await {
            tracing::warn!(callback_id = %event.callback_id, %error, "failed to acknowledge callback");
        }

        let action = CallbackAction::parse(&event.data);
        match &action {
            CallbackAction::Help => self.send_help(event.chat_id).await,
            CallbackAction::Stats => self.send_stats(event.chat_id, event.user_id).await,
            CallbackAction::VerifyMembership => {
                if self.gate.check(event.user_id).await {
                    self.reply(event.chat_id, &t!("membership.verified"), None)
                        .await;
                } else {
                    let keyboard = verify_keyboard();
                    let text = t!("membership.denied", channel = self.gate.required_channel());
                    self.reply(event.chat_id, &text, Some(&keyboard)).await;
                }
            }
            CallbackAction::Unknown(data) => {
                tracing::warn!(user_id = event.user_id, data = %data, "unknown callback action");
                self.reply(event.chat_id, &t!("callbacks.unknown", action = data), None)
                    .await;
            }
        }
        Outcome::Callback(action)
    }

    async fn send_help(&self, chat_id: i64) {
        let text = t!(
            "commands.help",
            providers = provider_list(self.classifier.providers()),
            limit = self.policy.inline_limit_bytes() / (1_024 * 1_024)
        );
        self.reply(chat_id, &text, None).await;
    }

    async fn send_stats(&self, chat_id: i64, user_id: i64) {
        if !self.is_admin(user_id) {
            self.reply(chat_id, &t!("commands.not_permitted"), None).await;
            return;
        }
        let snapshot = self.stats.snapshot();
        let text = t!(
            "commands.stats",
            requests = snapshot.requests,
            delivered = snapshot.delivered,
            retained = snapshot.retained,
            failed = snapshot.failed,
            rejected = snapshot.rejected,
            members = self.gate.cached_members()
        );
        self.reply(chat_id, &text, None).await;
    }

    fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id == Some(user_id)
    }

    async fn reply(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) {
        if let Err(error) = self.transport.send_text(chat_id, text, keyboard).await {
            tracing::warn!(chat_id, error = %format!("{error:#}"), "failed to send reply");
        }
    }
}

async fn step(reporter: &mut StatusReporter, request_id: Uuid, stage: Stage, text: &str) {
    if let Err(error) = reporter.advance(stage, text).await {
        log_status_error(request_id, &error);
    }
}

fn log_status_error(request_id: Uuid, error: &StatusError) {
    tracing::error!(%request_id, %error, "status message transition refused");
}
