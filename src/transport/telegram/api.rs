use super::TelegramChannel;
use super::updates::parse_update;
use crate::membership::{MemberRole, MembershipLookup};
use crate::transport::traits::{
    ChatTransport, InboundEvent, InlineKeyboard, MessageHandle, TransportFuture,
};
use anyhow::Context;
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::Ordering;

/// Upload method and form field for a file, chosen by extension.
pub(crate) fn upload_method(path: &Path) -> (&'static str, &'static str) {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "mov" | "mkv" | "webm" | "avi" => ("sendVideo", "video"),
        "mp3" | "m4a" | "ogg" | "opus" | "wav" | "flac" => ("sendAudio", "audio"),
        "jpg" | "jpeg" | "png" | "webp" => ("sendPhoto", "photo"),
        _ => ("sendDocument", "document"),
    }
}

fn api_error(method: &str, status: reqwest::StatusCode, body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).unwrap_or_default();
    if status.is_success() && parsed.get("ok") != Some(&Value::Bool(false)) {
        return None;
    }
    let description = parsed
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or(body);
    Some(format!("Telegram {method} failed ({status}): {description}"))
}

impl TelegramChannel {
    /// POST a JSON body to a Bot API method and return its `result` field.
    async fn call(&self, method: &str, body: Value) -> anyhow::Result<Value> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("send Telegram {method} request"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));

        if let Some(err) = api_error(method, status, &text) {
            anyhow::bail!(err);
        }

        let parsed: Value = serde_json::from_str(&text)
            .with_context(|| format!("parse Telegram {method} response"))?;
        Ok(parsed.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn upload(&self, chat_id: i64, path: &Path, caption: &str) -> anyhow::Result<()> {
        let (method, field) = upload_method(path);
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("open {} for upload", path.display()))?;
        let length = file
            .metadata()
            .await
            .with_context(|| format!("stat {}", path.display()))?
            .len();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        let body = reqwest::Body::wrap_stream(tokio_util::io::ReaderStream::new(file));
        let part = reqwest::multipart::Part::stream_with_length(body, length).file_name(filename);
        let mut form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part(field, part);
        if field == "video" {
            form = form.text("supports_streaming", "true");
        }

        tracing::debug!(chat_id, method, bytes = length, path = %path.display(), "uploading file");
        let resp = self
            .client
            .post(self.api_url(method))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("send Telegram {method} request"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));

        if let Some(err) = api_error(method, status, &text) {
            anyhow::bail!(err);
        }
        Ok(())
    }

    async fn poll_updates(&self, tx: tokio::sync::mpsc::Sender<InboundEvent>) -> anyhow::Result<()> {
        let mut offset = self.next_update_offset();
        if offset > 0 {
            tracing::info!(offset, "resuming Telegram updates after restart");
        } else {
            tracing::info!("Telegram channel listening for messages...");
        }

        loop {
            if tx.is_closed() {
                return Ok(());
            }

            let body = serde_json::json!({
                "offset": offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": ["message", "callback_query"]
            });

            let updates = match self.call("getUpdates", body).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Telegram poll error: {e:#}");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }
            };

            let Some(results) = updates.as_array() else {
                continue;
            };

            for update in results {
                if let Some(uid) = update.get("update_id").and_then(Value::as_i64) {
                    offset = uid + 1;
                    // Kept on the channel; a restarted listener resumes from here.
                    self.offset.store(offset, Ordering::SeqCst);
                }

                let Some(event) = parse_update(update) else {
                    continue;
                };

                if tx.send(event).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    /// Resolve the bot's own username via `getMe`.
    pub async fn get_me(&self) -> anyhow::Result<String> {
        let result = self.call("getMe", serde_json::json!({})).await?;
        Ok(result
            .get("username")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}

impl ChatTransport for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send_text<'a>(
        &'a self,
        chat_id: i64,
        text: &'a str,
        keyboard: Option<&'a InlineKeyboard>,
    ) -> TransportFuture<'a, MessageHandle> {
        Box::pin(async move {
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": text,
            });
            if let Some(keyboard) = keyboard {
                body["reply_markup"] = keyboard.to_reply_markup();
            }

            let result = self.call("sendMessage", body).await?;
            let message_id = result
                .get("message_id")
                .and_then(Value::as_i64)
                .context("Telegram sendMessage returned no message_id")?;
            Ok(MessageHandle {
                chat_id,
                message_id,
            })
        })
    }

    fn edit_text<'a>(&'a self, handle: &'a MessageHandle, text: &'a str) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let body = serde_json::json!({
                "chat_id": handle.chat_id,
                "message_id": handle.message_id,
                "text": text,
            });
            match self.call("editMessageText", body).await {
                Ok(_) => Ok(()),
                // Re-sending identical text is not a failure.
                Err(e) if e.to_string().contains("message is not modified") => Ok(()),
                Err(e) => Err(e),
            }
        })
    }

    fn delete_message<'a>(&'a self, handle: &'a MessageHandle) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let body = serde_json::json!({
                "chat_id": handle.chat_id,
                "message_id": handle.message_id,
            });
            self.call("deleteMessage", body).await.map(|_| ())
        })
    }

    fn send_file<'a>(
        &'a self,
        chat_id: i64,
        path: &'a Path,
        caption: &'a str,
    ) -> TransportFuture<'a, ()> {
        Box::pin(self.upload(chat_id, path, caption))
    }

    fn answer_callback<'a>(&'a self, callback_id: &'a str) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            let body = serde_json::json!({ "callback_query_id": callback_id });
            self.call("answerCallbackQuery", body).await.map(|_| ())
        })
    }

    fn listen<'a>(
        &'a self,
        tx: tokio::sync::mpsc::Sender<InboundEvent>,
    ) -> TransportFuture<'a, ()> {
        Box::pin(self.poll_updates(tx))
    }
}

impl MembershipLookup for TelegramChannel {
    fn get_membership<'a>(
        &'a self,
        channel: &'a str,
        user_id: i64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<MemberRole>> + Send + 'a>> {
        Box::pin(async move {
            let body = serde_json::json!({
                "chat_id": channel,
                "user_id": user_id,
            });
            let result = self.call("getChatMember", body).await?;
            let status = result
                .get("status")
                .and_then(Value::as_str)
                .context("Telegram getChatMember returned no status")?;
            MemberRole::from_status(status)
                .with_context(|| format!("unknown chat member status: {status}"))
        })
    }
}
