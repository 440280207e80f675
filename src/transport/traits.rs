use std::future::Future;
use std::path::Path;
use std::pin::Pin;

pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'a>>;

/// Address of a message the bot has sent, used for later edits and deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub chat_id: i64,
    pub message_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Rows of callback buttons attached under a sent message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn single_row(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: vec![buttons],
        }
    }

    pub fn to_reply_markup(&self) -> serde_json::Value {
        let rows: Vec<Vec<serde_json::Value>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| {
                        serde_json::json!({
                            "text": button.label,
                            "callback_data": button.data,
                        })
                    })
                    .collect()
            })
            .collect();
        serde_json::json!({ "inline_keyboard": rows })
    }
}

/// A text message received from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEvent {
    pub user_id: i64,
    pub chat_id: i64,
    pub message_id: i64,
    pub username: Option<String>,
    pub text: String,
}

/// A button press on an inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    pub callback_id: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub message_id: Option<i64>,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Text(TextEvent),
    Callback(CallbackEvent),
}

impl InboundEvent {
    #[must_use]
    pub fn user_id(&self) -> i64 {
        match self {
            Self::Text(event) => event.user_id,
            Self::Callback(event) => event.user_id,
        }
    }

    #[must_use]
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Text(event) => event.chat_id,
            Self::Callback(event) => event.chat_id,
        }
    }
}

/// Core transport trait, implemented once per chat platform
pub trait ChatTransport: Send + Sync {
    /// Human-readable transport name
    fn name(&self) -> &str;

    /// Send a text message, optionally with an inline keyboard
    fn send_text<'a>(
        &'a self,
        chat_id: i64,
        text: &'a str,
        keyboard: Option<&'a InlineKeyboard>,
    ) -> TransportFuture<'a, MessageHandle>;

    /// Replace the full text of a previously sent message
    fn edit_text<'a>(&'a self, handle: &'a MessageHandle, text: &'a str) -> TransportFuture<'a, ()>;

    fn delete_message<'a>(&'a self, handle: &'a MessageHandle) -> TransportFuture<'a, ()>;

    /// Upload a local file with a caption
    fn send_file<'a>(
        &'a self,
        chat_id: i64,
        path: &'a Path,
        caption: &'a str,
    ) -> TransportFuture<'a, ()>;

    fn answer_callback<'a>(&'a self, _callback_id: &'a str) -> TransportFuture<'a, ()> {
        Box::pin(async move { Ok(()) })
    }

    /// Start listening for inbound events (long-running)
    fn listen<'a>(
        &'a self,
        tx: tokio::sync::mpsc::Sender<InboundEvent>,
    ) -> TransportFuture<'a, ()>;
}
