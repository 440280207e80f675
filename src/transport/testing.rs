use super::traits::{ChatTransport, InboundEvent, InlineKeyboard, MessageHandle, TransportFuture};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportCall {
    SendText {
        chat_id: i64,
        text: String,
        with_keyboard: bool,
    },
    Edit {
        handle: MessageHandle,
        text: String,
    },
    Delete {
        handle: MessageHandle,
    },
    SendFile {
        chat_id: i64,
        path: PathBuf,
        caption: String,
    },
    AnswerCallback {
        callback_id: String,
    },
}

/// In-memory transport that records every outbound call.
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
    next_message_id: AtomicI64,
    fail_edits: AtomicBool,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_message_id: AtomicI64::new(100),
            fail_edits: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn edits_for(&self, handle: MessageHandle) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Edit { handle: h, text } if h == handle => Some(text),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::SendText { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: TransportCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ChatTransport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    fn send_text<'a>(
        &'a self,
        chat_id: i64,
        text: &'a str,
        keyboard: Option<&'a InlineKeyboard>,
    ) -> TransportFuture<'a, MessageHandle> {
        Box::pin(async move {
            self.record(TransportCall::SendText {
                chat_id,
                text: text.to_string(),
                with_keyboard: keyboard.is_some(),
            });
            Ok(MessageHandle {
                chat_id,
                message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            })
        })
    }

    fn edit_text<'a>(&'a self, handle: &'a MessageHandle, text: &'a str) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            self.record(TransportCall::Edit {
                handle: *handle,
                text: text.to_string(),
            });
            if self.fail_edits.load(Ordering::SeqCst) {
                anyhow::bail!("edit rejected");
            }
            Ok(())
        })
    }

    fn delete_message<'a>(&'a self, handle: &'a MessageHandle) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            self.record(TransportCall::Delete { handle: *handle });
            Ok(())
        })
    }

    fn send_file<'a>(
        &'a self,
        chat_id: i64,
        path: &'a Path,
        caption: &'a str,
    ) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            self.record(TransportCall::SendFile {
                chat_id,
                path: path.to_path_buf(),
                caption: caption.to_string(),
            });
            Ok(())
        })
    }

    fn answer_callback<'a>(&'a self, callback_id: &'a str) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            self.record(TransportCall::AnswerCallback {
                callback_id: callback_id.to_string(),
            });
            Ok(())
        })
    }

    fn listen<'a>(
        &'a self,
        _tx: tokio::sync::mpsc::Sender<InboundEvent>,
    ) -> TransportFuture<'a, ()> {
        Box::pin(async move { Ok(()) })
    }
}
