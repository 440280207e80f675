use crate::transport::traits::{CallbackEvent, InboundEvent, TextEvent};
use serde_json::Value;

/// Turn one `getUpdates` entry into an inbound event.
///
/// Updates without a sender, or messages without text, yield `None`.
pub fn parse_update(update: &Value) -> Option<InboundEvent> {
    if let Some(message) = update.get("message") {
        return parse_text_message(message).map(InboundEvent::Text);
    }
    if let Some(query) = update.get("callback_query") {
        return parse_callback_query(query).map(InboundEvent::Callback);
    }
    None
}

fn parse_text_message(message: &Value) -> Option<TextEvent> {
    let text = message.get("text").and_then(Value::as_str)?;
    let from = message.get("from")?;
    let user_id = from.get("id").and_then(Value::as_i64)?;
    let chat_id = message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)
        .unwrap_or(user_id);
    let message_id = message
        .get("message_id")
        .and_then(Value::as_i64)
        .unwrap_or_default();
    let username = from
        .get("username")
        .and_then(Value::as_str)
        .map(String::from);

    Some(TextEvent {
        user_id,
        chat_id,
        message_id,
        username,
        text: text.to_string(),
    })
}

fn parse_callback_query(query: &Value) -> Option<CallbackEvent> {
    let callback_id = query.get("id").and_then(Value::as_str)?;
    let user_id = query
        .get("from")
        .and_then(|f| f.get("id"))
        .and_then(Value::as_i64)?;
    let message = query.get("message");
    let chat_id = message
        .and_then(|m| m.get("chat"))
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)
        .unwrap_or(user_id);
    let message_id = message
        .and_then(|m| m.get("message_id"))
        .and_then(Value::as_i64);
    let data = query
        .get("data")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(CallbackEvent {
        callback_id: callback_id.to_string(),
        user_id,
        chat_id,
        message_id,
        data: data.to_string(),
    })
}
