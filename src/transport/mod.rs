pub(crate) mod health;
pub(crate) mod runtime;
pub mod telegram;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use telegram::TelegramChannel;
pub use traits::{
    CallbackEvent, ChatTransport, InboundEvent, InlineButton, InlineKeyboard, MessageHandle,
    TextEvent, TransportFuture,
};
