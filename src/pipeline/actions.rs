use crate::transport::{InlineButton, InlineKeyboard};

/// Slash commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Stats,
}

pub fn parse_command(input: &str) -> Option<BotCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let head = trimmed.split_whitespace().next()?;
    // Group chats address commands as `/cmd@botname`.
    let cmd = head.split('@').next().unwrap_or(head).to_lowercase();

    match cmd.as_str() {
        "/start" => Some(BotCommand::Start),
        "/help" | "/?" => Some(BotCommand::Help),
        "/stats" => Some(BotCommand::Stats),
        _ => None,
    }
}

/// Inline-button actions. Unrecognised callback data is kept so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Help,
    VerifyMembership,
    Stats,
    Unknown(String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Self {
        match data.trim() {
            "help" => Self::Help,
            "verify_membership" => Self::VerifyMembership,
            "stats" => Self::Stats,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_data(&self) -> &str {
        match self {
            Self::Help => "help",
            Self::VerifyMembership => "verify_membership",
            Self::Stats => "stats",
            Self::Unknown(data) => data,
        }
    }

    fn button(&self, label: impl Into<String>) -> InlineButton {
        InlineButton::new(label, self.as_data())
    }
}

pub(crate) fn welcome_keyboard() -> InlineKeyboard {
    InlineKeyboard::single_row(vec![
        CallbackAction::Help.button(t!("buttons.help")),
        CallbackAction::VerifyMembership.button(t!("buttons.verify")),
    ])
}

pub(crate) fn verify_keyboard() -> InlineKeyboard {
    InlineKeyboard::single_row(vec![
        CallbackAction::VerifyMembership.button(t!("buttons.verify")),
    ])
}

pub(crate) fn admin_keyboard() -> InlineKeyboard {
    InlineKeyboard::single_row(vec![
        CallbackAction::Help.button(t!("buttons.help")),
        CallbackAction::Stats.button(t!("buttons.stats")),
    ])
}
