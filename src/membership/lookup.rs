use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use strum::Display;

/// A user's role in the required channel as reported by the chat service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberRole {
    /// Map a Bot API `ChatMember.status` string.
    #[must_use]
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "creator" => Some(Self::Owner),
            "administrator" => Some(Self::Administrator),
            "member" => Some(Self::Member),
            "restricted" => Some(Self::Restricted),
            "left" => Some(Self::Left),
            "kicked" => Some(Self::Banned),
            _ => None,
        }
    }

    /// Only full members, admins and the owner pass the gate.
    #[must_use]
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::Owner | Self::Administrator | Self::Member)
    }
}

/// Live membership query against the external chat service.
pub trait MembershipLookup: Send + Sync {
    fn get_membership<'a>(
        &'a self,
        channel: &'a str,
        user_id: i64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<MemberRole>> + Send + 'a>>;
}
