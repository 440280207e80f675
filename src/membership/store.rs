use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// Set of users known to satisfy the membership requirement.
///
/// Entries are only ever added. Absence means "unknown", not "denied".
pub trait MembershipStore: Send + Sync {
    fn contains(&self, user_id: i64) -> bool;

    /// Record a verified user. Returns `true` if the user was not already present.
    fn add(&self, user_id: i64) -> bool;

    fn size(&self) -> usize;
}

/// Process-lifetime store. Verified users stay trusted until restart.
#[derive(Debug, Default)]
pub struct InMemoryMembershipStore {
    verified: RwLock<HashSet<i64>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        Self {
            verified: RwLock::new(users.into_iter().collect()),
        }
    }
}

impl MembershipStore for InMemoryMembershipStore {
    fn contains(&self, user_id: i64) -> bool {
        self.verified
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&user_id)
    }

    fn add(&self, user_id: i64) -> bool {
        self.verified
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id)
    }

    fn size(&self) -> usize {
        self.verified
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
