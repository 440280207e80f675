use super::lookup::MembershipLookup;
use super::store::MembershipStore;
use crate::error::PipelineError;
use std::sync::Arc;

/// Authorization check against the required channel.
///
/// A positive answer is cached for the life of the store; negative answers
/// and lookup failures are not, so the user is checked again next time.
/// Lookup failures deny access.
pub struct MembershipGate {
    store: Arc<dyn MembershipStore>,
    lookup: Arc<dyn MembershipLookup>,
    required_channel: String,
}

impl MembershipGate {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        lookup: Arc<dyn MembershipLookup>,
        required_channel: impl Into<String>,
    ) -> Self {
        Self {
            store,
            lookup,
            required_channel: required_channel.into(),
        }
    }

    #[must_use]
    pub fn required_channel(&self) -> &str {
        &self.required_channel
    }

    #[must_use]
    pub fn cached_members(&self) -> usize {
        self.store.size()
    }

    pub async fn check(&self, user_id: i64) -> bool {
        self.verify(user_id).await.is_ok()
    }

    /// Like [`check`](Self::check) but keeps the reason for a denial.
    pub async fn verify(&self, user_id: i64) -> Result<(), PipelineError> {
        if self.store.contains(user_id) {
            return Ok(());
        }

        match self
            .lookup
            .get_membership(&self.required_channel, user_id)
            .await
        {
            Ok(role) if role.is_authorized() => {
                self.store.add(user_id);
                tracing::info!(user_id, %role, "membership verified and cached");
                Ok(())
            }
            Ok(role) => {
                tracing::debug!(user_id, %role, "membership check negative");
                Err(PipelineError::Unauthorized { user_id })
            }
            Err(error) => {
                tracing::warn!(
                    user_id,
                    channel = %self.required_channel,
                    error = %format!("{error:#}"),
                    "membership lookup failed; denying access"
                );
                Err(PipelineError::MembershipLookup(error.to_string()))
            }
        }
    }
}
