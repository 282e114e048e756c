//! Identity directory port used to resolve mentions.

use async_trait::async_trait;

use crate::cqcode::domain::UserId;

/// Port for looking up display names of chat users.
///
/// Implementations never fail: when a user is unknown or the backing store
/// is unreachable they return a displayable fallback, typically the numeric
/// id.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Returns the name to show for `user_id`.
    async fn display_name(&self, user_id: UserId) -> String;
}
