//! Reply handler.

use async_trait::async_trait;

use crate::cqcode::config::SelfIdentity;
use crate::cqcode::domain::CqTag;

use super::{KindHandler, REPLY_PLACEHOLDER, ResolveScope};

/// Renders a reply as `[reply to {name}: {referenced text}]`.
///
/// The referenced message is resolved one level deeper. Replies to the
/// bot's own messages use the configured self nickname.
#[derive(Debug, Clone)]
pub struct ReplyHandler {
    self_identity: SelfIdentity,
}

impl ReplyHandler {
    /// Creates a handler that recognises `self_identity`.
    #[must_use]
    pub const fn new(self_identity: SelfIdentity) -> Self {
        Self { self_identity }
    }
}

#[async_trait]
impl KindHandler for ReplyHandler {
    async fn resolve(&self, tag: &CqTag, scope: &ResolveScope<'_>) -> String {
        let Some(context) = tag.context().filter(|context| context.sender.user_id.is_known())
        else {
            return REPLY_PLACEHOLDER.to_owned();
        };

        let text = scope.resolve_nested(&context.content).await;
        let name = if context.sender.user_id == self.self_identity.user_id {
            self.self_identity.nickname.as_str()
        } else {
            context.sender.display_name()
        };
        format!("[reply to {name}: {text}]")
    }
}
