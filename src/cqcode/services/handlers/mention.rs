//! Mention handler.

use async_trait::async_trait;
use std::sync::Arc;

use crate::cqcode::domain::{CqTag, UserId};
use crate::cqcode::ports::IdentityDirectory;

use super::{KindHandler, ResolveScope};

const MENTION_ALL: &str = "all";

/// Renders mentions as `@name`, looking names up in an
/// [`IdentityDirectory`].
///
/// `qq=all` renders as `@everyone`; a missing or non-numeric id renders as
/// `@someone`.
#[derive(Clone)]
pub struct MentionHandler {
    identity: Arc<dyn IdentityDirectory>,
}

impl MentionHandler {
    /// Creates a handler backed by `identity`.
    #[must_use]
    pub const fn new(identity: Arc<dyn IdentityDirectory>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl KindHandler for MentionHandler {
    async fn resolve(&self, tag: &CqTag, _scope: &ResolveScope<'_>) -> String {
        let target = tag.parameter("qq").map(str::trim).unwrap_or_default();
        if target == MENTION_ALL {
            return "@everyone".to_owned();
        }
        match target.parse::<UserId>() {
            Ok(user_id) => format!("@{}", self.identity.display_name(user_id).await),
            Err(_) => "@someone".to_owned(),
        }
    }
}
