//! Tag resolution service.

use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cqcode::config::ResolverConfig;
use crate::cqcode::domain::{
    CqTag, IncomingMessage, MessageContent, ReplyContext, ResolvedMessage, TEXT_KIND,
};
use crate::cqcode::ports::{ContentResolver, IdentityDirectory};

use super::handlers::{
    FaceHandler, ForwardHandler, ImageHandler, KindHandler, MentionHandler, ReplyHandler,
    ResolveScope, TextHandler,
};

/// Resolves tags, and whole messages, into plain text.
///
/// Kinds dispatch through a registry of [`KindHandler`]s; a kind without a
/// handler renders as `[{kind}]`. The built-in registry covers `text`,
/// `image`, `at` (also registered as `mention`), `face`, `reply` and
/// `forward`, and [`TagResolver::with_handler`] adds or replaces entries.
///
/// Resolution is total. Every failure inside a tag becomes that tag's
/// placeholder and never affects sibling tags.
///
/// Cloning is cheap; clones share the registry.
#[derive(Clone)]
pub struct TagResolver {
    handlers: Arc<HashMap<String, Arc<dyn KindHandler>>>,
    config: Arc<ResolverConfig>,
}

impl TagResolver {
    /// Creates a resolver with the built-in handlers.
    #[must_use]
    pub fn new<C, I>(content: Arc<C>, identity: Arc<I>, config: ResolverConfig) -> Self
    where
        C: ContentResolver + 'static,
        I: IdentityDirectory + 'static,
    {
        let mention: Arc<dyn KindHandler> = Arc::new(MentionHandler::new(identity));
        let mut handlers: HashMap<String, Arc<dyn KindHandler>> = HashMap::new();
        handlers.insert(TEXT_KIND.to_owned(), Arc::new(TextHandler));
        handlers.insert("image".to_owned(), Arc::new(ImageHandler::new(content)));
        handlers.insert("at".to_owned(), Arc::clone(&mention));
        handlers.insert("mention".to_owned(), mention);
        handlers.insert("face".to_owned(), Arc::new(FaceHandler));
        handlers.insert(
            "reply".to_owned(),
            Arc::new(ReplyHandler::new(config.self_identity.clone())),
        );
        handlers.insert(
            "forward".to_owned(),
            Arc::new(ForwardHandler::new(config.forward_depth_limit)),
        );

        Self {
            handlers: Arc::new(handlers),
            config: Arc::new(config),
        }
    }

    /// Creates a resolver with no handlers other than the text passthrough.
    #[must_use]
    pub fn bare(config: ResolverConfig) -> Self {
        let mut handlers: HashMap<String, Arc<dyn KindHandler>> = HashMap::new();
        handlers.insert(TEXT_KIND.to_owned(), Arc::new(TextHandler));
        Self {
            handlers: Arc::new(handlers),
            config: Arc::new(config),
        }
    }

    /// Registers `handler` for `kind`, replacing any existing handler.
    #[must_use]
    pub fn with_handler(
        mut self,
        kind: impl Into<String>,
        handler: impl KindHandler + 'static,
    ) -> Self {
        Arc::make_mut(&mut self.handlers).insert(kind.into(), Arc::new(handler));
        self
    }

    /// Returns the resolver policy.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns `true` when `kind` has a registered handler.
    #[must_use]
    pub fn handles(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Resolves one tag at nesting `depth` (0 for a top-level message).
    pub async fn resolve(&self, tag: &CqTag, depth: usize) -> String {
        let Some(handler) = self.handlers.get(tag.kind()) else {
            tracing::debug!(
                kind = tag.kind(),
                "no handler registered; using generic placeholder"
            );
            return format!("[{}]", tag.kind());
        };
        handler.resolve(tag, &ResolveScope::new(self, depth)).await
    }

    /// Resolves every tag of `content`, in order, at nesting `depth`.
    ///
    /// `reply` is attached to `reply` tags.
    pub async fn resolve_content(
        &self,
        content: &MessageContent,
        reply: Option<&ReplyContext>,
        depth: usize,
    ) -> Vec<String> {
        let tags = content.tags();
        let mut segments = Vec::with_capacity(tags.len());
        for tag in tags {
            let attached = match reply {
                Some(context) if tag.kind() == "reply" => tag.with_context(context.clone()),
                _ => tag,
            };
            segments.push(self.resolve(&attached, depth).await);
        }
        segments
    }

    /// Resolves `content` and concatenates the segments.
    pub async fn resolve_text(
        &self,
        content: &MessageContent,
        reply: Option<&ReplyContext>,
        depth: usize,
    ) -> String {
        self.resolve_content(content, reply, depth).await.concat()
    }

    /// Resolves a top-level message, stamping the result with `clock`.
    pub async fn resolve_message<C>(
        &self,
        incoming: &IncomingMessage,
        clock: &C,
    ) -> ResolvedMessage
    where
        C: Clock + Sync,
    {
        let segments = self
            .resolve_content(&incoming.content, incoming.reply.as_ref(), 0)
            .await;
        ResolvedMessage::new(incoming, segments, clock)
    }
}
