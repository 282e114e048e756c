//! Per-kind resolution strategies.
//!
//! Each tag kind maps to one [`KindHandler`] in the resolver's registry.
//! Handlers that pull in nested messages (reply, forward) recurse through
//! [`ResolveScope::resolve_nested`], which threads the depth counter.

mod forward;
mod literal;
mod media;
mod mention;
mod reply;

use async_trait::async_trait;

use crate::cqcode::domain::{CqTag, MessageContent};

use super::TagResolver;

pub use forward::ForwardHandler;
pub use literal::{FaceHandler, TextHandler};
pub use media::ImageHandler;
pub use mention::MentionHandler;
pub use reply::ReplyHandler;

/// Rendering of a forward tag that is not expanded.
pub const FORWARD_PLACEHOLDER: &str = "[forward message]";
/// Rendering of a reply whose referenced message is unavailable.
pub const REPLY_PLACEHOLDER: &str = "[reply to someone]";
/// Rendering of a built-in face.
pub const FACE_PLACEHOLDER: &str = "[emoji]";
/// Rendering of a forwarded entry without content.
pub const EMPTY_MESSAGE_PLACEHOLDER: &str = "[empty message]";

/// Strategy that renders one tag kind as text.
///
/// Handlers are total: every failure path returns a placeholder string.
#[async_trait]
pub trait KindHandler: Send + Sync {
    /// Renders `tag` within `scope`.
    async fn resolve(&self, tag: &CqTag, scope: &ResolveScope<'_>) -> String;
}

/// Where in a nested resolution a tag is being rendered.
#[derive(Clone, Copy)]
pub struct ResolveScope<'a> {
    resolver: &'a TagResolver,
    depth: usize,
}

impl<'a> ResolveScope<'a> {
    pub(crate) const fn new(resolver: &'a TagResolver, depth: usize) -> Self {
        Self { resolver, depth }
    }

    /// Nesting depth; 0 for the top-level message.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Resolves a referenced or forwarded message one level deeper.
    ///
    /// Nested messages carry no reply context of their own.
    pub async fn resolve_nested(&self, content: &MessageContent) -> String {
        self.resolver
            .resolve_text(content, None, self.depth.saturating_add(1))
            .await
    }
}
