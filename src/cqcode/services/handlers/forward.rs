//! Forward-bundle handler.

use async_trait::async_trait;

use crate::cqcode::domain::{CqTag, ForwardBundle, ForwardEntry};

use super::{EMPTY_MESSAGE_PLACEHOLDER, FORWARD_PLACEHOLDER, KindHandler, ResolveScope};

/// Expands a forward bundle into one `{sender}: {text}` line per entry.
///
/// Bundles at or beyond the depth limit, and entries that themselves carry
/// a forward, render as the placeholder instead of recursing. A bundle
/// that does not decode renders as the placeholder as a whole.
#[derive(Debug, Clone, Copy)]
pub struct ForwardHandler {
    depth_limit: usize,
}

impl ForwardHandler {
    /// Creates a handler that expands bundles above `depth_limit`.
    #[must_use]
    pub const fn new(depth_limit: usize) -> Self {
        Self { depth_limit }
    }

    async fn render_entry(entry: &ForwardEntry, scope: &ResolveScope<'_>) -> String {
        let text = if entry.contains_forward() {
            FORWARD_PLACEHOLDER.to_owned()
        } else if let Some(content) = entry.content() {
            scope.resolve_nested(&content).await
        } else {
            EMPTY_MESSAGE_PLACEHOLDER.to_owned()
        };
        format!("{}: {text}", entry.sender_name())
    }
}

#[async_trait]
impl KindHandler for ForwardHandler {
    async fn resolve(&self, tag: &CqTag, scope: &ResolveScope<'_>) -> String {
        if scope.depth() >= self.depth_limit {
            tracing::debug!(depth = scope.depth(), "forward depth limit reached");
            return FORWARD_PLACEHOLDER.to_owned();
        }
        let Some(content) = tag.parameter("content") else {
            return FORWARD_PLACEHOLDER.to_owned();
        };
        let bundle = match ForwardBundle::decode(content) {
            Ok(bundle) => bundle,
            Err(error) => {
                tracing::warn!(%error, "forward bundle did not decode; using placeholder");
                return FORWARD_PLACEHOLDER.to_owned();
            }
        };

        let mut lines = Vec::with_capacity(bundle.entries().len());
        for entry in bundle.entries() {
            lines.push(Self::render_entry(entry, scope).await);
        }
        format!("[forward message:\n{}]", lines.join("\n"))
    }
}
