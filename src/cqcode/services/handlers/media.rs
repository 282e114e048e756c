//! Image and sticker handler.

use async_trait::async_trait;
use std::sync::Arc;

use crate::cqcode::domain::{CqTag, PromptProfile};
use crate::cqcode::ports::ContentResolver;

use super::{KindHandler, ResolveScope};

/// Describes images through a [`ContentResolver`].
///
/// `sub_type=0` marks a photo; anything else is treated as a sticker. A tag
/// without a URL, or a failed lookup, renders as the profile's placeholder.
#[derive(Clone)]
pub struct ImageHandler {
    content: Arc<dyn ContentResolver>,
}

impl ImageHandler {
    /// Creates a handler backed by `content`.
    #[must_use]
    pub const fn new(content: Arc<dyn ContentResolver>) -> Self {
        Self { content }
    }
}

#[async_trait]
impl KindHandler for ImageHandler {
    async fn resolve(&self, tag: &CqTag, _scope: &ResolveScope<'_>) -> String {
        let profile = PromptProfile::from_sub_type(tag.parameter("sub_type"));
        let Some(url) = tag.parameter("url").filter(|url| !url.is_empty()) else {
            tracing::debug!(%profile, "image tag has no url");
            return profile.placeholder().to_owned();
        };

        match self.content.describe_url(url, profile).await {
            Ok(description) => profile.render(&description),
            Err(error) => {
                tracing::warn!(%profile, url, %error, "image description failed; using placeholder");
                profile.placeholder().to_owned()
            }
        }
    }
}
