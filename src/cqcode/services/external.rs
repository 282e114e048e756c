//! Composed image description: fetch, then describe.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::timeout;
use url::Url;

use crate::cqcode::config::ExternalContentConfig;
use crate::cqcode::domain::PromptProfile;
use crate::cqcode::ports::{
    ContentResolver, DescribeError, ExternalResolutionResult, FetchError, ImageDescriber,
    ImageFetcher,
};

/// [`ContentResolver`] that chains an [`ImageFetcher`] and an
/// [`ImageDescriber`].
///
/// Each step runs under its own time budget; an expired budget is reported
/// like any other failure of that step. Only `http` and `https` URLs are
/// fetched. Descriptions are trimmed and clipped to the profile's
/// character budget.
#[derive(Clone)]
pub struct ExternalContentService<F, D>
where
    F: ImageFetcher,
    D: ImageDescriber,
{
    fetcher: Arc<F>,
    describer: Arc<D>,
    config: ExternalContentConfig,
}

impl<F, D> ExternalContentService<F, D>
where
    F: ImageFetcher,
    D: ImageDescriber,
{
    /// Creates a service over the given collaborators.
    #[must_use]
    pub const fn new(fetcher: Arc<F>, describer: Arc<D>, config: ExternalContentConfig) -> Self {
        Self {
            fetcher,
            describer,
            config,
        }
    }
}

#[async_trait]
impl<F, D> ContentResolver for ExternalContentService<F, D>
where
    F: ImageFetcher,
    D: ImageDescriber,
{
    async fn describe_url(
        &self,
        url: &str,
        profile: PromptProfile,
    ) -> ExternalResolutionResult<String> {
        let target = fetchable_url(url)?;

        let image = timeout(self.config.fetch_timeout(), self.fetcher.fetch(target.as_str()))
            .await
            .map_err(|_| FetchError::Timeout)??;

        let description = timeout(
            self.config.describe_timeout(),
            self.describer.describe(&image, profile),
        )
        .await
        .map_err(|_| DescribeError::Timeout)??;

        let clipped = clip(description.trim(), profile.max_chars());
        if clipped.is_empty() {
            return Err(DescribeError::EmptyDescription.into());
        }
        tracing::debug!(%profile, url = target.as_str(), "image described");
        Ok(clipped)
    }
}

fn fetchable_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url.trim())
        .ok()
        .filter(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .ok_or_else(|| FetchError::UnsupportedUrl(url.to_owned()))
}

fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
