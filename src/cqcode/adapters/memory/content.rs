//! Scripted content resolver.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cqcode::domain::PromptProfile;
use crate::cqcode::ports::{
    ContentResolver, ExternalResolutionError, ExternalResolutionResult, FetchError,
};

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, ExternalResolutionResult<String>>,
    delays: HashMap<String, Duration>,
    requests: Vec<(String, PromptProfile)>,
}

/// [`ContentResolver`] that answers from a fixed table.
///
/// URLs without a scripted answer fail with HTTP 404. Every request is
/// recorded so callers can assert which URLs were looked up.
#[derive(Debug, Clone, Default)]
pub struct StaticContentResolver {
    script: Arc<Mutex<Script>>,
}

impl StaticContentResolver {
    /// Creates a resolver with no scripted answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful description for `url`.
    #[must_use]
    pub fn with_description(
        self,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.script_response(url.into(), Ok(description.into()));
        self
    }

    /// Scripts a failure for `url`.
    #[must_use]
    pub fn with_failure(
        self,
        url: impl Into<String>,
        error: impl Into<ExternalResolutionError>,
    ) -> Self {
        self.script_response(url.into(), Err(error.into()));
        self
    }

    /// Delays every answer for `url` by `delay`.
    #[must_use]
    pub fn with_delay(self, url: impl Into<String>, delay: Duration) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.delays.insert(url.into(), delay);
        }
        self
    }

    /// Returns the URLs and profiles requested so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, PromptProfile)> {
        self.script
            .lock()
            .map(|script| script.requests.clone())
            .unwrap_or_default()
    }

    fn script_response(&self, url: String, response: ExternalResolutionResult<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.responses.insert(url, response);
        }
    }

    fn answer(
        &self,
        url: &str,
        profile: PromptProfile,
    ) -> (Option<Duration>, ExternalResolutionResult<String>) {
        let Ok(mut script) = self.script.lock() else {
            let poisoned = FetchError::Client("script lock poisoned".to_owned());
            return (None, Err(poisoned.into()));
        };
        script.requests.push((url.to_owned(), profile));
        let response = script
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::HttpStatus { status: 404 }.into()));
        (script.delays.get(url).copied(), response)
    }
}

#[async_trait]
impl ContentResolver for StaticContentResolver {
    async fn describe_url(
        &self,
        url: &str,
        profile: PromptProfile,
    ) -> ExternalResolutionResult<String> {
        let (delay, response) = self.answer(url, profile);
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        response
    }
}
