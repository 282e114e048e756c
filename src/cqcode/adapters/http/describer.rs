//! Image description over an OpenAI-compatible chat-completions API.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::cqcode::config::DescriberConfig;
use crate::cqcode::domain::PromptProfile;
use crate::cqcode::ports::{DescribeError, DescribeResult, FetchedImage, ImageDescriber};

/// [`ImageDescriber`] that sends the image inline to a vision model.
#[derive(Debug, Clone)]
pub struct ChatCompletionsDescriber {
    client: Client,
    config: DescriberConfig,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsDescriber {
    /// Builds a describer from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DescribeError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(config: DescriberConfig) -> DescribeResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|error| DescribeError::Transport(error.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageDescriber for ChatCompletionsDescriber {
    async fn describe(
        &self,
        image: &FetchedImage,
        profile: PromptProfile,
    ) -> DescribeResult<String> {
        let body = completion_request(&self.config.model, image, profile);
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    DescribeError::Timeout
                } else {
                    DescribeError::Transport(error.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DescribeError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|error| DescribeError::MalformedResponse(error.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or(DescribeError::EmptyDescription)
    }
}

fn completion_request(model: &str, image: &FetchedImage, profile: PromptProfile) -> Value {
    let data_url = format!(
        "data:{};base64,{}",
        image.content_type,
        STANDARD.encode(&image.bytes)
    );
    json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": profile.prompt() },
                { "type": "image_url", "image_url": { "url": data_url } },
            ],
        }],
        "max_tokens": profile.max_tokens(),
        "temperature": profile.temperature(),
    })
}
