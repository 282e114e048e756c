//! HTTP image retrieval.

use async_trait::async_trait;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue,
};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::cqcode::config::FetcherConfig;
use crate::cqcode::ports::{FetchError, FetchResult, FetchedImage, ImageFetcher};

use super::tls;

/// Host of the chat platform's media CDN; it answers 400 for expired links.
const MEDIA_CDN_HOST: &str = "multimedia.nt.qq.com.cn";

/// [`ImageFetcher`] that downloads over HTTP with browser-like headers.
///
/// Connections are pinned to TLS 1.2 and two ECDHE AES-128-GCM suites,
/// which the media CDN negotiates most reliably. Transport failures are retried up to the configured attempt
/// count; status errors are returned immediately.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
    max_attempts: u32,
}

impl HttpImageFetcher {
    /// Builds a fetcher from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] when the TLS backend rejects the
    /// client settings.
    pub fn new(config: &FetcherConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .use_preconfigured_tls(tls::client_config(config.accept_invalid_certs)?)
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(browser_headers())
            .build()
            .map_err(|error| FetchError::Client(error.to_string()))?;
        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
        })
    }

    async fn send_with_retries(&self, url: &str) -> FetchResult<Response> {
        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.client.get(url).send().await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    tracing::debug!(attempt, url, %error, "image request failed");
                    last_error = Some(error);
                }
            }
        }
        Err(match last_error {
            Some(error) if error.is_timeout() => FetchError::Timeout,
            Some(error) => FetchError::Transport {
                attempts: self.max_attempts,
                reason: error.to_string(),
            },
            None => FetchError::Transport {
                attempts: 0,
                reason: "no request was attempted".to_owned(),
            },
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedImage> {
        let response = self.send_with_retries(url).await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST && is_media_cdn(url) {
            return Err(FetchError::ExpiredMedia);
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        if !content_type.starts_with("image/") {
            return Err(FetchError::NotAnImage { content_type });
        }

        let bytes = response.bytes().await.map_err(|error| FetchError::Transport {
            attempts: 1,
            reason: error.to_string(),
        })?;
        tracing::debug!(url, size = bytes.len(), %content_type, "image fetched");
        Ok(FetchedImage::new(bytes.to_vec(), content_type))
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html, application/xhtml+xml, image/*, */*"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

fn is_media_cdn(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .is_some_and(|parsed| parsed.host_str() == Some(MEDIA_CDN_HOST))
}
