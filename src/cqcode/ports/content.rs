//! External content ports: image retrieval and image description.
//!
//! Resolving an image tag takes two collaborator calls: fetch the bytes
//! behind the URL, then ask a description service what they show. Each step
//! reports failure as a typed error; the composed [`ContentResolver`] port
//! returns a `Result` the tag resolver branches on to pick its placeholder.

use async_trait::async_trait;
use thiserror::Error;

use crate::cqcode::domain::PromptProfile;

/// Result type for image retrieval.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for image description.
pub type DescribeResult<T> = Result<T, DescribeError>;

/// Result type for composed URL description.
pub type ExternalResolutionResult<T> = Result<T, ExternalResolutionError>;

/// Image bytes together with the content type the server declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// Declared MIME type, e.g. `image/png`.
    pub content_type: String,
}

impl FetchedImage {
    /// Creates a fetched image.
    #[must_use]
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }
}

/// Port for retrieving image bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads the image at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, a non-success status,
    /// or a response that is not an image.
    async fn fetch(&self, url: &str) -> FetchResult<FetchedImage>;
}

/// Port for describing an image in natural language.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    /// Requests a short description of `image` using `profile`'s prompt.
    ///
    /// # Errors
    ///
    /// Returns [`DescribeError`] when the service rejects the request or
    /// answers with a body that carries no description.
    async fn describe(
        &self,
        image: &FetchedImage,
        profile: PromptProfile,
    ) -> DescribeResult<String>;
}

/// Port that turns an image URL into a description.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Fetches the image at `url` and describes it.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalResolutionError`] when either step fails.
    async fn describe_url(
        &self,
        url: &str,
        profile: PromptProfile,
    ) -> ExternalResolutionResult<String>;
}

/// Errors retrieving image bytes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The URL is unparseable or not `http`/`https`.
    #[error("unsupported image URL '{0}'")]
    UnsupportedUrl(String),

    /// The request failed at the transport level after every retry.
    #[error("image request failed after {attempts} attempt(s): {reason}")]
    Transport {
        /// Attempts made.
        attempts: u32,
        /// Last transport error.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("image request returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The media CDN rejected an expired download link.
    #[error("image link has expired")]
    ExpiredMedia,

    /// The response is not an image.
    #[error("response content type '{content_type}' is not an image")]
    NotAnImage {
        /// Declared content type.
        content_type: String,
    },

    /// The request did not complete in time.
    #[error("image request timed out")]
    Timeout,

    /// The HTTP client could not be built.
    #[error("image client unavailable: {0}")]
    Client(String),
}

/// Errors describing an image.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescribeError {
    /// The service answered with a non-success status.
    #[error("description service returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The request failed at the transport level.
    #[error("description request failed: {0}")]
    Transport(String),

    /// The response body does not have the expected shape.
    #[error("malformed description response: {0}")]
    MalformedResponse(String),

    /// The service returned an empty description.
    #[error("description service returned no text")]
    EmptyDescription,

    /// The request did not complete in time.
    #[error("description request timed out")]
    Timeout,
}

/// Failure of either step of URL description.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExternalResolutionError {
    /// Retrieval failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Description failed.
    #[error(transparent)]
    Describe(#[from] DescribeError),
}
