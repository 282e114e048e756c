//! Configuration for the resolver and its external collaborators.
//!
//! Every struct deserialises with defaults for missing fields, so a JSON
//! file only needs to name what it changes. Environment variables override
//! file values.
//!
//! # Examples
//!
//! ```
//! use cqtext::cqcode::config::AppConfig;
//!
//! let config = AppConfig::from_lookup(|key| match key {
//!     "CQTEXT_SELF_ID" => Some("10001".to_owned()),
//!     "CQTEXT_SELF_NICKNAME" => Some("Mai".to_owned()),
//!     _ => None,
//! })
//! .expect("valid environment");
//!
//! assert_eq!(config.resolver.self_identity.nickname, "Mai");
//! assert_eq!(config.resolver.forward_depth_limit, 1);
//! ```

use camino::Utf8Path;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::domain::UserId;

/// Environment variable holding the bot's own user id.
pub const ENV_SELF_ID: &str = "CQTEXT_SELF_ID";
/// Environment variable holding the bot's own display name.
pub const ENV_SELF_NICKNAME: &str = "CQTEXT_SELF_NICKNAME";
/// Environment variable holding the forward nesting limit.
pub const ENV_FORWARD_DEPTH_LIMIT: &str = "CQTEXT_FORWARD_DEPTH_LIMIT";
/// Environment variable holding the description service base URL.
pub const ENV_VISION_BASE_URL: &str = "CQTEXT_VISION_BASE_URL";
/// Environment variable holding the description service credential.
pub const ENV_VISION_API_KEY: &str = "CQTEXT_VISION_API_KEY";
/// Environment variable holding the description model name.
pub const ENV_VISION_MODEL: &str = "CQTEXT_VISION_MODEL";

const DEFAULT_SELF_NICKNAME: &str = "bot";
const DEFAULT_VISION_BASE_URL: &str = "https://api.siliconflow.cn/v1/";
const DEFAULT_VISION_MODEL: &str = "deepseek-ai/deepseek-vl2";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/50.0.2661.87 Safari/537.36";

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// File path relative to the config directory.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`AppConfig`].
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        /// File path relative to the config directory.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// An environment variable holds an unusable value.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// The bot's own identity, used to phrase replies to its own messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfIdentity {
    /// The bot's user id.
    pub user_id: UserId,
    /// The name the bot goes by.
    pub nickname: String,
}

impl SelfIdentity {
    /// Creates a self identity.
    #[must_use]
    pub fn new(user_id: UserId, nickname: impl Into<String>) -> Self {
        Self {
            user_id,
            nickname: nickname.into(),
        }
    }
}

impl Default for SelfIdentity {
    fn default() -> Self {
        Self::new(UserId::UNKNOWN, DEFAULT_SELF_NICKNAME)
    }
}

/// Resolver policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Identity whose messages are phrased as replies to the bot.
    pub self_identity: SelfIdentity,
    /// Depth at and beyond which forward tags are not expanded.
    ///
    /// Depth 0 is the top-level message, so the default of 1 expands a
    /// top-level forward but renders forwards inside it as placeholders.
    pub forward_depth_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            self_identity: SelfIdentity::default(),
            forward_depth_limit: 1,
        }
    }
}

impl ResolverConfig {
    /// Creates a default policy for the given self identity.
    #[must_use]
    pub fn for_identity(self_identity: SelfIdentity) -> Self {
        Self {
            self_identity,
            ..Self::default()
        }
    }

    /// Sets the forward nesting limit.
    #[must_use]
    pub const fn with_forward_depth_limit(mut self, limit: usize) -> Self {
        self.forward_depth_limit = limit;
        self
    }
}

/// Time budgets applied around each external step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalContentConfig {
    /// Budget for retrieving an image, retries included.
    pub fetch_timeout_ms: u64,
    /// Budget for one description request.
    pub describe_timeout_ms: u64,
}

impl Default for ExternalContentConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 30_000,
            describe_timeout_ms: 30_000,
        }
    }
}

impl ExternalContentConfig {
    /// Budget for retrieving an image.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Budget for one description request.
    #[must_use]
    pub const fn describe_timeout(&self) -> Duration {
        Duration::from_millis(self.describe_timeout_ms)
    }
}

/// HTTP image retrieval settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Per-attempt request timeout.
    pub timeout_ms: u64,
    /// Attempts made when the transport fails; status errors are final.
    pub max_attempts: u32,
    /// Skip certificate verification; some media CDNs serve broken chains.
    pub accept_invalid_certs: bool,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_attempts: 3,
            accept_invalid_certs: false,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl FetcherConfig {
    /// Per-attempt request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Description service settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriberConfig {
    /// Base URL of an OpenAI-compatible API, with trailing slash.
    pub base_url: String,
    /// Bearer credential.
    pub api_key: String,
    /// Vision model name.
    pub model: String,
    /// Request timeout.
    pub timeout_ms: u64,
}

impl Default for DescriberConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_VISION_BASE_URL.to_owned(),
            api_key: String::new(),
            model: DEFAULT_VISION_MODEL.to_owned(),
            timeout_ms: 30_000,
        }
    }
}

impl DescriberConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the chat-completions endpoint URL.
    #[must_use]
    pub fn completions_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}chat/completions", self.base_url)
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }
}

impl fmt::Debug for DescriberConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriberConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Resolver policy.
    pub resolver: ResolverConfig,
    /// External step time budgets.
    pub external: ExternalContentConfig,
    /// Image retrieval.
    pub fetcher: FetcherConfig,
    /// Image description.
    pub describer: DescriberConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid configuration JSON.
    pub fn load(dir: &Dir, path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = dir.read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Builds configuration from defaults and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Builds configuration from defaults and a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable does not
    /// parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::default().with_overrides(lookup)
    }

    /// Applies variables found by `lookup` on top of this configuration.
    ///
    /// Absent variables leave the current value in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable does not
    /// parse.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(user_id) = parse_var::<UserId>(&lookup, ENV_SELF_ID)? {
            self.resolver.self_identity.user_id = user_id;
        }
        if let Some(nickname) = lookup(ENV_SELF_NICKNAME) {
            self.resolver.self_identity.nickname = nickname;
        }
        if let Some(limit) = parse_var::<usize>(&lookup, ENV_FORWARD_DEPTH_LIMIT)? {
            self.resolver.forward_depth_limit = limit;
        }
        if let Some(base_url) = lookup(ENV_VISION_BASE_URL) {
            self.describer.base_url = base_url;
        }
        if let Some(api_key) = lookup(ENV_VISION_API_KEY) {
            self.describer.api_key = api_key;
        }
        if let Some(model) = lookup(ENV_VISION_MODEL) {
            self.describer.model = model;
        }
        Ok(self)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|error: T::Err| ConfigError::InvalidValue {
                    key,
                    value: value.clone(),
                    reason: error.to_string(),
                })
        })
        .transpose()
}
