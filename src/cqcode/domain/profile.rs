//! Prompt profiles for image description.

use serde::{Deserialize, Serialize};
use std::fmt;

const PHOTO_PROMPT: &str = "Describe the content of this image. If it contains any text, \
transcribe all of it, then try to infer what the image means. Use at most 200 characters.";

const STICKER_PROMPT: &str = "This is a sticker. Briefly describe the emotion and intent it \
conveys. Use at most 20 characters.";

/// How an image should be described, and how its description is rendered.
///
/// # Examples
///
/// ```
/// use cqtext::cqcode::domain::PromptProfile;
///
/// assert_eq!(PromptProfile::Photo.placeholder(), "[image]");
/// assert_eq!(PromptProfile::Sticker.render("smug grin"), "[sticker: smug grin]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptProfile {
    /// A photo or screenshot: descriptive, transcribes text.
    Photo,
    /// A sticker or reaction image: emotion and intent only.
    Sticker,
}

impl PromptProfile {
    /// Selects the profile from an image tag's `sub_type` parameter.
    ///
    /// Only `sub_type=0` marks a regular photo; any other value, or none,
    /// is a sticker.
    #[must_use]
    pub fn from_sub_type(sub_type: Option<&str>) -> Self {
        if sub_type == Some("0") {
            Self::Photo
        } else {
            Self::Sticker
        }
    }

    /// Instruction sent to the description service.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Photo => PHOTO_PROMPT,
            Self::Sticker => STICKER_PROMPT,
        }
    }

    /// Character budget a description is clipped to.
    #[must_use]
    pub const fn max_chars(self) -> usize {
        match self {
            Self::Photo => 200,
            Self::Sticker => 20,
        }
    }

    /// Token budget requested from the description service.
    #[must_use]
    pub const fn max_tokens(self) -> u32 {
        match self {
            Self::Photo => 300,
            Self::Sticker => 50,
        }
    }

    /// Sampling temperature requested from the description service.
    #[must_use]
    pub const fn temperature(self) -> f32 {
        match self {
            Self::Photo => 0.6,
            Self::Sticker => 0.4,
        }
    }

    /// Static text used when no description is available.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Photo => "[image]",
            Self::Sticker => "[sticker]",
        }
    }

    /// Wraps a description for inclusion in plain text.
    #[must_use]
    pub fn render(self, description: &str) -> String {
        format!("[{self}: {description}]")
    }
}

impl fmt::Display for PromptProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Photo => "image",
            Self::Sticker => "sticker",
        })
    }
}
