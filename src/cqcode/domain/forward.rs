//! Forward bundles: a tag whose `content` carries whole sub-messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    ForwardDecodeError, GroupId, MessageContent, MessageId, TagRecord, UserId, unescape,
};

const UNKNOWN_SENDER: &str = "unknown user";

/// Sender block of a forwarded entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardSender {
    /// Group-specific display name.
    #[serde(default)]
    pub card: Option<String>,
    /// Account nickname.
    #[serde(default)]
    pub nickname: Option<String>,
}

/// One forwarded sub-message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardEntry {
    /// Who originally sent the entry.
    #[serde(default)]
    pub sender: ForwardSender,
    /// Entry content in the string grammar.
    #[serde(default)]
    pub raw_message: String,
    /// Entry content as structured records, when the transport supplies it.
    #[serde(default)]
    pub message: Value,
    /// Original sender id.
    #[serde(default)]
    pub user_id: UserId,
    /// Original message id.
    #[serde(default)]
    pub message_id: MessageId,
    /// Original group, if any.
    #[serde(default)]
    pub group_id: Option<GroupId>,
}

impl ForwardEntry {
    /// Returns the card when non-empty, else the nickname, else a fixed
    /// "unknown user" label.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        [&self.sender.card, &self.sender.nickname]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_SENDER)
    }

    /// Returns the structured records; empty when absent or undecodable.
    #[must_use]
    pub fn records(&self) -> Vec<TagRecord> {
        serde_json::from_value(self.message.clone()).unwrap_or_default()
    }

    /// Returns the entry's content, preferring the raw string form.
    ///
    /// `None` when neither form carries anything.
    #[must_use]
    pub fn content(&self) -> Option<MessageContent> {
        if !self.raw_message.is_empty() {
            return Some(MessageContent::Raw(self.raw_message.clone()));
        }
        Some(MessageContent::Records(self.records())).filter(|content| !content.is_empty())
    }

    /// Returns `true` when either content form holds a forward tag.
    #[must_use]
    pub fn contains_forward(&self) -> bool {
        self.records().iter().any(TagRecord::is_forward)
            || MessageContent::Raw(self.raw_message.clone())
                .tags()
                .iter()
                .any(|tag| tag.kind() == "forward")
    }
}

/// The decoded sub-messages of a forward tag, in order.
///
/// # Examples
///
/// ```
/// use cqtext::cqcode::domain::ForwardBundle;
///
/// let bundle = ForwardBundle::decode(
///     r#"[{"sender":{"nickname":"bob"},"raw_message":"hi"}]"#,
/// )
/// .expect("valid bundle");
/// assert_eq!(bundle.entries().len(), 1);
/// assert_eq!(bundle.entries().first().map(|entry| entry.sender_name()), Some("bob"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForwardBundle {
    entries: Vec<ForwardEntry>,
}

impl ForwardBundle {
    /// Decodes a forward tag's `content` parameter.
    ///
    /// Parameter values are unescaped once when the tag is parsed, so
    /// `content` is normally plain JSON and nested tags inside entries keep
    /// their own escaping. Content that only decodes after a further
    /// unescape, as some transports double-escape it, is accepted too.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardDecodeError::Malformed`] when the content is not a
    /// JSON array of entries.
    pub fn decode(content: &str) -> Result<Self, ForwardDecodeError> {
        serde_json::from_str(content)
            .or_else(|error| serde_json::from_str(&unescape(content)).map_err(|_| error))
            .map_err(|error| ForwardDecodeError::Malformed(error.to_string()))
    }

    /// Returns the entries in order.
    #[must_use]
    pub fn entries(&self) -> &[ForwardEntry] {
        &self.entries
    }

    /// Returns `true` when the bundle holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
