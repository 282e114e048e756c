//! Whole-message types: senders, reply context, and resolution output.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::{CqTag, GroupId, MessageId, TAG_CLOSE, TAG_OPEN, TagRecord, UserId, unescape};

/// Identity of a message sender, as reported by the transport.
///
/// # Examples
///
/// ```
/// use cqtext::cqcode::domain::{SenderInfo, UserId};
///
/// let sender = SenderInfo::new(UserId::new(42), "alice").with_card("Alice (ops)");
/// assert_eq!(sender.display_name(), "Alice (ops)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderInfo {
    /// Sender account id.
    pub user_id: UserId,
    /// Account nickname.
    #[serde(default)]
    pub nickname: String,
    /// Group-specific display name, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
}

impl SenderInfo {
    /// Creates sender info without a group card.
    #[must_use]
    pub fn new(user_id: UserId, nickname: impl Into<String>) -> Self {
        Self {
            user_id,
            nickname: nickname.into(),
            card: None,
        }
    }

    /// Sets the group card.
    #[must_use]
    pub fn with_card(mut self, card: impl Into<String>) -> Self {
        self.card = Some(card.into());
        self
    }

    /// Returns the card when non-empty, else the nickname.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.card
            .as_deref()
            .filter(|card| !card.is_empty())
            .unwrap_or(&self.nickname)
    }
}

/// Content of a message in either transport representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Flat string with embedded tags.
    Raw(String),
    /// Array of structured tag records.
    Records(Vec<TagRecord>),
}

impl MessageContent {
    /// Splits the content into tags, in message order.
    ///
    /// Text runs between raw tags are unescaped.
    #[must_use]
    pub fn tags(&self) -> Vec<CqTag> {
        match self {
            Self::Raw(raw) => split_segments(raw)
                .into_iter()
                .map(|segment| match segment {
                    RawSegment::Text(text) => CqTag::text(unescape(text)),
                    RawSegment::Tag(tag) => CqTag::parse(tag),
                })
                .collect(),
            Self::Records(records) => records.iter().map(CqTag::from_record).collect(),
        }
    }

    /// Returns `true` when there is nothing to resolve.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::Raw(raw) => raw.is_empty(),
            Self::Records(records) => records.is_empty(),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_owned())
    }
}

impl From<String> for MessageContent {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<Vec<TagRecord>> for MessageContent {
    fn from(records: Vec<TagRecord>) -> Self {
        Self::Records(records)
    }
}

/// The message a reply tag refers to, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyContext {
    /// Sender of the referenced message.
    pub sender: SenderInfo,
    /// Id of the referenced message.
    pub message_id: MessageId,
    /// Content of the referenced message.
    pub content: MessageContent,
}

impl ReplyContext {
    /// Creates a reply context.
    #[must_use]
    pub fn new(
        sender: SenderInfo,
        message_id: MessageId,
        content: impl Into<MessageContent>,
    ) -> Self {
        Self {
            sender,
            message_id,
            content: content.into(),
        }
    }
}

/// A message handed over by the transport for resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Transport message id.
    #[serde(default)]
    pub message_id: MessageId,
    /// Who sent the message.
    pub sender: SenderInfo,
    /// Originating group, absent for direct messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Message body.
    pub content: MessageContent,
    /// Message referenced by a reply tag in the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyContext>,
}

impl IncomingMessage {
    /// Creates a message without group or reply context.
    #[must_use]
    pub fn new(sender: SenderInfo, content: impl Into<MessageContent>) -> Self {
        Self {
            message_id: MessageId::default(),
            sender,
            group_id: None,
            content: content.into(),
            reply: None,
        }
    }

    /// Sets the transport message id.
    #[must_use]
    pub const fn with_message_id(mut self, message_id: MessageId) -> Self {
        self.message_id = message_id;
        self
    }

    /// Sets the originating group.
    #[must_use]
    pub const fn with_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Attaches the message a reply tag refers to.
    #[must_use]
    pub fn with_reply(mut self, reply: ReplyContext) -> Self {
        self.reply = Some(reply);
        self
    }
}

/// The textual surrogate of one message.
///
/// Built once per incoming message and handed to whoever displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMessage {
    /// Transport message id.
    pub message_id: MessageId,
    /// Who sent the message.
    pub sender: SenderInfo,
    /// Originating group, absent for direct messages.
    pub group_id: Option<GroupId>,
    /// One resolved fragment per tag or text run, in message order.
    pub segments: Vec<String>,
    /// When resolution finished.
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedMessage {
    /// Assembles a resolved message for `incoming`.
    #[must_use]
    pub fn new(incoming: &IncomingMessage, segments: Vec<String>, clock: &impl Clock) -> Self {
        Self {
            message_id: incoming.message_id,
            sender: incoming.sender.clone(),
            group_id: incoming.group_id,
            segments,
            resolved_at: clock.utc(),
        }
    }

    /// Concatenates the segments into the message's plain text.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.segments.concat()
    }
}

/// A slice of a raw message: either literal text or one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSegment<'a> {
    /// Text between tags, still escaped.
    Text(&'a str),
    /// One `[CQ:...]` tag including its brackets.
    Tag(&'a str),
}

/// Splits a raw message into text runs and tags.
///
/// A tag runs from `[CQ:` to the first `]`; reserved characters inside
/// values are escaped, so the first `]` always closes the tag. An opening
/// marker without a closing bracket is kept as text.
///
/// # Examples
///
/// ```
/// use cqtext::cqcode::domain::{RawSegment, split_segments};
///
/// assert_eq!(
///     split_segments("hi [CQ:face,id=5]!"),
///     [
///         RawSegment::Text("hi "),
///         RawSegment::Tag("[CQ:face,id=5]"),
///         RawSegment::Text("!"),
///     ]
/// );
/// ```
#[must_use]
pub fn split_segments(raw: &str) -> Vec<RawSegment<'_>> {
    let mut segments = Vec::new();
    let mut rest = raw;

    while let Some(open_index) = rest.find(TAG_OPEN) {
        let (before, from_open) = rest.split_at(open_index);
        let Some(close_index) = from_open.find(TAG_CLOSE) else {
            break;
        };
        if !before.is_empty() {
            segments.push(RawSegment::Text(before));
        }
        let (tag, after) = from_open.split_at(close_index + TAG_CLOSE.len_utf8());
        segments.push(RawSegment::Tag(tag));
        rest = after;
    }

    if !rest.is_empty() {
        segments.push(RawSegment::Text(rest));
    }
    segments
}
