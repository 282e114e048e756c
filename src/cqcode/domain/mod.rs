//! Domain types for tagged-code translation.
//!
//! This module is free of I/O: escaping, parsing, message segmentation, and
//! forward-bundle decoding are pure functions over owned values.

mod error;
mod escape;
mod forward;
mod ids;
mod message;
mod parameters;
mod profile;
mod record;
mod tag;

pub use error::{ForwardDecodeError, TagParseError};
pub use escape::{escape, unescape};
pub use forward::{ForwardBundle, ForwardEntry, ForwardSender};
pub use ids::{GroupId, MessageId, UserId};
pub use message::{
    IncomingMessage, MessageContent, RawSegment, ReplyContext, ResolvedMessage, SenderInfo,
    split_segments,
};
pub use parameters::TagParameters;
pub use profile::PromptProfile;
pub use record::TagRecord;
pub use tag::{CqTag, TAG_CLOSE, TAG_OPEN, TEXT_KIND};
