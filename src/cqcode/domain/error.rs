//! Error types for tag parsing and forward-bundle decoding.
//!
//! Neither error escapes tag resolution: parsing falls back to a text tag
//! and a bundle that fails to decode resolves to its placeholder. They are
//! exposed for callers that want the diagnostic reason.

use thiserror::Error;

/// Reasons a string is not a well-formed tag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagParseError {
    /// Input does not start with the tag-open marker.
    #[error("input does not start with '[CQ:'")]
    NotATag,

    /// Input opens a tag but does not end with `]`.
    #[error("tag is missing its closing ']'")]
    Unterminated,
}

/// Errors decoding the `content` parameter of a forward bundle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForwardDecodeError {
    /// The content is not a JSON array of forward entries.
    #[error("forward content is not a list of messages: {0}")]
    Malformed(String),
}
