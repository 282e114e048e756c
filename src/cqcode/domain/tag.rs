//! The parsed representation of one tagged code.

use camino::{FromPathBufError, Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::io;

use super::{MessageId, ReplyContext, TagParameters, TagParseError, TagRecord, escape, unescape};

/// Marker that opens every tag in the string grammar.
pub const TAG_OPEN: &str = "[CQ:";

/// Marker that closes a tag.
pub const TAG_CLOSE: char = ']';

/// Kind of plain-text runs.
pub const TEXT_KIND: &str = "text";

/// A tagged code parsed into kind and parameters.
///
/// A tag is immutable once built. Its kind and parameters are a pure
/// function of the raw string (or structured record) it was built from, so
/// parsing the same input twice yields equal tags.
///
/// # Examples
///
/// ```
/// use cqtext::cqcode::domain::CqTag;
///
/// let tag = CqTag::parse("[CQ:image,url=http://x/y.png,sub_type=0]");
/// assert_eq!(tag.kind(), "image");
/// assert_eq!(tag.parameter("url"), Some("http://x/y.png"));
///
/// let text = CqTag::parse("hello");
/// assert_eq!(text.kind(), "text");
/// assert_eq!(text.parameter("text"), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqTag {
    kind: String,
    parameters: TagParameters,
    raw: String,
    context: Option<ReplyContext>,
}

impl CqTag {
    /// Parses a raw tag string.
    ///
    /// Parsing never fails: input that is not a well-formed tag becomes a
    /// text tag holding the input verbatim.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or_else(|_| Self::text(raw))
    }

    /// Parses a raw tag string, reporting why malformed input was rejected.
    ///
    /// Parameter segments without `=` are skipped. A repeated key keeps its
    /// first position and its last value.
    ///
    /// # Errors
    ///
    /// Returns [`TagParseError`] when the input does not open with `[CQ:` or
    /// does not end with `]`.
    pub fn try_parse(raw: &str) -> Result<Self, TagParseError> {
        let opened = raw.strip_prefix(TAG_OPEN).ok_or(TagParseError::NotATag)?;
        let interior = opened
            .strip_suffix(TAG_CLOSE)
            .ok_or(TagParseError::Unterminated)?;

        let mut segments = interior.split(',');
        let kind = segments.next().unwrap_or_default().to_owned();
        let parameters = segments
            .filter_map(|segment| segment.split_once('='))
            .map(|(key, value)| (key.to_owned(), unescape(value)))
            .collect();

        Ok(Self {
            kind,
            parameters,
            raw: raw.to_owned(),
            context: None,
        })
    }

    /// Builds a tag from a structured record.
    ///
    /// The resulting tag has the same shape as one parsed from the string
    /// grammar. Its raw form is the record rendered back into that grammar.
    #[must_use]
    pub fn from_record(record: &TagRecord) -> Self {
        Self::from_parts(record.kind.clone(), record.parameters())
    }

    /// Creates a plain-text tag.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        let content = text.into();
        Self {
            kind: TEXT_KIND.to_owned(),
            parameters: std::iter::once(("text", content.as_str())).collect(),
            raw: content,
            context: None,
        }
    }

    /// Builds a tag from its kind and parameters; the raw form is rendered.
    #[must_use]
    pub fn from_parts(kind: impl Into<String>, parameters: TagParameters) -> Self {
        let kind_name = kind.into();
        if kind_name == TEXT_KIND {
            return Self::text(parameters.get("text").unwrap_or_default());
        }
        let raw = render(&kind_name, &parameters);
        Self {
            kind: kind_name,
            parameters,
            raw,
            context: None,
        }
    }

    /// Builds a sticker image tag that points at a local file.
    ///
    /// A relative `path` is made absolute against the current directory
    /// without touching the file itself.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the current directory is needed and cannot
    /// be read or is not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use cqtext::cqcode::domain::CqTag;
    ///
    /// let tag = CqTag::sticker_from_path(Utf8Path::new("/srv/emoji/a,b.gif"))
    ///     .expect("absolute path");
    /// assert_eq!(tag.raw(), "[CQ:image,file=file:////srv/emoji/a&#44;b.gif,sub_type=1]");
    /// ```
    pub fn sticker_from_path(path: &Utf8Path) -> io::Result<Self> {
        let absolute = Utf8PathBuf::try_from(std::path::absolute(path)?)
            .map_err(FromPathBufError::into_io_error)?;
        let parameters = [
            ("file", format!("file:///{absolute}")),
            ("sub_type", "1".to_owned()),
        ]
        .into_iter()
        .collect();
        Ok(Self::from_parts("image", parameters))
    }

    /// Builds a reply tag referencing `message_id`.
    #[must_use]
    pub fn reply_to(message_id: MessageId) -> Self {
        Self::from_parts(
            "reply",
            std::iter::once(("id", message_id.to_string())).collect(),
        )
    }

    /// Attaches the message a reply tag refers to.
    #[must_use]
    pub fn with_context(mut self, context: ReplyContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns the kind discriminator.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the unescaped parameters.
    #[must_use]
    pub const fn parameters(&self) -> &TagParameters {
        &self.parameters
    }

    /// Returns one unescaped parameter value.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key)
    }

    /// Returns the string the tag was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the referenced message attached to a reply tag.
    #[must_use]
    pub const fn context(&self) -> Option<&ReplyContext> {
        self.context.as_ref()
    }

    /// Returns `true` for plain-text tags.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == TEXT_KIND
    }

    /// Renders the tag in the string grammar, escaping every value.
    ///
    /// Text tags render as their text.
    #[must_use]
    pub fn to_cq_string(&self) -> String {
        if self.is_text() {
            return self.parameter("text").unwrap_or_default().to_owned();
        }
        render(&self.kind, &self.parameters)
    }
}

fn render(kind: &str, parameters: &TagParameters) -> String {
    let body: String = parameters
        .iter()
        .map(|(key, value)| format!(",{key}={}", escape(value)))
        .collect();
    format!("{TAG_OPEN}{kind}{body}{TAG_CLOSE}")
}
