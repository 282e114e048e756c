//! Escaping codec for tag parameter values.
//!
//! Four characters are reserved inside a tag: `&`, `,`, `[` and `]`. Values
//! carry them as HTML-style entities so that the bracketed grammar can be
//! split on `,` and terminated on `]` without ambiguity.

const ESCAPES: [(&str, &str); 3] = [(",", "&#44;"), ("[", "&#91;"), ("]", "&#93;")];

const AMPERSAND: &str = "&";
const AMPERSAND_ENTITY: &str = "&amp;";

/// Escapes the reserved characters of a parameter value.
///
/// The ampersand is replaced first so the entities introduced for the other
/// characters are not escaped a second time.
///
/// # Examples
///
/// ```
/// use cqtext::cqcode::domain::escape;
///
/// assert_eq!(escape("a,b&[c]"), "a&#44;b&amp;&#91;c&#93;");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    ESCAPES.iter().fold(
        text.replace(AMPERSAND, AMPERSAND_ENTITY),
        |escaped, (character, entity)| escaped.replace(character, entity),
    )
}

/// Reverses [`escape`].
///
/// Bracket and comma entities are decoded before the ampersand entity, so a
/// value whose literal text is `&amp;#44;` decodes to `&#44;` rather than `,`.
///
/// # Examples
///
/// ```
/// use cqtext::cqcode::domain::unescape;
///
/// assert_eq!(unescape("a&#44;b&amp;&#91;c&#93;"), "a,b&[c]");
/// ```
#[must_use]
pub fn unescape(text: &str) -> String {
    ESCAPES
        .iter()
        .fold(text.to_owned(), |unescaped, (character, entity)| {
            unescaped.replace(entity, character)
        })
        .replace(AMPERSAND_ENTITY, AMPERSAND)
}
