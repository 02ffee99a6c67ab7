//! Decoders for the platform attribute payloads.

pub mod props;
pub mod quarantine;
pub mod zone;

use crate::split;

/// Interpret a raw attribute value as one line of text.
///
/// Freedesktop URL attributes are plain strings, but some download
/// tools append a trailing newline; tokenizing on CR/LF and taking the
/// first token strips that without touching interior content.
#[must_use]
pub fn text_value(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    split::split_tokens(&text, &['\r', '\n'])
        .first()
        .map(|s| (*s).to_string())
}
