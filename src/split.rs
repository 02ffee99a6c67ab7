//! Delimiter splitting with two deliberately distinct semantics.
//!
//! The quarantine decoder needs positional fields, so empty parts must
//! survive (`"a;;b"` → `["a", "", "b"]`). The Zone.Identifier decoder
//! tokenizes on a separator *set* where consecutive separators collapse
//! (CRLF line endings). Do not unify the two.

/// Split on a single separator, preserving empty parts.
///
/// Always returns `count(sep) + 1` parts, in order.
pub fn split_keep(text: &str, sep: char) -> Vec<&str> {
    text.split(sep).collect()
}

/// Tokenize on a set of separator characters, collapsing runs.
///
/// Never yields an empty token; an input of only separators yields
/// nothing.
pub fn split_tokens<'a>(text: &'a str, seps: &[char]) -> Vec<&'a str> {
    text.split(|c| seps.contains(&c))
        .filter(|part| !part.is_empty())
        .collect()
}
