use crate::MAX_TERM_LEN;

/// Reduce a raw token to an indexable term: keep ASCII letters only,
/// lowercase them, drop everything else. No separator is substituted, so
/// `"it's"` becomes `"its"` and `"word-3"` becomes `"word"`. Output is
/// silently truncated at [`MAX_TERM_LEN`] letters. Tokens with no letters
/// normalize to the empty string.
pub fn normalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_TERM_LEN)
        .collect()
}
