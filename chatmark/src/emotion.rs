/// Emotion tag matching for `(name)` tokens
use crate::scanner::Match;

/// Supported emotion tags.
/// Keep this list sorted, lookups binary search it.
pub const SUPPORTED_EMOTIONS: &[&str] = &[
    "atlassian",
    "bitbucket",
    "boom",
    "crucible",
    "fry",
    "ghost",
    "heart",
];

/// Whether `name` is one of the supported emotion tags (case-sensitive)
pub fn is_supported(name: &str) -> bool {
    SUPPORTED_EMOTIONS.binary_search(&name).is_ok()
}

/// Match an emotion tag at the start of `text`, which must begin with `(`.
///
/// The tag runs to the first `)`; there is no nesting or escaping. On success
/// the width covers both parentheses.
pub fn match_emotion(text: &[u8]) -> Option<Match<'_>> {
    if text.first() != Some(&b'(') {
        return None;
    }
    let close = text.iter().position(|&b| b == b')')?;
    let name = std::str::from_utf8(&text[1..close]).ok()?;
    if !is_supported(name) {
        return None;
    }
    Some(Match {
        value: name,
        width: close + 1,
    })
}
