//! Link detection for `http://` and `https://` tokens.
//!
//! Full URL grammar is out of reach for a single pass scanner, so a link is
//! taken to be everything from the scheme up to the next whitespace. The
//! candidate is then checked with the WHATWG parser from the `url` crate.

use url::Url;

use crate::chars::{is_digit, is_letter};
use crate::cursor::decode_at;
use crate::scanner::Match;

/// Shortest possible candidate: `http://`
pub const MIN_LINK_LEN: usize = 7;

/// A link may only start at a word boundary, so `xhttp://a.com` is not a
/// link while ` http://a.com` and `(http://a.com` are. Only letters and
/// decimal digits join a word.
pub fn can_start_link(previous: Option<char>) -> bool {
    match previous {
        Some(ch) => !(is_letter(ch) || is_digit(ch)),
        None => true,
    }
}

/// Match a link at the start of `text`.
///
/// The scheme is matched case-insensitively. The link spans up to, but not
/// including, the next whitespace character.
pub fn match_link(text: &[u8]) -> Option<Match<'_>> {
    if text.len() < MIN_LINK_LEN {
        return None;
    }

    if !text[..4].eq_ignore_ascii_case(b"http") {
        return None;
    }
    let scheme_len = if matches!(text[4], b's' | b'S') { 5 } else { 4 };
    if text.get(scheme_len..scheme_len + 3) != Some(&b"://"[..]) {
        return None;
    }

    let end = whitespace_index(text).unwrap_or(text.len());
    let candidate = std::str::from_utf8(&text[..end]).ok()?;
    if let Err(err) = Url::parse(candidate) {
        tracing::trace!("Rejected link candidate {:?}: {}", candidate, err);
        return None;
    }

    Some(Match {
        value: candidate,
        width: end,
    })
}

/// Byte offset of the first whitespace code point. Undecodable bytes also
/// end the candidate; the scanner reports them when it reaches them.
fn whitespace_index(text: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < text.len() {
        match decode_at(text, i) {
            Ok((ch, _)) if ch.is_whitespace() => return Some(i),
            Ok((_, width)) => i += width,
            Err(_) => return Some(i),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundary() {
        assert!(can_start_link(None));
        assert!(can_start_link(Some(' ')));
        assert!(can_start_link(Some(':')));
        assert!(can_start_link(Some('(')));
        assert!(!can_start_link(Some('x')));
        assert!(!can_start_link(Some('7')));
        assert!(!can_start_link(Some('é')));
        assert!(!can_start_link(Some('٣')));
        assert!(can_start_link(Some('²')));
        assert!(can_start_link(Some('Ⅻ')));
        assert!(can_start_link(Some('½')));
    }

    #[test]
    fn test_match_http_and_https() {
        let m = match_link(b"http://golang.org").unwrap();
        assert_eq!(m.value, "http://golang.org");
        assert_eq!(m.width, 17);

        let m = match_link(b"https://atlassian.com\nnext line").unwrap();
        assert_eq!(m.value, "https://atlassian.com");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let m = match_link(b"HTTPS://Example.com/Path").unwrap();
        assert_eq!(m.value, "HTTPS://Example.com/Path");
        assert!(match_link(b"hTtP://example.com").is_some());
    }

    #[test]
    fn test_link_stops_at_whitespace() {
        let m = match_link(b"http://golang.org?foo=bar&baz=true#anchor foo").unwrap();
        assert_eq!(m.value, "http://golang.org?foo=bar&baz=true#anchor");

        let text = "http://a.com/ü\u{3000}after";
        let m = match_link(text.as_bytes()).unwrap();
        assert_eq!(m.value, "http://a.com/ü");
    }

    #[test]
    fn test_not_a_link() {
        assert!(match_link(b"http:/").is_none());
        assert!(match_link(b"http:/x.com").is_none());
        assert!(match_link(b"httpx://a.com").is_none());
        assert!(match_link(b"ftp://a.com").is_none());
        assert!(match_link(b"hello world").is_none());
        // the https scheme needs room for its separator
        assert!(match_link(b"https:/").is_none());
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(match_link(b"http://").is_none());
        assert!(match_link(b"http://example.com:99999 port").is_none());
        assert!(match_link(b"http://[::1").is_none());
    }
}
