//! Single pass message scanner.
//!
//! The scanner walks the message one code point at a time. When the current
//! code point can open a token, the matching extractor is tried; a match
//! moves the cursor past the whole token, anything else moves it by one code
//! point. Each token kind is a trigger predicate plus an extractor in
//! `RULES`.

use crate::cursor::CodePointCursor;
use crate::emotion::match_emotion;
use crate::error::DecodeError;
use crate::link::{can_start_link, match_link};
use crate::mention::match_mention;

/// A token recognised by one of the extractors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// Token payload, e.g. the username without its `@`
    pub value: &'a str,
    /// Bytes consumed from the start of the token
    pub width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Emotion,
    Mention,
    Link,
}

/// Extractor signature: the message from the trigger onwards, plus the code
/// point before the trigger.
type Extract = for<'t> fn(&'t [u8], Option<char>) -> Option<Match<'t>>;

struct Rule {
    kind: TokenKind,
    trigger: fn(char) -> bool,
    extract: Extract,
}

const RULES: &[Rule] = &[
    Rule {
        kind: TokenKind::Emotion,
        trigger: opens_emotion,
        extract: extract_emotion,
    },
    Rule {
        kind: TokenKind::Mention,
        trigger: opens_mention,
        extract: extract_mention,
    },
    Rule {
        kind: TokenKind::Link,
        trigger: opens_link,
        extract: extract_link,
    },
];

fn opens_emotion(ch: char) -> bool {
    ch == '('
}

fn opens_mention(ch: char) -> bool {
    ch == '@'
}

fn opens_link(ch: char) -> bool {
    matches!(ch, 'h' | 'H')
}

fn extract_emotion(text: &[u8], _previous: Option<char>) -> Option<Match<'_>> {
    match_emotion(text)
}

fn extract_mention(text: &[u8], _previous: Option<char>) -> Option<Match<'_>> {
    match_mention(text)
}

fn extract_link(text: &[u8], previous: Option<char>) -> Option<Match<'_>> {
    if !can_start_link(previous) {
        return None;
    }
    match_link(text)
}

/// Raw scan result, before links are enriched with titles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub mentions: Vec<String>,
    pub emotions: Vec<String>,
    /// Link URLs in discovery order
    pub urls: Vec<String>,
}

impl ScanOutput {
    fn push(&mut self, kind: TokenKind, value: &str) {
        let list = match kind {
            TokenKind::Emotion => &mut self.emotions,
            TokenKind::Mention => &mut self.mentions,
            TokenKind::Link => &mut self.urls,
        };
        list.push(value.to_string());
    }
}

/// Try every rule triggered by `ch` at the cursor position
fn dispatch<'a>(ch: char, cursor: &CodePointCursor<'a>) -> Option<(TokenKind, Match<'a>)> {
    RULES
        .iter()
        .filter(|rule| (rule.trigger)(ch))
        .find_map(|rule| {
            (rule.extract)(cursor.remaining(), cursor.previous()).map(|m| (rule.kind, m))
        })
}

/// Scan a message for mentions, emotion tags and link candidates.
///
/// Fails on the first byte sequence that is not valid UTF-8; no partial
/// output is returned in that case.
pub fn scan(message: &[u8]) -> Result<ScanOutput, DecodeError> {
    let mut cursor = CodePointCursor::new(message);
    let mut output = ScanOutput::default();

    while !cursor.is_at_end() {
        let (ch, width) = cursor.current()?;
        let step = match dispatch(ch, &cursor) {
            Some((kind, token)) => {
                output.push(kind, token.value);
                token.width
            }
            None => width,
        };
        cursor.advance(step);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_text_yields_nothing() {
        assert_eq!(scan(b"").unwrap(), ScanOutput::default());
        assert_eq!(scan(b"Hello world!").unwrap(), ScanOutput::default());
        assert_eq!(scan(b"(no) @ h http:/ x").unwrap(), ScanOutput::default());
    }

    #[test]
    fn test_mentions_in_order() {
        let out = scan(b"@one,@two,some text,@three@four").unwrap();
        assert_eq!(out.mentions, strings(&["one", "two", "three", "four"]));
    }

    #[test]
    fn test_emotions_in_order() {
        let out = scan(b"(atlassian)(non-emotion),(crucible)(bitbucket)").unwrap();
        assert_eq!(out.emotions, strings(&["atlassian", "crucible", "bitbucket"]));
    }

    #[test]
    fn test_unknown_emotion_paren_is_plain_text() {
        // the outer '(' finds no tag and is skipped alone
        let out = scan(b"((fry)").unwrap();
        assert_eq!(out.emotions, strings(&["fry"]));
    }

    #[test]
    fn test_link_word_boundary() {
        assert!(scan(b"xhttp://a.com").unwrap().urls.is_empty());
        assert!(scan(b"MyHttp://fake.com").unwrap().urls.is_empty());
        assert_eq!(scan("²http://a.com".as_bytes()).unwrap().urls, strings(&["http://a.com"]));
        assert_eq!(scan("Ⅻhttp://a.com".as_bytes()).unwrap().urls, strings(&["http://a.com"]));
        assert_eq!(scan(b" http://a.com").unwrap().urls, strings(&["http://a.com"]));
        assert_eq!(
            scan(b"Golang homepage:http://golang.org").unwrap().urls,
            strings(&["http://golang.org"])
        );
    }

    #[test]
    fn test_matched_link_is_not_rescanned() {
        let out = scan(b"http://a.com/@bob/(fry) @alice").unwrap();
        assert_eq!(out.urls, strings(&["http://a.com/@bob/(fry)"]));
        assert_eq!(out.mentions, strings(&["alice"]));
        assert!(out.emotions.is_empty());
    }

    #[test]
    fn test_mixed_message() {
        let out =
            scan(b"Hi, @atlassian(atlassian)! Here is a link:http://golang.org (fry)").unwrap();
        assert_eq!(out.mentions, strings(&["atlassian"]));
        assert_eq!(out.emotions, strings(&["atlassian", "fry"]));
        assert_eq!(out.urls, strings(&["http://golang.org"]));
    }

    #[test]
    fn test_unicode_text_is_walked_by_code_point() {
        let out = scan("Grüße @Zoë 😀 (heart)".as_bytes()).unwrap();
        assert_eq!(out.mentions, strings(&["Zoë"]));
        assert_eq!(out.emotions, strings(&["heart"]));

        let out = scan("@a½ x".as_bytes()).unwrap();
        assert_eq!(out.mentions, strings(&["a"]));
    }

    #[test]
    fn test_invalid_utf8_fails_whole_scan() {
        let err = scan(&[b'@', b'b', b'o', b'b', b' ', 0xFF, b'!']).unwrap_err();
        assert_eq!(err, DecodeError { position: 5 });

        let err = scan(&[b'h', b'i', 0xE2, 0x82]).unwrap_err();
        assert_eq!(err.position, 2);
    }
}
