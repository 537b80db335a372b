/// Mention extraction for `@username` tokens
/// A username is a run of Unicode letters, decimal digits and underscores
use crate::chars::{is_digit, is_letter};
use crate::cursor::decode_at;
use crate::scanner::Match;

fn is_username_char(ch: char) -> bool {
    is_letter(ch) || is_digit(ch) || ch == '_'
}

/// Match a mention at the start of `text`, which must begin with `@`.
///
/// Consumes as many username characters as possible. The returned value
/// excludes the `@`, the width includes it.
pub fn match_mention(text: &[u8]) -> Option<Match<'_>> {
    if text.first() != Some(&b'@') {
        return None;
    }

    let mut end = 1; // Skip '@'
    while end < text.len() {
        match decode_at(text, end) {
            Ok((ch, width)) if is_username_char(ch) => end += width,
            // Anything else, including undecodable bytes, ends the name
            _ => break,
        }
    }
    if end == 1 {
        return None;
    }

    // Every byte in 1..end was decoded above
    let name = std::str::from_utf8(&text[1..end]).ok()?;
    Some(Match {
        value: name,
        width: end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_mention() {
        let m = match_mention(b"@username, hello").unwrap();
        assert_eq!(m.value, "username");
        assert_eq!(m.width, 9);

        let m = match_mention(b"@snake_case_42!").unwrap();
        assert_eq!(m.value, "snake_case_42");
    }

    #[test]
    fn test_unicode_usernames() {
        let text = "@Jürgen_Ω9 says hi";
        let m = match_mention(text.as_bytes()).unwrap();
        assert_eq!(m.value, "Jürgen_Ω9");
        assert_eq!(m.width, "@Jürgen_Ω9".len());
    }

    #[test]
    fn test_other_numbers_end_the_name() {
        assert_eq!(match_mention("@a½ x".as_bytes()).unwrap().value, "a");
        assert_eq!(match_mention("@x²".as_bytes()).unwrap().value, "x");
        assert!(match_mention("@Ⅻ".as_bytes()).is_none());
        assert_eq!(match_mention("@user٣".as_bytes()).unwrap().value, "user٣");
    }

    #[test]
    fn test_stops_at_next_mention() {
        let m = match_mention(b"@three@four").unwrap();
        assert_eq!(m.value, "three");
        assert_eq!(m.width, 6);
    }

    #[test]
    fn test_no_mention() {
        assert!(match_mention(b"@").is_none());
        assert!(match_mention(b"@ alice").is_none());
        assert!(match_mention(b"@-alice").is_none());
        assert!(match_mention(b"alice").is_none());
    }

    #[test]
    fn test_invalid_bytes_end_the_name() {
        let m = match_mention(&[b'@', b'a', b'b', 0xFF, b'c']).unwrap();
        assert_eq!(m.value, "ab");
        assert_eq!(m.width, 3);
    }
}
