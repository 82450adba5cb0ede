//! GFF3 percent-encoding for attribute keys and values.
//!
//! Only the characters with special meaning in column 9 are escaped:
//! tab, LF, CR, `%`, `;`, `=`, `&` and `,`. Any other `%XX` sequence is
//! left untouched when decoding.

use std::borrow::Cow;

const RESERVED: [(char, &str); 8] = [
    ('\t', "%09"),
    ('\n', "%0A"),
    ('\r', "%0D"),
    ('%', "%25"),
    (';', "%3B"),
    ('=', "%3D"),
    ('&', "%26"),
    (',', "%2C"),
];

fn reserved_char(hi: u8, lo: u8) -> Option<char> {
    let code = (hex_value(hi)? << 4) | hex_value(lo)?;
    RESERVED
        .iter()
        .map(|(c, _)| *c)
        .find(|c| *c as u32 == u32::from(code))
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode the reserved percent escapes in an attribute key or value.
///
/// # Examples
///
/// ```
/// use gffload::formats::primitives::escape::decode;
///
/// assert_eq!(decode("a%3Bb%2Cc"), "a;b,c");
/// assert_eq!(decode("50%25"), "50%");
/// assert_eq!(decode("space%20kept"), "space%20kept");
/// ```
pub fn decode(s: &str) -> Cow<'_, str> {
    if !s.contains('%') {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let mut copied = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Some(c) = reserved_char(bytes[i + 1], bytes[i + 2]) {
                out.push_str(&s[copied..i]);
                out.push(c);
                i += 3;
                copied = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&s[copied..]);

    Cow::Owned(out)
}

/// Escape the reserved characters of an attribute key or value.
///
/// # Examples
///
/// ```
/// use gffload::formats::primitives::escape::encode;
///
/// assert_eq!(encode("a;b,c"), "a%3Bb%2Cc");
/// assert_eq!(encode("plain"), "plain");
/// ```
pub fn encode(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| RESERVED.iter().any(|(r, _)| *r == c)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match RESERVED.iter().find(|(r, _)| *r == c) {
            Some((_, escaped)) => out.push_str(escaped),
            None => out.push(c),
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_reserved() {
        assert_eq!(
            decode("%09%0A%0D%25%3B%3D%26%2C"),
            "\t\n\r%;=&,"
        );
    }

    #[test]
    fn test_decode_lowercase_hex() {
        assert_eq!(decode("a%3db"), "a=b");
    }

    #[test]
    fn test_decode_truncated_escape() {
        assert_eq!(decode("abc%2"), "abc%2");
        assert_eq!(decode("%"), "%");
    }

    #[test]
    fn test_decode_borrows_when_unescaped() {
        assert!(matches!(decode("gene1"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_encode_percent_first() {
        assert_eq!(encode("100%;"), "100%25%3B");
    }
}
