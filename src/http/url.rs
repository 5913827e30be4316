//! URL path encoding and decoding
//!
//! Request paths arrive percent-encoded; directory listing hyperlinks
//! must be percent-encoded on the way back out.

use std::fmt::Write;

/// Decode percent-escapes in a URL path.
///
/// Invalid escape sequences are passed through unchanged, matching the
/// lenient decoding of common file servers. Decoded bytes that are not
/// valid UTF-8 are replaced with U+FFFD.
pub fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encode a directory entry name for use as a hyperlink target.
///
/// Unreserved characters and `/` (the trailing slash on directory
/// entries) stay literal; everything else is escaped.
pub fn percent_encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for &b in segment.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_path() {
        assert_eq!(percent_decode("/index.html"), "/index.html");
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(percent_decode("/my%20file.txt"), "/my file.txt");
        assert_eq!(percent_decode("/a%2Fb"), "/a/b");
        assert_eq!(percent_decode("%2e%2e/x"), "../x");
    }

    #[test]
    fn test_decode_invalid_escape_passthrough() {
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/a%zz"), "/a%zz");
        assert_eq!(percent_decode("/a%2"), "/a%2");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(percent_encode_segment("plain.txt"), "plain.txt");
        assert_eq!(percent_encode_segment("my file.txt"), "my%20file.txt");
        assert_eq!(percent_encode_segment("a#b?c"), "a%23b%3Fc");
        assert_eq!(percent_encode_segment("sub/"), "sub/");
        assert_eq!(percent_encode_segment("50%"), "50%25");
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let name = "odd name #1 (50%).txt";
        assert_eq!(percent_decode(&percent_encode_segment(name)), name);
    }
}
