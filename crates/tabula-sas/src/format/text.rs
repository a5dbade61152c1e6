//! Text decoding.
//!
//! SAS7BDAT text (column names, labels, formats, character values) is read
//! as Windows-1252. Other code pages declared in the header are not honored.

use encoding_rs::WINDOWS_1252;

/// Decode a byte span as Windows-1252.
///
/// Every byte maps to some character, so decoding never fails. NUL padding
/// is kept; callers trim as needed.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Decode and strip surrounding whitespace and NUL padding.
pub fn decode_trimmed(bytes: &[u8]) -> String {
    decode_text(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii() {
        assert_eq!(decode_text(b"pizza"), "pizza");
    }

    #[test]
    fn test_decode_high_bytes() {
        // 0x80 is the euro sign in Windows-1252, not a C1 control
        assert_eq!(decode_text(&[0x80, 0x20, 0xFC]), "\u{20AC} \u{FC}");
    }

    #[test]
    fn test_decode_trimmed() {
        assert_eq!(decode_trimmed(b"ABC   "), "ABC");
        assert_eq!(decode_trimmed(b"  9.4\0\0\0"), "9.4");
        assert_eq!(decode_trimmed(b"    "), "");
    }
}
