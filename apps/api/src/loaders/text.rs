//! Plain-text uploads. Decoding is best effort: a stray Latin-1 byte in an
//! otherwise fine file should not block an import, so invalid sequences are
//! replaced rather than rejected.

pub fn extract_txt_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passes_through() {
        let text = extract_txt_text("proposta de ocupa\u{e7}\u{e3}o".as_bytes());
        assert_eq!(text, "proposta de ocupa\u{e7}\u{e3}o");
    }

    #[test]
    fn test_bom_is_stripped() {
        let bytes = [0xEF, 0xBB, 0xBF, b'o', b'i'];
        assert_eq!(extract_txt_text(&bytes), "oi");
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let bytes = [b'a', 0xFF, b'b'];
        assert_eq!(extract_txt_text(&bytes), "a\u{fffd}b");
    }
}
