use unicode_normalization::UnicodeNormalization;

/// Normalize extracted glyph text.
///
/// Applies NFKC so presentation forms (ligatures, full-width letters,
/// compatibility digits) become their plain equivalents, and drops the
/// Unicode replacement character left behind by failed decodes.
pub fn normalize_text(text: &str) -> String {
    text.nfkc().filter(|&c| c != '\u{FFFD}').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        assert_eq!(normalize_text("Hello"), "Hello");
    }

    #[test]
    fn test_ligature_expanded() {
        assert_eq!(normalize_text("\u{FB01}"), "fi");
        assert_eq!(normalize_text("\u{FB04}"), "ffl");
    }

    #[test]
    fn test_combining_sequence_composed() {
        assert_eq!(normalize_text("e\u{0301}"), "\u{00E9}");
    }

    #[test]
    fn test_precomposed_untouched() {
        assert_eq!(normalize_text("\u{00E9}"), "\u{00E9}");
    }

    #[test]
    fn test_fullwidth_folded() {
        assert_eq!(normalize_text("\u{FF21}"), "A");
    }

    #[test]
    fn test_replacement_char_removed() {
        assert_eq!(normalize_text("\u{FFFD}"), "");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_text(""), "");
    }
}
