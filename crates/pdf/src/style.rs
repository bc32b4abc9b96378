//! Bold/italic inference from font descriptors and font names.
//!
//! Descriptors in embedded subset fonts are often missing or wrong, so the
//! base-font name is checked as a fallback. A name like `NotBoldSans` will
//! match; that false positive is accepted.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Descriptor flag bit 7: glyphs have dominant vertical strokes slanted.
pub const FLAG_ITALIC: u32 = 1 << 6;

/// Descriptor flag bit 19: force bold glyphs at small sizes.
pub const FLAG_FORCE_BOLD: u32 = 1 << 18;

/// Weight at or above which a font counts as bold.
const BOLD_WEIGHT: f32 = 700.0;

/// The subset of a `/FontDescriptor` dictionary the extractor cares about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontDescriptor {
    /// The `/Flags` bit field.
    pub flags: u32,
    /// `/FontWeight`, if declared.
    pub weight: Option<f32>,
    /// `/CapHeight` in glyph space (thousandths of text space).
    pub cap_height: Option<f32>,
    /// `/Ascent` in glyph space.
    pub ascent: Option<f32>,
    /// `/MissingWidth` in glyph space.
    pub missing_width: Option<f32>,
}

impl FontDescriptor {
    pub fn is_italic(&self) -> bool {
        self.flags & FLAG_ITALIC != 0
    }

    pub fn is_force_bold(&self) -> bool {
        self.flags & FLAG_FORCE_BOLD != 0
    }

    /// Declared weight, `0.0` when absent.
    pub fn font_weight(&self) -> f32 {
        self.weight.unwrap_or(0.0)
    }
}

/// Inferred glyph style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontStyle {
    pub is_italic: bool,
    pub is_bold: bool,
}

pub fn infer_style(descriptor: Option<&FontDescriptor>, font_name: Option<&str>) -> FontStyle {
    static RE_ITALIC: OnceLock<Regex> = OnceLock::new();
    static RE_BOLD: OnceLock<Regex> = OnceLock::new();
    let re_italic = RE_ITALIC.get_or_init(|| Regex::new(r"(?i)italic").unwrap());
    let re_bold = RE_BOLD.get_or_init(|| Regex::new(r"(?i)bold").unwrap());

    let name_matches = |re: &Regex| font_name.is_some_and(|n| re.is_match(n));

    let is_italic = descriptor.is_some_and(FontDescriptor::is_italic) || name_matches(re_italic);
    let is_bold = descriptor.is_some_and(|d| d.is_force_bold() || d.font_weight() >= BOLD_WEIGHT)
        || name_matches(re_bold);

    FontStyle { is_italic, is_bold }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(flags: u32, weight: Option<f32>) -> FontDescriptor {
        FontDescriptor {
            flags,
            weight,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_inputs_is_plain() {
        assert_eq!(infer_style(None, None), FontStyle::default());
    }

    #[test]
    fn test_italic_flag() {
        let d = descriptor(FLAG_ITALIC, None);
        let style = infer_style(Some(&d), Some("Helvetica"));
        assert!(style.is_italic);
        assert!(!style.is_bold);
    }

    #[test]
    fn test_force_bold_flag() {
        let d = descriptor(FLAG_FORCE_BOLD, None);
        assert!(infer_style(Some(&d), None).is_bold);
    }

    #[test]
    fn test_weight_threshold() {
        assert!(infer_style(Some(&descriptor(0, Some(700.0))), None).is_bold);
        assert!(infer_style(Some(&descriptor(0, Some(900.0))), None).is_bold);
        assert!(!infer_style(Some(&descriptor(0, Some(600.0))), None).is_bold);
    }

    #[test]
    fn test_descriptor_bold_wins_over_plain_name() {
        let d = descriptor(FLAG_FORCE_BOLD, None);
        assert!(infer_style(Some(&d), Some("Times-Roman")).is_bold);
    }

    #[test]
    fn test_name_fallback_without_descriptor() {
        assert!(infer_style(None, Some("ABCDEF+Arial-BoldMT")).is_bold);
        assert!(infer_style(None, Some("bold")).is_bold);
        assert!(infer_style(None, Some("Garamond-ITALIC")).is_italic);
    }

    #[test]
    fn test_name_fallback_with_plain_descriptor() {
        let d = descriptor(0, Some(400.0));
        let style = infer_style(Some(&d), Some("Helvetica-BoldOblique"));
        assert!(style.is_bold);
        // Oblique is not treated as italic by name.
        assert!(!style.is_italic);
    }

    #[test]
    fn test_name_false_positive_is_accepted() {
        assert!(infer_style(None, Some("NotBoldSans")).is_bold);
    }

    #[test]
    fn test_flags_are_independent() {
        let d = descriptor(FLAG_ITALIC | FLAG_FORCE_BOLD, None);
        let style = infer_style(Some(&d), None);
        assert!(style.is_italic && style.is_bold);
    }
}
