use crate::normalize::normalize_text;
use crate::parser::text::{GlyphEvent, GlyphVisitor};
use crate::style::infer_style;
use crate::types::GlyphPosition;

/// Accumulates one [`GlyphPosition`] per glyph event.
///
/// One collector serves a single pass over a document; the records keep
/// stream-encounter order.
pub struct TextPositionCollector {
    positions: Vec<GlyphPosition>,
    normalize: fn(&str) -> String,
}

impl TextPositionCollector {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normalize: normalize_text,
        }
    }

    /// Replace the text normalizer.
    pub fn with_normalizer(normalize: fn(&str) -> String) -> Self {
        Self {
            positions: Vec::new(),
            normalize,
        }
    }

    /// Record one glyph.
    ///
    /// A glyph without a font gets no font name and no style flags.
    pub fn on_glyph(&mut self, event: &GlyphEvent<'_>) {
        let font_name = event.font.and_then(|f| f.base_font.clone());
        let descriptor = event.font.and_then(|f| f.descriptor.as_ref());
        let style = infer_style(descriptor, font_name.as_deref());

        self.positions.push(GlyphPosition {
            text: (self.normalize)(event.unicode),
            x: event.x,
            y: round2(event.y),
            page_number: event.page_number,
            font_size: event.font_size,
            height: event.height,
            width: event.width,
            font_name,
            is_italic: style.is_italic,
            is_bold: style.is_bold,
        });
    }

    /// Records collected so far.
    pub fn get_data(&self) -> &[GlyphPosition] {
        &self.positions
    }

    pub fn finish(self) -> Vec<GlyphPosition> {
        self.positions
    }
}

impl Default for TextPositionCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphVisitor for TextPositionCollector {
    fn on_glyph(&mut self, event: &GlyphEvent<'_>) {
        TextPositionCollector::on_glyph(self, event);
    }
}

/// Round to two decimals, half away from zero.
///
/// The shift is done on the shortest decimal form (`20.005` -> `2000.5`)
/// so binary representation error cannot pull a half down.
fn round2(v: f32) -> f32 {
    let shifted = format!("{}e2", v).parse::<f32>().unwrap_or(v * 100.0);
    shifted.round() / 100.0
}
