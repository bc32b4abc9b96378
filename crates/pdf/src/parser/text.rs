//! Glyph replay over page content streams.
//!
//! Walks each page's content stream with a text state machine and hands
//! every rendered character code to a [`GlyphVisitor`] as a [`GlyphEvent`],
//! positioned in top-down page space.
//!
//! | Operator | Action |
//! |----------|--------|
//! | `q` `Q` `cm` | Save / restore / concatenate the CTM |
//! | `BT`     | Begin text object -- reset matrices |
//! | `ET`     | End text object |
//! | `Tf`     | Set font and size |
//! | `Tm`     | Set text matrix directly |
//! | `Td`     | Translate text position |
//! | `TD`     | Translate and set leading |
//! | `T*`     | Move to start of next line |
//! | `TL` `Tc` `Tw` `Tz` `Ts` | Text state parameters |
//! | `Tj`     | Show a string |
//! | `TJ`     | Show strings with kerning adjustments |
//! | `'` `"`  | Move to next line and show string |

use log::{debug, trace};

use super::backend::{
    decode_glyphs, get_number_from_value, FontInfo, PageId, PdfBackend, PdfValue,
};
use super::matrix::{CtmStack, Matrix};
use crate::PdfError;

/// Advance width, as a fraction of the font size, used when the font has
/// no usable `/Widths` entry for a code.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// One rendered glyph as seen by a [`GlyphVisitor`].
#[derive(Debug, Clone)]
pub struct GlyphEvent<'a> {
    /// Unicode text of the glyph, before normalization.
    pub unicode: &'a str,
    pub x: f32,
    /// Baseline Y measured down from the top of the crop box.
    pub y: f32,
    /// The font selected by the last `Tf`, if it exists in the page resources.
    pub font: Option<&'a FontInfo>,
    /// Font size in page space (Tf size scaled by text matrix and CTM).
    pub font_size: f32,
    pub height: f32,
    pub width: f32,
    /// 1-based page currently being replayed.
    pub page_number: u32,
}

/// Receives glyph events in content-stream order.
pub trait GlyphVisitor {
    fn on_glyph(&mut self, event: &GlyphEvent<'_>);
}

/// Text state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    /// Index into the page font list of the current font.
    font: Option<usize>,
    /// Current font size in text-space units.
    font_size: f32,
    text_matrix: Matrix,
    /// Text line matrix -- set by BT and updated by Td/TD/T*/Tm.
    line_matrix: Matrix,
    /// Horizontal scaling factor (percent / 100).  Default 1.0.
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 0.0,
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Multiply the text line matrix by a translation (used by Td / TD / T*).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// Advance the text matrix horizontally by `tx` text-space units.
    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }

    /// The text rendering matrix for the current position.
    fn rendering_matrix(&self, ctm: &Matrix) -> Matrix {
        let params = Matrix([
            self.font_size * self.horiz_scale,
            0.0,
            0.0,
            self.font_size,
            0.0,
            self.text_rise,
        ]);
        params.multiply(&self.text_matrix).multiply(ctm)
    }
}

/// Per-page replay context shared by the show-text helpers.
struct PageReplay<'a> {
    fonts: &'a [FontInfo],
    page_number: u32,
    top_y: f32,
    ctm: CtmStack,
    state: TextState,
}

impl PageReplay<'_> {
    fn show(&mut self, operand: &PdfValue, visitor: &mut dyn GlyphVisitor) {
        let PdfValue::Str(bytes) = operand else {
            return;
        };

        let fonts = self.fonts;
        let font = self.state.font.and_then(|i| fonts.get(i));
        let ctm = self.ctm.ctm();
        let single_byte = !font.is_some_and(FontInfo::is_two_byte);

        for glyph in decode_glyphs(font, bytes) {
            let trm = self.state.rendering_matrix(&ctm);
            let device = self.state.text_matrix.multiply(&ctm);
            let fs = self.state.font_size;

            let w0 = font
                .and_then(|f| f.glyph_width(glyph.code))
                .map(|w| w / 1000.0)
                .unwrap_or(APPROX_CHAR_WIDTH_RATIO);
            let font_size = (fs * device.vertical_scale()).abs();

            let event = GlyphEvent {
                unicode: &glyph.text,
                x: trm.tx(),
                y: self.top_y - trm.ty(),
                font,
                font_size,
                height: glyph_height(font, font_size),
                width: (w0 * fs * self.state.horiz_scale * device.horizontal_scale()).abs(),
                page_number: self.page_number,
            };
            visitor.on_glyph(&event);

            let mut tx = w0 * fs + self.state.char_spacing;
            if single_byte && glyph.code == 32 {
                tx += self.state.word_spacing;
            }
            self.state.advance(tx * self.state.horiz_scale);
        }
    }

    fn show_array(&mut self, arr: &[PdfValue], visitor: &mut dyn GlyphVisitor) {
        for elem in arr {
            match elem {
                PdfValue::Str(_) => self.show(elem, visitor),
                val => {
                    // Numeric kerning in thousandths of a text-space unit;
                    // negative values move right.
                    if let Some(adj) = get_number_from_value(val) {
                        let tx = -adj / 1000.0 * self.state.font_size * self.state.horiz_scale;
                        self.state.advance(tx);
                    }
                }
            }
        }
    }

    fn set_font(&mut self, operands: &[PdfValue]) {
        let [key, size, ..] = operands else {
            return;
        };
        let key = match key {
            PdfValue::Name(n) | PdfValue::Str(n) => n.as_slice(),
            _ => return,
        };
        self.state.font_size = get_number_from_value(size).unwrap_or(0.0);
        self.state.font = self.fonts.iter().position(|f| f.name == key);
        if self.state.font.is_none() {
            debug!(
                "page {}: font /{} not found in resources",
                self.page_number,
                String::from_utf8_lossy(key)
            );
        }
    }
}

/// Glyph height from the descriptor's cap height or ascent, falling back to
/// the font size.
fn glyph_height(font: Option<&FontInfo>, font_size: f32) -> f32 {
    font.and_then(|f| f.descriptor.as_ref())
        .and_then(|d| d.cap_height.filter(|h| *h > 0.0).or(d.ascent.filter(|a| *a > 0.0)))
        .map(|h| h / 1000.0 * font_size)
        .unwrap_or(font_size)
}

/// Replay one page's content stream into `visitor`.
pub fn replay_page_glyphs(
    backend: &dyn PdfBackend,
    page_number: u32,
    page_id: PageId,
    visitor: &mut dyn GlyphVisitor,
) -> Result<(), PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_else(|e| {
        debug!("page {}: {}", page_number, e);
        Vec::new()
    });
    let [_, _, _, top_y] = backend.crop_box(page_id)?;

    let mut page = PageReplay {
        fonts: &fonts,
        page_number,
        top_y,
        ctm: CtmStack::default(),
        state: TextState::default(),
    };

    for op in &ops {
        let num = |i: usize| op.operands.get(i).and_then(get_number_from_value);

        match op.operator.as_str() {
            // -- Graphics state -----------------------------------------
            "q" => page.ctm.save(),
            "Q" => page.ctm.restore(),
            "cm" => {
                if let Some(m) = op.numbers().and_then(|v| Matrix::from_operands(&v)) {
                    page.ctm.concat(m);
                }
            }

            // -- Text object delimiters --------------------------------
            "BT" => {
                page.state.text_matrix = Matrix::IDENTITY;
                page.state.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {
                // Font state is kept across text objects.
            }

            // -- Font and matrices -------------------------------------
            "Tf" => page.set_font(&op.operands),
            "Tm" => {
                if let Some(m) = op.numbers().and_then(|v| Matrix::from_operands(&v)) {
                    page.state.text_matrix = m;
                    page.state.line_matrix = m;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    page.state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // TD is equivalent to: -ty TL ; tx ty Td
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    page.state.leading = -ty;
                    page.state.translate_line(tx, ty);
                }
            }
            "T*" => {
                let leading = page.state.leading;
                page.state.translate_line(0.0, -leading);
            }

            // -- Text state parameters ---------------------------------
            "TL" => {
                if let Some(v) = num(0) {
                    page.state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = num(0) {
                    page.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = num(0) {
                    page.state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = num(0) {
                    page.state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = num(0) {
                    page.state.text_rise = v;
                }
            }

            // -- Show text ---------------------------------------------
            "Tj" => {
                if let Some(first) = op.operands.first() {
                    page.show(first, visitor);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    page.show_array(arr, visitor);
                }
            }
            "'" => {
                let leading = page.state.leading;
                page.state.translate_line(0.0, -leading);
                if let Some(first) = op.operands.first() {
                    page.show(first, visitor);
                }
            }
            "\"" => {
                // " aw ac string  =>  set Tw, Tc, T*, Tj
                if let [aw, ac, string, ..] = op.operands.as_slice() {
                    if let Some(aw) = get_number_from_value(aw) {
                        page.state.word_spacing = aw;
                    }
                    if let Some(ac) = get_number_from_value(ac) {
                        page.state.char_spacing = ac;
                    }
                    let leading = page.state.leading;
                    page.state.translate_line(0.0, -leading);
                    page.show(string, visitor);
                }
            }

            _ => { /* Ignore non-text operators */ }
        }
    }

    trace!("page {}: replayed {} operators", page_number, ops.len());
    Ok(())
}

/// Replay every page of the document, in page order, into `visitor`.
pub fn replay_glyphs(
    backend: &dyn PdfBackend,
    visitor: &mut dyn GlyphVisitor,
) -> Result<(), PdfError> {
    for (&page_number, &page_id) in &backend.pages() {
        replay_page_glyphs(backend, page_number, page_id, visitor)?;
    }
    Ok(())
}
