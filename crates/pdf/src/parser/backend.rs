use std::collections::BTreeMap;

use lopdf::{self, content::Content};

use crate::style::FontDescriptor;
use crate::PdfError;

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// A page box `[llx, lly, urx, ury]`.
pub type PageBox = [f32; 4];

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Font information extracted from a page's resource dictionary.
#[derive(Debug, Clone, Default)]
pub struct FontInfo {
    /// The font name key as it appears in the resource dictionary (e.g. `b"F1"`).
    pub name: Vec<u8>,
    /// Base font name from the font dictionary, if present.
    pub base_font: Option<String>,
    /// Font subtype (e.g. `Type1`, `TrueType`, `Type0`).
    pub subtype: Option<String>,
    /// Encoding entry from the font dictionary, if present.
    pub encoding: Option<String>,
    /// The font descriptor, looked up through `DescendantFonts` for Type0.
    pub descriptor: Option<FontDescriptor>,
    /// `/FirstChar` of a simple font.
    pub first_char: u32,
    /// `/Widths` of a simple font, in glyph space.
    pub widths: Vec<f32>,
}

impl FontInfo {
    /// Whether text strings shown in this font use two-byte codes.
    pub fn is_two_byte(&self) -> bool {
        self.subtype.as_deref() == Some("Type0")
            || self
                .encoding
                .as_deref()
                .is_some_and(|e| e.starts_with("Identity"))
    }

    /// Advance width of a character code in glyph space (1/1000 em).
    pub fn glyph_width(&self, code: u32) -> Option<f32> {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize).copied())
            .filter(|w| *w > 0.0)
            .or_else(|| {
                self.descriptor
                    .as_ref()
                    .and_then(|d| d.missing_width)
                    .filter(|w| *w > 0.0)
            })
    }
}

/// One character code decoded from a text-showing operand.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedGlyph {
    pub code: u32,
    pub text: String,
}

/// A simplified, lopdf-independent representation of a PDF value.
///
/// This enum decouples higher-level logic from the concrete `lopdf::Object`
/// type so that the replay drivers can work with pure data.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Dict(Vec<(Vec<u8>, PdfValue)>),
    Reference(PageId),
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: &str, operands: Vec<PdfValue>) -> Self {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    /// All operands as numbers, or `None` if any operand is not numeric.
    pub fn numbers(&self) -> Option<Vec<f32>> {
        self.operands.iter().map(get_number_from_value).collect()
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Extract an `f32` from a [`PdfValue`], accepting both `Integer` and `Real`.
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(f) => Some(*f),
        _ => None,
    }
}

/// Convert a `lopdf::Object` into a [`PdfValue`].
///
/// References are preserved as `PdfValue::Reference`.  Stream dictionaries
/// are converted but the raw stream bytes are discarded (they must be
/// obtained through [`PdfBackend::page_content`]).
pub fn convert_object(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Null => PdfValue::Null,
        lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => PdfValue::Dict(convert_dict(dict)),
        lopdf::Object::Stream(stream) => PdfValue::Dict(convert_dict(&stream.dict)),
        lopdf::Object::Reference(id) => PdfValue::Reference(*id),
    }
}

fn convert_dict(dict: &lopdf::Dictionary) -> Vec<(Vec<u8>, PdfValue)> {
    dict.iter()
        .map(|(k, v)| (k.clone(), convert_object(v)))
        .collect()
}

/// Best-effort decoding of a PDF text string (titles, metadata).
///
/// Handles three cases in order:
/// 1. UTF-16BE with BOM (`\xFE\xFF` prefix) -- strips BOM and decodes.
/// 2. Valid UTF-8 -- returned as-is.
/// 3. Fallback to Latin-1 (ISO 8859-1) -- each byte mapped to its Unicode
///    code point.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return String::from_utf16_lossy(&utf16_units(payload));
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Split a text-showing operand into per-glyph codes and their unicode text.
///
/// Two-byte fonts (Type0 / Identity encodings) and BOM-prefixed operands
/// are decoded as UTF-16BE code units. Everything else is a single-byte
/// code, mapped through WinAnsi when the font declares it and Latin-1
/// otherwise.
pub fn decode_glyphs(font: Option<&FontInfo>, bytes: &[u8]) -> Vec<DecodedGlyph> {
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return two_byte_glyphs(payload);
    }

    if font.is_some_and(FontInfo::is_two_byte) && bytes.len() % 2 == 0 {
        return two_byte_glyphs(bytes);
    }

    let win_ansi = font
        .and_then(|f| f.encoding.as_deref())
        .is_some_and(|e| e == "WinAnsiEncoding");

    bytes
        .iter()
        .map(|&b| {
            let ch = if win_ansi { win_ansi_char(b) } else { b as char };
            DecodedGlyph {
                code: b as u32,
                text: ch.to_string(),
            }
        })
        .collect()
}

fn two_byte_glyphs(bytes: &[u8]) -> Vec<DecodedGlyph> {
    char::decode_utf16(utf16_units(bytes))
        .map(|r| {
            let ch = r.unwrap_or(char::REPLACEMENT_CHARACTER);
            DecodedGlyph {
                code: ch as u32,
                text: ch.to_string(),
            }
        })
        .collect()
}

/// Trailing odd bytes are dropped.
fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect()
}

/// WinAnsiEncoding differs from Latin-1 only in `0x80..=0x9F`.
fn win_ansi_char(b: u8) -> char {
    const HIGH: [char; 32] = [
        '\u{20AC}', '\u{FFFD}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}',
        '\u{2021}', '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{FFFD}',
        '\u{017D}', '\u{FFFD}', '\u{FFFD}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
        '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
        '\u{0153}', '\u{FFFD}', '\u{017E}', '\u{0178}',
    ];
    match b {
        0x80..=0x9F => HIGH[(b - 0x80) as usize],
        _ => b as char,
    }
}

// ---------------------------------------------------------------------------
// PdfBackend trait
// ---------------------------------------------------------------------------

/// Abstraction over a PDF parsing backend (currently backed by `lopdf`).
///
/// The replay drivers only talk to this trait, so they can be tested
/// against in-memory pages without building real PDF files.
pub trait PdfBackend {
    /// Return a mapping from 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return font information for every font referenced by the given page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<FontInfo>, PdfError>;

    /// Return the (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError>;

    /// Decode raw content-stream bytes into a sequence of [`ContentOp`]s.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError>;

    /// The page's CropBox, falling back to its MediaBox.
    fn crop_box(&self, page: PageId) -> Result<PageBox, PdfError>;

    /// Page `(width, height)` from the MediaBox.
    fn page_dimensions(&self, page: PageId) -> Result<(f32, f32), PdfError>;
}

// ---------------------------------------------------------------------------
// LopdfBackend
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] implementation backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    /// Parse a PDF from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: lopdf::Document) -> Self {
        Self { doc }
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &lopdf::Document {
        &self.doc
    }

    /// Total number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    // -- private helpers ----------------------------------------------------

    fn page_dict(&self, page: PageId) -> Result<&lopdf::Dictionary, PdfError> {
        self.doc
            .get_object(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page object: {}", e)))?
            .as_dict()
            .map_err(|e| PdfError::Parse(format!("page object is not a dictionary: {}", e)))
    }

    /// Read an inheritable page box (`MediaBox`, `CropBox`) as four numbers.
    fn page_box(&self, page: PageId, key: &[u8]) -> Result<Option<PageBox>, PdfError> {
        let page_dict = self.page_dict(page)?;
        let Some(arr) = self.find_inherited_array(page_dict, key, 0) else {
            return Ok(None);
        };

        let nums = self.array_to_f32s(&arr)?;
        match nums.as_slice() {
            [llx, lly, urx, ury, ..] => Ok(Some([*llx, *lly, *urx, *ury])),
            _ => Err(PdfError::Parse(format!(
                "{} has {} elements, expected 4",
                String::from_utf8_lossy(key),
                nums.len()
            ))),
        }
    }

    /// Walk up the page tree to find an inheritable array attribute.
    fn find_inherited_array(
        &self,
        dict: &lopdf::Dictionary,
        key: &[u8],
        depth: usize,
    ) -> Option<Vec<lopdf::Object>> {
        if depth > MAX_PAGE_TREE_DEPTH {
            return None;
        }

        if let Some(arr) = dict.get(key).ok().and_then(|obj| self.resolve_array(obj)) {
            return Some(arr);
        }

        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        let parent_dict = self.doc.get_object(parent_id).ok()?.as_dict().ok()?;
        self.find_inherited_array(parent_dict, key, depth + 1)
    }

    /// Resolve an object to an array, following a single level of indirection.
    fn resolve_array(&self, obj: &lopdf::Object) -> Option<Vec<lopdf::Object>> {
        match self.resolve_object(obj) {
            lopdf::Object::Array(arr) => Some(arr.clone()),
            _ => None,
        }
    }

    /// Follow one level of reference indirection.
    pub(crate) fn resolve_object<'a>(&'a self, obj: &'a lopdf::Object) -> &'a lopdf::Object {
        match obj {
            lopdf::Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    pub(crate) fn resolve_dict<'a>(
        &'a self,
        obj: &'a lopdf::Object,
    ) -> Option<&'a lopdf::Dictionary> {
        self.resolve_object(obj).as_dict().ok()
    }

    pub(crate) fn number(&self, obj: &lopdf::Object) -> Option<f32> {
        match self.resolve_object(obj) {
            lopdf::Object::Integer(i) => Some(*i as f32),
            lopdf::Object::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert a vector of lopdf objects to `f32` values.
    fn array_to_f32s(&self, objects: &[lopdf::Object]) -> Result<Vec<f32>, PdfError> {
        objects
            .iter()
            .map(|obj| {
                self.number(obj).ok_or_else(|| {
                    PdfError::Parse(format!("expected number in array, got {:?}", obj))
                })
            })
            .collect()
    }

    fn dict_name(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
        dict.get(key)
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
    }

    fn font_info(&self, name: &[u8], dict: &lopdf::Dictionary) -> FontInfo {
        let subtype = Self::dict_name(dict, b"Subtype");

        // Type0 fonts keep their metrics on the first descendant.
        let descendant = dict
            .get(b"DescendantFonts")
            .ok()
            .and_then(|o| self.resolve_array(o))
            .and_then(|arr| arr.first().cloned());
        let metrics_dict = descendant
            .as_ref()
            .and_then(|o| self.resolve_dict(o))
            .unwrap_or(dict);

        let descriptor = metrics_dict
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve_dict(o))
            .map(|d| self.font_descriptor(d));

        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| self.number(o))
            .map(|n| n.max(0.0) as u32)
            .unwrap_or(0);

        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| self.resolve_array(o))
            .map(|arr| arr.iter().map(|w| self.number(w).unwrap_or(0.0)).collect())
            .unwrap_or_default();

        FontInfo {
            name: name.to_vec(),
            base_font: Self::dict_name(dict, b"BaseFont"),
            subtype,
            encoding: Self::dict_name(dict, b"Encoding"),
            descriptor,
            first_char,
            widths,
        }
    }

    fn font_descriptor(&self, dict: &lopdf::Dictionary) -> FontDescriptor {
        let num = |key: &[u8]| dict.get(key).ok().and_then(|o| self.number(o));
        FontDescriptor {
            flags: num(b"Flags").map(|f| f.max(0.0) as u32).unwrap_or(0),
            weight: num(b"FontWeight"),
            cap_height: num(b"CapHeight"),
            ascent: num(b"Ascent"),
            missing_width: num(b"MissingWidth"),
        }
    }
}

/// Guards against `/Parent` cycles in malformed page trees.
const MAX_PAGE_TREE_DEPTH: usize = 64;

// ---------------------------------------------------------------------------
// PdfBackend implementation for LopdfBackend
// ---------------------------------------------------------------------------

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<FontInfo>, PdfError> {
        let fonts_map = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page fonts: {}", e)))?;

        Ok(fonts_map
            .iter()
            .map(|(name, dict)| self.font_info(name, dict))
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
        let content = Content::decode(data)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;

        let ops = content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect();

        Ok(ops)
    }

    fn crop_box(&self, page: PageId) -> Result<PageBox, PdfError> {
        if let Some(crop) = self.page_box(page, b"CropBox")? {
            return Ok(crop);
        }
        self.page_box(page, b"MediaBox")?
            .ok_or_else(|| PdfError::Parse("MediaBox not found for page".into()))
    }

    /// MediaBox is an array `[llx, lly, urx, ury]`.  Dimensions are
    /// computed as `(urx - llx, ury - lly)`.
    fn page_dimensions(&self, page: PageId) -> Result<(f32, f32), PdfError> {
        let [llx, lly, urx, ury] = self
            .page_box(page, b"MediaBox")?
            .ok_or_else(|| PdfError::Parse("MediaBox not found for page".into()))?;
        Ok((urx - llx, ury - lly))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
