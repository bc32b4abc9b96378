use std::path::Path;

use log::{debug, trace};
use thiserror::Error;

use parser::backend::{LopdfBackend, PdfBackend};

pub mod collector;
pub mod geometry;
pub mod normalize;
pub mod outline;
pub mod parser;
pub mod style;
pub mod types;

pub use collector::{LineSegmentCollector, TextPositionCollector, DEFAULT_CUTOFF};
pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tunables for line-segment extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractOptions {
    /// Segments (and rectangle diagonals) must be strictly longer than this.
    pub cutoff: f32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// A loaded PDF document.
///
/// Constructed via [`ParsedDocument::from_bytes`]. Each extraction runs a
/// fresh pass over the already parsed object graph.
pub struct ParsedDocument {
    backend: LopdfBackend,
}

impl ParsedDocument {
    /// Parse PDF bytes. Encrypted documents are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        debug!("loaded document with {} pages", backend.page_count());
        Ok(Self { backend })
    }

    /// Read and parse a PDF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already loaded `lopdf` document.
    pub fn from_document(doc: lopdf::Document) -> Self {
        Self {
            backend: LopdfBackend::from_document(doc),
        }
    }

    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// One record per rendered glyph, across all pages in page order.
    pub fn text_positions(&self) -> Result<Vec<GlyphPosition>, PdfError> {
        let mut collector = TextPositionCollector::new();
        parser::text::replay_glyphs(&self.backend, &mut collector)?;
        Ok(collector.finish())
    }

    /// Ruling lines and rectangle edges with the default cutoff.
    pub fn line_segments(&self) -> Result<Vec<LineSegment>, PdfError> {
        self.line_segments_with(&ExtractOptions::default())
    }

    /// Ruling lines and rectangle edges, one collector per page.
    pub fn line_segments_with(
        &self,
        options: &ExtractOptions,
    ) -> Result<Vec<LineSegment>, PdfError> {
        let mut segments = Vec::new();

        for (&page_number, &page_id) in &self.backend.pages() {
            let [_, _, _, top_y] = self.backend.crop_box(page_id)?;
            let mut collector = LineSegmentCollector::with_cutoff(top_y, options.cutoff);
            parser::path::replay_page_paths(&self.backend, page_id, &mut collector)?;

            let page_segments = collector.finish();
            trace!("page {}: {} line segments", page_number, page_segments.len());
            segments.extend(page_segments.into_iter().map(|mut s| {
                s.page_number = page_number;
                s
            }));
        }

        Ok(segments)
    }

    /// The outline forest, or `None` if the document has no outline.
    pub fn bookmarks(&self) -> Option<Vec<OutlineNode>> {
        outline::get_bookmarks(&self.backend)
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions (stateless, re-parse each call)
// ---------------------------------------------------------------------------

/// Extract per-glyph positions from PDF bytes.
pub fn extract_text_positions(bytes: &[u8]) -> Result<Vec<GlyphPosition>, PdfError> {
    ParsedDocument::from_bytes(bytes)?.text_positions()
}

/// Extract line segments from PDF bytes with the default cutoff.
pub fn extract_line_segments(bytes: &[u8]) -> Result<Vec<LineSegment>, PdfError> {
    ParsedDocument::from_bytes(bytes)?.line_segments()
}

pub fn extract_line_segments_with(
    bytes: &[u8],
    options: &ExtractOptions,
) -> Result<Vec<LineSegment>, PdfError> {
    ParsedDocument::from_bytes(bytes)?.line_segments_with(options)
}

/// Extract the bookmark tree from PDF bytes.
///
/// `Ok(None)` means the document parsed but has no outline.
pub fn extract_bookmarks(bytes: &[u8]) -> Result<Option<Vec<OutlineNode>>, PdfError> {
    Ok(ParsedDocument::from_bytes(bytes)?.bookmarks())
}
