use serde::{Deserialize, Serialize};

/// A point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned rectangle given by two opposite corners, already flipped
/// to top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub page_number: u32,
}

/// One rendered glyph occurrence.
///
/// Records are produced in content-stream order and that order is part of
/// the contract: downstream layout stages rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphPosition {
    /// Normalized unicode text of the glyph.
    pub text: String,
    pub x: f32,
    /// Top-down Y, rounded to two decimals.
    pub y: f32,
    /// 1-based page number.
    pub page_number: u32,
    pub font_size: f32,
    pub height: f32,
    pub width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_bold: bool,
}

/// One boundary edge in top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// 1-based page number. Zero until stamped by the page loop.
    pub page_number: u32,
}

impl LineSegment {
    pub fn length(&self) -> f32 {
        crate::geometry::distance(Point::new(self.x0, self.y0), Point::new(self.x1, self.y1))
    }
}

/// One bookmark in the document outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// Distance from the top of the target page, never negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_offset: Option<f32>,
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::node_count).sum::<usize>()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
