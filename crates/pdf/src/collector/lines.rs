use crate::geometry::{distance, rectangle_to_bounds};
use crate::parser::path::PathSink;
use crate::types::{LineSegment, Point, Rect};

/// Minimum length a segment must exceed to be kept.
///
/// Shorter strokes are kerning marks, hairline artifacts and anti-aliasing
/// fragments rather than ruling lines or borders.
pub const DEFAULT_CUTOFF: f32 = 20.0;

/// Collects ruling lines and rectangle edges for one page.
///
/// Coordinates are flipped to top-down using the crop box top captured at
/// construction. `page_number` is left at zero; the page loop stamps it.
#[derive(Debug, Clone)]
pub struct LineSegmentCollector {
    segments: Vec<LineSegment>,
    pen: Point,
    top_y: f32,
    cutoff: f32,
}

impl LineSegmentCollector {
    pub fn new(top_y: f32) -> Self {
        Self::with_cutoff(top_y, DEFAULT_CUTOFF)
    }

    pub fn with_cutoff(top_y: f32, cutoff: f32) -> Self {
        Self {
            segments: Vec::new(),
            pen: Point::default(),
            top_y,
            cutoff,
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.pen = Point::new(x, y);
    }

    /// Record the segment from the pen to `(x, y)` if it is long enough.
    /// The pen moves either way.
    pub fn line_to(&mut self, x: f32, y: f32) {
        let target = Point::new(x, y);
        if distance(self.pen, target) > self.cutoff {
            self.segments.push(LineSegment {
                x0: self.pen.x,
                y0: self.top_y - self.pen.y,
                x1: x,
                y1: self.top_y - y,
                page_number: 0,
            });
        }
        self.pen = target;
    }

    /// Record the four edges of the rectangle spanned by `p0` and `p2`.
    ///
    /// The diagonal decides for all four edges; edges are not filtered on
    /// their own. The pen does not move.
    pub fn append_rectangle(&mut self, p0: Point, _p1: Point, p2: Point, _p3: Point) {
        if distance(p0, p2) <= self.cutoff {
            return;
        }
        let rect = Rect {
            x0: p0.x,
            y0: self.top_y - p0.y,
            x1: p2.x,
            y1: self.top_y - p2.y,
            page_number: 0,
        };
        self.segments.extend(rectangle_to_bounds(&rect));
    }

    pub fn current_point(&self) -> Point {
        self.pen
    }

    /// Segments collected so far.
    pub fn get_data(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn finish(self) -> Vec<LineSegment> {
        self.segments
    }
}

impl PathSink for LineSegmentCollector {
    fn move_to(&mut self, p: Point) {
        LineSegmentCollector::move_to(self, p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        LineSegmentCollector::line_to(self, p.x, p.y);
    }

    fn append_rectangle(&mut self, p0: Point, p1: Point, p2: Point, p3: Point) {
        LineSegmentCollector::append_rectangle(self, p0, p1, p2, p3);
    }

    fn current_point(&self) -> Point {
        self.pen
    }
}
