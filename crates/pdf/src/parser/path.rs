//! Path-construction replay over a page content stream.
//!
//! Handles: q, Q, cm, m, l, c, v, y, h, re, S, s, f, F, f*, B, B*, b, b*, n, W, W*
//!
//! Every point is mapped through the current transformation matrix before
//! it reaches the [`PathSink`], so sinks see page space.

use log::trace;

use super::backend::{PageId, PdfBackend};
use super::matrix::{CtmStack, Matrix};
use crate::types::Point;
use crate::PdfError;

/// Receives path-construction events in content-stream order.
///
/// Only the construction primitives are required. Curves, close-path,
/// painting and clipping default to no-ops.
pub trait PathSink {
    /// Begin a new subpath at `p`.
    fn move_to(&mut self, p: Point);

    /// Straight segment from the current point to `p`.
    fn line_to(&mut self, p: Point);

    /// Rectangle with corners in drawing order: `(x, y)`, `(x+w, y)`,
    /// `(x+w, y+h)`, `(x, y+h)`.
    fn append_rectangle(&mut self, p0: Point, p1: Point, p2: Point, p3: Point);

    /// The sink's current point. The driver reads it for the `v` operator,
    /// whose first control point is the current point.
    fn current_point(&self) -> Point;

    fn curve_to(&mut self, _c1: Point, _c2: Point, _end: Point) {}

    fn close_path(&mut self) {}

    fn stroke_path(&mut self) {}

    fn fill_path(&mut self, _even_odd: bool) {}

    fn fill_and_stroke_path(&mut self, _even_odd: bool) {}

    fn end_path(&mut self) {}

    fn clip(&mut self, _even_odd: bool) {}
}

/// Replay the path operators of one page into `sink`.
pub fn replay_page_paths(
    backend: &dyn PdfBackend,
    page_id: PageId,
    sink: &mut dyn PathSink,
) -> Result<(), PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;

    let mut gs = CtmStack::default();
    let mut constructed = 0usize;

    for op in &ops {
        let ctm = gs.ctm();
        let at = |x: f32, y: f32| ctm.transform(x, y);

        match (op.operator.as_str(), op.numbers().as_deref()) {
            // -- Graphics state -----------------------------------------
            ("q", _) => gs.save(),
            ("Q", _) => gs.restore(),
            ("cm", Some(vals)) => {
                if let Some(m) = Matrix::from_operands(vals) {
                    gs.concat(m);
                }
            }

            // -- Path construction --------------------------------------
            ("m", Some(&[x, y])) => {
                sink.move_to(at(x, y));
                constructed += 1;
            }
            ("l", Some(&[x, y])) => {
                sink.line_to(at(x, y));
                constructed += 1;
            }
            ("c", Some(&[x1, y1, x2, y2, x3, y3])) => {
                sink.curve_to(at(x1, y1), at(x2, y2), at(x3, y3));
            }
            ("v", Some(&[x2, y2, x3, y3])) => {
                let c1 = sink.current_point();
                sink.curve_to(c1, at(x2, y2), at(x3, y3));
            }
            ("y", Some(&[x1, y1, x3, y3])) => {
                let end = at(x3, y3);
                sink.curve_to(at(x1, y1), end, end);
            }
            ("h", _) => sink.close_path(),
            ("re", Some(&[x, y, w, h])) => {
                sink.append_rectangle(at(x, y), at(x + w, y), at(x + w, y + h), at(x, y + h));
                constructed += 1;
            }

            // -- Path painting ------------------------------------------
            ("S", _) => sink.stroke_path(),
            ("s", _) => {
                sink.close_path();
                sink.stroke_path();
            }
            ("f" | "F", _) => sink.fill_path(false),
            ("f*", _) => sink.fill_path(true),
            ("B", _) => sink.fill_and_stroke_path(false),
            ("B*", _) => sink.fill_and_stroke_path(true),
            ("b", _) => {
                sink.close_path();
                sink.fill_and_stroke_path(false);
            }
            ("b*", _) => {
                sink.close_path();
                sink.fill_and_stroke_path(true);
            }
            ("n", _) => sink.end_path(),

            // -- Clipping -----------------------------------------------
            ("W", _) => sink.clip(false),
            ("W*", _) => sink.clip(true),

            _ => { /* Ignore non-path operators and malformed operands */ }
        }
    }

    trace!(
        "page {:?}: {} path construction operators",
        page_id,
        constructed
    );
    Ok(())
}
