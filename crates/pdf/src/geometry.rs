use crate::types::{LineSegment, Point, Rect};

/// Euclidean distance between two points.
pub fn distance(p0: Point, p1: Point) -> f32 {
    (p1.x - p0.x).hypot(p1.y - p0.y)
}

/// Split a rectangle into its four boundary edges.
///
/// Each edge is the rectangle itself with one coordinate pair collapsed:
/// `y0 <- y1`, `y1 <- y0`, `x0 <- x1`, `x1 <- x0`. No length filtering
/// happens here.
pub fn rectangle_to_bounds(rect: &Rect) -> [LineSegment; 4] {
    let base = LineSegment {
        x0: rect.x0,
        y0: rect.y0,
        x1: rect.x1,
        y1: rect.y1,
        page_number: rect.page_number,
    };
    [
        LineSegment { y0: rect.y1, ..base },
        LineSegment { y1: rect.y0, ..base },
        LineSegment { x0: rect.x1, ..base },
        LineSegment { x1: rect.x0, ..base },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
        Rect {
            x0,
            y0,
            x1,
            y1,
            page_number: 3,
        }
    }

    #[test]
    fn test_distance_pythagorean() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new(-2.5, 7.0);
        let b = Point::new(10.0, -1.0);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn test_distance_zero() {
        let p = Point::new(4.0, 4.0);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_bounds_are_axis_aligned_edges() {
        let edges = rectangle_to_bounds(&rect(10.0, 20.0, 110.0, 70.0));

        // top and bottom edges are horizontal
        assert_eq!((edges[0].y0, edges[0].y1), (70.0, 70.0));
        assert_eq!((edges[1].y0, edges[1].y1), (20.0, 20.0));
        assert_eq!((edges[0].x0, edges[0].x1), (10.0, 110.0));
        // left and right edges are vertical
        assert_eq!((edges[2].x0, edges[2].x1), (110.0, 110.0));
        assert_eq!((edges[3].x0, edges[3].x1), (10.0, 10.0));
        assert_eq!((edges[3].y0, edges[3].y1), (20.0, 70.0));
    }

    #[test]
    fn test_bounds_keep_page_number() {
        let edges = rectangle_to_bounds(&rect(0.0, 0.0, 50.0, 50.0));
        assert!(edges.iter().all(|e| e.page_number == 3));
    }

    #[test]
    fn test_bounds_reassemble_bounding_box() {
        let r = rect(5.0, 80.0, 45.0, 30.0);
        let edges = rectangle_to_bounds(&r);

        let min_x = edges.iter().map(|e| e.x0.min(e.x1)).fold(f32::MAX, f32::min);
        let max_x = edges.iter().map(|e| e.x0.max(e.x1)).fold(f32::MIN, f32::max);
        let min_y = edges.iter().map(|e| e.y0.min(e.y1)).fold(f32::MAX, f32::min);
        let max_y = edges.iter().map(|e| e.y0.max(e.y1)).fold(f32::MIN, f32::max);

        assert_eq!((min_x, max_x), (5.0, 45.0));
        assert_eq!((min_y, max_y), (30.0, 80.0));
    }

    #[test]
    fn test_adjacent_edges_share_one_coordinate_with_original() {
        let r = rect(1.0, 2.0, 30.0, 40.0);
        let edges = rectangle_to_bounds(&r);

        let originals = [r.x0, r.y0, r.x1, r.y1];
        for e in &edges {
            let coords = [e.x0, e.y0, e.x1, e.y1];
            let changed = coords
                .iter()
                .zip(originals.iter())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(changed, 1, "edge {:?} should differ in one field", e);
        }
    }
}
