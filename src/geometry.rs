// Box geometry helpers
// Pure functions over pixel-space boxes. Degenerate input yields a
// "no relation" result rather than an error; one bad detection must
// never abort the rest of the video.

use crate::detection::BoundingBox;

/// Midpoint of a box.
pub fn centroid(bbox: &BoundingBox) -> (f64, f64) {
    ((bbox.x1 + bbox.x2) / 2.0, (bbox.y1 + bbox.y2) / 2.0)
}

/// Euclidean distance between two points.
pub fn centroid_distance(p: (f64, f64), q: (f64, f64)) -> f64 {
    let dx = p.0 - q.0;
    let dy = p.1 - q.1;
    (dx * dx + dy * dy).sqrt()
}

/// Whether two boxes intersect, and the intersection area as a fraction of
/// box `a`'s area. Asymmetric: the caller picks which box is the denominator.
pub fn overlap(a: &BoundingBox, b: &BoundingBox) -> (bool, f64) {
    if a.is_degenerate() || b.is_degenerate() {
        return (false, 0.0);
    }

    let ix = (a.x2.min(b.x2) - a.x1.max(b.x1)).max(0.0);
    let iy = (a.y2.min(b.y2) - a.y1.max(b.y1)).max(0.0);
    let intersection = ix * iy;
    if intersection <= 0.0 {
        return (false, 0.0);
    }

    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    if area_a <= 0.0 {
        // Zero-area box overlapping only on an edge
        return (false, 0.0);
    }

    (true, intersection / area_a)
}

/// True iff `inner` lies fully within `outer`'s extent.
pub fn contains(inner: &BoundingBox, outer: &BoundingBox) -> bool {
    if inner.is_degenerate() || outer.is_degenerate() {
        return false;
    }
    inner.x1 >= outer.x1 && inner.y1 >= outer.y1 && inner.x2 <= outer.x2 && inner.y2 <= outer.y2
}

/// True iff `point` lies within `bbox` expanded by `buffer` px on all sides.
pub fn point_near_box(point: (f64, f64), bbox: &BoundingBox, buffer: f64) -> bool {
    if bbox.is_degenerate() {
        return false;
    }
    let (x, y) = point;
    x >= bbox.x1 - buffer && x <= bbox.x2 + buffer && y >= bbox.y1 - buffer && y <= bbox.y2 + buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: f64, y1: f64, x2: f64, y2: f64) -> BoundingBox {
        BoundingBox::new(x1, y1, x2, y2)
    }

    #[test]
    fn test_centroid() {
        assert_eq!(centroid(&bbox(0.0, 0.0, 10.0, 20.0)), (5.0, 10.0));
    }

    #[test]
    fn test_centroid_distance() {
        let d = centroid_distance((0.0, 0.0), (3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_identical_boxes() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let (intersects, ratio) = overlap(&a, &a);
        assert!(intersects);
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_disjoint() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(20.0, 20.0, 30.0, 30.0);
        assert_eq!(overlap(&a, &b), (false, 0.0));
    }

    #[test]
    fn test_overlap_is_asymmetric() {
        let small = bbox(0.0, 0.0, 10.0, 10.0);
        let big = bbox(0.0, 0.0, 100.0, 100.0);
        let (_, small_ratio) = overlap(&small, &big);
        let (_, big_ratio) = overlap(&big, &small);
        assert!((small_ratio - 1.0).abs() < 1e-9);
        assert!((big_ratio - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_edge_touch_is_not_overlap() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(10.0, 0.0, 20.0, 10.0);
        assert_eq!(overlap(&a, &b), (false, 0.0));
    }

    #[test]
    fn test_overlap_degenerate_box() {
        let a = bbox(10.0, 10.0, 0.0, 0.0);
        let b = bbox(0.0, 0.0, 10.0, 10.0);
        assert_eq!(overlap(&a, &b), (false, 0.0));
        assert_eq!(overlap(&b, &a), (false, 0.0));
    }

    #[test]
    fn test_contains() {
        let inner = bbox(2.0, 2.0, 8.0, 8.0);
        let outer = bbox(0.0, 0.0, 10.0, 10.0);
        assert!(contains(&inner, &outer));
        assert!(!contains(&outer, &inner));
        // A box contains itself
        assert!(contains(&outer, &outer));
    }

    #[test]
    fn test_point_near_box() {
        let b = bbox(0.0, 0.0, 10.0, 10.0);
        assert!(point_near_box((5.0, 5.0), &b, 0.0));
        assert!(point_near_box((-5.0, 5.0), &b, 5.0));
        assert!(!point_near_box((-5.1, 5.0), &b, 5.0));
        assert!(!point_near_box((5.0, 20.0), &b, 5.0));
    }
}
