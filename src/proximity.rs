// Per-frame contact predicates
// Boolean "active this frame" signals for grooming and drinking. These
// feed the merge/finalize tracker; no state lives here beyond what the
// motion gate carries.

use crate::config::AnalysisConfig;
use crate::detection::{BoundingBox, Detection};
use crate::geometry;
use crate::motion::MotionTracker;

/// Whether a subject is engaged with any moving brush this frame.
/// Contact is centroid distance OR overlap ratio; either way the brush
/// must currently be moving for the contact to count.
pub fn is_grooming(
    subject_box: &BoundingBox,
    brushes: &[Detection],
    motion: &MotionTracker,
    config: &AnalysisConfig,
) -> bool {
    let subject_centroid = geometry::centroid(subject_box);
    brushes.iter().any(|brush| {
        if !motion.is_moving(brush.track_id) {
            return false;
        }
        let distance =
            geometry::centroid_distance(subject_centroid, geometry::centroid(&brush.bbox));
        if distance < config.grooming_distance_threshold {
            return true;
        }
        let (_, ratio) = geometry::overlap(subject_box, &brush.bbox);
        ratio > config.grooming_overlap_ratio
    })
}

/// The first head box fully contained in the subject's body box, if any.
/// At most one head is expected per body, so first match wins.
pub fn find_head<'a>(
    subject_box: &BoundingBox,
    heads: &'a [Detection],
) -> Option<&'a BoundingBox> {
    heads
        .iter()
        .find(|head| geometry::contains(&head.bbox, subject_box))
        .map(|head| &head.bbox)
}

/// Whether a subject is drinking this frame: its head box (tighter
/// threshold) or, failing head resolution, its body box (looser threshold)
/// overlaps some tub beyond the applicable ratio.
pub fn is_drinking(
    subject_box: &BoundingBox,
    heads: &[Detection],
    tubs: &[Detection],
    config: &AnalysisConfig,
) -> bool {
    let (probe, threshold) = match find_head(subject_box, heads) {
        Some(head_box) => (head_box, config.drinking_head_overlap),
        None => (subject_box, config.drinking_body_overlap),
    };

    tubs.iter().any(|tub| {
        let (intersects, ratio) = geometry::overlap(probe, &tub.bbox);
        intersects && ratio > threshold
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ObjectClass;

    fn det(track_id: i64, class: ObjectClass, x1: f64, y1: f64, x2: f64, y2: f64) -> Detection {
        Detection {
            track_id,
            class,
            bbox: BoundingBox::new(x1, y1, x2, y2),
            confidence: 0.9,
        }
    }

    fn moving_tracker(brush: &Detection) -> MotionTracker {
        let config = AnalysisConfig::default();
        let mut motion = MotionTracker::new(&config);
        // Walk the brush across enough frames to look moving
        for i in 0..10 {
            let mut b = brush.clone();
            b.bbox.x1 += i as f64 * 5.0;
            b.bbox.x2 += i as f64 * 5.0;
            motion.observe(&[b]);
        }
        motion
    }

    fn parked_tracker(brush: &Detection) -> MotionTracker {
        let config = AnalysisConfig::default();
        let mut motion = MotionTracker::new(&config);
        for _ in 0..10 {
            motion.observe(std::slice::from_ref(brush));
        }
        motion
    }

    #[test]
    fn test_grooming_near_moving_brush() {
        let config = AnalysisConfig::default();
        let subject = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let brush = det(5, ObjectClass::Apparatus, 90.0, 0.0, 130.0, 40.0);
        let motion = moving_tracker(&brush);
        assert!(is_grooming(&subject, &[brush], &motion, &config));
    }

    #[test]
    fn test_no_grooming_against_parked_brush() {
        let config = AnalysisConfig::default();
        let subject = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        // Overlapping the subject, but stationary
        let brush = det(5, ObjectClass::Apparatus, 50.0, 50.0, 120.0, 120.0);
        let motion = parked_tracker(&brush);
        assert!(!is_grooming(&subject, &[brush], &motion, &config));
    }

    #[test]
    fn test_no_grooming_when_far() {
        let config = AnalysisConfig::default();
        let subject = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        let brush = det(5, ObjectClass::Apparatus, 500.0, 500.0, 540.0, 540.0);
        let motion = moving_tracker(&brush);
        assert!(!is_grooming(&subject, &[brush], &motion, &config));
    }

    #[test]
    fn test_find_head_requires_containment() {
        let subject = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let inside = det(2, ObjectClass::SubjectHead, 10.0, 10.0, 30.0, 30.0);
        let outside = det(3, ObjectClass::SubjectHead, 200.0, 200.0, 220.0, 220.0);
        assert!(find_head(&subject, &[outside.clone()]).is_none());
        let detections = [outside, inside.clone()];
        let found = find_head(&subject, &detections).unwrap();
        assert_eq!(*found, inside.bbox);
    }

    #[test]
    fn test_drinking_with_resolved_head() {
        let config = AnalysisConfig::default();
        let subject = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let head = det(2, ObjectClass::SubjectHead, 70.0, 70.0, 100.0, 100.0);
        // Tub covers the lower-right quarter of the head box
        let tub = det(9, ObjectClass::Receptacle, 85.0, 85.0, 200.0, 200.0);
        assert!(is_drinking(&subject, &[head], &[tub], &config));
    }

    #[test]
    fn test_drinking_body_fallback() {
        let config = AnalysisConfig::default();
        let subject = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        // No head resolves; body overlap of 4% clears the 3% body threshold
        let tub = det(9, ObjectClass::Receptacle, 80.0, 80.0, 200.0, 200.0);
        assert!(is_drinking(&subject, &[], &[tub], &config));
    }

    #[test]
    fn test_drinking_below_threshold() {
        let config = AnalysisConfig::default();
        let subject = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        // 1% body overlap, under both thresholds
        let tub = det(9, ObjectClass::Receptacle, 90.0, 90.0, 200.0, 200.0);
        assert!(!is_drinking(&subject, &[], &[tub], &config));
    }
}
