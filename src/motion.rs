// Brush motion gate
// A stationary brush touching a subject is not grooming; only a brush
// that is actually reciprocating counts. Keeps a short centroid history
// per apparatus track and thresholds the mean step displacement.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::config::AnalysisConfig;
use crate::detection::Detection;
use crate::geometry;

#[derive(Debug)]
pub struct MotionTracker {
    histories: HashMap<i64, VecDeque<(f64, f64)>>,
    history_len: usize,
    threshold: f64,
}

impl MotionTracker {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            histories: HashMap::new(),
            history_len: config.motion_history_len,
            threshold: config.motion_threshold,
        }
    }

    /// Record this frame's apparatus centroids. Oldest samples are evicted
    /// once a track's history reaches capacity.
    pub fn observe(&mut self, brushes: &[Detection]) {
        for brush in brushes {
            let history = self
                .histories
                .entry(brush.track_id)
                .or_insert_with(|| VecDeque::with_capacity(self.history_len));
            if history.len() == self.history_len {
                history.pop_front();
            }
            history.push_back(geometry::centroid(&brush.bbox));
        }
    }

    /// Whether the apparatus has been moving over its recorded history.
    /// False until at least two samples exist.
    pub fn is_moving(&self, track_id: i64) -> bool {
        let Some(history) = self.histories.get(&track_id) else {
            return false;
        };
        if history.len() < 2 {
            return false;
        }

        let total: f64 = history
            .iter()
            .zip(history.iter().skip(1))
            .map(|(a, b)| geometry::centroid_distance(*a, *b))
            .sum();
        let mean = total / (history.len() - 1) as f64;

        mean > self.threshold
    }
}
