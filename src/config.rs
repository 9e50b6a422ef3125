// Analysis configuration
// All thresholds the pipeline uses, named and validated up front.
// Invalid values are the only fatal condition in the core: fail before
// the first frame, never mid-stream.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{HerdwatchError, Result};

/// Every tunable threshold for a run. Defaults match `constants`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum detection confidence to consider a box at all.
    pub detection_confidence_min: f32,
    /// Minimum confidence for head boxes specifically.
    pub head_confidence_min: f32,

    /// Subject-to-brush centroid distance below which grooming is possible (px).
    pub grooming_distance_threshold: f64,
    /// Subject/brush overlap ratio above which grooming is possible.
    pub grooming_overlap_ratio: f64,

    /// Centroid samples kept per apparatus for the motion gate.
    pub motion_history_len: usize,
    /// Mean consecutive displacement (px/step) above which an apparatus is moving.
    pub motion_threshold: f64,

    /// Head-box overlap with a tub above which drinking is active.
    pub drinking_head_overlap: f64,
    /// Body-box overlap with a tub above which drinking is active (no head resolved).
    pub drinking_body_overlap: f64,

    /// Maximum silent gap still bridged into one event (seconds).
    pub merge_gap_secs: f64,
    /// Silent gap after which an open event is closed and flushed (seconds).
    pub finalize_gap_secs: f64,
    /// Minimum merged span for a grooming event to be recorded (seconds).
    pub grooming_min_duration_secs: f64,
    /// Minimum merged span for a drinking event to be recorded (frames).
    pub drinking_min_active_frames: u64,

    /// Body box expansion when testing head contact (px).
    pub head_proximity_buffer: f64,
    /// Minimum head speed for a nudge to count (px/frame).
    pub min_nudge_speed: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            detection_confidence_min: DETECTION_CONFIDENCE_MIN,
            head_confidence_min: HEAD_CONFIDENCE_MIN,
            grooming_distance_threshold: GROOMING_DISTANCE_THRESHOLD,
            grooming_overlap_ratio: GROOMING_OVERLAP_RATIO,
            motion_history_len: MOTION_HISTORY_LEN,
            motion_threshold: MOTION_THRESHOLD,
            drinking_head_overlap: DRINKING_HEAD_OVERLAP,
            drinking_body_overlap: DRINKING_BODY_OVERLAP,
            merge_gap_secs: MERGE_GAP_SECS,
            finalize_gap_secs: FINALIZE_GAP_SECS,
            grooming_min_duration_secs: GROOMING_MIN_DURATION_SECS,
            drinking_min_active_frames: DRINKING_MIN_ACTIVE_FRAMES,
            head_proximity_buffer: HEAD_PROXIMITY_BUFFER,
            min_nudge_speed: MIN_NUDGE_SPEED,
        }
    }
}

impl AnalysisConfig {
    /// Validate thresholds together with the run fps. Must be called before
    /// processing starts.
    pub fn validate(&self, fps: f64) -> Result<()> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(HerdwatchError::InvalidConfig(format!(
                "fps must be positive, got {}",
                fps
            )));
        }
        if self.motion_history_len < 2 {
            return Err(HerdwatchError::InvalidConfig(
                "motion_history_len must be at least 2".to_string(),
            ));
        }

        let non_negative = [
            ("grooming_distance_threshold", self.grooming_distance_threshold),
            ("grooming_overlap_ratio", self.grooming_overlap_ratio),
            ("motion_threshold", self.motion_threshold),
            ("drinking_head_overlap", self.drinking_head_overlap),
            ("drinking_body_overlap", self.drinking_body_overlap),
            ("merge_gap_secs", self.merge_gap_secs),
            ("finalize_gap_secs", self.finalize_gap_secs),
            ("grooming_min_duration_secs", self.grooming_min_duration_secs),
            ("head_proximity_buffer", self.head_proximity_buffer),
            ("min_nudge_speed", self.min_nudge_speed),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(HerdwatchError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Merge gap expressed in whole frames at the run's fps.
    pub fn merge_gap_frames(&self, fps: f64) -> u64 {
        (self.merge_gap_secs * fps).round() as u64
    }

    /// Finalize gap expressed in whole frames at the run's fps.
    pub fn finalize_gap_frames(&self, fps: f64) -> u64 {
        (self.finalize_gap_secs * fps).round() as u64
    }
}
