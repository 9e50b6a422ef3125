// Detection input model
// Per-frame typed bounding boxes from the external detector/tracker.
// Track ids are stable only while tracking holds; identity continuity
// comes from the identity resolver, never from the track id.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;

/// Axis-aligned pixel-space box, x1 < x2 and y1 < y2 for well-formed input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// A box with inverted extents carries no usable geometry.
    pub fn is_degenerate(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }
}

/// Object classes emitted by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    /// The moving grooming brush.
    Apparatus,
    /// A tracked animal body.
    Subject,
    /// An animal head, expected inside some subject's body box.
    SubjectHead,
    /// The stationary water tub.
    Receptacle,
}

/// One detector output record for one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub track_id: i64,
    pub class: ObjectClass,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// One frame of detector output as read from the JSONL ingest stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub detections: Vec<Detection>,
}

/// Detections for one frame, bucketed by class with confidence filtering
/// already applied.
#[derive(Debug, Default)]
pub struct FrameDetections {
    pub subjects: Vec<Detection>,
    pub heads: Vec<Detection>,
    pub brushes: Vec<Detection>,
    pub tubs: Vec<Detection>,
}

impl FrameDetections {
    /// Bucket raw detections, dropping low-confidence boxes and degenerate
    /// geometry. A bad box excludes itself, never the frame.
    pub fn from_raw(detections: &[Detection], config: &AnalysisConfig) -> Self {
        let mut out = Self::default();
        for det in detections {
            if det.bbox.is_degenerate() {
                log::warn!(
                    "dropping degenerate box for track {} ({:?})",
                    det.track_id,
                    det.class
                );
                continue;
            }
            if det.confidence < config.detection_confidence_min {
                continue;
            }
            match det.class {
                ObjectClass::Apparatus => out.brushes.push(det.clone()),
                ObjectClass::Subject => out.subjects.push(det.clone()),
                ObjectClass::SubjectHead => {
                    if det.confidence >= config.head_confidence_min {
                        out.heads.push(det.clone());
                    }
                }
                ObjectClass::Receptacle => out.tubs.push(det.clone()),
            }
        }
        out
    }
}
