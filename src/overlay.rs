// Overlay instructions for the annotated video
// The core never touches pixels; it emits labelled boxes and banners per
// frame and hands them to an AnnotationSink. Encoding and drawing are the
// video layer's job.

use serde::{Deserialize, Serialize};

use crate::detection::BoundingBox;
use crate::error::Result;

/// Color roles the renderer maps to actual colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayStyle {
    Subject,
    SubjectHead,
    Apparatus,
    Receptacle,
    GroomingActive,
    DrinkingActive,
    CollisionHighlight,
}

/// One labelled box to draw on one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overlay {
    pub bbox: BoundingBox,
    pub label: String,
    pub style: OverlayStyle,
}

/// Destination for per-frame overlay lists.
pub trait AnnotationSink {
    fn annotate_frame(&mut self, frame_idx: u64, overlays: &[Overlay]) -> Result<()>;
}

/// Discards overlays; used when no annotated video is wanted.
#[derive(Debug, Default)]
pub struct NullAnnotationSink;

impl AnnotationSink for NullAnnotationSink {
    fn annotate_frame(&mut self, _frame_idx: u64, _overlays: &[Overlay]) -> Result<()> {
        Ok(())
    }
}

/// Writes one JSON line of overlays per frame, for an external renderer.
pub struct JsonlAnnotationSink<W: std::io::Write> {
    writer: W,
}

impl<W: std::io::Write> JsonlAnnotationSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
struct FrameOverlays<'a> {
    frame: u64,
    overlays: &'a [Overlay],
}

impl<W: std::io::Write> AnnotationSink for JsonlAnnotationSink<W> {
    fn annotate_frame(&mut self, frame_idx: u64, overlays: &[Overlay]) -> Result<()> {
        if overlays.is_empty() {
            return Ok(());
        }
        let line = serde_json::to_string(&FrameOverlays { frame: frame_idx, overlays })?;
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonl_sink_skips_empty_frames() {
        let mut buf = Vec::new();
        {
            let mut sink = JsonlAnnotationSink::new(&mut buf);
            sink.annotate_frame(0, &[]).unwrap();
            sink.annotate_frame(
                1,
                &[Overlay {
                    bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                    label: "cow - 7".to_string(),
                    style: OverlayStyle::Subject,
                }],
            )
            .unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("\"frame\":1"));
        assert!(text.contains("cow - 7"));
    }
}
