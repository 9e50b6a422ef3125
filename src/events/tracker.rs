// Merge/finalize activity tracker
// Turns a per-frame boolean "active now" signal into durable events.
// Brief interruptions up to the merge gap are bridged into one event;
// longer silences close the open event, which is recorded only if it
// clears the minimum-span bar. One tracker per behavior; one state per
// subject, created the first time the subject is seen.

use std::collections::HashMap;

/// Minimum span an event must cover to be worth recording.
#[derive(Debug, Clone, Copy)]
pub enum MinSpan {
    /// Merged span in seconds (grooming).
    Seconds(f64),
    /// Merged span in frames (drinking).
    Frames(u64),
}

/// Per-subject bookkeeping for one behavior.
///
/// Invariant: `last_active_end` is Some whenever `merged_start` is Some and
/// at least one active frame has been observed, and `merged_start <=
/// last_active_end`.
#[derive(Debug, Default, Clone)]
struct ActivityState {
    merged_start: Option<u64>,
    last_active_end: Option<u64>,
    active_prev: bool,
}

/// A closed merged span that cleared the minimum bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalizedSpan {
    pub track_id: i64,
    pub start_frame: u64,
    pub end_frame: u64,
}

impl FinalizedSpan {
    /// Inclusive span duration at the run's frame rate. Always positive.
    pub fn duration_secs(&self, fps: f64) -> f64 {
        (self.end_frame - self.start_frame + 1) as f64 / fps
    }
}

#[derive(Debug)]
pub struct ActivityTracker {
    states: HashMap<i64, ActivityState>,
    merge_gap_frames: u64,
    finalize_gap_frames: u64,
    min_span: MinSpan,
    fps: f64,
}

impl ActivityTracker {
    pub fn new(merge_gap_frames: u64, finalize_gap_frames: u64, min_span: MinSpan, fps: f64) -> Self {
        Self {
            states: HashMap::new(),
            merge_gap_frames,
            finalize_gap_frames,
            min_span,
            fps,
        }
    }

    /// Advance one subject by one frame. Returns a finalized span when this
    /// frame's update closes a mature event: either fresh activity arrived
    /// after a gap too wide to merge, or the silence since the last active
    /// frame outgrew the finalize gap.
    pub fn update(&mut self, track_id: i64, active_now: bool, frame_idx: u64) -> Option<FinalizedSpan> {
        let state = self.states.entry(track_id).or_default();
        let mut finalized = None;

        if active_now {
            match (state.merged_start, state.last_active_end) {
                (Some(start), Some(end)) => {
                    // Frames strictly between the last active frame and now
                    let gap = frame_idx.saturating_sub(end + 1);
                    if gap > self.merge_gap_frames {
                        // Too far apart to be one event: flush the old span
                        // and open a fresh one here.
                        finalized =
                            Self::accept(&self.min_span, self.fps, track_id, start, end);
                        state.merged_start = Some(frame_idx);
                    }
                    // Within the merge gap the original start is kept; the
                    // new burst is stitched onto the open event.
                }
                _ => {
                    state.merged_start = Some(frame_idx);
                }
            }
            state.last_active_end = Some(frame_idx);
            state.active_prev = true;
        } else {
            state.active_prev = false;
            if let (Some(start), Some(end)) = (state.merged_start, state.last_active_end) {
                let gap = frame_idx.saturating_sub(end + 1);
                if gap > self.finalize_gap_frames {
                    finalized = Self::accept(&self.min_span, self.fps, track_id, start, end);
                    state.merged_start = None;
                    state.last_active_end = None;
                }
            }
        }

        finalized
    }

    /// Flush every still-open event at end-of-stream, minimum bar applied,
    /// regardless of pending gap. Subjects that vanished from tracking are
    /// flushed here too.
    pub fn finish(&mut self) -> Vec<FinalizedSpan> {
        let mut flushed = Vec::new();
        for (&track_id, state) in self.states.iter_mut() {
            if let (Some(start), Some(end)) = (state.merged_start, state.last_active_end) {
                if let Some(span) = Self::accept(&self.min_span, self.fps, track_id, start, end) {
                    flushed.push(span);
                }
                state.merged_start = None;
                state.last_active_end = None;
            }
        }
        flushed.sort_by_key(|span| (span.start_frame, span.track_id));
        flushed
    }

    /// Whether the subject was active in the previous update.
    pub fn was_active(&self, track_id: i64) -> bool {
        self.states
            .get(&track_id)
            .map(|state| state.active_prev)
            .unwrap_or(false)
    }

    fn accept(
        min_span: &MinSpan,
        fps: f64,
        track_id: i64,
        start: u64,
        end: u64,
    ) -> Option<FinalizedSpan> {
        let span = FinalizedSpan {
            track_id,
            start_frame: start,
            end_frame: end,
        };
        let passes = match *min_span {
            MinSpan::Seconds(min_secs) => span.duration_secs(fps) >= min_secs,
            MinSpan::Frames(min_frames) => end - start + 1 >= min_frames,
        };
        if passes {
            Some(span)
        } else {
            log::debug!(
                "dropping sub-minimum span for track {}: frames {}..{}",
                track_id,
                start,
                end
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FPS: f64 = 30.0;

    /// Drive a tracker with an activity trace: active on listed frames,
    /// inactive on every other frame up to `last_frame`.
    fn run_trace(
        tracker: &mut ActivityTracker,
        active_frames: &[u64],
        last_frame: u64,
    ) -> Vec<FinalizedSpan> {
        let mut out = Vec::new();
        for frame in 0..=last_frame {
            let active = active_frames.contains(&frame);
            if let Some(span) = tracker.update(7, active, frame) {
                out.push(span);
            }
        }
        out.extend(tracker.finish());
        out
    }

    fn frames(ranges: &[(u64, u64)]) -> Vec<u64> {
        ranges.iter().flat_map(|&(a, b)| a..=b).collect()
    }

    #[test]
    fn test_gap_within_merge_tolerance_bridges() {
        // Active [0,9], silent [10,12], active [13,20]: three silent frames.
        let mut tracker = ActivityTracker::new(3, 100, MinSpan::Frames(1), FPS);
        let spans = run_trace(&mut tracker, &frames(&[(0, 9), (13, 20)]), 20);
        assert_eq!(
            spans,
            vec![FinalizedSpan { track_id: 7, start_frame: 0, end_frame: 20 }]
        );
    }

    #[test]
    fn test_gap_beyond_merge_tolerance_splits() {
        let mut tracker = ActivityTracker::new(2, 100, MinSpan::Frames(1), FPS);
        let spans = run_trace(&mut tracker, &frames(&[(0, 9), (13, 20)]), 20);
        assert_eq!(
            spans,
            vec![
                FinalizedSpan { track_id: 7, start_frame: 0, end_frame: 9 },
                FinalizedSpan { track_id: 7, start_frame: 13, end_frame: 20 },
            ]
        );
    }

    #[test]
    fn test_finalize_without_revival() {
        // Active [0,9] then silent until the stream ends at frame 20.
        let mut tracker = ActivityTracker::new(5, 5, MinSpan::Frames(1), FPS);
        let spans = run_trace(&mut tracker, &frames(&[(0, 9)]), 20);
        assert_eq!(
            spans,
            vec![FinalizedSpan { track_id: 7, start_frame: 0, end_frame: 9 }]
        );
    }

    #[test]
    fn test_single_frame_never_emitted() {
        let mut tracker =
            ActivityTracker::new(5, 5, MinSpan::Seconds(1.0), FPS);
        let spans = run_trace(&mut tracker, &[3], 40);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_min_duration_rejection_seconds() {
        // 20 frames at 30 fps is 0.67s, under the 1s bar
        let mut tracker = ActivityTracker::new(5, 5, MinSpan::Seconds(1.0), FPS);
        let spans = run_trace(&mut tracker, &frames(&[(0, 19)]), 60);
        assert!(spans.is_empty());

        // 30 frames is exactly 1.0s
        let mut tracker = ActivityTracker::new(5, 5, MinSpan::Seconds(1.0), FPS);
        let spans = run_trace(&mut tracker, &frames(&[(0, 29)]), 60);
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_min_frames_rejection() {
        let mut tracker = ActivityTracker::new(5, 5, MinSpan::Frames(30), FPS);
        let spans = run_trace(&mut tracker, &frames(&[(0, 28)]), 60);
        assert!(spans.is_empty());

        let mut tracker = ActivityTracker::new(5, 5, MinSpan::Frames(30), FPS);
        let spans = run_trace(&mut tracker, &frames(&[(0, 29)]), 60);
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_duration_formula() {
        let span = FinalizedSpan { track_id: 7, start_frame: 100, end_frame: 130 };
        let secs = span.duration_secs(30.0);
        assert!((secs - 31.0 / 30.0).abs() < 1e-9);
        assert!(secs > 0.0);
    }

    #[test]
    fn test_reactivation_after_finalize_opens_new_event() {
        let mut tracker = ActivityTracker::new(2, 2, MinSpan::Frames(1), FPS);
        // First burst closes via the finalize gap while the subject stays
        // in view; a later burst must become a separate event.
        let spans = run_trace(&mut tracker, &frames(&[(0, 4), (30, 35)]), 50);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].start_frame, 0);
        assert_eq!(spans[0].end_frame, 4);
        assert_eq!(spans[1].start_frame, 30);
        assert_eq!(spans[1].end_frame, 35);
    }

    #[test]
    fn test_merge_preserves_original_start_across_multiple_gaps() {
        let mut tracker = ActivityTracker::new(5, 100, MinSpan::Frames(1), FPS);
        let spans = run_trace(
            &mut tracker,
            &frames(&[(0, 3), (8, 10), (14, 16)]),
            16,
        );
        assert_eq!(
            spans,
            vec![FinalizedSpan { track_id: 7, start_frame: 0, end_frame: 16 }]
        );
    }

    #[test]
    fn test_subjects_tracked_independently() {
        let mut tracker = ActivityTracker::new(5, 5, MinSpan::Frames(1), FPS);
        for frame in 0..10 {
            assert!(tracker.update(1, true, frame).is_none());
            assert!(tracker.update(2, frame < 5, frame).is_none());
        }
        let mut spans = tracker.finish();
        spans.sort_by_key(|s| s.track_id);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].track_id, spans[0].end_frame), (1, 9));
        assert_eq!((spans[1].track_id, spans[1].end_frame), (2, 4));
    }

    #[test]
    fn test_vanished_subject_flushed_at_end() {
        let mut tracker = ActivityTracker::new(5, 5, MinSpan::Frames(1), FPS);
        for frame in 0..40 {
            tracker.update(9, true, frame);
        }
        // No further updates: the subject dropped out of tracking entirely.
        let spans = tracker.finish();
        assert_eq!(
            spans,
            vec![FinalizedSpan { track_id: 9, start_frame: 0, end_frame: 39 }]
        );
        // finish() leaves nothing open behind it
        assert!(tracker.finish().is_empty());
    }

    #[test]
    fn test_was_active_reflects_previous_frame() {
        let mut tracker = ActivityTracker::new(5, 5, MinSpan::Frames(1), FPS);
        assert!(!tracker.was_active(4));
        tracker.update(4, true, 0);
        assert!(tracker.was_active(4));
        tracker.update(4, false, 1);
        assert!(!tracker.was_active(4));
    }
}
