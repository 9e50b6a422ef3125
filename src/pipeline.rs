// Frame analysis pipeline
// Single-threaded, frame-sequential orchestration. Owns every piece of
// per-run mutable state: the behavior trackers, the brush motion history,
// and the dedup sets. External components only see the per-frame entry
// point and the end-of-stream flush; nothing reads or writes the state
// maps directly.

use std::collections::HashSet;

use crate::config::AnalysisConfig;
use crate::detection::{Detection, FrameDetections};
use crate::error::Result;
use crate::events::collision::{CollisionDetector, CollisionHit};
use crate::events::tracker::{ActivityTracker, FinalizedSpan, MinSpan};
use crate::events::{Behavior, BehaviorEvent, EventSink, IdentityResolver};
use crate::motion::MotionTracker;
use crate::overlay::{AnnotationSink, Overlay, OverlayStyle};
use crate::proximity;
use crate::video::VideoMeta;

/// Counts for one processed frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameSummary {
    pub subjects_seen: usize,
    pub events_recorded: usize,
    pub collisions_recorded: usize,
}

/// Totals for a completed run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub events_recorded: usize,
    pub collisions_recorded: usize,
}

pub struct FrameAnalyzer {
    config: AnalysisConfig,
    meta: VideoMeta,
    motion: MotionTracker,
    grooming: ActivityTracker,
    drinking: ActivityTracker,
    collisions: CollisionDetector,
    // Append-only for the life of a run; never cleared mid-run
    logged_grooming: HashSet<(i64, u64)>,
    logged_drinking: HashSet<(i64, u64)>,
    collision_log: Vec<CollisionHit>,
    summary: RunSummary,
    finished: bool,
}

impl FrameAnalyzer {
    /// Build an analyzer for one video. Fails fast on an invalid
    /// configuration; nothing else here can fail.
    pub fn new(config: AnalysisConfig, meta: VideoMeta) -> Result<Self> {
        config.validate(meta.fps)?;
        let fps = meta.fps;
        Ok(Self {
            motion: MotionTracker::new(&config),
            grooming: ActivityTracker::new(
                config.merge_gap_frames(fps),
                config.finalize_gap_frames(fps),
                MinSpan::Seconds(config.grooming_min_duration_secs),
                fps,
            ),
            drinking: ActivityTracker::new(
                config.merge_gap_frames(fps),
                config.finalize_gap_frames(fps),
                MinSpan::Frames(config.drinking_min_active_frames),
                fps,
            ),
            collisions: CollisionDetector::new(&config),
            logged_grooming: HashSet::new(),
            logged_drinking: HashSet::new(),
            collision_log: Vec::new(),
            summary: RunSummary::default(),
            config,
            meta,
            finished: false,
        })
    }

    /// Analyze one frame. Frames must arrive in strictly increasing order;
    /// all perception results for the frame are expected up front.
    pub fn process_frame(
        &mut self,
        frame_idx: u64,
        detections: &[Detection],
        resolver: &dyn IdentityResolver,
        sink: &mut dyn EventSink,
        annotations: &mut dyn AnnotationSink,
    ) -> Result<FrameSummary> {
        let frame = FrameDetections::from_raw(detections, &self.config);
        self.motion.observe(&frame.brushes);

        let mut overlays = Self::base_overlays(&frame);
        let mut summary = FrameSummary {
            subjects_seen: frame.subjects.len(),
            ..Default::default()
        };

        for subject in &frame.subjects {
            let grooming_now =
                proximity::is_grooming(&subject.bbox, &frame.brushes, &self.motion, &self.config);
            if grooming_now {
                overlays.push(Overlay {
                    bbox: subject.bbox,
                    label: "Grooming".to_string(),
                    style: OverlayStyle::GroomingActive,
                });
            }
            if let Some(span) = self.grooming.update(subject.track_id, grooming_now, frame_idx) {
                if self.record_sustained(Behavior::Grooming, span, sink)? {
                    summary.events_recorded += 1;
                }
            }

            let drinking_now =
                proximity::is_drinking(&subject.bbox, &frame.heads, &frame.tubs, &self.config);
            if drinking_now {
                overlays.push(Overlay {
                    bbox: subject.bbox,
                    label: "Drinking".to_string(),
                    style: OverlayStyle::DrinkingActive,
                });
            }
            if let Some(span) = self.drinking.update(subject.track_id, drinking_now, frame_idx) {
                if self.record_sustained(Behavior::Drinking, span, sink)? {
                    summary.events_recorded += 1;
                }
            }
        }

        let hits = self.collisions.process_frame(
            frame_idx,
            self.meta.fps,
            &frame.subjects,
            &frame.heads,
            resolver,
        );
        for hit in hits {
            sink.record_event(&BehaviorEvent::new(
                hit.pair_id(),
                Behavior::Collision,
                hit.time_secs,
                &self.meta,
            ))?;
            for subject in &frame.subjects {
                if subject.track_id == hit.track_a || subject.track_id == hit.track_b {
                    overlays.push(Overlay {
                        bbox: subject.bbox,
                        label: "Head-butt".to_string(),
                        style: OverlayStyle::CollisionHighlight,
                    });
                }
            }
            self.collision_log.push(hit);
            summary.collisions_recorded += 1;
        }

        annotations.annotate_frame(frame_idx, &overlays)?;

        self.summary.frames_processed += 1;
        self.summary.events_recorded += summary.events_recorded;
        self.summary.collisions_recorded += summary.collisions_recorded;
        Ok(summary)
    }

    /// End-of-stream flush: every still-open sustained event is evaluated
    /// against its minimum bar and recorded if it passes, regardless of
    /// pending gap. Idempotent.
    pub fn finish(&mut self, sink: &mut dyn EventSink) -> Result<RunSummary> {
        if self.finished {
            return Ok(self.summary);
        }
        for span in self.grooming.finish() {
            if self.record_sustained(Behavior::Grooming, span, sink)? {
                self.summary.events_recorded += 1;
            }
        }
        for span in self.drinking.finish() {
            if self.record_sustained(Behavior::Drinking, span, sink)? {
                self.summary.events_recorded += 1;
            }
        }
        self.finished = true;
        log::debug!(
            "run complete: {} frames, {} events, {} collisions",
            self.summary.frames_processed,
            self.summary.events_recorded,
            self.summary.collisions_recorded
        );
        Ok(self.summary)
    }

    /// Collision records accumulated this run, for the append log.
    pub fn collision_log(&self) -> &[CollisionHit] {
        &self.collision_log
    }

    pub fn video_meta(&self) -> &VideoMeta {
        &self.meta
    }

    /// Record one finalized span unless its dedup key has already been
    /// written this run. Returns whether the sink was called.
    fn record_sustained(
        &mut self,
        behavior: Behavior,
        span: FinalizedSpan,
        sink: &mut dyn EventSink,
    ) -> Result<bool> {
        let key = (span.track_id, span.start_frame);
        let logged = match behavior {
            Behavior::Grooming => &mut self.logged_grooming,
            Behavior::Drinking => &mut self.logged_drinking,
            Behavior::Collision => unreachable!("collisions are not sustained spans"),
        };
        if !logged.insert(key) {
            return Ok(false);
        }

        let event = BehaviorEvent::new(
            span.track_id.to_string(),
            behavior,
            span.duration_secs(self.meta.fps),
            &self.meta,
        );
        sink.record_event(&event)?;
        Ok(true)
    }

    fn base_overlays(frame: &FrameDetections) -> Vec<Overlay> {
        let mut overlays = Vec::new();
        for subject in &frame.subjects {
            overlays.push(Overlay {
                bbox: subject.bbox,
                label: format!("cow - {}", subject.track_id),
                style: OverlayStyle::Subject,
            });
        }
        for head in &frame.heads {
            overlays.push(Overlay {
                bbox: head.bbox,
                label: "Cow Head".to_string(),
                style: OverlayStyle::SubjectHead,
            });
        }
        for brush in &frame.brushes {
            overlays.push(Overlay {
                bbox: brush.bbox,
                label: "Brush".to_string(),
                style: OverlayStyle::Apparatus,
            });
        }
        for tub in &frame.tubs {
            overlays.push(Overlay {
                bbox: tub.bbox,
                label: "Water Tub".to_string(),
                style: OverlayStyle::Receptacle,
            });
        }
        overlays
    }
}
