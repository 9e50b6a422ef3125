// Behavioral events
// Output model for finalized events plus the seams to the outside world:
// the identity resolver (external re-id classifier) and the event sink
// (persistence). The core deduplicates before calling the sink, so the
// sink only needs to be at-least-once.

pub mod collision;
pub mod tracker;


use serde::{Deserialize, Serialize};

use crate::constants::{BEHAVIOR_COLLISION, BEHAVIOR_DRINKING, BEHAVIOR_GROOMING};
use crate::error::Result;
use crate::video::VideoMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    Grooming,
    Drinking,
    Collision,
}

impl Behavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Grooming => BEHAVIOR_GROOMING,
            Behavior::Drinking => BEHAVIOR_DRINKING,
            Behavior::Collision => BEHAVIOR_COLLISION,
        }
    }
}

/// A finalized behavioral event ready for persistence.
///
/// For sustained behaviors `value` is the merged-span duration in seconds;
/// for collisions it is the timestamp of the hit. For collisions
/// `subject_id` is the sorted resolved-identity pair joined with '-'.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub subject_id: String,
    pub behavior: Behavior,
    pub value: f64,
    pub video_name: String,
    pub video_date: String,
    pub video_time: String,
    pub camera_id: String,
}

impl BehaviorEvent {
    pub fn new(subject_id: String, behavior: Behavior, value: f64, meta: &VideoMeta) -> Self {
        Self {
            subject_id,
            behavior,
            value,
            video_name: meta.name.clone(),
            video_date: meta.date.clone(),
            video_time: meta.time.clone(),
            camera_id: meta.camera.clone(),
        }
    }
}

/// Maps a short-lived track id to a stable subject identity. Backed by the
/// external re-id classifier; used only for collision-pair dedup. Sustained
/// events key on raw track id + start frame instead.
pub trait IdentityResolver {
    fn resolve(&self, track_id: i64) -> String;
}

/// Fallback resolver: the track id stands in for identity. Matches the
/// original system's behavior when the classifier has no answer for a track.
#[derive(Debug, Default)]
pub struct TrackIdResolver;

impl IdentityResolver for TrackIdResolver {
    fn resolve(&self, track_id: i64) -> String {
        track_id.to_string()
    }
}

/// Resolver backed by a preloaded track-to-identity table, falling back to
/// the raw track id for unknown tracks.
#[derive(Debug, Default)]
pub struct MappedResolver {
    map: std::collections::HashMap<i64, String>,
}

impl MappedResolver {
    pub fn new(map: std::collections::HashMap<i64, String>) -> Self {
        Self { map }
    }
}

impl IdentityResolver for MappedResolver {
    fn resolve(&self, track_id: i64) -> String {
        self.map
            .get(&track_id)
            .cloned()
            .unwrap_or_else(|| track_id.to_string())
    }
}

/// Destination for finalized events. Must tolerate at-least-once delivery;
/// the caller guarantees it never sends the same dedup key twice in a run.
pub trait EventSink {
    fn record_event(&mut self, event: &BehaviorEvent) -> Result<()>;
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<BehaviorEvent>,
}

impl EventSink for MemorySink {
    fn record_event(&mut self, event: &BehaviorEvent) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}
