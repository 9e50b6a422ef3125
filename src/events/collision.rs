// Head-butt collision detector
// Instantaneous pairwise test: a head moving fast enough, toward the
// other subject, inside a buffered region around the other body. Either
// side of the pair can trigger. Fires at most once per resolved-identity
// pair for the whole run; track ids churn across occlusion, resolved
// identities do not, so the dedup key uses the latter.

use std::collections::{HashMap, HashSet};

use crate::config::AnalysisConfig;
use crate::detection::{BoundingBox, Detection};
use crate::geometry;
use crate::proximity::find_head;

use super::IdentityResolver;

/// One recorded head-butt between two resolved identities.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionHit {
    /// Sorted resolved identity pair.
    pub identity_a: String,
    pub identity_b: String,
    /// Raw track ids involved this frame, for overlay highlighting only.
    pub track_a: i64,
    pub track_b: i64,
    pub frame: u64,
    pub time_secs: f64,
}

impl CollisionHit {
    /// Composite subject id for persistence, order-normalized.
    pub fn pair_id(&self) -> String {
        format!("{}-{}", self.identity_a, self.identity_b)
    }
}

/// A subject whose head resolved this frame.
#[derive(Debug, Clone, Copy)]
struct HeadedSubject {
    track_id: i64,
    body: BoundingBox,
    head: (f64, f64),
    velocity: (f64, f64),
    speed: f64,
}

#[derive(Debug)]
pub struct CollisionDetector {
    prev_head_positions: HashMap<i64, (f64, f64)>,
    logged_pairs: HashSet<(String, String)>,
    buffer: f64,
    min_speed: f64,
}

impl CollisionDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            prev_head_positions: HashMap::new(),
            logged_pairs: HashSet::new(),
            buffer: config.head_proximity_buffer,
            min_speed: config.min_nudge_speed,
        }
    }

    /// Run the pairwise test for one frame. Subjects without a head box
    /// contained in their body box sit this frame out. Returns the hits
    /// newly recorded this frame.
    pub fn process_frame(
        &mut self,
        frame_idx: u64,
        fps: f64,
        subjects: &[Detection],
        heads: &[Detection],
        resolver: &dyn IdentityResolver,
    ) -> Vec<CollisionHit> {
        let current = self.resolve_heads(subjects, heads);

        let mut hits = Vec::new();
        for i in 0..current.len() {
            for j in (i + 1)..current.len() {
                let a = &current[i];
                let b = &current[j];

                if !(self.side_triggers(a, b) || self.side_triggers(b, a)) {
                    continue;
                }

                let id_a = resolver.resolve(a.track_id);
                let id_b = resolver.resolve(b.track_id);
                let mut pair = [id_a, id_b];
                pair.sort();
                let key = (pair[0].clone(), pair[1].clone());
                if !self.logged_pairs.insert(key) {
                    continue;
                }

                let [identity_a, identity_b] = pair;
                log::debug!(
                    "head-butt between {} and {} at frame {}",
                    identity_a,
                    identity_b,
                    frame_idx
                );
                hits.push(CollisionHit {
                    identity_a,
                    identity_b,
                    track_a: a.track_id,
                    track_b: b.track_id,
                    frame: frame_idx,
                    time_secs: frame_idx as f64 / fps,
                });
            }
        }
        hits
    }

    /// Match heads to bodies and derive per-head velocity from the previous
    /// frame's position (zero vector on first sight).
    fn resolve_heads(&mut self, subjects: &[Detection], heads: &[Detection]) -> Vec<HeadedSubject> {
        let mut current = Vec::new();
        for subject in subjects {
            let Some(head_box) = find_head(&subject.bbox, heads) else {
                continue;
            };
            let head = geometry::centroid(head_box);
            let velocity = match self.prev_head_positions.get(&subject.track_id) {
                Some(prev) => (head.0 - prev.0, head.1 - prev.1),
                None => (0.0, 0.0),
            };
            let speed = (velocity.0 * velocity.0 + velocity.1 * velocity.1).sqrt();
            self.prev_head_positions.insert(subject.track_id, head);
            current.push(HeadedSubject {
                track_id: subject.track_id,
                body: subject.bbox,
                head,
                velocity,
                speed,
            });
        }
        current
    }

    /// Whether `striker`'s head hits `target`: close to the target body,
    /// fast enough, and moving toward the target's centroid.
    fn side_triggers(&self, striker: &HeadedSubject, target: &HeadedSubject) -> bool {
        if !geometry::point_near_box(striker.head, &target.body, self.buffer) {
            return false;
        }
        if striker.speed < self.min_speed {
            return false;
        }
        let target_centroid = geometry::centroid(&target.body);
        let toward = (
            target_centroid.0 - striker.head.0,
            target_centroid.1 - striker.head.1,
        );
        striker.velocity.0 * toward.0 + striker.velocity.1 * toward.1 > crate::constants::DOT_PRODUCT_MIN
    }
}
