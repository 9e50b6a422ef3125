// Herdwatch Constants
// Every threshold the analysis pipeline uses, collected in one place.
// AnalysisConfig carries these per-run; these are the defaults.

// Detection filtering
pub const DETECTION_CONFIDENCE_MIN: f32 = 0.3;
pub const HEAD_CONFIDENCE_MIN: f32 = 0.5; // head boxes are noisier than bodies

// Grooming (brush contact)
pub const GROOMING_DISTANCE_THRESHOLD: f64 = 80.0; // px, subject centroid to brush centroid
pub const GROOMING_OVERLAP_RATIO: f64 = 0.02;      // fraction of subject box covered by brush

// Brush motion gate
pub const MOTION_HISTORY_LEN: usize = 10;          // centroid samples kept per apparatus
pub const MOTION_THRESHOLD: f64 = 2.0;             // mean px displacement per frame step

// Drinking (tub contact)
pub const DRINKING_HEAD_OVERLAP: f64 = 0.05;       // head box vs tub
pub const DRINKING_BODY_OVERLAP: f64 = 0.03;       // fallback when no head resolves

// Event merge/finalize
pub const MERGE_GAP_SECS: f64 = 5.0;               // silent gap still bridged into one event
pub const FINALIZE_GAP_SECS: f64 = 5.0;            // silent gap after which an open event closes
pub const GROOMING_MIN_DURATION_SECS: f64 = 1.0;
pub const DRINKING_MIN_ACTIVE_FRAMES: u64 = 30;

// Head-butt collision
pub const HEAD_PROXIMITY_BUFFER: f64 = 10.0;       // px, body box expansion for head contact
pub const MIN_NUDGE_SPEED: f64 = 0.15;             // px/frame, minimum head speed
pub const DOT_PRODUCT_MIN: f64 = 0.0;              // head velocity must point toward the other body

// Storage
pub const DB_FILENAME: &str = "herdwatch.db";
pub const COLLISION_LOG_FILENAME: &str = "collision_events.csv";
pub const DEFAULT_CAMERA_ID: &str = "000";

// Behavior labels as stored in the events table
pub const BEHAVIOR_GROOMING: &str = "grooming";
pub const BEHAVIOR_DRINKING: &str = "drinking";
pub const BEHAVIOR_COLLISION: &str = "collision";
