// Herdwatch - Library Entry Point
// Derives behavioral events (grooming, drinking, head-butts) from
// per-frame object detections. Detection, re-identification, and video
// codec work live outside this crate; it consumes typed boxes and emits
// events, overlays, and a collision log.

pub mod config;
pub mod constants;
pub mod db;
pub mod detection;
pub mod error;
pub mod events;
pub mod export;
pub mod geometry;
pub mod motion;
pub mod overlay;
pub mod pipeline;
pub mod proximity;
pub mod video;
