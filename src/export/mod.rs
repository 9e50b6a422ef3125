// Collision append log
// Flat CSV of every head-butt recorded in a run, written once at
// end-of-stream. Fields are fixed and none of them can contain commas,
// so no quoting is needed.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use crate::events::collision::CollisionHit;
use crate::video::VideoMeta;

const HEADER: &str = "subject_1,subject_2,time_secs,video_name,video_date,video_time,camera,logged_at";

/// Write the run's collision log to `path`, replacing any previous log
/// for the same video.
pub fn write_collision_log(path: &Path, hits: &[CollisionHit], meta: &VideoMeta) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_collision_records(&mut file, hits, meta)?;
    log::debug!("wrote {} collision records to {}", hits.len(), path.display());
    Ok(())
}

fn write_collision_records<W: Write>(
    writer: &mut W,
    hits: &[CollisionHit],
    meta: &VideoMeta,
) -> Result<()> {
    let logged_at = Utc::now().to_rfc3339();
    writeln!(writer, "{}", HEADER)?;
    for hit in hits {
        writeln!(
            writer,
            "{},{},{:.2},{},{},{},{},{}",
            hit.identity_a,
            hit.identity_b,
            hit.time_secs,
            meta.name,
            meta.date,
            meta.time,
            meta.camera,
            logged_at,
        )?;
    }
    Ok(())
}
