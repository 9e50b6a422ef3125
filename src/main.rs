// Herdwatch CLI binary

use std::collections::HashMap;
use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use herdwatch::config::AnalysisConfig;
use herdwatch::constants::{COLLISION_LOG_FILENAME, DB_FILENAME};
use herdwatch::db::{open_db, schema, SqliteEventSink};
use herdwatch::detection::FrameRecord;
use herdwatch::events::{MappedResolver, TrackIdResolver};
use herdwatch::export;
use herdwatch::overlay::{JsonlAnnotationSink, NullAnnotationSink};
use herdwatch::pipeline::FrameAnalyzer;
use herdwatch::video::VideoMeta;

#[derive(Parser)]
#[command(name = "herdwatch")]
#[command(about = "Herdwatch - behavioral event detection for barn camera footage", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a detection stream and record events
    Analyze {
        /// Detection stream (JSONL, one frame per line)
        detections: PathBuf,
        /// Video filename the detections came from (EventYYYYMMDDhhmmssCCC.mp4)
        #[arg(short, long)]
        video: String,
        /// Frame rate of the source video
        #[arg(long, default_value = "30.0")]
        fps: f64,
        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,
        /// Track-to-identity map (JSON object, track id -> identity)
        #[arg(long)]
        identities: Option<PathBuf>,
        /// Write per-frame overlay instructions here (JSONL)
        #[arg(long)]
        overlays: Option<PathBuf>,
        /// Collision log path
        #[arg(long)]
        collision_log: Option<PathBuf>,
        /// Analysis configuration (JSON), defaults otherwise
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List recorded events
    Events {
        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,
        /// Filter by video name
        #[arg(long)]
        video: Option<String>,
        /// Filter by behavior (grooming, drinking, collision)
        #[arg(long)]
        behavior: Option<String>,
        /// Maximum events to show
        #[arg(long, default_value = "100")]
        limit: i64,
    },

    /// Delete a video's recorded events
    Delete {
        /// Video name whose events to delete
        video: String,
        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            detections,
            video,
            fps,
            db,
            identities,
            overlays,
            collision_log,
            config,
        } => cmd_analyze(detections, video, fps, db, identities, overlays, collision_log, config),
        Commands::Events { db, video, behavior, limit } => cmd_events(db, video, behavior, limit),
        Commands::Delete { video, db } => cmd_delete(video, db),
    }
}

fn db_path(db: Option<PathBuf>) -> PathBuf {
    db.unwrap_or_else(|| PathBuf::from(DB_FILENAME))
}

#[allow(clippy::too_many_arguments)]
fn cmd_analyze(
    detections: PathBuf,
    video: String,
    fps: f64,
    db: Option<PathBuf>,
    identities: Option<PathBuf>,
    overlays: Option<PathBuf>,
    collision_log: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = match config {
        Some(path) => serde_json::from_str::<AnalysisConfig>(&std::fs::read_to_string(&path)?)?,
        None => AnalysisConfig::default(),
    };

    let meta = match VideoMeta::from_filename(&video, fps) {
        Ok(meta) => meta,
        Err(e) => {
            eprintln!("Warning: {}; date/time/camera will be blank", e);
            VideoMeta::unnamed(&video, fps)
        }
    };

    // Validates config + fps before anything touches the stream
    let mut analyzer = FrameAnalyzer::new(config, meta)?;

    let resolver: Box<dyn herdwatch::events::IdentityResolver> = match identities {
        Some(path) => {
            let map: HashMap<i64, String> =
                serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            Box::new(MappedResolver::new(map))
        }
        None => Box::new(TrackIdResolver),
    };

    let conn = open_db(&db_path(db))?;
    // Re-analysis replaces the video's prior events
    let removed = schema::delete_events_for_video(&conn, &video)?;
    if removed > 0 {
        println!("Cleared {} previously recorded events for {}", removed, video);
    }
    let mut sink = SqliteEventSink::new(conn);

    let mut annotations: Box<dyn herdwatch::overlay::AnnotationSink> = match &overlays {
        Some(path) => Box::new(JsonlAnnotationSink::new(std::io::BufWriter::new(
            std::fs::File::create(path)?,
        ))),
        None => Box::new(NullAnnotationSink),
    };

    let file = std::fs::File::open(&detections)?;
    let reader = std::io::BufReader::new(file);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FrameRecord = serde_json::from_str(&line)?;
        analyzer.process_frame(
            record.frame,
            &record.detections,
            resolver.as_ref(),
            &mut sink,
            annotations.as_mut(),
        )?;
    }

    let summary = analyzer.finish(&mut sink)?;

    let log_path = collision_log.unwrap_or_else(|| PathBuf::from(COLLISION_LOG_FILENAME));
    export::write_collision_log(&log_path, analyzer.collision_log(), analyzer.video_meta())?;

    println!("Analyzed {} frames of {}", summary.frames_processed, video);
    println!("  Events recorded:     {}", summary.events_recorded);
    println!("  Collisions recorded: {}", summary.collisions_recorded);
    println!("  Collision log:       {}", log_path.display());

    Ok(())
}

fn cmd_events(
    db: Option<PathBuf>,
    video: Option<String>,
    behavior: Option<String>,
    limit: i64,
) -> Result<()> {
    let conn = open_db(&db_path(db))?;
    let rows = schema::list_events(&conn, video.as_deref(), behavior.as_deref(), limit)?;

    if rows.is_empty() {
        println!("No events recorded.");
        return Ok(());
    }

    println!("{:<6} {:<10} {:<10} {:>10} {}", "ID", "Subject", "Behavior", "Value", "Video");
    for row in rows {
        println!(
            "{:<6} {:<10} {:<10} {:>10.2} {}",
            row.id, row.subject_id, row.behavior, row.event_value, row.video_name
        );
    }

    Ok(())
}

fn cmd_delete(video: String, db: Option<PathBuf>) -> Result<()> {
    let conn = open_db(&db_path(db))?;
    let removed = schema::delete_events_for_video(&conn, &video)?;
    println!("Deleted {} events for {}", removed, video);
    Ok(())
}
